//! Write a synthetic coffee-shop sales dataset to `sample_sales.parquet` and
//! `sample_sales.csv`. A few cells are left blank or malformed on purpose so
//! the loader's coercion shows up in the dashboard.

use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{Date32Array, Float64Array, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use chrono::{Duration, NaiveDate};
use parquet::arrow::ArrowWriter;

const DAYS: i64 = 60;
const PARQUET_PATH: &str = "sample_sales.parquet";
const CSV_PATH: &str = "sample_sales.csv";

/// (category, item, unit price in rupiah, relative popularity)
const MENU: &[(&str, &str, f64, u64)] = &[
    ("Coffee", "Espresso", 18_000.0, 6),
    ("Coffee", "Americano", 22_000.0, 8),
    ("Coffee", "Cappuccino", 28_000.0, 7),
    ("Coffee", "Latte", 30_000.0, 9),
    ("Coffee", "Kopi Susu Gula Aren", 25_000.0, 10),
    ("Non-Coffee", "Matcha Latte", 32_000.0, 5),
    ("Non-Coffee", "Chocolate", 27_000.0, 4),
    ("Non-Coffee", "Lemon Tea", 15_000.0, 3),
    ("Food", "Croissant", 25_000.0, 5),
    ("Food", "Banana Bread", 22_000.0, 3),
    ("Food", "Nasi Goreng", 35_000.0, 4),
    ("Food", "French Fries", 20_000.0, 4),
];

/// Minimal deterministic PRNG (splitmix64).
struct SimpleRng(u64);

impl SimpleRng {
    fn next_u64(&mut self) -> u64 {
        self.0 = self.0.wrapping_add(0x9E37_79B9_7F4A_7C15);
        let mut z = self.0;
        z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
        z ^ (z >> 31)
    }

    fn below(&mut self, n: u64) -> u64 {
        self.next_u64() % n
    }
}

fn pick_item(rng: &mut SimpleRng) -> usize {
    let total: u64 = MENU.iter().map(|m| m.3).sum();
    let mut roll = rng.below(total);
    for (i, m) in MENU.iter().enumerate() {
        if roll < m.3 {
            return i;
        }
        roll -= m.3;
    }
    MENU.len() - 1
}

#[derive(Default)]
struct Columns {
    dates: Vec<Option<NaiveDate>>,
    categories: Vec<Option<String>>,
    items: Vec<Option<String>>,
    quantities: Vec<Option<i64>>,
    totals: Vec<Option<f64>>,
}

fn generate(rng: &mut SimpleRng, start: NaiveDate) -> Columns {
    let mut cols = Columns::default();
    for day in 0..DAYS {
        let date = start + Duration::days(day);
        // Weekends are busier.
        let weekend = day % 7 >= 5;
        let sales = 15 + rng.below(if weekend { 25 } else { 12 });

        for _ in 0..sales {
            let (category, item, price, _) = MENU[pick_item(rng)];
            let qty = 1 + rng.below(3) as i64;
            let blank = rng.below(100);

            cols.dates.push((blank != 0).then_some(date));
            cols.categories.push((blank != 1).then(|| category.to_string()));
            cols.items.push((blank != 2).then(|| item.to_string()));
            cols.quantities.push((blank != 3).then_some(qty));
            cols.totals.push((blank != 4).then_some(price * qty as f64));
        }
    }
    cols
}

fn write_parquet(cols: &Columns) -> Result<()> {
    let epoch = NaiveDate::from_ymd_opt(1970, 1, 1).context("epoch date")?;
    let days: Vec<Option<i32>> = cols
        .dates
        .iter()
        .map(|d| d.map(|d| (d - epoch).num_days() as i32))
        .collect();

    let schema = Arc::new(Schema::new(vec![
        Field::new("Tanggal", DataType::Date32, true),
        Field::new("Kategori", DataType::Utf8, true),
        Field::new("Nama_Item", DataType::Utf8, true),
        Field::new("Jumlah", DataType::Int64, true),
        Field::new("Total_Penjualan", DataType::Float64, true),
    ]));

    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![
            Arc::new(Date32Array::from(days)),
            Arc::new(StringArray::from(cols.categories.clone())),
            Arc::new(StringArray::from(cols.items.clone())),
            Arc::new(Int64Array::from(cols.quantities.clone())),
            Arc::new(Float64Array::from(cols.totals.clone())),
        ],
    )
    .context("building record batch")?;

    let file = std::fs::File::create(PARQUET_PATH).context("creating parquet file")?;
    let mut writer = ArrowWriter::try_new(file, schema, None).context("creating writer")?;
    writer.write(&batch).context("writing batch")?;
    writer.close().context("closing writer")?;
    Ok(())
}

/// The CSV copy uses lowercase headers and text dates, to exercise header
/// resolution and date parsing.
fn write_csv(cols: &Columns) -> Result<()> {
    let mut writer = csv::Writer::from_path(CSV_PATH).context("creating CSV file")?;
    writer.write_record(["tanggal", "kategori", "nama_item", "jumlah", "total_penjualan"])?;
    for i in 0..cols.dates.len() {
        writer.write_record([
            cols.dates[i]
                .map(|d| d.format("%Y-%m-%d").to_string())
                .unwrap_or_else(|| "n/a".to_string()),
            cols.categories[i].clone().unwrap_or_default(),
            cols.items[i].clone().unwrap_or_default(),
            cols.quantities[i].map(|q| q.to_string()).unwrap_or_default(),
            cols.totals[i].map(|t| t.to_string()).unwrap_or_default(),
        ])?;
    }
    writer.flush()?;
    Ok(())
}

fn main() -> Result<()> {
    let mut rng = SimpleRng(42);
    let start = NaiveDate::from_ymd_opt(2024, 1, 1).context("start date")?;
    let cols = generate(&mut rng, start);

    write_parquet(&cols)?;
    write_csv(&cols)?;

    println!(
        "Wrote {} sales over {DAYS} days to {PARQUET_PATH} and {CSV_PATH}",
        cols.dates.len()
    );
    Ok(())
}
