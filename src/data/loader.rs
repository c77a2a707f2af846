use std::path::Path;

use anyhow::{bail, Context, Result};
use arrow::array::{Array, ArrayRef, AsArray};
use arrow::compute::cast;
use arrow::datatypes::{
    DataType, Date32Type, Float32Type, Float64Type, Int16Type, Int32Type, Int64Type, Int8Type,
    UInt16Type, UInt32Type, UInt64Type, UInt8Type,
};
use arrow::util::display::array_value_to_string;
use calamine::{open_workbook_auto, Data, Reader};
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::Value as JsonValue;

use super::coerce;
use super::model::{RawCell, SaleRecord, SalesTable};
use super::schema::{resolve_columns, Column};

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Options that change how a file is read.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadOptions {
    /// Worksheet to read from a spreadsheet; the first sheet when `None`.
    pub sheet: Option<String>,
}

/// Load a sales table from a file with default options.
pub fn load_file(path: &Path) -> Result<SalesTable> {
    load_file_with(path, &LoadOptions::default())
}

/// Load a sales table from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.xlsx` / `.xlsm` / `.xlsb` / `.xls` / `.ods` – first row is the header
/// * `.csv`     – header row, one sale per line
/// * `.json`    – `[{ "Tanggal": "...", "Kategori": "...", ... }, ...]`
/// * `.parquet` – one column per field
pub fn load_file_with(path: &Path, options: &LoadOptions) -> Result<SalesTable> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let grid = match ext.as_str() {
        "xlsx" | "xlsm" | "xlsb" | "xls" | "ods" => read_spreadsheet(path, options.sheet.as_deref()),
        "csv" => read_csv(path),
        "json" => read_json(path),
        "parquet" | "pq" => read_parquet(path),
        other => bail!("Unsupported file extension: .{other}"),
    }
    .with_context(|| format!("loading {}", path.display()))?;

    let table = grid
        .into_table()
        .with_context(|| format!("loading {}", path.display()))?;
    log::info!(
        "Loaded {} sales rows from {} (extra columns: {:?})",
        table.len(),
        path.display(),
        table.extra_columns
    );
    Ok(table)
}

// ---------------------------------------------------------------------------
// RawGrid – header + cells, shared by every format
// ---------------------------------------------------------------------------

/// Untyped contents of a file: a header row and data rows.
#[derive(Debug, Default)]
pub(crate) struct RawGrid {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<RawCell>>,
}

impl RawGrid {
    /// Resolve columns and coerce every row. Rows are never dropped.
    pub(crate) fn into_table(self) -> Result<SalesTable> {
        let columns = resolve_columns(&self.headers)?;
        let extra_columns: Vec<String> = columns.extras.iter().map(|(_, h)| h.clone()).collect();

        let empty = RawCell::Empty;
        let mut lossy = 0usize;
        let mut records = Vec::with_capacity(self.rows.len());

        for row in &self.rows {
            let cell = |c: Column| row.get(columns.position(c)).unwrap_or(&empty);

            let date_cell = cell(Column::Date);
            let qty_cell = cell(Column::Quantity);
            let amount_cell = cell(Column::TotalSaleAmount);
            lossy += usize::from(coerce::is_lossy_date(date_cell))
                + usize::from(coerce::is_lossy_number(qty_cell))
                + usize::from(coerce::is_lossy_number(amount_cell));

            records.push(SaleRecord {
                date: coerce::to_date(date_cell),
                category: coerce::to_label(cell(Column::Category)),
                item_name: coerce::to_label(cell(Column::ItemName)),
                quantity: coerce::to_quantity(qty_cell),
                total_sale_amount: coerce::to_amount(amount_cell),
                extras: columns
                    .extras
                    .iter()
                    .map(|(pos, _)| row.get(*pos).cloned().unwrap_or(RawCell::Empty))
                    .collect(),
            });
        }

        if lossy > 0 {
            log::debug!("{lossy} cell(s) could not be read and were coerced to defaults");
        }
        Ok(SalesTable::from_records(records, extra_columns))
    }
}

// ---------------------------------------------------------------------------
// Spreadsheet reader
// ---------------------------------------------------------------------------

/// Read one worksheet; the first row is the header.
fn read_spreadsheet(path: &Path, sheet: Option<&str>) -> Result<RawGrid> {
    let mut workbook = open_workbook_auto(path).context("opening workbook")?;

    let sheet_name = match sheet {
        Some(name) => name.to_string(),
        None => workbook
            .sheet_names()
            .first()
            .cloned()
            .context("workbook contains no sheets")?,
    };
    let range = workbook
        .worksheet_range(&sheet_name)
        .with_context(|| format!("reading sheet '{sheet_name}'"))?;

    let mut rows = range.rows();
    let headers: Vec<String> = match rows.next() {
        Some(header) => header.iter().map(|c| excel_cell(c).to_string()).collect(),
        None => Vec::new(),
    };
    let rows: Vec<Vec<RawCell>> = rows
        .map(|row| row.iter().map(excel_cell).collect())
        .collect();

    Ok(RawGrid { headers, rows })
}

pub(crate) fn excel_cell(value: &Data) -> RawCell {
    match value {
        Data::Empty => RawCell::Empty,
        Data::String(s) => RawCell::Text(s.clone()),
        Data::Int(i) => RawCell::Int(*i),
        Data::Float(f) => RawCell::Float(*f),
        Data::Bool(b) => RawCell::Bool(*b),
        Data::DateTime(dt) => dt
            .as_datetime()
            .map(|d| RawCell::Date(d.date()))
            .unwrap_or(RawCell::Empty),
        Data::DateTimeIso(s) => coerce::to_date(&RawCell::Text(s.clone()))
            .map(RawCell::Date)
            .unwrap_or_else(|| RawCell::Text(s.clone())),
        Data::DurationIso(s) => RawCell::Text(s.clone()),
        // Formula errors (#N/A, #DIV/0!, ...) read as missing values.
        Data::Error(_) => RawCell::Empty,
    }
}

// ---------------------------------------------------------------------------
// CSV reader
// ---------------------------------------------------------------------------

/// CSV layout: header row with column names, one sale per record.
fn read_csv(path: &Path) -> Result<RawGrid> {
    let mut reader = csv::Reader::from_path(path).context("opening CSV")?;
    let headers: Vec<String> = reader
        .headers()
        .context("reading CSV headers")?
        .iter()
        .map(|h| h.to_string())
        .collect();

    let mut rows: Vec<Vec<RawCell>> = Vec::new();
    for (row_no, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("CSV row {row_no}"))?;
        rows.push(record.iter().map(guess_cell_type).collect());
    }

    Ok(RawGrid { headers, rows })
}

fn guess_cell_type(s: &str) -> RawCell {
    if s.is_empty() {
        return RawCell::Empty;
    }
    if let Ok(i) = s.parse::<i64>() {
        return RawCell::Int(i);
    }
    if let Ok(f) = s.parse::<f64>() {
        return RawCell::Float(f);
    }
    match s {
        "true" | "True" | "TRUE" => RawCell::Bool(true),
        "false" | "False" | "FALSE" => RawCell::Bool(false),
        _ => RawCell::Text(s.to_string()),
    }
}

// ---------------------------------------------------------------------------
// JSON reader
// ---------------------------------------------------------------------------

/// Expected JSON schema (records-oriented, `df.to_json(orient='records')`):
///
/// ```json
/// [
///   { "Tanggal": "2024-01-01", "Kategori": "Coffee", "Nama_Item": "Latte",
///     "Jumlah": 2, "Total_Penjualan": 50000 },
///   ...
/// ]
/// ```
///
/// The header is the union of keys in first-seen order.
fn read_json(path: &Path) -> Result<RawGrid> {
    let text = std::fs::read_to_string(path).context("reading JSON file")?;
    let root: JsonValue = serde_json::from_str(&text).context("parsing JSON")?;

    let records = root.as_array().context("Expected top-level JSON array")?;

    let mut headers: Vec<String> = Vec::new();
    for (i, rec) in records.iter().enumerate() {
        let obj = rec
            .as_object()
            .with_context(|| format!("Row {i} is not a JSON object"))?;
        for key in obj.keys() {
            if !headers.contains(key) {
                headers.push(key.clone());
            }
        }
    }

    let rows = records
        .iter()
        .filter_map(|rec| rec.as_object())
        .map(|obj| {
            headers
                .iter()
                .map(|h| obj.get(h).map(json_cell).unwrap_or(RawCell::Empty))
                .collect()
        })
        .collect();

    Ok(RawGrid { headers, rows })
}

fn json_cell(val: &JsonValue) -> RawCell {
    match val {
        JsonValue::String(s) => RawCell::Text(s.clone()),
        JsonValue::Number(n) => {
            if let Some(i) = n.as_i64() {
                RawCell::Int(i)
            } else if let Some(f) = n.as_f64() {
                RawCell::Float(f)
            } else {
                RawCell::Text(n.to_string())
            }
        }
        JsonValue::Bool(b) => RawCell::Bool(*b),
        JsonValue::Null => RawCell::Empty,
        other => RawCell::Text(other.to_string()),
    }
}

// ---------------------------------------------------------------------------
// Parquet reader
// ---------------------------------------------------------------------------

/// Load a Parquet file with one column per field.
///
/// Works with files written by both **Pandas** (`df.to_parquet()`) and
/// **Polars** (`df.write_parquet()`). Date, Date64 and Timestamp columns are
/// read as calendar dates; other types fall back to their text rendering.
fn read_parquet(path: &Path) -> Result<RawGrid> {
    let file = std::fs::File::open(path).context("opening parquet file")?;
    let builder =
        ParquetRecordBatchReaderBuilder::try_new(file).context("reading parquet metadata")?;
    let headers: Vec<String> = builder
        .schema()
        .fields()
        .iter()
        .map(|f| f.name().clone())
        .collect();
    let reader = builder.build().context("building parquet reader")?;

    let mut rows: Vec<Vec<RawCell>> = Vec::new();
    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;
        let columns = batch
            .columns()
            .iter()
            .map(arrow_column_cells)
            .collect::<Result<Vec<_>>>()?;

        for row in 0..batch.num_rows() {
            rows.push(columns.iter().map(|col| col[row].clone()).collect());
        }
    }

    Ok(RawGrid { headers, rows })
}

/// Convert a whole Arrow column into cells.
fn arrow_column_cells(col: &ArrayRef) -> Result<Vec<RawCell>> {
    let len = col.len();
    let cell_at = |row: usize, f: &dyn Fn(usize) -> RawCell| {
        if col.is_null(row) {
            RawCell::Empty
        } else {
            f(row)
        }
    };

    macro_rules! ints {
        ($t:ty) => {{
            let arr = col.as_primitive::<$t>();
            (0..len)
                .map(|r| cell_at(r, &|r| RawCell::Int(i64::from(arr.value(r)))))
                .collect()
        }};
    }

    let cells: Vec<RawCell> = match col.data_type() {
        DataType::Utf8 => {
            let arr = col.as_string::<i32>();
            (0..len)
                .map(|r| cell_at(r, &|r| RawCell::Text(arr.value(r).to_string())))
                .collect()
        }
        DataType::LargeUtf8 => {
            let arr = col.as_string::<i64>();
            (0..len)
                .map(|r| cell_at(r, &|r| RawCell::Text(arr.value(r).to_string())))
                .collect()
        }
        DataType::Int8 => ints!(Int8Type),
        DataType::Int16 => ints!(Int16Type),
        DataType::Int32 => ints!(Int32Type),
        DataType::Int64 => ints!(Int64Type),
        DataType::UInt8 => ints!(UInt8Type),
        DataType::UInt16 => ints!(UInt16Type),
        DataType::UInt32 => ints!(UInt32Type),
        DataType::UInt64 => {
            let arr = col.as_primitive::<UInt64Type>();
            (0..len)
                .map(|r| {
                    cell_at(r, &|r| {
                        i64::try_from(arr.value(r))
                            .map(RawCell::Int)
                            .unwrap_or(RawCell::Float(arr.value(r) as f64))
                    })
                })
                .collect()
        }
        DataType::Float32 => {
            let arr = col.as_primitive::<Float32Type>();
            (0..len)
                .map(|r| cell_at(r, &|r| RawCell::Float(f64::from(arr.value(r)))))
                .collect()
        }
        DataType::Float64 => {
            let arr = col.as_primitive::<Float64Type>();
            (0..len)
                .map(|r| cell_at(r, &|r| RawCell::Float(arr.value(r))))
                .collect()
        }
        DataType::Boolean => {
            let arr = col.as_boolean();
            (0..len)
                .map(|r| cell_at(r, &|r| RawCell::Bool(arr.value(r))))
                .collect()
        }
        DataType::Date32 => date32_cells(col),
        DataType::Date64 | DataType::Timestamp(_, _) => {
            let dates = cast(col, &DataType::Date32).context("casting timestamps to dates")?;
            date32_cells(&dates)
        }
        _ => (0..len)
            .map(|r| {
                cell_at(r, &|r| {
                    array_value_to_string(col, r)
                        .map(RawCell::Text)
                        .unwrap_or(RawCell::Empty)
                })
            })
            .collect(),
    };
    Ok(cells)
}

fn date32_cells(col: &ArrayRef) -> Vec<RawCell> {
    let arr = col.as_primitive::<Date32Type>();
    (0..arr.len())
        .map(|r| {
            if arr.is_null(r) {
                RawCell::Empty
            } else {
                arr.value_as_date(r).map(RawCell::Date).unwrap_or(RawCell::Empty)
            }
        })
        .collect()
}
