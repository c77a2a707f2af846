use std::fmt::Write as _;
use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{ArrayRef, Float64Array, StringArray, UInt64Array};
use arrow::datatypes::{Field, Schema};
use arrow::record_batch::RecordBatch;
use arrow::util::pretty::pretty_format_batches;

use crate::data::aggregate::GroupTotal;
use crate::format::{format_thousands, DisplayTable};
use crate::state::ControlOptions;
use crate::view::DashboardView;

// ---------------------------------------------------------------------------
// Text report
// ---------------------------------------------------------------------------

/// Render every dashboard section as a plain-text table.
pub fn render_text(view: &DashboardView) -> Result<String> {
    let mut out = String::new();
    writeln!(out, "Rows after filtering: {}", view.row_count)?;

    section(&mut out, "Total sales per category", totals_batch("Kategori", &view.category_totals)?)?;
    section(&mut out, "Daily sales trend", totals_batch("Tanggal", &view.daily_totals)?)?;
    section(
        &mut out,
        &format!("Top {} items by total sales", view.top_n),
        totals_batch("Nama_Item", &view.top_items)?,
    )?;
    section(&mut out, "Quantity vs total sales", scatter_batch(view)?)?;
    section(&mut out, "Total sales distribution", histogram_batch(view)?)?;
    section(&mut out, "Data table", display_batch(&view.display)?)?;
    Ok(out)
}

fn section(out: &mut String, title: &str, batch: RecordBatch) -> Result<()> {
    writeln!(out, "\n{title}")?;
    if batch.num_rows() == 0 {
        writeln!(out, "(no data)")?;
        return Ok(());
    }
    let table = pretty_format_batches(&[batch]).context("formatting table")?;
    writeln!(out, "{table}")?;
    Ok(())
}

fn batch_of(columns: Vec<(&str, ArrayRef)>) -> Result<RecordBatch> {
    let fields: Vec<Field> = columns
        .iter()
        .map(|(name, arr)| Field::new(*name, arr.data_type().clone(), true))
        .collect();
    let arrays = columns.into_iter().map(|(_, arr)| arr).collect();
    RecordBatch::try_new(Arc::new(Schema::new(fields)), arrays).context("building report table")
}

fn totals_batch(key_name: &str, totals: &[GroupTotal]) -> Result<RecordBatch> {
    let keys = StringArray::from_iter_values(totals.iter().map(|g| g.key.as_str()));
    let sums = StringArray::from_iter_values(totals.iter().map(|g| format_thousands(g.total)));
    batch_of(vec![
        (key_name, Arc::new(keys) as ArrayRef),
        ("Total_Penjualan", Arc::new(sums) as ArrayRef),
    ])
}

fn scatter_batch(view: &DashboardView) -> Result<RecordBatch> {
    let points = &view.scatter;
    batch_of(vec![
        (
            "Jumlah",
            Arc::new(UInt64Array::from_iter_values(points.iter().map(|p| p.quantity))) as ArrayRef,
        ),
        (
            "Total_Penjualan",
            Arc::new(Float64Array::from_iter_values(
                points.iter().map(|p| p.total_sale_amount),
            )) as ArrayRef,
        ),
        (
            "Kategori",
            Arc::new(StringArray::from_iter_values(points.iter().map(|p| p.category.as_str())))
                as ArrayRef,
        ),
        (
            "Nama_Item",
            Arc::new(StringArray::from_iter_values(points.iter().map(|p| p.item_name.as_str())))
                as ArrayRef,
        ),
    ])
}

fn histogram_batch(view: &DashboardView) -> Result<RecordBatch> {
    let bins = &view.histogram;
    batch_of(vec![
        (
            "from",
            Arc::new(StringArray::from_iter_values(bins.iter().map(|b| format_thousands(b.start))))
                as ArrayRef,
        ),
        (
            "to",
            Arc::new(StringArray::from_iter_values(bins.iter().map(|b| format_thousands(b.end))))
                as ArrayRef,
        ),
        (
            "count",
            Arc::new(UInt64Array::from_iter_values(bins.iter().map(|b| b.count as u64)))
                as ArrayRef,
        ),
    ])
}

fn display_batch(display: &DisplayTable) -> Result<RecordBatch> {
    let columns = display
        .columns
        .iter()
        .enumerate()
        .map(|(i, name)| {
            let values = display.rows.iter().map(|row| row.get(i).map(String::as_str));
            (name.as_str(), Arc::new(StringArray::from_iter(values)) as ArrayRef)
        })
        .collect();
    batch_of(columns)
}

/// Serialize the view for another front end.
pub fn render_json(view: &DashboardView) -> Result<String> {
    serde_json::to_string_pretty(view).context("serializing dashboard view")
}

// ---------------------------------------------------------------------------
// Control options
// ---------------------------------------------------------------------------

/// List the values each control accepts.
pub fn render_options_text(options: &ControlOptions) -> Result<String> {
    let mut out = String::new();
    match options.date_bounds {
        Some((start, end)) => writeln!(out, "Date range: {start} .. {end}")?,
        None => writeln!(out, "Date range: (no dates)")?,
    }
    writeln!(
        out,
        "Top-N: {}..={} (default {})",
        options.top_n_min, options.top_n_max, options.top_n_default
    )?;
    section(&mut out, "Categories", labels_batch("Kategori", &options.categories)?)?;
    section(&mut out, "Items", labels_batch("Nama_Item", &options.items)?)?;
    Ok(out)
}

fn labels_batch(name: &str, labels: &[String]) -> Result<RecordBatch> {
    let values = StringArray::from_iter_values(labels.iter().map(String::as_str));
    batch_of(vec![(name, Arc::new(values) as ArrayRef)])
}

pub fn render_options_json(options: &ControlOptions) -> Result<String> {
    serde_json::to_string_pretty(options).context("serializing control options")
}
