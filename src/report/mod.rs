//! Fixed-precision CSV rendering of a corrected comparison family.

use std::fs;
use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};

use crate::comparison::{ComparisonFamily, ComparisonRecord};

/// Report columns, in output order.
pub const COLUMNS: [&str; 14] = [
    "comparison",
    "n",
    "t_stat",
    "df",
    "p_value",
    "mean_diff",
    "conf_low",
    "conf_high",
    "cohen_d",
    "shapiro_p",
    "wilcox_p",
    "p_adj_bonferroni",
    "p_adj_holm",
    "p_adj_bh",
];

pub type ReportRow = Vec<String>;

/// Round half away from zero to `precision` decimal places.
pub fn round_to(value: f64, precision: usize) -> f64 {
    let factor = 10f64.powi(precision as i32);
    let rounded = (value * factor).round() / factor;
    if rounded == 0.0 { 0.0 } else { rounded }
}

/// Missing values and non-finite values render as an empty field.
///
/// Values too large to scale by `10^precision` are written unrounded.
pub fn format_value(value: Option<f64>, precision: usize) -> String {
    match value {
        Some(v) if v.is_finite() => {
            let rounded = round_to(v, precision);
            if rounded.is_finite() {
                rounded.to_string()
            } else {
                v.to_string()
            }
        }
        _ => String::new(),
    }
}

pub fn format_record(record: &ComparisonRecord, precision: usize) -> ReportRow {
    let numeric = [
        record.t_stat,
        record.df,
        record.p_value,
        record.mean_diff,
        record.conf_low,
        record.conf_high,
        record.cohen_d,
        record.shapiro_p,
        record.wilcox_p,
        record.p_adj_bonferroni,
        record.p_adj_holm,
        record.p_adj_bh,
    ];

    let mut row = Vec::with_capacity(COLUMNS.len());
    row.push(record.comparison.clone());
    row.push(record.n.to_string());
    row.extend(numeric.iter().map(|&v| format_value(v, precision)));
    row
}

/// One row per record, in family order.
pub fn format_family(family: &ComparisonFamily, precision: usize) -> Vec<ReportRow> {
    family
        .records
        .iter()
        .map(|record| format_record(record, precision))
        .collect()
}

/// Serialize rows with the header to any writer.
pub fn write_rows<W: Write>(writer: W, rows: &[ReportRow]) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(COLUMNS)?;
    for row in rows {
        wtr.write_record(row)?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn render_csv(rows: &[ReportRow]) -> Result<String> {
    let mut buffer = Vec::new();
    write_rows(&mut buffer, rows)?;
    Ok(String::from_utf8(buffer)?)
}

pub fn write_report(path: &Path, rows: &[ReportRow]) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    let file =
        fs::File::create(path).with_context(|| format!("failed to create {}", path.display()))?;
    write_rows(file, rows).with_context(|| format!("failed to write {}", path.display()))
}
