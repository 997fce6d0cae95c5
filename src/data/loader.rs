use std::path::Path;

use serde::de::DeserializeOwned;
use serde_json::{Number, Value};

use crate::data::datetime::{format_timestamp, from_excel_serial};
use crate::data::header::detect_header_row;
use crate::data::normalize::{normalize_readings, Record};
use crate::data::units::UnitScale;
use crate::error::{Error, Result};
use crate::state::forecast::ForecastPoint;
use crate::state::reading::Reading;
use crate::state::silo::Silo;

/// Load a JSON, CSV or Excel export as loose records.
pub fn load_records(path: &Path) -> Result<Vec<Record>> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
        .unwrap_or_default();

    let records = match ext.as_str() {
        "json" => load_json(path)?,
        "csv" => rows_to_records(read_csv_rows(path)?)?,
        "xls" | "xlsx" => rows_to_records(read_excel_rows(path)?)?,
        _ => return Err(Error::UnsupportedFormat(ext)),
    };

    tracing::info!("Loaded {} records from {:?}", records.len(), path);
    Ok(records)
}

pub fn load_readings(path: &Path, scale: UnitScale) -> Result<Vec<Reading>> {
    Ok(normalize_readings(&load_records(path)?, scale))
}

pub fn load_forecasts(path: &Path) -> Result<Vec<ForecastPoint>> {
    load_typed(path)
}

pub fn load_silos(path: &Path) -> Result<Vec<Silo>> {
    load_typed(path)
}

fn load_typed<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    load_records(path)?
        .into_iter()
        .map(|r| serde_json::from_value(Value::Object(r)).map_err(Error::from))
        .collect()
}

fn load_json(path: &Path) -> Result<Vec<Record>> {
    let text = std::fs::read_to_string(path)?;
    match serde_json::from_str::<Value>(&text)? {
        Value::Array(items) => items
            .into_iter()
            .enumerate()
            .map(|(i, item)| match item {
                Value::Object(map) => Ok(map),
                other => Err(Error::Malformed(format!(
                    "item {i} is not an object: {other}"
                ))),
            })
            .collect(),
        _ => Err(Error::Malformed("expected a JSON array of records".to_string())),
    }
}

fn read_csv_rows(path: &Path) -> Result<Vec<Vec<String>>> {
    let content = std::fs::read(path)?;
    // Exports from older spreadsheet tools are sometimes latin1.
    let text = match String::from_utf8(content) {
        Ok(s) => s,
        Err(e) => e.into_bytes().iter().map(|&b| b as char).collect(),
    };

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b',')
        .has_headers(false)
        .flexible(true)
        .from_reader(text.as_bytes());

    let mut rows = Vec::new();
    for (line, result) in reader.records().enumerate() {
        match result {
            Ok(record) => rows.push(record.iter().map(|s| s.to_string()).collect()),
            Err(e) => tracing::debug!("Skipping CSV line {}: {e}", line + 1),
        }
    }
    Ok(rows)
}

fn read_excel_rows(path: &Path) -> Result<Vec<Vec<String>>> {
    use calamine::{open_workbook_auto, Data, Reader};

    let mut workbook =
        open_workbook_auto(path).map_err(|e| Error::Spreadsheet(format!("cannot open workbook: {e}")))?;

    let sheet_name = workbook
        .sheet_names()
        .first()
        .cloned()
        .ok_or_else(|| Error::Spreadsheet("no sheets found".to_string()))?;

    let range = workbook
        .worksheet_range(&sheet_name)
        .map_err(|e| Error::Spreadsheet(format!("cannot read sheet {sheet_name}: {e}")))?;

    Ok(range
        .rows()
        .map(|row| {
            row.iter()
                .map(|cell| match cell {
                    Data::Empty => String::new(),
                    Data::String(s) => s.clone(),
                    Data::Float(f) => f.to_string(),
                    Data::Int(i) => i.to_string(),
                    Data::Bool(b) => b.to_string(),
                    Data::DateTime(dt) => from_excel_serial(dt.as_f64())
                        .map(|ts| format_timestamp(&ts))
                        .unwrap_or_default(),
                    Data::DateTimeIso(s) => s.clone(),
                    Data::DurationIso(s) => s.clone(),
                    Data::Error(_) => String::new(),
                })
                .collect()
        })
        .collect())
}

/// Turn header + data rows into records. Empty cells are left out so they
/// read as missing; numeric cells become JSON numbers.
fn rows_to_records(rows: Vec<Vec<String>>) -> Result<Vec<Record>> {
    if rows.is_empty() {
        return Err(Error::Malformed("no rows found".to_string()));
    }

    let header_row = detect_header_row(&rows);
    let columns: Vec<String> = rows[header_row].iter().map(|s| s.trim().to_string()).collect();

    let records = rows[header_row + 1..]
        .iter()
        .filter(|row| row.iter().any(|c| !c.trim().is_empty()))
        .map(|row| {
            columns
                .iter()
                .zip(row.iter())
                .filter(|(name, _)| !name.is_empty())
                .filter_map(|(name, cell)| cell_to_value(cell).map(|v| (name.clone(), v)))
                .collect()
        })
        .collect();

    Ok(records)
}

fn cell_to_value(cell: &str) -> Option<Value> {
    let trimmed = cell.trim();
    if trimmed.is_empty() {
        return None;
    }
    if let Ok(i) = trimmed.parse::<i64>() {
        return Some(Value::Number(i.into()));
    }
    match trimmed.parse::<f64>().ok().and_then(Number::from_f64) {
        Some(n) => Some(Value::Number(n)),
        None => Some(Value::String(trimmed.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn to_rows(lines: &[&[&str]]) -> Vec<Vec<String>> {
        lines.iter().map(|r| r.iter().map(|s| s.to_string()).collect()).collect()
    }

    #[test]
    fn cells_become_typed_values() {
        assert_eq!(cell_to_value(" 42 "), Some(Value::from(42)));
        assert_eq!(cell_to_value("25.5"), Some(Value::from(25.5)));
        assert_eq!(cell_to_value("temp"), Some(Value::from("temp")));
        assert_eq!(cell_to_value("NaN"), Some(Value::from("NaN")));
        assert_eq!(cell_to_value("  "), None);
    }

    #[test]
    fn rows_skip_blank_lines_and_blank_cells() {
        let records = rows_to_records(to_rows(&[
            &["silo_id", "temp_C", "rh_pct"],
            &["s1", "251", ""],
            &["", "", ""],
            &["s1", "249", "650"],
        ]))
        .unwrap();
        assert_eq!(records.len(), 2);
        assert!(!records[0].contains_key("rh_pct"));
        assert_eq!(records[1].get("rh_pct"), Some(&Value::from(650)));
    }

    #[test]
    fn latin1_and_ragged_csv_rows_are_all_read() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("silos.csv");
        std::fs::write(&path, b"_id,name\ns1,Caf\xe9\ns2\n").unwrap();

        let rows = read_csv_rows(&path).unwrap();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[1], vec!["s1".to_string(), "Caf\u{e9}".to_string()]);
        assert_eq!(rows[2], vec!["s2".to_string()]);
    }

    #[test]
    fn short_rows_only_fill_leading_columns() {
        let records = rows_to_records(to_rows(&[&["a", "b"], &["1"]])).unwrap();
        assert_eq!(records[0].len(), 1);
    }
}
