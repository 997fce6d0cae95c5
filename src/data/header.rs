use std::collections::HashMap;

use crate::data::datetime::parse_timestamp;

/// Rows inspected when looking for the header.
pub const HEADER_SCAN_ROWS: usize = 50;

/// Find the header row of a tabular export. Backend reports sometimes put a
/// title or generation date above the table, so the header is taken to be the
/// first row (within the first `HEADER_SCAN_ROWS`) whose width matches the
/// table and whose cells are all non-empty, non-numeric, non-date text.
/// Data rows of an all-text table qualify too, so the first match wins.
/// Returns 0 when nothing qualifies.
pub fn detect_header_row(rows: &[Vec<String>]) -> usize {
    let rows = &rows[..rows.len().min(HEADER_SCAN_ROWS)];

    let mut counts: HashMap<usize, usize> = HashMap::new();
    for row in rows {
        *counts.entry(used_width(row)).or_insert(0) += 1;
    }
    // Ties go to the wider table so a short title line never wins.
    let table_width = counts
        .into_iter()
        .max_by_key(|&(width, count)| (count, width))
        .map(|(width, _)| width)
        .unwrap_or(0);

    rows.iter()
        .position(|row| used_width(row) == table_width && row[..table_width].iter().all(|c| is_label(c)))
        .unwrap_or(0)
}

/// Width ignoring trailing empty cells, which spreadsheets pad rows with.
fn used_width(row: &[String]) -> usize {
    row.iter().rposition(|c| !c.trim().is_empty()).map_or(0, |i| i + 1)
}

fn is_label(cell: &str) -> bool {
    let trimmed = cell.trim();
    !trimmed.is_empty() && trimmed.parse::<f64>().is_err() && parse_timestamp(trimmed).is_none()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rows(lines: &[&[&str]]) -> Vec<Vec<String>> {
        lines.iter().map(|r| r.iter().map(|s| s.to_string()).collect()).collect()
    }

    #[test]
    fn plain_header_is_row_zero() {
        let r = rows(&[
            &["timestamp", "temp_C", "rh_pct"],
            &["2025-01-01T00:00:00Z", "251", "640"],
            &["2025-01-01T01:00:00Z", "249", "650"],
        ]);
        assert_eq!(detect_header_row(&r), 0);
    }

    #[test]
    fn title_lines_above_the_table_are_skipped() {
        let r = rows(&[
            &["Silo report", "", ""],
            &["Generated", "2025-01-02", ""],
            &["timestamp", "temp_C", "rh_pct"],
            &["2025-01-01T00:00:00Z", "251", "640"],
            &["2025-01-01T01:00:00Z", "249", "650"],
        ]);
        assert_eq!(detect_header_row(&r), 2);
    }

    #[test]
    fn all_text_table_keeps_its_data_rows() {
        let r = rows(&[
            &["_id", "name", "device_id", "location"],
            &["a1", "North", "esp-01", "Farm road"],
            &["b2", "South", "esp-02", "River bend"],
        ]);
        assert_eq!(detect_header_row(&r), 0);

        let mut with_title = rows(&[&["Silo list", "", "", ""]]);
        with_title.extend(r);
        assert_eq!(detect_header_row(&with_title), 1);
    }

    #[test]
    fn no_label_row_defaults_to_zero() {
        let r = rows(&[&["1", "2"], &["3", "4"]]);
        assert_eq!(detect_header_row(&r), 0);
    }
}
