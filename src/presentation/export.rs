// =============================================================================
// CSV export
// =============================================================================
//
// Writes the export table to `<output_dir>/stock_analysis_<TICKER>_<stamp>.csv`
// where the stamp is the local time at second resolution. The directory is
// created on demand. Two exports of the same ticker within one second share
// a name; the later one wins.
// =============================================================================

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::NaiveDateTime;
use tracing::info;

use super::table::Table;

/// File name for an export taken at `at`.
pub fn export_file_name(ticker: &str, at: NaiveDateTime) -> String {
    format!("stock_analysis_{}_{}.csv", ticker, at.format("%Y%m%d_%H%M%S"))
}

/// Write `table` as CSV under `dir` and return the full path.
pub fn write_csv(dir: &Path, ticker: &str, table: &Table, at: NaiveDateTime) -> Result<PathBuf> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create output directory {}", dir.display()))?;

    let path = dir.join(export_file_name(ticker, at));
    let mut writer = csv::Writer::from_path(&path)
        .with_context(|| format!("Failed to open {}", path.display()))?;

    writer
        .write_record(&table.columns)
        .context("Failed to write CSV header")?;
    for row in &table.rows {
        writer
            .write_record(row.iter().map(|c| c.to_field()))
            .context("Failed to write CSV row")?;
    }
    writer.flush().context("Failed to flush CSV export")?;

    info!(path = %path.display(), rows = table.rows.len(), "CSV export written");
    Ok(path)
}

// =============================================================================
// Unit Tests
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;
    use crate::presentation::table::Cell;
    use chrono::NaiveDate;

    fn at() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 2, 24)
            .unwrap()
            .and_hms_opt(9, 5, 7)
            .unwrap()
    }

    #[test]
    fn file_name_embeds_ticker_and_stamp() {
        assert_eq!(
            export_file_name("AAPL", at()),
            "stock_analysis_AAPL_20250224_090507.csv"
        );
    }

    #[test]
    fn writes_header_rows_and_blank_nan() {
        let dir = tempfile::tempdir().unwrap();
        let out_dir = dir.path().join("nested").join("tmp");
        let table = Table {
            columns: vec!["Date".into(), "Close".into(), "CDLDOJI".into(), "RSI_14".into()],
            rows: vec![
                vec![
                    Cell::Text("2025-02-21".into()),
                    Cell::Number(101.5),
                    Cell::Signal(100),
                    Cell::Number(f64::NAN),
                ],
                vec![
                    Cell::Text("2025-02-24".into()),
                    Cell::Number(99.0),
                    Cell::Signal(0),
                    Cell::Number(55.25),
                ],
            ],
        };

        let path = write_csv(&out_dir, "AAPL", &table, at()).unwrap();
        assert!(path.starts_with(&out_dir));

        let text = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "Date,Close,CDLDOJI,RSI_14");
        assert_eq!(lines[1], "2025-02-21,101.5,100,");
        assert_eq!(lines[2], "2025-02-24,99,0,55.25");
    }

    #[test]
    fn non_ascii_placeholder_survives() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_csv(dir.path(), "XYZ", &Table::placeholder("XYZ"), at()).unwrap();
        let mut reader = csv::Reader::from_path(&path).unwrap();
        let record = reader.records().next().unwrap().unwrap();
        assert_eq!(&record[0], "XYZ 無資料或無形態。");
    }
}
