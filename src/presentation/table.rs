// =============================================================================
// Result tables
// =============================================================================
//
// Two wide tables are built per request:
//
//   results  date + OHLCV + the retained pattern columns + indicators, one row
//            per date that survived filtering (what the page shows)
//   export   date + OHLCV + all 61 pattern columns + indicators, one row per
//            bar (what goes into the CSV)
//
// Degenerate outcomes use single-cell tables: a "Message" placeholder when no
// pattern survived, an "Error" row when the pipeline failed.
// =============================================================================

use serde::Serialize;

use crate::indicators::IndicatorTable;
use crate::market_data::BarSeries;
use crate::patterns::PatternMatrix;
use crate::selection::FilteredPatterns;

const PRICE_COLUMNS: [&str; 6] = ["Date", "Open", "High", "Low", "Close", "Volume"];

/// One table cell. Serialises as a bare JSON string / number; NaN becomes
/// `null`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Cell {
    Text(String),
    Signal(i32),
    Number(f64),
}

impl Cell {
    /// Text form used in the CSV export. Undefined numbers are empty.
    pub fn to_field(&self) -> String {
        match self {
            Self::Text(s) => s.clone(),
            Self::Signal(v) => v.to_string(),
            Self::Number(v) if v.is_finite() => v.to_string(),
            Self::Number(_) => String::new(),
        }
    }
}

/// Column headers plus row-major cells.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Table {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Cell>>,
}

impl Table {
    fn single(column: &str, text: String) -> Self {
        Self {
            columns: vec![column.to_string()],
            rows: vec![vec![Cell::Text(text)]],
        }
    }

    /// Shown when the series loaded but no pattern row survived filtering.
    pub fn placeholder(ticker: &str) -> Self {
        Self::single("Message", format!("{ticker} 無資料或無形態。"))
    }

    /// Shown in place of results when any pipeline stage failed.
    pub fn error(message: impl Into<String>) -> Self {
        Self::single("Error", message.into())
    }

    #[cfg(test)]
    pub fn is_placeholder(&self) -> bool {
        self.columns.len() == 1 && self.columns[0] == "Message"
    }
}

fn headers(patterns: &PatternMatrix, indicators: &IndicatorTable) -> Vec<String> {
    PRICE_COLUMNS
        .iter()
        .map(|s| s.to_string())
        .chain(patterns.pattern_ids().into_iter().map(|p| p.code().to_string()))
        .chain(indicators.names().into_iter().map(str::to_string))
        .collect()
}

/// Price cells for bar `row` of `series`.
fn price_cells(series: &BarSeries, row: usize) -> Vec<Cell> {
    let bar = &series.bars()[row];
    vec![
        Cell::Text(bar.date.format("%Y-%m-%d").to_string()),
        Cell::Number(bar.open),
        Cell::Number(bar.high),
        Cell::Number(bar.low),
        Cell::Number(bar.close),
        Cell::Number(bar.volume.unwrap_or(f64::NAN)),
    ]
}

fn indicator_cells(indicators: &IndicatorTable, row: usize) -> impl Iterator<Item = Cell> + '_ {
    indicators.columns().iter().map(move |(_, v)| Cell::Number(v[row]))
}

/// The on-screen table: only the rows that survived filtering.
pub fn results_table(
    series: &BarSeries,
    filtered: &FilteredPatterns,
    indicators: &IndicatorTable,
) -> Table {
    if filtered.is_empty() {
        return Table::placeholder(series.ticker());
    }

    let patterns = filtered.matrix();
    let rows = filtered
        .source_rows()
        .iter()
        .enumerate()
        .map(|(k, &src)| {
            let mut row = price_cells(series, src);
            row.extend(patterns.columns().iter().map(|(_, v)| Cell::Signal(v[k])));
            row.extend(indicator_cells(indicators, src));
            row
        })
        .collect();

    Table {
        columns: headers(patterns, indicators),
        rows,
    }
}

/// The export table: every bar with the complete pattern matrix.
pub fn export_table(series: &BarSeries, patterns: &PatternMatrix, indicators: &IndicatorTable) -> Table {
    let rows = (0..series.len())
        .map(|i| {
            let mut row = price_cells(series, i);
            row.extend(patterns.columns().iter().map(|(_, v)| Cell::Signal(v[i])));
            row.extend(indicator_cells(indicators, i));
            row
        })
        .collect();

    Table {
        columns: headers(patterns, indicators),
        rows,
    }
}
