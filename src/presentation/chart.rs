// =============================================================================
// Chart figure (Plotly JSON)
// =============================================================================
//
// The page renders the chart with plotly.js, so the server only has to emit a
// figure description: `{ "data": [traces...], "layout": {...} }`.
//
// Three stacked panes share one date axis:
//   pane 1 (y)   candlesticks + red triangle markers on pattern days
//   pane 2 (y2)  volume bars
//   pane 3 (y3)  one line per selected indicator column
//
// Pane heights are 0.4 / 0.2 / 0.4 of the plot area with 0.03 spacing.
// =============================================================================

use serde_json::{json, Value};

use crate::indicators::IndicatorTable;
use crate::market_data::BarSeries;
use crate::selection::FilteredPatterns;

const ROW_HEIGHTS: [f64; 3] = [0.4, 0.2, 0.4];
const VERTICAL_SPACING: f64 = 0.03;
const FIGURE_HEIGHT: u32 = 900;
const X_AXIS_TITLE: &str = "日期";

/// `[bottom, top]` domain of each pane, top pane first.
fn pane_domains() -> [[f64; 2]; 3] {
    let total: f64 = ROW_HEIGHTS.iter().sum();
    let usable = 1.0 - VERTICAL_SPACING * (ROW_HEIGHTS.len() - 1) as f64;
    let mut domains = [[0.0; 2]; 3];
    let mut top = 1.0;
    for (i, h) in ROW_HEIGHTS.iter().enumerate() {
        let height = h / total * usable;
        domains[i] = [(top - height).max(0.0), top];
        top -= height + VERTICAL_SPACING;
    }
    domains
}

/// NaN-safe JSON array; undefined values become `null` gaps.
fn series_json(values: &[f64]) -> Vec<Value> {
    values
        .iter()
        .map(|&v| if v.is_finite() { json!(v) } else { Value::Null })
        .collect()
}

/// Build the figure for one analysis.
///
/// Candles and volume always span the full history; markers appear only on
/// dates that survived filtering, labelled with the display names of the
/// patterns that fired there, one per line.
pub fn build_figure(
    series: &BarSeries,
    filtered: &FilteredPatterns,
    indicators: &IndicatorTable,
    title: &str,
) -> Value {
    let dates: Vec<String> = series
        .dates()
        .iter()
        .map(|d| d.format("%Y-%m-%d").to_string())
        .collect();
    let highs = series.highs();

    let mut traces = vec![json!({
        "type": "candlestick",
        "name": "K線",
        "x": dates,
        "open": series.opens(),
        "high": highs,
        "low": series.lows(),
        "close": series.closes(),
        "xaxis": "x",
        "yaxis": "y",
    })];

    if !filtered.is_empty() {
        let matrix = filtered.matrix();
        let marker_x: Vec<&String> = filtered.source_rows().iter().map(|&r| &dates[r]).collect();
        let marker_y: Vec<f64> = filtered.source_rows().iter().map(|&r| highs[r]).collect();
        let labels: Vec<String> = (0..matrix.len())
            .map(|row| {
                matrix
                    .fired_at(row)
                    .iter()
                    .map(|p| p.description())
                    .collect::<Vec<_>>()
                    .join("\n")
            })
            .collect();
        traces.push(json!({
            "type": "scatter",
            "name": "形態標記",
            "mode": "markers+text",
            "x": marker_x,
            "y": marker_y,
            "text": labels,
            "textposition": "top center",
            "marker": { "symbol": "triangle-down", "size": 15, "color": "red" },
            "xaxis": "x",
            "yaxis": "y",
        }));
    }

    if let Some(volume) = series.volumes() {
        traces.push(json!({
            "type": "bar",
            "name": "成交量",
            "x": dates,
            "y": series_json(&volume),
            "marker": { "color": "rgba(128,128,128,0.5)" },
            "xaxis": "x",
            "yaxis": "y2",
        }));
    }

    for (name, values) in indicators.columns() {
        traces.push(json!({
            "type": "scatter",
            "name": name,
            "mode": "lines",
            "x": dates,
            "y": series_json(values),
            "xaxis": "x",
            "yaxis": "y3",
        }));
    }

    let [d1, d2, d3] = pane_domains();
    json!({
        "data": traces,
        "layout": {
            "title": { "text": title },
            "height": FIGURE_HEIGHT,
            "xaxis": {
                "title": { "text": X_AXIS_TITLE },
                "anchor": "y3",
                "rangeslider": { "visible": false },
            },
            "yaxis": { "domain": d1 },
            "yaxis2": { "domain": d2 },
            "yaxis3": { "domain": d3 },
        },
    })
}

// =============================================================================
// Unit Tests
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::{compute_selected, IndicatorId};
    use crate::market_data::bars::test_support::wavy_series;
    use crate::patterns::{detect_all, PatternId, PatternMatrix};
    use crate::selection::filter_patterns;

    fn trace_names(fig: &Value) -> Vec<String> {
        fig["data"]
            .as_array()
            .unwrap()
            .iter()
            .map(|t| t["name"].as_str().unwrap().to_string())
            .collect()
    }

    #[test]
    fn pane_domains_follow_row_heights() {
        let [d1, d2, d3] = pane_domains();
        assert!((d1[1] - 1.0).abs() < 1e-12);
        assert!((d1[0] - 0.624).abs() < 1e-9);
        assert!((d2[1] - 0.594).abs() < 1e-9);
        assert!((d2[0] - 0.406).abs() < 1e-9);
        assert!((d3[1] - 0.376).abs() < 1e-9);
        assert!(d3[0].abs() < 1e-9);
    }

    #[test]
    fn figure_has_candles_volume_and_indicator_lines() {
        let series = wavy_series(60);
        let matrix = detect_all(&series);
        let filtered = filter_patterns(&matrix, &[], 1_000);
        let ind = compute_selected(&series, &[IndicatorId::Bbands]);
        let fig = build_figure(&series, &filtered, &ind, "title");

        assert_eq!(
            trace_names(&fig),
            vec!["K線", "成交量", "BBANDS_Upper", "BBANDS_Middle", "BBANDS_Lower"]
        );
        assert_eq!(fig["layout"]["height"], 900);
        assert_eq!(fig["layout"]["xaxis"]["title"]["text"], "日期");
        // warm-up values are gaps
        assert!(fig["data"][2]["y"][0].is_null());
        assert!(fig["data"][2]["y"][19].is_number());
    }

    #[test]
    fn markers_sit_on_highs_with_pattern_names() {
        let series = wavy_series(12);
        let mut doji = vec![0; 12];
        doji[11] = 100;
        let mut engulfing = vec![0; 12];
        engulfing[11] = -80;
        let matrix = PatternMatrix::new(
            series.dates(),
            vec![(PatternId::Doji, doji), (PatternId::Engulfing, engulfing)],
        );
        let filtered = filter_patterns(&matrix, &[], 0);
        let fig = build_figure(&series, &filtered, &IndicatorTable::default(), "t");

        let markers = &fig["data"][1];
        assert_eq!(markers["name"], "形態標記");
        assert_eq!(markers["marker"]["symbol"], "triangle-down");
        assert_eq!(markers["y"][0].as_f64().unwrap(), series.highs()[11]);
        let label = markers["text"][0].as_str().unwrap();
        assert_eq!(
            label,
            format!("{}\n{}", PatternId::Doji.description(), PatternId::Engulfing.description())
        );
    }
}
