// =============================================================================
// Price Transforms
// =============================================================================
//
// AVGPRICE  (open + high + low + close) / 4
// MEDPRICE  (high + low) / 2
// TYPPRICE  (high + low + close) / 3
// WCLPRICE  (high + low + 2 * close) / 4
//
// Defined on every bar; no warm-up.
// =============================================================================

pub fn avg_price(open: &[f64], high: &[f64], low: &[f64], close: &[f64]) -> Vec<f64> {
    (0..close.len())
        .map(|i| (open[i] + high[i] + low[i] + close[i]) / 4.0)
        .collect()
}

pub fn med_price(high: &[f64], low: &[f64]) -> Vec<f64> {
    high.iter().zip(low).map(|(h, l)| (h + l) / 2.0).collect()
}

pub fn typ_price(high: &[f64], low: &[f64], close: &[f64]) -> Vec<f64> {
    (0..close.len())
        .map(|i| (high[i] + low[i] + close[i]) / 3.0)
        .collect()
}

/// Close-weighted price.
pub fn wcl_price(high: &[f64], low: &[f64], close: &[f64]) -> Vec<f64> {
    (0..close.len())
        .map(|i| (high[i] + low[i] + 2.0 * close[i]) / 4.0)
        .collect()
}
