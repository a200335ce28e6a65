// =============================================================================
// Bollinger Bands
// =============================================================================
//
// Bollinger Bands consist of a middle band (SMA), an upper band (SMA + k*σ),
// and a lower band (SMA - k*σ). σ is the population standard deviation of
// the same window the SMA covers.

use super::moving_average::sma;
use super::nan_series;

/// Upper, middle and lower band series, each aligned with the input.
#[derive(Debug, Clone)]
pub struct BollingerBands {
    pub upper: Vec<f64>,
    pub middle: Vec<f64>,
    pub lower: Vec<f64>,
}

/// Calculate Bollinger Bands for the given closing prices.
///
/// Every band starts at index `period - 1`; earlier slots are NaN.
///
/// # Edge cases
/// - `period == 0` or too few closes => all three bands NaN
/// - A flat window has σ = 0, so all three bands coincide.
pub fn bbands(closes: &[f64], period: usize, num_std: f64) -> BollingerBands {
    let middle = sma(closes, period);
    let mut upper = nan_series(closes.len());
    let mut lower = nan_series(closes.len());

    for (i, &mid) in middle.iter().enumerate() {
        if mid.is_nan() {
            continue;
        }
        let window = &closes[i + 1 - period..=i];
        let variance = window.iter().map(|v| (v - mid).powi(2)).sum::<f64>() / period as f64;
        let sigma = variance.max(0.0).sqrt();
        upper[i] = mid + num_std * sigma;
        lower[i] = mid - num_std * sigma;
    }

    BollingerBands {
        upper,
        middle,
        lower,
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bollinger_insufficient_data() {
        let bands = bbands(&[1.0, 2.0, 3.0], 5, 2.0);
        assert_eq!(bands.middle.len(), 3);
        assert!(bands.upper.iter().all(|v| v.is_nan()));
        assert!(bands.lower.iter().all(|v| v.is_nan()));
    }

    #[test]
    fn bollinger_flat_prices_collapse() {
        let bands = bbands(&[100.0; 20], 20, 2.0);
        assert!((bands.upper[19] - 100.0).abs() < 1e-10);
        assert!((bands.middle[19] - 100.0).abs() < 1e-10);
        assert!((bands.lower[19] - 100.0).abs() < 1e-10);
    }

    #[test]
    fn bollinger_population_sigma() {
        // mean 5, population variance 4 -> sigma 2
        let closes = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        let bands = bbands(&closes, 8, 2.0);
        assert!(bands.middle[6].is_nan());
        assert!((bands.middle[7] - 5.0).abs() < 1e-10);
        assert!((bands.upper[7] - 9.0).abs() < 1e-10);
        assert!((bands.lower[7] - 1.0).abs() < 1e-10);
    }

    #[test]
    fn bollinger_bands_are_ordered() {
        let closes: Vec<f64> = (0..40).map(|i| 100.0 + (i as f64 * 0.7).sin() * 5.0).collect();
        let bands = bbands(&closes, 20, 2.0);
        for i in 19..40 {
            assert!(bands.upper[i] >= bands.middle[i]);
            assert!(bands.middle[i] >= bands.lower[i]);
        }
    }
}
