// =============================================================================
// Pattern Selection & Strength Filtering
// =============================================================================
//
// Narrows the full pattern matrix down to what the user asked for:
//
//   1. Resolve the chosen categories to their pattern lists (union, no
//      duplicates). No category at all means every pattern column.
//   2. Keep only those columns, in matrix order.
//   3. With a positive threshold, zero every cell whose magnitude is below it.
//   4. Keep only the rows where at least one retained cell is still non-zero.
//
// The result is itself a `PatternMatrix`, so filtering can be re-applied.
// =============================================================================

use std::collections::HashSet;

use tracing::debug;

use crate::patterns::{PatternId, PatternMatrix};
use crate::types::PatternCategory;

const BULLISH: [PatternId; 17] = [
    PatternId::MorningStar,
    PatternId::MorningDojiStar,
    PatternId::Hammer,
    PatternId::InvertedHammer,
    PatternId::Engulfing,
    PatternId::Piercing,
    PatternId::ThreeWhiteSoldiers,
    PatternId::Harami,
    PatternId::InNeck,
    PatternId::OnNeck,
    PatternId::BeltHold,
    PatternId::HomingPigeon,
    PatternId::MatchingLow,
    PatternId::Thrusting,
    PatternId::UniqueThreeRiver,
    PatternId::LadderBottom,
    PatternId::Marubozu,
];

const BEARISH: [PatternId; 18] = [
    PatternId::EveningStar,
    PatternId::EveningDojiStar,
    PatternId::HangingMan,
    PatternId::ShootingStar,
    PatternId::DarkCloudCover,
    PatternId::ThreeBlackCrows,
    PatternId::TwoCrows,
    PatternId::ThreeStarsInSouth,
    PatternId::IdenticalThreeCrows,
    PatternId::AdvanceBlock,
    PatternId::Breakaway,
    PatternId::Counterattack,
    PatternId::GapSideSideWhite,
    PatternId::GravestoneDoji,
    PatternId::HighWave,
    PatternId::StalledPattern,
    PatternId::UpsideGapTwoCrows,
    PatternId::XSideGapThreeMethods,
];

/// Patterns listed under a category.
pub fn category_members(category: PatternCategory) -> &'static [PatternId] {
    match category {
        PatternCategory::Bullish => &BULLISH,
        PatternCategory::Bearish => &BEARISH,
    }
}

/// Union of the selected categories' patterns; `None` when nothing was
/// selected (all columns apply).
fn resolve(categories: &[PatternCategory]) -> Option<HashSet<PatternId>> {
    if categories.is_empty() {
        return None;
    }
    Some(
        categories
            .iter()
            .flat_map(|c| category_members(*c).iter().copied())
            .collect(),
    )
}

/// Outcome of filtering: the surviving sub-matrix plus, for each of its rows,
/// the row index it came from in the input matrix.
#[derive(Debug, Clone, PartialEq)]
pub struct FilteredPatterns {
    matrix: PatternMatrix,
    source_rows: Vec<usize>,
}

impl FilteredPatterns {
    pub fn matrix(&self) -> &PatternMatrix {
        &self.matrix
    }

    pub fn source_rows(&self) -> &[usize] {
        &self.source_rows
    }

    /// No row survived.
    pub fn is_empty(&self) -> bool {
        self.source_rows.is_empty()
    }
}

/// Restrict `matrix` to the selected categories and to signals at least
/// `threshold` strong. A threshold of 0 keeps every non-zero cell.
pub fn filter_patterns(
    matrix: &PatternMatrix,
    categories: &[PatternCategory],
    threshold: u32,
) -> FilteredPatterns {
    let wanted = resolve(categories);

    let retained: Vec<(PatternId, Vec<i32>)> = matrix
        .columns()
        .iter()
        .filter(|(id, _)| wanted.as_ref().map_or(true, |set| set.contains(id)))
        .map(|(id, values)| {
            let kept = values
                .iter()
                .map(|&v| if threshold > 0 && v.unsigned_abs() < threshold { 0 } else { v })
                .collect();
            (*id, kept)
        })
        .collect();

    let source_rows: Vec<usize> = (0..matrix.len())
        .filter(|&row| retained.iter().any(|(_, v)| v[row] != 0))
        .collect();

    let dates = source_rows.iter().map(|&r| matrix.dates()[r]).collect();
    let columns = retained
        .into_iter()
        .map(|(id, v)| (id, source_rows.iter().map(|&r| v[r]).collect()))
        .collect();

    debug!(
        categories = categories.len(),
        threshold,
        rows_in = matrix.len(),
        rows_out = source_rows.len(),
        "patterns filtered"
    );

    FilteredPatterns {
        matrix: PatternMatrix::new(dates, columns),
        source_rows,
    }
}
