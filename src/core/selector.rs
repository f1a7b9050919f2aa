use crate::core::scoring::{measurement_distance, shape_distance};
use crate::core::RecommendError;
use crate::models::{ScoredSize, SizeChart, UserMeasurements};

/// Garment ladder used to order candidate sizes deterministically.
/// Labels outside the ladder sort after it, lexically.
const SIZE_LADDER: [&str; 8] = ["XXS", "XS", "S", "M", "L", "XL", "XXL", "XXXL"];

pub const CONFIDENCE_FLOOR: f64 = 0.30;
pub const CONFIDENCE_CEILING: f64 = 0.98;

/// Weighted average deviation (inches) at which confidence bottoms out.
pub const NO_CONFIDENCE_DISTANCE: f64 = 6.0;

/// Map a winning distance to a bounded confidence score. Monotonically
/// non-increasing in distance; always reported, never omitted.
#[inline]
pub fn confidence_from_distance(distance: f64) -> f64 {
    (1.0 - distance / NO_CONFIDENCE_DISTANCE).clamp(CONFIDENCE_FLOOR, CONFIDENCE_CEILING)
}

fn ladder_rank(label: &str) -> usize {
    SIZE_LADDER
        .iter()
        .position(|step| step.eq_ignore_ascii_case(label.trim()))
        .unwrap_or(SIZE_LADDER.len())
}

/// Candidate labels in canonical order: ladder positions first, unknown
/// labels after in lexical order. Source-map insertion order never leaks
/// into the result, so repeated calls are deterministic and distance ties
/// resolve to the earlier canonical label.
fn canonical_order(chart: &SizeChart) -> Vec<&String> {
    let mut labels: Vec<&String> = chart.sizes.keys().collect();
    labels.sort_by(|a, b| ladder_rank(a).cmp(&ladder_rank(b)).then_with(|| a.cmp(b)));
    labels
}

/// Evaluate every candidate size and pick the minimum-distance one.
///
/// Sizes sharing no weighted measurement with the user are discarded; if
/// that discards everything the selection fails rather than guessing.
pub fn select_size(user: &UserMeasurements, chart: &SizeChart) -> Result<ScoredSize, RecommendError> {
    let mut best: Option<ScoredSize> = None;

    for label in canonical_order(chart) {
        let measures = &chart.sizes[label];

        let Some(scored) = measurement_distance(user, measures) else {
            tracing::trace!(size = %label, "no weighted measurement overlap, skipped");
            continue;
        };

        tracing::debug!(
            size = %label,
            distance = scored.distance,
            shared_keys = scored.shared_keys,
            shape_distance = shape_distance(user, measures),
            "scored candidate size"
        );

        // Strict < keeps the earlier canonical label on ties.
        if best.as_ref().map_or(true, |b| scored.distance < b.distance) {
            best = Some(ScoredSize {
                label: label.clone(),
                distance: scored.distance,
                shared_keys: scored.shared_keys,
                confidence: confidence_from_distance(scored.distance),
            });
        }
    }

    best.ok_or(RecommendError::NoScorableSize)
}
