use crate::models::{MeasurementValue, SizeMeasurements, UserMeasurements, WeightedDistance};

/// Fixed per-measurement weights used uniformly across all calls.
/// Keys absent from this table never affect scoring.
pub const MEASUREMENT_WEIGHTS: [(&str, f64); 5] = [
    ("waist", 3.0),
    ("hip", 3.0),
    ("bust", 2.0),
    ("chest", 2.0),
    ("length", 1.0),
];

const CM_PER_INCH: f64 = 2.54;

#[inline]
pub fn measurement_weight(key: &str) -> Option<f64> {
    MEASUREMENT_WEIGHTS
        .iter()
        .find(|(name, _)| *name == key)
        .map(|(_, weight)| *weight)
}

/// Height and weight carry their own units (cm, kg) and are never
/// cm->in converted.
#[inline]
fn keeps_native_unit(key: &str) -> bool {
    key == "height" || key == "weight"
}

/// Weighted mean absolute difference between a user profile and one
/// candidate size, in inches.
///
/// Only keys present on both sides AND in the weight table contribute.
/// Chart values arrive in centimeters and are converted to inches per key
/// (except height/weight). Returns `None` when no weighted key overlaps:
/// the distance is undefined, not zero, and the caller must treat the size
/// as unscorable.
pub fn measurement_distance(
    user: &UserMeasurements,
    size: &SizeMeasurements,
) -> Option<WeightedDistance> {
    let mut weighted_diff = 0.0;
    let mut weight_total = 0.0;
    let mut shared_keys = 0;

    for (key, user_value) in user {
        let Some(weight) = measurement_weight(key) else {
            continue;
        };
        let Some(size_value) = size.get(key).and_then(MeasurementValue::as_number) else {
            continue;
        };

        let size_inches = if keeps_native_unit(key) {
            size_value
        } else {
            size_value / CM_PER_INCH
        };

        weighted_diff += weight * (user_value - size_inches).abs();
        weight_total += weight;
        shared_keys += 1;
    }

    if weight_total <= 0.0 {
        return None;
    }

    Some(WeightedDistance {
        distance: weighted_diff / weight_total,
        shared_keys,
    })
}

/// Diagnostic body-shape metric: 0.5*|Δ(bust/waist)| + 0.5*|Δ(hips/waist)|.
///
/// Ratios are unit-free, so chart values are used unconverted. Requires
/// bust, waist and hips on both sides with a non-zero waist; returns 0.0
/// when the ratios are unavailable. Never participates in size selection.
pub fn shape_distance(user: &UserMeasurements, size: &SizeMeasurements) -> f64 {
    let user_ratios = body_ratios(|key| user.get(key).copied());
    let size_ratios = body_ratios(|key| size.get(key).and_then(MeasurementValue::as_number));

    match (user_ratios, size_ratios) {
        (Some((user_bw, user_hw)), Some((size_bw, size_hw))) => {
            0.5 * (user_bw - size_bw).abs() + 0.5 * (user_hw - size_hw).abs()
        }
        _ => 0.0,
    }
}

fn body_ratios(get: impl Fn(&str) -> Option<f64>) -> Option<(f64, f64)> {
    let bust = get("bust")?;
    let waist = get("waist")?;
    let hips = get("hips").or_else(|| get("hip"))?;

    if waist == 0.0 {
        return None;
    }

    Some((bust / waist, hips / waist))
}
