use crate::core::chart::{parse_chart, parse_chart_value};
use crate::core::profile::normalize_profile;
use crate::core::selector::select_size;
use crate::core::RecommendError;
use crate::models::{ParsedChart, SizeRecommendation};
use serde_json::Value;

/// Method tag reported on every measurement-based recommendation.
pub const METHOD_MEASUREMENTS: &str = "measurements";

/// Top-level product fields treated as base measurements when the record
/// carries only a size-label list.
const RECOGNIZED_MEASUREMENTS: [&str; 8] = [
    "bust", "waist", "hips", "hip", "chest", "ptp", "shoulder", "length",
];

/// Public entry point for size recommendation.
///
/// Stateless and call-scoped: each `recommend` call validates its inputs,
/// drives the parse -> normalize -> select pipeline, and maps internal
/// failures onto the small error taxonomy in [`RecommendError`]. Concurrent
/// calls are safe without locking.
#[derive(Debug, Clone, Copy, Default)]
pub struct SizeRecommender;

impl SizeRecommender {
    pub fn new() -> Self {
        Self
    }

    /// Recommend a size for one product from the user's measurements.
    ///
    /// `height_cm`/`weight_kg` are accepted for interface compatibility
    /// and logged, but the measurement-based path does not require them.
    /// There is deliberately no height/weight-only fallback: with no usable
    /// chart or no measurements this fails instead of guessing.
    pub fn recommend(
        &self,
        height_cm: f64,
        weight_kg: f64,
        user_measurements: &serde_json::Map<String, Value>,
        product: &Value,
    ) -> Result<SizeRecommendation, RecommendError> {
        tracing::debug!(
            height_cm,
            weight_kg,
            measurement_fields = user_measurements.len(),
            "size recommendation requested"
        );

        let parsed = self.extract_chart(product)?;
        for issue in &parsed.issues {
            tracing::debug!(
                size = ?issue.size,
                key = %issue.key,
                reason = %issue.reason,
                "field skipped during chart parse"
            );
        }

        if user_measurements.is_empty() {
            return Err(RecommendError::MissingUserData);
        }
        let profile = normalize_profile(user_measurements)?;

        let scored = select_size(&profile, &parsed.chart)?;
        tracing::info!(
            size = %scored.label,
            distance = scored.distance,
            shared_keys = scored.shared_keys,
            confidence = scored.confidence,
            "size selected"
        );

        Ok(SizeRecommendation {
            recommended_size: scored.label,
            confidence: scored.confidence,
            method: METHOD_MEASUREMENTS.to_string(),
        })
    }

    /// Pull a raw size chart off the product record.
    ///
    /// Preference order: `sizes_with_measurements` (string-encoded or
    /// already decoded), then a `sizes` field that is either a
    /// canonical-shaped mapping or a plain label list combined with
    /// recognized top-level measurement fields via the flat-format path.
    fn extract_chart(&self, product: &Value) -> Result<ParsedChart, RecommendError> {
        let Some(record) = product.as_object() else {
            return Err(RecommendError::MissingProductData);
        };

        if let Some(raw) = record.get("sizes_with_measurements") {
            match raw {
                Value::String(encoded) if !encoded.trim().is_empty() => {
                    return Ok(parse_chart(encoded)?);
                }
                Value::Object(_) | Value::Array(_) => {
                    return Ok(parse_chart_value(raw.clone())?);
                }
                _ => {}
            }
        }

        match record.get("sizes") {
            Some(sizes @ Value::Object(_)) => Ok(parse_chart_value(sizes.clone())?),
            Some(Value::Array(labels)) => {
                let mut flat = serde_json::Map::new();
                for (key, value) in record {
                    let lowered = key.trim().to_lowercase();
                    if RECOGNIZED_MEASUREMENTS.contains(&lowered.as_str()) {
                        flat.insert(lowered, value.clone());
                    }
                }
                if flat.is_empty() || labels.is_empty() {
                    return Err(RecommendError::MissingProductData);
                }
                flat.insert("sizes".to_string(), Value::Array(labels.clone()));
                Ok(parse_chart_value(Value::Object(flat))?)
            }
            _ => Err(RecommendError::MissingProductData),
        }
    }
}
