use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A single cell in a canonical size chart.
///
/// Charts arrive with numeric measurements mixed with free-text metadata
/// (fabric, fit notes). Scalar text that fails numeric coercion is kept as
/// `Text` so the metadata survives normalization; scoring only ever reads
/// `Number` cells.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MeasurementValue {
    Number(f64),
    Text(String),
}

impl MeasurementValue {
    pub fn as_number(&self) -> Option<f64> {
        match self {
            MeasurementValue::Number(n) => Some(*n),
            MeasurementValue::Text(_) => None,
        }
    }
}

/// One size's canonical measurements: lowercase measurement name -> value.
pub type SizeMeasurements = BTreeMap<String, MeasurementValue>;

/// A user's normalized body measurements: lowercase name -> finite value
/// (inches, except height in cm and weight in kg).
pub type UserMeasurements = BTreeMap<String, f64>;

/// Canonical size chart: size label -> measurements.
///
/// Labels keep the caller's vocabulary (S, M, 38, ...); measurement keys
/// are lowercased by the parser. `BTreeMap` storage keeps iteration
/// deterministic regardless of how the source record ordered its keys.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SizeChart {
    pub sizes: BTreeMap<String, SizeMeasurements>,
}

impl SizeChart {
    pub fn is_empty(&self) -> bool {
        self.sizes.is_empty()
    }

    pub fn len(&self) -> usize {
        self.sizes.len()
    }

    /// True when at least one size carries at least one numeric value.
    /// A chart that is all text metadata is unusable for scoring.
    pub fn has_numeric_measurements(&self) -> bool {
        self.sizes
            .values()
            .any(|measures| measures.values().any(|v| v.as_number().is_some()))
    }
}

/// Why one raw field was skipped (or downgraded) during parsing.
///
/// Collected instead of printed so callers decide whether to log or
/// surface partial-parse diagnostics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParseIssue {
    pub size: Option<String>,
    pub key: String,
    pub reason: String,
}

/// Parser output: the canonical chart plus per-field diagnostics.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedChart {
    pub chart: SizeChart,
    pub issues: Vec<ParseIssue>,
}

/// Weighted distance between a user profile and one candidate size.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeightedDistance {
    /// Weighted mean absolute difference, in inches.
    pub distance: f64,
    /// Number of weighted measurement keys both sides share.
    pub shared_keys: usize,
}

/// One candidate size after scoring.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredSize {
    pub label: String,
    pub distance: f64,
    pub shared_keys: usize,
    pub confidence: f64,
}

/// Final recommendation value object. Field names match the wire format.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SizeRecommendation {
    pub recommended_size: String,
    /// Bounded fit certainty in [0.3, 0.98]; not a probability.
    pub confidence: f64,
    pub method: String,
}

/// One ranked product from the style-similarity recommender.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedProduct {
    #[serde(rename = "productId")]
    pub product_id: String,
    pub similarity: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chart_numeric_detection() {
        let mut chart = SizeChart::default();
        assert!(!chart.has_numeric_measurements());

        let mut measures = SizeMeasurements::new();
        measures.insert("fabric".to_string(), MeasurementValue::Text("cotton".to_string()));
        chart.sizes.insert("M".to_string(), measures);
        assert!(!chart.has_numeric_measurements());

        chart
            .sizes
            .get_mut("M")
            .unwrap()
            .insert("waist".to_string(), MeasurementValue::Number(70.0));
        assert!(chart.has_numeric_measurements());
    }

    #[test]
    fn test_measurement_value_as_number() {
        assert_eq!(MeasurementValue::Number(36.0).as_number(), Some(36.0));
        assert_eq!(MeasurementValue::Text("slim".to_string()).as_number(), None);
    }

    #[test]
    fn test_recommendation_wire_format() {
        let rec = SizeRecommendation {
            recommended_size: "S".to_string(),
            confidence: 0.85,
            method: "measurements".to_string(),
        };

        let json = serde_json::to_value(&rec).unwrap();
        assert_eq!(json["recommended_size"], "S");
        assert_eq!(json["confidence"], 0.85);
        assert_eq!(json["method"], "measurements");
    }
}
