//! SizeFit Algo - size and style recommendation service
//!
//! This library implements the size recommendation pipeline used by the
//! SizeFit shopping app: normalize a product's loosely-typed size chart
//! into a canonical measurement model, score every candidate size against
//! the user's body measurements, and pick the best fit with a calibrated
//! confidence. A secondary module ranks products by style similarity over
//! precomputed embeddings.

pub mod config;
pub mod core;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use crate::core::{
    confidence_from_distance, measurement_distance, normalize_profile, parse_chart, select_size,
    shape_distance, ParseError, RecommendError, SizeRecommender, StyleRanker,
};
pub use models::{
    MeasurementValue, ParsedChart, RankedProduct, SizeChart, SizeRecommendation, UserMeasurements,
};
