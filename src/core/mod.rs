// Core recommendation pipeline exports
pub mod chart;
pub mod profile;
pub mod recommender;
pub mod scoring;
pub mod selector;
pub mod style;

pub use chart::{parse_chart, parse_chart_value, synthesize_size_variants, ParseError};
pub use profile::normalize_profile;
pub use recommender::{SizeRecommender, METHOD_MEASUREMENTS};
pub use scoring::{measurement_distance, measurement_weight, shape_distance};
pub use selector::{confidence_from_distance, select_size};
pub use style::{cosine_similarity, ProductEmbedding, StyleError, StyleRanker};

use thiserror::Error;

/// Failure taxonomy for one recommendation call.
///
/// Every variant is terminal: nothing is retried inside the core and no
/// best-effort size is ever guessed. Causes are chained, not swallowed, so
/// the orchestration boundary can re-report them with their origin.
#[derive(Debug, Error)]
pub enum RecommendError {
    #[error("failed to parse measurement data")]
    Parse(#[from] ParseError),

    #[error("product has no usable size or measurement data")]
    MissingProductData,

    #[error("no user measurements provided")]
    MissingUserData,

    #[error("no candidate size shares a weighted measurement with the user profile")]
    NoScorableSize,
}
