// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{
    MeasurementValue, ParseIssue, ParsedChart, RankedProduct, ScoredSize, SizeChart,
    SizeMeasurements, SizeRecommendation, UserMeasurements, WeightedDistance,
};
pub use requests::{RecommendSizeRequest, RecommendStyleRequest};
pub use responses::{ErrorResponse, HealthResponse, RecommendStyleResponse};
