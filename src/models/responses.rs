use crate::models::domain::RankedProduct;
use serde::{Deserialize, Serialize};

/// Response for the style recommendation endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecommendStyleResponse {
    pub products: Vec<RankedProduct>,
    #[serde(rename = "totalProducts")]
    pub total_products: usize,
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

/// Error response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}
