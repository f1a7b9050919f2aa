use serde::{Deserialize, Serialize};
use validator::Validate;

/// Request for a size recommendation.
///
/// The product may arrive inline or as an id to fetch from the catalog
/// record store; the same goes for measurements (inline object, or looked
/// up via `userId`). Inline data always wins over fetched data.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RecommendSizeRequest {
    #[serde(alias = "user_id", rename = "userId", default)]
    pub user_id: Option<String>,
    /// User height in cm.
    #[validate(range(min = 0.0, max = 300.0))]
    pub height: f64,
    /// User weight in kg.
    #[validate(range(min = 0.0, max = 500.0))]
    pub weight: f64,
    #[serde(alias = "product_id", rename = "productId", default)]
    pub product_id: Option<String>,
    /// Full product record, when the caller already has it.
    #[serde(default)]
    pub product: Option<serde_json::Value>,
    /// Body measurements in inches; an object, or a string-encoded object.
    #[serde(default)]
    pub measurements: Option<serde_json::Value>,
}

/// Request for style-similarity recommendations.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RecommendStyleRequest {
    #[serde(alias = "preference_vectors", rename = "preferenceVectors")]
    #[validate(length(min = 1))]
    pub preference_vectors: Vec<Vec<f32>>,
    #[serde(alias = "top_n", rename = "topN", default = "default_top_n")]
    pub top_n: u16,
}

fn default_top_n() -> u16 {
    10
}
