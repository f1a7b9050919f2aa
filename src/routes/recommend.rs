use actix_web::{web, HttpResponse, Responder};
use serde_json::Value;
use std::sync::Arc;
use validator::Validate;

use crate::core::{RecommendError, SizeRecommender, StyleError, StyleRanker};
use crate::models::{
    ErrorResponse, HealthResponse, RecommendSizeRequest, RecommendStyleRequest,
    RecommendStyleResponse,
};
use crate::services::{CatalogClient, CatalogError};

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<CatalogClient>,
    pub recommender: SizeRecommender,
    pub style: Arc<StyleRanker>,
}

/// Configure all recommendation routes.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health_check))
        .route("/recommend/size", web::post().to(recommend_size))
        .route("/recommend/style", web::post().to(recommend_style));
}

/// Health check endpoint.
async fn health_check(state: web::Data<AppState>) -> impl Responder {
    tracing::debug!(style_products = state.style.len(), "health check");

    HttpResponse::Ok().json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now(),
    })
}

/// Size recommendation endpoint
///
/// POST /api/v1/recommend/size
///
/// Request body:
/// ```json
/// {
///   "userId": "string",
///   "height": 165,
///   "weight": 58,
///   "productId": "string",
///   "measurements": {"waist": 28, "hip": 38}
/// }
/// ```
async fn recommend_size(
    state: web::Data<AppState>,
    req: web::Json<RecommendSizeRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        tracing::info!("Validation failed for recommend_size request: {:?}", errors);
        return HttpResponse::BadRequest().json(ErrorResponse {
            error: "validation_failed".to_string(),
            message: errors.to_string(),
            status_code: 400,
        });
    }

    // Resolve the product record: inline wins, otherwise fetch by id.
    let product: Value = if let Some(product) = &req.product {
        product.clone()
    } else if let Some(product_id) = &req.product_id {
        match state.catalog.get_product(product_id).await {
            Ok(product) => product,
            Err(CatalogError::NotFound(what)) => {
                return HttpResponse::NotFound().json(ErrorResponse {
                    error: "product_not_found".to_string(),
                    message: what,
                    status_code: 404,
                });
            }
            Err(e) => {
                tracing::error!("Failed to fetch product {}: {}", product_id, e);
                return HttpResponse::BadGateway().json(ErrorResponse {
                    error: "catalog_unavailable".to_string(),
                    message: e.to_string(),
                    status_code: 502,
                });
            }
        }
    } else {
        return HttpResponse::BadRequest().json(ErrorResponse {
            error: "missing_product".to_string(),
            message: "either product or productId is required".to_string(),
            status_code: 400,
        });
    };

    let measurements = match resolve_measurements(&state, &req).await {
        Ok(measurements) => measurements,
        Err(response) => return response,
    };

    match state
        .recommender
        .recommend(req.height, req.weight, &measurements, &product)
    {
        Ok(recommendation) => HttpResponse::Ok().json(recommendation),
        Err(e) => recommend_error_response(&e),
    }
}

/// Resolve user measurements: inline object, string-encoded object, or a
/// profile lookup by userId. A failed lookup degrades to an empty set so
/// the core reports `MissingUserData` with its usual message.
async fn resolve_measurements(
    state: &web::Data<AppState>,
    req: &RecommendSizeRequest,
) -> Result<serde_json::Map<String, Value>, HttpResponse> {
    match &req.measurements {
        Some(Value::Object(map)) if !map.is_empty() => return Ok(map.clone()),
        Some(Value::String(encoded)) => {
            return serde_json::from_str::<Value>(encoded)
                .ok()
                .and_then(|v| v.as_object().cloned())
                .ok_or_else(|| {
                    HttpResponse::BadRequest().json(ErrorResponse {
                        error: "invalid_measurements".to_string(),
                        message: "measurements string is not a JSON object".to_string(),
                        status_code: 400,
                    })
                });
        }
        _ => {}
    }

    if let Some(user_id) = &req.user_id {
        match state.catalog.get_profile_measurements(user_id).await {
            Ok(measurements) => return Ok(measurements),
            Err(e) => {
                tracing::warn!("No stored measurements for {}: {}", user_id, e);
            }
        }
    }

    Ok(serde_json::Map::new())
}

fn recommend_error_response(err: &RecommendError) -> HttpResponse {
    let (kind, status_code) = match err {
        RecommendError::Parse(_) => ("parse_error", 400),
        RecommendError::MissingProductData => ("missing_product_data", 400),
        RecommendError::MissingUserData => ("missing_user_data", 400),
        RecommendError::NoScorableSize => ("no_scorable_size", 422),
    };

    tracing::info!(kind, "size recommendation failed: {}", error_chain(err));

    let body = ErrorResponse {
        error: kind.to_string(),
        message: error_chain(err),
        status_code,
    };

    match status_code {
        422 => HttpResponse::UnprocessableEntity().json(body),
        _ => HttpResponse::BadRequest().json(body),
    }
}

/// Render an error with its full cause chain, never just the outer layer.
pub fn error_chain(err: &dyn std::error::Error) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}

/// Style recommendation endpoint
///
/// POST /api/v1/recommend/style
///
/// Request body:
/// ```json
/// {
///   "preferenceVectors": [[0.1, 0.2, ...]],
///   "topN": 10
/// }
/// ```
async fn recommend_style(
    state: web::Data<AppState>,
    req: web::Json<RecommendStyleRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        return HttpResponse::BadRequest().json(ErrorResponse {
            error: "validation_failed".to_string(),
            message: errors.to_string(),
            status_code: 400,
        });
    }

    if state.style.is_empty() {
        return HttpResponse::ServiceUnavailable().json(ErrorResponse {
            error: "no_embeddings".to_string(),
            message: "style ranker has no product embeddings loaded".to_string(),
            status_code: 503,
        });
    }

    match state.style.rank(&req.preference_vectors, req.top_n as usize) {
        Ok(products) => {
            let total_products = state.style.len();
            HttpResponse::Ok().json(RecommendStyleResponse {
                products,
                total_products,
            })
        }
        Err(e @ (StyleError::EmptyPreferences | StyleError::DimensionMismatch { .. })) => {
            HttpResponse::BadRequest().json(ErrorResponse {
                error: "invalid_preferences".to_string(),
                message: e.to_string(),
                status_code: 400,
            })
        }
        Err(e) => {
            tracing::error!("Style ranking failed: {}", e);
            HttpResponse::InternalServerError().json(ErrorResponse {
                error: "style_ranking_failed".to_string(),
                message: e.to_string(),
                status_code: 500,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::chart::ParseError;

    #[test]
    fn test_error_chain_includes_cause() {
        let err = RecommendError::Parse(ParseError::NoUsableMeasurements);
        let chain = error_chain(&err);

        assert!(chain.contains("failed to parse measurement data"));
        assert!(chain.contains("no usable numeric measurements"));
    }

    #[test]
    fn test_health_response_shape() {
        let response = HealthResponse {
            status: "healthy".to_string(),
            version: "0.1.0".to_string(),
            timestamp: chrono::Utc::now(),
        };

        assert_eq!(response.status, "healthy");
    }
}
