use reqwest::Client;
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur when talking to the catalog record store.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("record store returned error: {0}")]
    ApiError(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("invalid response format: {0}")]
    InvalidResponse(String),
}

/// Client for the product/profile record store (PostgREST-style API).
///
/// Pure passthrough: raw records come back as `serde_json::Value` and all
/// normalization happens in the core. Nothing is cached between calls.
pub struct CatalogClient {
    base_url: String,
    api_key: String,
    client: Client,
}

impl CatalogClient {
    pub fn new(base_url: String, api_key: String) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
            client,
        }
    }

    /// Fetch one raw product record by id.
    pub async fn get_product(&self, product_id: &str) -> Result<Value, CatalogError> {
        let url = format!(
            "{}/products?product_id=eq.{}&limit=1",
            self.base_url, product_id
        );

        let response = self
            .client
            .get(&url)
            .header("apikey", &self.api_key)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(CatalogError::ApiError(format!(
                "status {} fetching product {}",
                response.status(),
                product_id
            )));
        }

        let body: Value = response.json().await?;
        let records = body
            .as_array()
            .ok_or_else(|| CatalogError::InvalidResponse("expected a record array".into()))?;

        records
            .first()
            .cloned()
            .ok_or_else(|| CatalogError::NotFound(format!("product {}", product_id)))
    }

    /// Fetch a user's stored body measurements.
    ///
    /// The store keeps them as a JSON string, and older rows wrap them in
    /// a `body_measurements` envelope; both shapes are unwrapped here so
    /// callers always get a flat measurement object.
    pub async fn get_profile_measurements(
        &self,
        user_id: &str,
    ) -> Result<serde_json::Map<String, Value>, CatalogError> {
        let url = format!(
            "{}/profiles?user_id=eq.{}&select=measurements&limit=1",
            self.base_url, user_id
        );

        let response = self
            .client
            .get(&url)
            .header("apikey", &self.api_key)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(CatalogError::ApiError(format!(
                "status {} fetching profile {}",
                response.status(),
                user_id
            )));
        }

        let body: Value = response.json().await?;
        let record = body
            .as_array()
            .and_then(|records| records.first())
            .ok_or_else(|| CatalogError::NotFound(format!("profile {}", user_id)))?;

        let raw = record
            .get("measurements")
            .ok_or_else(|| CatalogError::InvalidResponse("profile lacks measurements".into()))?;

        let decoded: Value = match raw {
            Value::String(encoded) => serde_json::from_str(encoded).map_err(|e| {
                CatalogError::InvalidResponse(format!("measurements not valid JSON: {}", e))
            })?,
            other => other.clone(),
        };

        let map = decoded
            .as_object()
            .cloned()
            .ok_or_else(|| CatalogError::InvalidResponse("measurements is not an object".into()))?;

        if let Some(Value::Object(inner)) = map.get("body_measurements") {
            return Ok(inner.clone());
        }

        Ok(map)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_get_product() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/products?product_id=eq.p1&limit=1")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"[{"product_id": "p1", "sizes": ["S", "M"]}]"#)
            .create_async()
            .await;

        let client = CatalogClient::new(server.url(), "test-key".to_string());
        let product = client.get_product("p1").await.unwrap();

        assert_eq!(product["product_id"], "p1");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_get_product_not_found() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/products?product_id=eq.missing&limit=1")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body("[]")
            .create_async()
            .await;

        let client = CatalogClient::new(server.url(), "test-key".to_string());
        let result = client.get_product("missing").await;

        assert!(matches!(result, Err(CatalogError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_profile_measurements_string_encoded() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/profiles?user_id=eq.u1&select=measurements&limit=1")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"[{"measurements": "{\"body_measurements\": {\"waist\": 28}}"}]"#)
            .create_async()
            .await;

        let client = CatalogClient::new(server.url(), "test-key".to_string());
        let measurements = client.get_profile_measurements("u1").await.unwrap();

        assert_eq!(measurements["waist"], 28);
    }

    #[tokio::test]
    async fn test_profile_measurements_plain_object() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/profiles?user_id=eq.u2&select=measurements&limit=1")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"[{"measurements": {"waist": 28, "bust": 34}}]"#)
            .create_async()
            .await;

        let client = CatalogClient::new(server.url(), "test-key".to_string());
        let measurements = client.get_profile_measurements("u2").await.unwrap();

        assert_eq!(measurements.len(), 2);
        assert_eq!(measurements["bust"], 34);
    }

    #[tokio::test]
    async fn test_api_error_status() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/products?product_id=eq.p1&limit=1")
            .with_status(500)
            .create_async()
            .await;

        let client = CatalogClient::new(server.url(), "test-key".to_string());
        let result = client.get_product("p1").await;

        assert!(matches!(result, Err(CatalogError::ApiError(_))));
    }
}
