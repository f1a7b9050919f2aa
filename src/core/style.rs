use crate::models::RankedProduct;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Errors from the style-similarity ranker.
#[derive(Debug, Error)]
pub enum StyleError {
    #[error("no preference vectors provided")]
    EmptyPreferences,

    #[error("preference vector dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("failed to load embedding table: {0}")]
    Load(String),
}

/// One product's precomputed embedding.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductEmbedding {
    #[serde(rename = "productId", alias = "product_id")]
    pub product_id: String,
    pub vector: Vec<f32>,
}

/// Nearest-neighbor style ranker over a precomputed product embedding
/// table.
///
/// Caller-supplied preference vectors are mean-pooled into one query
/// vector and every product is ranked by cosine similarity against it.
/// The table is read-only after construction; no model inference happens
/// here.
#[derive(Debug, Clone, Default)]
pub struct StyleRanker {
    embeddings: Vec<ProductEmbedding>,
}

impl StyleRanker {
    pub fn new(embeddings: Vec<ProductEmbedding>) -> Self {
        Self { embeddings }
    }

    /// Load the embedding table from a JSON file of
    /// `[{"productId": ..., "vector": [...]}]` entries.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self, StyleError> {
        let raw = std::fs::read_to_string(path.as_ref())
            .map_err(|e| StyleError::Load(e.to_string()))?;
        let embeddings: Vec<ProductEmbedding> =
            serde_json::from_str(&raw).map_err(|e| StyleError::Load(e.to_string()))?;
        Ok(Self::new(embeddings))
    }

    pub fn len(&self) -> usize {
        self.embeddings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.embeddings.is_empty()
    }

    /// Rank products by similarity to the mean of the preference vectors.
    pub fn rank(
        &self,
        preference_vectors: &[Vec<f32>],
        top_n: usize,
    ) -> Result<Vec<RankedProduct>, StyleError> {
        if preference_vectors.is_empty() || preference_vectors.iter().all(Vec::is_empty) {
            return Err(StyleError::EmptyPreferences);
        }

        let expected = preference_vectors[0].len();
        for vector in preference_vectors {
            if vector.len() != expected {
                return Err(StyleError::DimensionMismatch {
                    expected,
                    actual: vector.len(),
                });
            }
        }

        let query = mean_vector(preference_vectors);

        let mut ranked: Vec<RankedProduct> = self
            .embeddings
            .iter()
            .map(|embedding| RankedProduct {
                product_id: embedding.product_id.clone(),
                similarity: cosine_similarity(&query, &embedding.vector) as f64,
            })
            .collect();

        ranked.sort_by(|a, b| {
            b.similarity
                .partial_cmp(&a.similarity)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.product_id.cmp(&b.product_id))
        });
        ranked.truncate(top_n);

        Ok(ranked)
    }
}

fn mean_vector(vectors: &[Vec<f32>]) -> Vec<f32> {
    let dims = vectors[0].len();
    let mut mean = vec![0.0f32; dims];
    for vector in vectors {
        for (slot, value) in mean.iter_mut().zip(vector) {
            *slot += value;
        }
    }
    let count = vectors.len() as f32;
    for slot in &mut mean {
        *slot /= count;
    }
    mean
}

/// Cosine similarity between two vectors; 0.0 on dimension mismatch or
/// zero-magnitude input rather than an error, since a single bad product
/// embedding must not fail the whole ranking.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() {
        tracing::warn!(
            "cosine_similarity dimension mismatch: a={}, b={}",
            a.len(),
            b.len()
        );
        return 0.0;
    }
    if a.is_empty() {
        return 0.0;
    }

    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    dot / (norm_a * norm_b)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ranker() -> StyleRanker {
        StyleRanker::new(vec![
            ProductEmbedding {
                product_id: "dress-1".to_string(),
                vector: vec![1.0, 0.0, 0.0],
            },
            ProductEmbedding {
                product_id: "shirt-2".to_string(),
                vector: vec![0.0, 1.0, 0.0],
            },
            ProductEmbedding {
                product_id: "pants-3".to_string(),
                vector: vec![0.7, 0.7, 0.0],
            },
        ])
    }

    #[test]
    fn test_cosine_similarity() {
        assert!((cosine_similarity(&[1.0, 0.0], &[1.0, 0.0]) - 1.0).abs() < 1e-6);
        assert!(cosine_similarity(&[1.0, 0.0], &[0.0, 1.0]).abs() < 1e-6);
        assert!((cosine_similarity(&[1.0, 0.0], &[-1.0, 0.0]) + 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_cosine_dimension_mismatch_is_zero() {
        assert_eq!(cosine_similarity(&[1.0, 0.0], &[1.0]), 0.0);
    }

    #[test]
    fn test_rank_orders_by_similarity() {
        let ranked = ranker().rank(&[vec![1.0, 0.0, 0.0]], 10).unwrap();

        assert_eq!(ranked.len(), 3);
        assert_eq!(ranked[0].product_id, "dress-1");
        assert!(ranked[0].similarity > ranked[1].similarity);
        assert_eq!(ranked[2].product_id, "shirt-2");
    }

    #[test]
    fn test_rank_respects_top_n() {
        let ranked = ranker().rank(&[vec![1.0, 0.0, 0.0]], 1).unwrap();
        assert_eq!(ranked.len(), 1);
    }

    #[test]
    fn test_rank_mean_pools_preferences() {
        // Two orthogonal preferences average to the diagonal product.
        let ranked = ranker()
            .rank(&[vec![1.0, 0.0, 0.0], vec![0.0, 1.0, 0.0]], 1)
            .unwrap();
        assert_eq!(ranked[0].product_id, "pants-3");
    }

    #[test]
    fn test_rank_empty_preferences() {
        assert!(matches!(
            ranker().rank(&[], 5),
            Err(StyleError::EmptyPreferences)
        ));
    }

    #[test]
    fn test_rank_mismatched_preferences() {
        let result = ranker().rank(&[vec![1.0, 0.0, 0.0], vec![1.0]], 5);
        assert!(matches!(
            result,
            Err(StyleError::DimensionMismatch { expected: 3, actual: 1 })
        ));
    }
}
