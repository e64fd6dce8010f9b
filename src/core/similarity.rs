use thiserror::Error;

/// Errors raised while scoring a request
#[derive(Debug, Error, PartialEq)]
pub enum ScoringError {
    #[error("Embedding dimensions differ: {left} vs {right}")]
    DimensionMismatch { left: usize, right: usize },

    #[error("Embedding provider unavailable: {0} embeddings degraded")]
    ProviderUnavailable(usize),
}

/// Cosine similarity between two embedding vectors
///
/// Returns a value in [-1, 1]. A zero-magnitude vector has no direction,
/// so its similarity to anything is 0.
///
/// # Errors
/// `ScoringError::DimensionMismatch` when the vectors differ in length.
#[inline]
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> Result<f32, ScoringError> {
    if a.len() != b.len() {
        return Err(ScoringError::DimensionMismatch {
            left: a.len(),
            right: b.len(),
        });
    }

    let (dot, norm_a, norm_b) = a.iter().zip(b).fold((0.0f32, 0.0f32, 0.0f32), |(dot, na, nb), (x, y)| {
        (dot + x * y, na + x * x, nb + y * y)
    });

    let magnitude = norm_a.sqrt() * norm_b.sqrt();
    if magnitude == 0.0 || !magnitude.is_finite() {
        return Ok(0.0);
    }

    Ok((dot / magnitude).clamp(-1.0, 1.0))
}

/// Convert a similarity into a 0-100 score
#[inline]
pub fn similarity_to_score(similarity: f32) -> u8 {
    if !similarity.is_finite() {
        return 0;
    }
    (similarity * 100.0).round().clamp(0.0, 100.0) as u8
}
