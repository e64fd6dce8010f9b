use crate::core::{
    overlap::{explanation, lexical_score, shared_interests},
    similarity::{cosine_similarity, similarity_to_score, ScoringError},
};
use crate::models::{InterestProfile, GuideCandidate, MatchResult, StrategyKind};
use crate::services::Embedder;
use async_trait::async_trait;

/// Scores every guide against one tourist's interests
///
/// Implementations return one result per guide, in input order. Ranking
/// and truncation belong to the `Matcher`.
#[async_trait]
pub trait MatchingStrategy: Send + Sync {
    fn kind(&self) -> StrategyKind;

    async fn score(
        &self,
        profile: &InterestProfile,
        guides: &[GuideCandidate],
    ) -> Result<Vec<MatchResult>, ScoringError>;
}

/// Cosine similarity between provider embeddings
///
/// Score formula:
/// score = clamp(round(cos(tourist, guide) * 100), 0, 100)
///
/// The tourist text is embedded once, then every guide text is embedded with
/// bounded parallelism. Individual guide failures degrade to random vectors
/// and are still scored. A degraded tourist vector, or every guide vector
/// degraded, leaves the ranking without signal, so
/// `ScoringError::ProviderUnavailable` is returned instead. Cached vectors
/// count as healthy.
pub struct EmbeddingSimilarityStrategy {
    embedder: Embedder,
    concurrency: usize,
}

impl EmbeddingSimilarityStrategy {
    pub fn new(embedder: Embedder, concurrency: usize) -> Self {
        Self {
            embedder,
            concurrency,
        }
    }

    pub fn embedder(&self) -> &Embedder {
        &self.embedder
    }
}

#[async_trait]
impl MatchingStrategy for EmbeddingSimilarityStrategy {
    fn kind(&self) -> StrategyKind {
        StrategyKind::Embedding
    }

    async fn score(
        &self,
        profile: &InterestProfile,
        guides: &[GuideCandidate],
    ) -> Result<Vec<MatchResult>, ScoringError> {
        let tourist = self.embedder.embed(&profile.embedding_text()).await;

        let texts: Vec<String> = guides.iter().map(GuideCandidate::embedding_text).collect();
        let guide_embeddings = self.embedder.embed_many(&texts, self.concurrency).await;

        let total = guide_embeddings.len() + 1;
        let degraded_guides = guide_embeddings.iter().filter(|e| e.is_degraded()).count();
        let degraded = usize::from(tourist.is_degraded()) + degraded_guides;

        let guides_lost = !guide_embeddings.is_empty() && degraded_guides == guide_embeddings.len();
        if tourist.is_degraded() || guides_lost {
            return Err(ScoringError::ProviderUnavailable(degraded));
        }
        if degraded > 0 {
            tracing::warn!(degraded, total, "Scoring with degraded embeddings");
        }

        guides
            .iter()
            .zip(&guide_embeddings)
            .map(|(guide, embedding)| {
                let similarity = cosine_similarity(&tourist.vector, &embedding.vector)?;
                let shared = shared_interests(profile, guide);

                Ok(MatchResult {
                    guide_id: guide.id.clone(),
                    score: similarity_to_score(similarity),
                    explanation: explanation(&shared),
                    shared_interests: shared,
                })
            })
            .collect()
    }
}

/// Keyword overlap ratio, no provider calls
///
/// Score formula:
/// score = min(100, max(50, overlap / max(interests, specialties) * 100 + 20))
#[derive(Debug, Clone, Copy, Default)]
pub struct LexicalOverlapStrategy;

#[async_trait]
impl MatchingStrategy for LexicalOverlapStrategy {
    fn kind(&self) -> StrategyKind {
        StrategyKind::Lexical
    }

    async fn score(
        &self,
        profile: &InterestProfile,
        guides: &[GuideCandidate],
    ) -> Result<Vec<MatchResult>, ScoringError> {
        Ok(guides
            .iter()
            .map(|guide| {
                let shared = shared_interests(profile, guide);
                let score = lexical_score(shared.len(), profile.len(), guide.specialties.len());

                MatchResult {
                    guide_id: guide.id.clone(),
                    score,
                    explanation: explanation(&shared),
                    shared_interests: shared,
                }
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::EmbeddingVector;
    use crate::services::{CacheKey, EmbeddingCache, EmbeddingProvider, ProviderError};
    use std::sync::Arc;
    use std::time::Duration;

    struct FixedProvider {
        vector: Option<EmbeddingVector>,
    }

    #[async_trait]
    impl EmbeddingProvider for FixedProvider {
        async fn embed(&self, text: &str) -> Result<EmbeddingVector, ProviderError> {
            match &self.vector {
                Some(v) if text.starts_with("short") => Ok(v[..2].to_vec()),
                Some(v) => Ok(v.clone()),
                None => Err(ProviderError::Unauthorized),
            }
        }

        fn dimensions(&self) -> usize {
            3
        }

        fn name(&self) -> &str {
            "fixed"
        }
    }

    fn strategy(vector: Option<EmbeddingVector>) -> EmbeddingSimilarityStrategy {
        let embedder = Embedder::new(
            Arc::new(FixedProvider { vector }),
            EmbeddingCache::disabled(),
            Duration::from_secs(1),
        );
        EmbeddingSimilarityStrategy::new(embedder, 2)
    }

    fn guides() -> Vec<GuideCandidate> {
        vec![
            GuideCandidate::new("g1", vec!["hiking".to_string(), "nature".to_string()], None),
            GuideCandidate::new("g2", vec!["cooking".to_string()], None),
        ]
    }

    #[tokio::test]
    async fn test_lexical_strategy() {
        let profile = InterestProfile::new(["adventure", "hiking"]);
        let results = LexicalOverlapStrategy.score(&profile, &guides()).await.unwrap();

        assert_eq!(results[0].guide_id, "g1");
        assert_eq!(results[0].score, 70);
        assert_eq!(results[0].shared_interests, vec!["hiking"]);
        assert_eq!(results[1].score, 50);
        assert!(results[1].shared_interests.is_empty());
    }

    #[tokio::test]
    async fn test_embedding_strategy_identical_vectors() {
        let profile = InterestProfile::new(["adventure", "hiking"]);
        let results = strategy(Some(vec![0.2, 0.4, 0.6]))
            .score(&profile, &guides())
            .await
            .unwrap();

        assert_eq!(results.len(), 2);
        assert!(results.iter().all(|r| r.score == 100));
        assert_eq!(results[0].explanation, "Perfect match! Shares hiking");
    }

    #[tokio::test]
    async fn test_embedding_strategy_all_degraded() {
        let profile = InterestProfile::new(["history"]);
        let err = strategy(None).score(&profile, &guides()).await.unwrap_err();
        assert_eq!(err, ScoringError::ProviderUnavailable(3));
    }

    #[tokio::test]
    async fn test_embedding_strategy_degraded_tourist_with_cached_guides() {
        let cache = EmbeddingCache::new(100, 60);
        for guide in guides() {
            cache
                .insert(CacheKey::embedding("fixed", &guide.embedding_text()), Arc::new(vec![0.2, 0.4, 0.6]))
                .await;
        }
        let embedder = Embedder::new(Arc::new(FixedProvider { vector: None }), cache, Duration::from_secs(1));
        let profile = InterestProfile::new(["history"]);

        let err = EmbeddingSimilarityStrategy::new(embedder, 2)
            .score(&profile, &guides())
            .await
            .unwrap_err();
        assert_eq!(err, ScoringError::ProviderUnavailable(1));
    }

    #[tokio::test]
    async fn test_embedding_strategy_dimension_mismatch() {
        let profile = InterestProfile::new(["history"]);
        let short_guide = vec![GuideCandidate::new("g1", vec!["short".to_string()], None)];

        let err = strategy(Some(vec![0.2, 0.4, 0.6]))
            .score(&profile, &short_guide)
            .await
            .unwrap_err();
        assert!(matches!(err, ScoringError::DimensionMismatch { left: 3, right: 2 }));
    }
}
