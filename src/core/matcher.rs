use crate::core::scoring::{EmbeddingSimilarityStrategy, LexicalOverlapStrategy, MatchingStrategy};
use crate::models::{InterestProfile, GuideCandidate, MatchResult, MatchingLimits, StrategyKind};
use crate::services::Embedder;
use std::sync::Arc;

/// Number of guides returned by the fixed fallback ranking
pub const FALLBACK_COUNT: usize = 3;
const FALLBACK_TOP_SCORE: u8 = 95;
const FALLBACK_STEP: u8 = 5;
const FALLBACK_SHARED: usize = 2;
const FALLBACK_EXPLANATION: &str = "Highly recommended local guide";

/// Result of a ranking call
#[derive(Debug)]
pub struct RankedMatches {
    pub matches: Vec<MatchResult>,
    pub total_candidates: usize,
    pub used_fallback: bool,
}

/// Main matching orchestrator
///
/// # Pipeline Stages
/// 1. Score every guide with the selected strategy
/// 2. Stable sort by descending score (ties keep input order)
/// 3. Truncate to the requested cap
///
/// If the strategy fails, a fixed ranking of the first guides is returned
/// instead. Callers always get a result, never an error.
#[derive(Clone)]
pub struct Matcher {
    embedding: Arc<EmbeddingSimilarityStrategy>,
    lexical: Arc<LexicalOverlapStrategy>,
    limits: MatchingLimits,
}

impl Matcher {
    pub fn new(embedder: Embedder, limits: MatchingLimits) -> Self {
        Self {
            embedding: Arc::new(EmbeddingSimilarityStrategy::new(embedder, limits.concurrency)),
            lexical: Arc::new(LexicalOverlapStrategy),
            limits,
        }
    }

    pub fn limits(&self) -> MatchingLimits {
        self.limits
    }

    pub fn embedder(&self) -> &Embedder {
        self.embedding.embedder()
    }

    pub fn strategy(&self, kind: StrategyKind) -> &dyn MatchingStrategy {
        match kind {
            StrategyKind::Embedding => self.embedding.as_ref(),
            StrategyKind::Lexical => self.lexical.as_ref(),
        }
    }

    /// Find the best guides for a tourist using embedding similarity
    ///
    /// # Arguments
    /// * `interests` - The tourist's interest terms
    /// * `guides` - Candidate guides, supplied by the caller
    ///
    /// # Returns
    /// At most `max_results` matches, ordered by descending score
    pub async fn find_matches(&self, interests: &[String], guides: &[GuideCandidate]) -> Vec<MatchResult> {
        let profile = InterestProfile::new(interests.iter().cloned());
        self.rank(StrategyKind::Embedding, &profile, guides, self.limits.max_results)
            .await
            .matches
    }

    /// Rank guides with an explicit strategy and cap
    pub async fn rank(
        &self,
        kind: StrategyKind,
        profile: &InterestProfile,
        guides: &[GuideCandidate],
        limit: usize,
    ) -> RankedMatches {
        let total_candidates = guides.len();

        if guides.is_empty() || limit == 0 {
            return RankedMatches {
                matches: Vec::new(),
                total_candidates,
                used_fallback: false,
            };
        }

        match self.strategy(kind).score(profile, guides).await {
            Ok(mut matches) => {
                matches.sort_by(|a, b| b.score.cmp(&a.score));
                matches.truncate(limit);

                tracing::debug!(
                    "Ranked {} of {} guides with {} strategy",
                    matches.len(),
                    total_candidates,
                    kind
                );

                RankedMatches {
                    matches,
                    total_candidates,
                    used_fallback: false,
                }
            }
            Err(e) => {
                tracing::error!(strategy = %kind, "Scoring failed, returning fixed fallback ranking: {}", e);

                RankedMatches {
                    matches: fallback_ranking(profile, guides, limit),
                    total_candidates,
                    used_fallback: true,
                }
            }
        }
    }
}

/// Fixed ranking used when scoring fails
///
/// The first `FALLBACK_COUNT` guides in input order, scored 95, 90, 85,
/// each sharing the tourist's first two interests.
pub fn fallback_ranking(profile: &InterestProfile, guides: &[GuideCandidate], limit: usize) -> Vec<MatchResult> {
    let shared: Vec<String> = profile.interests.iter().take(FALLBACK_SHARED).cloned().collect();

    guides
        .iter()
        .take(FALLBACK_COUNT.min(limit))
        .zip((0u8..).map(|rank| FALLBACK_TOP_SCORE - rank * FALLBACK_STEP))
        .map(|(guide, score)| MatchResult {
            guide_id: guide.id.clone(),
            score,
            shared_interests: shared.clone(),
            explanation: FALLBACK_EXPLANATION.to_string(),
        })
        .collect()
}
