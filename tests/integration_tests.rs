// Integration tests for Rukna Match

use async_trait::async_trait;
use rukna_match::core::Matcher;
use rukna_match::models::{EmbeddingVector, GuideCandidate, InterestProfile, MatchingLimits, StrategyKind};
use rukna_match::services::{Embedder, EmbeddingCache, EmbeddingProvider, ProviderError};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

const VOCABULARY: &[&str] = &[
    "adventure", "hiking", "nature", "cooking", "food", "history", "art", "museums",
];

/// Bag-of-words provider over a fixed vocabulary; unknown words share the last slot
struct VocabularyProvider {
    calls: AtomicUsize,
    fail_on: Option<&'static str>,
    offline: AtomicBool,
}

impl VocabularyProvider {
    fn new() -> Self {
        Self { calls: AtomicUsize::new(0), fail_on: None, offline: AtomicBool::new(false) }
    }

    fn failing_on(word: &'static str) -> Self {
        Self { calls: AtomicUsize::new(0), fail_on: Some(word), offline: AtomicBool::new(false) }
    }
}

#[async_trait]
impl EmbeddingProvider for VocabularyProvider {
    async fn embed(&self, text: &str) -> Result<EmbeddingVector, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.offline.load(Ordering::SeqCst) {
            return Err(ProviderError::Api { status: 503, message: "service unavailable".to_string() });
        }
        if let Some(word) = self.fail_on {
            if text.contains(word) {
                return Err(ProviderError::RateLimited);
            }
        }

        let mut vector = vec![0.0; VOCABULARY.len() + 1];
        for word in text.split_whitespace() {
            let word = word.to_lowercase();
            let slot = VOCABULARY.iter().position(|v| *v == word).unwrap_or(VOCABULARY.len());
            vector[slot] += 1.0;
        }
        Ok(vector)
    }

    fn dimensions(&self) -> usize {
        VOCABULARY.len() + 1
    }

    fn name(&self) -> &str {
        "vocabulary"
    }
}

/// Provider that always fails
struct OfflineProvider;

#[async_trait]
impl EmbeddingProvider for OfflineProvider {
    async fn embed(&self, _text: &str) -> Result<EmbeddingVector, ProviderError> {
        Err(ProviderError::Api { status: 503, message: "service unavailable".to_string() })
    }

    fn dimensions(&self) -> usize {
        768
    }

    fn name(&self) -> &str {
        "offline"
    }
}

fn create_matcher(provider: Arc<dyn EmbeddingProvider>, cache: EmbeddingCache) -> Matcher {
    let embedder = Embedder::new(provider, cache, Duration::from_secs(2));
    Matcher::new(embedder, MatchingLimits::default())
}

fn create_guide(id: &str, specialties: &[&str], bio: Option<&str>) -> GuideCandidate {
    GuideCandidate::new(
        id,
        specialties.iter().map(|s| s.to_string()).collect(),
        bio.map(str::to_string),
    )
}

fn interests(terms: &[&str]) -> Vec<String> {
    terms.iter().map(|s| s.to_string()).collect()
}

fn many_guides(count: usize) -> Vec<GuideCandidate> {
    (0..count)
        .map(|i| {
            let specialty = VOCABULARY[i % VOCABULARY.len()];
            create_guide(&format!("g{}", i), &[specialty], Some("local guide"))
        })
        .collect()
}

#[tokio::test]
async fn test_adventure_hiking_scenario_embedding() {
    let matcher = create_matcher(Arc::new(VocabularyProvider::new()), EmbeddingCache::disabled());
    let guides = vec![
        create_guide("g1", &["hiking", "nature"], None),
        create_guide("g2", &["cooking"], None),
    ];

    let results = matcher.find_matches(&interests(&["adventure", "hiking"]), &guides).await;

    assert_eq!(results.len(), 2);
    assert_eq!(results[0].guide_id, "g1");
    assert_eq!(results[0].score, 50);
    assert_eq!(results[0].shared_interests, vec!["hiking"]);
    assert_eq!(results[0].explanation, "Perfect match! Shares hiking");
    assert_eq!(results[1].guide_id, "g2");
    assert!(results[0].score > results[1].score);
}

#[tokio::test]
async fn test_adventure_hiking_scenario_lexical() {
    let matcher = create_matcher(Arc::new(OfflineProvider), EmbeddingCache::disabled());
    let guides = vec![
        create_guide("g1", &["hiking", "nature"], None),
        create_guide("g2", &["cooking"], None),
    ];
    let profile = InterestProfile::new(["adventure", "hiking"]);

    let ranked = matcher.rank(StrategyKind::Lexical, &profile, &guides, 5).await;

    assert!(!ranked.used_fallback);
    assert_eq!(ranked.matches[0].guide_id, "g1");
    assert!(ranked.matches[0].score > ranked.matches[1].score);
    assert!(ranked.matches[0].shared_interests.contains(&"hiking".to_string()));
}

#[tokio::test]
async fn test_result_count_capped() {
    let matcher = create_matcher(Arc::new(VocabularyProvider::new()), EmbeddingCache::disabled());
    let tourist = interests(&["history", "art"]);

    for count in 0..=5 {
        let results = matcher.find_matches(&tourist, &many_guides(count)).await;
        assert_eq!(results.len(), count, "Expected {} results", count);
    }

    let results = matcher.find_matches(&tourist, &many_guides(12)).await;
    assert_eq!(results.len(), 5);
}

#[tokio::test]
async fn test_results_sorted_and_bounded() {
    let matcher = create_matcher(Arc::new(VocabularyProvider::new()), EmbeddingCache::disabled());
    let tourist = interests(&["food", "cooking", "history"]);

    let results = matcher.find_matches(&tourist, &many_guides(10)).await;

    for pair in results.windows(2) {
        assert!(pair[0].score >= pair[1].score, "Matches not sorted by score");
    }
    for m in &results {
        assert!(m.score <= 100);
        for shared in &m.shared_interests {
            assert!(tourist.contains(shared), "{} is not a tourist interest", shared);
        }
    }
}

#[tokio::test]
async fn test_offline_provider_returns_fixed_fallback() {
    let matcher = create_matcher(Arc::new(OfflineProvider), EmbeddingCache::disabled());
    let tourist = interests(&["food", "history", "art"]);

    let results = matcher.find_matches(&tourist, &many_guides(6)).await;
    let scores: Vec<u8> = results.iter().map(|m| m.score).collect();
    assert_eq!(scores, vec![95, 90, 85]);
    assert_eq!(results[0].guide_id, "g0");
    assert_eq!(results[0].shared_interests, vec!["food", "history"]);
    assert_eq!(results[0].explanation, "Highly recommended local guide");

    let results = matcher.find_matches(&tourist, &many_guides(2)).await;
    assert_eq!(results.len(), 2);
}

#[tokio::test]
async fn test_partial_degradation_still_scores() {
    let provider = Arc::new(VocabularyProvider::failing_on("cooking"));
    let matcher = create_matcher(provider, EmbeddingCache::disabled());
    let profile = InterestProfile::new(["hiking"]);
    let guides = vec![
        create_guide("g1", &["hiking"], None),
        create_guide("g2", &["cooking"], None),
    ];

    let ranked = matcher.rank(StrategyKind::Embedding, &profile, &guides, 5).await;

    assert!(!ranked.used_fallback);
    assert_eq!(ranked.matches.len(), 2);
    assert_eq!(ranked.matches[0].guide_id, "g1");
    assert_eq!(ranked.matches[0].score, 100);
}

#[tokio::test]
async fn test_empty_guide_list_skips_provider() {
    let provider = Arc::new(VocabularyProvider::new());
    let matcher = create_matcher(provider.clone(), EmbeddingCache::disabled());

    let results = matcher.find_matches(&interests(&["food"]), &[]).await;

    assert!(results.is_empty());
    assert_eq!(provider.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_empty_interests_are_valid() {
    let matcher = create_matcher(Arc::new(VocabularyProvider::new()), EmbeddingCache::disabled());

    let results = matcher.find_matches(&[], &many_guides(3)).await;

    assert_eq!(results.len(), 3);
    assert!(results.iter().all(|m| m.shared_interests.is_empty()));
}

#[tokio::test]
async fn test_cache_avoids_repeat_calls() {
    let provider = Arc::new(VocabularyProvider::new());
    let matcher = create_matcher(provider.clone(), EmbeddingCache::new(1000, 60));
    let tourist = interests(&["art"]);
    let guides = many_guides(4);

    let first = matcher.find_matches(&tourist, &guides).await;
    assert_eq!(provider.calls.load(Ordering::SeqCst), 5);

    let second = matcher.find_matches(&tourist, &guides).await;
    assert_eq!(provider.calls.load(Ordering::SeqCst), 5);
    assert_eq!(first, second);
}

#[tokio::test]
async fn test_outage_after_warm_cache_returns_fixed_fallback() {
    let provider = Arc::new(VocabularyProvider::new());
    let matcher = create_matcher(provider.clone(), EmbeddingCache::new(1000, 60));
    let tourist = interests(&["food", "history", "art"]);

    let warm = matcher.find_matches(&tourist, &[create_guide("w1", &["walking"], None)]).await;
    assert_eq!(warm.len(), 1);

    provider.offline.store(true, Ordering::SeqCst);
    let results = matcher.find_matches(&tourist, &many_guides(6)).await;

    let scores: Vec<u8> = results.iter().map(|m| m.score).collect();
    assert_eq!(scores, vec![95, 90, 85]);
    assert_eq!(results[0].explanation, "Highly recommended local guide");
}

#[tokio::test]
async fn test_identical_guide_texts_share_one_call() {
    let provider = Arc::new(VocabularyProvider::new());
    let matcher = create_matcher(provider.clone(), EmbeddingCache::new(1000, 60));
    let guides: Vec<GuideCandidate> = (0..4)
        .map(|i| create_guide(&format!("g{}", i), &["food"], Some("local guide")))
        .collect();

    let results = matcher.find_matches(&interests(&["food"]), &guides).await;

    assert_eq!(results.len(), 4);
    assert_eq!(provider.calls.load(Ordering::SeqCst), 2);
}
