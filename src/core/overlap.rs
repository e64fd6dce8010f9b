use crate::models::{InterestProfile, GuideCandidate};

/// Floor applied by the lexical scorer
pub const LEXICAL_MIN_SCORE: u8 = 50;

/// Flat bonus added to the lexical overlap ratio
const LEXICAL_BONUS: f64 = 20.0;

const GENERIC_EXPLANATION: &str = "Great cultural experience based on your interests";

/// Tourist interests that overlap any of the guide's specialties
///
/// A term overlaps when either string contains the other, ignoring case.
/// Result keeps the tourist's order and casing, so it is always a subset
/// of the profile's interests. Blank terms never overlap.
pub fn shared_interests(profile: &InterestProfile, guide: &GuideCandidate) -> Vec<String> {
    let specialties: Vec<String> = guide
        .specialties
        .iter()
        .map(|s| s.trim().to_lowercase())
        .filter(|s| !s.is_empty())
        .collect();

    profile
        .interests
        .iter()
        .filter(|interest| {
            let interest = interest.trim().to_lowercase();
            !interest.is_empty()
                && specialties
                    .iter()
                    .any(|specialty| specialty.contains(&interest) || interest.contains(specialty.as_str()))
        })
        .cloned()
        .collect()
}

/// Keyword overlap score for discover listings
///
/// `min(100, max(50, overlap / max(interests, specialties) * 100 + 20))`,
/// rounded. With no terms on either side the floor applies.
#[inline]
pub fn lexical_score(overlap_count: usize, interest_count: usize, specialty_count: usize) -> u8 {
    let denominator = interest_count.max(specialty_count);
    if denominator == 0 {
        return LEXICAL_MIN_SCORE;
    }

    let ratio = overlap_count as f64 / denominator as f64;
    (ratio * 100.0 + LEXICAL_BONUS)
        .max(LEXICAL_MIN_SCORE as f64)
        .min(100.0)
        .round() as u8
}

/// One-line explanation shown next to a match
pub fn explanation(shared: &[String]) -> String {
    if shared.is_empty() {
        GENERIC_EXPLANATION.to_string()
    } else {
        format!("Perfect match! Shares {}", shared.join(", "))
    }
}
