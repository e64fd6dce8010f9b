use actix_web::{web, HttpResponse, Responder};
use validator::Validate;
use crate::models::{FindMatchesRequest, RankGuidesRequest, FindMatchesResponse, HealthResponse, ErrorResponse, InterestProfile, StrategyKind};
use crate::core::Matcher;

/// Request limits applied by the HTTP layer
#[derive(Debug, Clone, Copy)]
pub struct RouteLimits {
    /// Cap on `limit` for `/matches/find`
    pub max_limit: usize,
    pub max_candidates: usize,
}

impl Default for RouteLimits {
    fn default() -> Self {
        Self {
            max_limit: 100,
            max_candidates: 500,
        }
    }
}

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub matcher: Matcher,
    pub limits: RouteLimits,
    pub provider_configured: bool,
}

/// Configure all match-related routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        .route("/health", web::get().to(health_check))
        .route("/matches/find", web::post().to(find_matches))
        .route("/guides/rank", web::post().to(rank_guides));
}

fn bad_request(error: &str, message: String) -> HttpResponse {
    HttpResponse::BadRequest().json(ErrorResponse {
        error: error.to_string(),
        message,
        status_code: 400,
    })
}

fn check_candidates(state: &AppState, count: usize) -> Result<(), HttpResponse> {
    if count > state.limits.max_candidates {
        return Err(bad_request(
            "Too many guides",
            format!("At most {} guides per request, got {}", state.limits.max_candidates, count),
        ));
    }
    Ok(())
}

/// Health check endpoint
async fn health_check(state: web::Data<AppState>) -> impl Responder {
    let embedder = state.matcher.embedder();
    let status = if state.provider_configured { "healthy" } else { "degraded" };

    HttpResponse::Ok().json(HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        provider: embedder.provider_name().to_string(),
        cache_entries: embedder.cache().stats().entries,
        timestamp: chrono::Utc::now(),
    })
}

/// Find matches endpoint
///
/// POST /api/v1/matches/find
///
/// Request body:
/// ```json
/// {
///   "touristInterests": ["hiking", "food"],
///   "guides": [{ "id": "g1", "specialties": ["hiking"], "bio": "..." }],
///   "strategy": "embedding",
///   "limit": 5
/// }
/// ```
async fn find_matches(
    state: web::Data<AppState>,
    req: web::Json<FindMatchesRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        tracing::info!("Validation failed for find_matches request: {}", errors);
        return bad_request("Validation failed", errors.to_string());
    }
    if let Err(response) = check_candidates(&state, req.guides.len()) {
        return response;
    }

    let strategy = req.strategy.unwrap_or_default();
    let limit = req
        .limit
        .map(usize::from)
        .unwrap_or_else(|| state.matcher.limits().max_results)
        .min(state.limits.max_limit);

    tracing::info!(
        "Finding matches: {} interests, {} guides, strategy: {}, limit: {}",
        req.tourist_interests.len(),
        req.guides.len(),
        strategy,
        limit
    );

    let profile = InterestProfile::new(req.tourist_interests.iter().cloned());
    let result = state.matcher.rank(strategy, &profile, &req.guides, limit).await;

    if result.used_fallback {
        tracing::warn!("Served fallback ranking for {} guides", result.total_candidates);
    }

    HttpResponse::Ok().json(FindMatchesResponse {
        matches: result.matches,
        strategy,
        total_candidates: result.total_candidates,
    })
}

/// Rank a discover listing by keyword overlap
///
/// POST /api/v1/guides/rank
///
/// Returns every candidate unless the caller passes a `limit`. The listing is
/// bounded by `max_candidates` only.
async fn rank_guides(
    state: web::Data<AppState>,
    req: web::Json<RankGuidesRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        return bad_request("Validation failed", errors.to_string());
    }
    if let Err(response) = check_candidates(&state, req.guides.len()) {
        return response;
    }

    let limit = req.limit.map(usize::from).unwrap_or(req.guides.len());

    let profile = InterestProfile::new(req.tourist_interests.iter().cloned());
    let result = state
        .matcher
        .rank(StrategyKind::Lexical, &profile, &req.guides, limit)
        .await;

    tracing::debug!("Ranked {} guides for listing", result.matches.len());

    HttpResponse::Ok().json(FindMatchesResponse {
        matches: result.matches,
        strategy: StrategyKind::Lexical,
        total_candidates: result.total_candidates,
    })
}
