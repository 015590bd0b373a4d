//! # kedai-api
//!
//! HTTP server for the kedai merchant directory: router assembly, shared
//! state, middleware and logging setup. The binary in `main.rs` only wires
//! configuration, the database and the listener together.

pub mod auth;
pub mod config;
pub mod error;
pub mod handlers;
pub mod openapi;
pub mod query_types;

use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::State,
    http::{header, HeaderValue, Method, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use governor::{Quota, RateLimiter};
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    request_id::{MakeRequestId, PropagateRequestIdLayer, RequestId, SetRequestIdLayer},
    trace::TraceLayer,
};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::OpenApi;
use uuid::Uuid;

use kedai_core::{defaults, logging};
use kedai_db::Database;

pub use auth::{CurrentUser, JwtKeys};
pub use config::ApiConfig;
pub use error::ApiError;

// =============================================================================
// REQUEST ID (UUIDv7)
// =============================================================================

/// Generates time-ordered UUIDv7 request correlation IDs.
#[derive(Clone, Default)]
pub struct MakeRequestUuidV7;

impl MakeRequestId for MakeRequestUuidV7 {
    fn make_request_id<B>(&mut self, _request: &axum::http::Request<B>) -> Option<RequestId> {
        let id = Uuid::now_v7().to_string().parse().ok()?;
        Some(RequestId::new(id))
    }
}

/// Root span of every HTTP request, tagged with its correlation id.
fn make_request_span(request: &axum::http::Request<axum::body::Body>) -> tracing::Span {
    let span = tracing::info_span!(
        "http_request",
        method = %request.method(),
        uri = %request.uri(),
        request_id = tracing::field::Empty,
    );
    if let Some(id) = request
        .headers()
        .get("x-request-id")
        .and_then(|v| v.to_str().ok())
    {
        span.record(logging::REQUEST_ID, id);
    }
    span
}

// =============================================================================
// STATE
// =============================================================================

/// Global rate limiter type (direct quota, one bucket for all clients).
pub type GlobalRateLimiter = RateLimiter<
    governor::state::NotKeyed,
    governor::state::InMemoryState,
    governor::clock::DefaultClock,
>;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub config: Arc<ApiConfig>,
    pub jwt: Arc<JwtKeys>,
    /// None when rate limiting is disabled.
    pub rate_limiter: Option<Arc<GlobalRateLimiter>>,
}

impl AppState {
    pub fn new(db: Database, config: ApiConfig) -> Self {
        let jwt = JwtKeys::new(&config.secret_key, config.access_token_expires_minutes);
        let rate_limiter = build_rate_limiter(&config);
        Self {
            db,
            config: Arc::new(config),
            jwt: Arc::new(jwt),
            rate_limiter,
        }
    }
}

/// `requests` tokens per `period_secs`, refilled evenly, with the full
/// allowance available as a burst.
fn build_rate_limiter(config: &ApiConfig) -> Option<Arc<GlobalRateLimiter>> {
    if !config.rate_limit_enabled {
        return None;
    }
    let requests = u32::try_from(config.rate_limit_requests)
        .ok()
        .and_then(NonZeroU32::new);
    let quota = requests.and_then(|burst| {
        let period = Duration::from_secs(config.rate_limit_period_secs) / burst.get();
        Quota::with_period(period).map(|q| q.allow_burst(burst))
    });
    match quota {
        Some(quota) => Some(Arc::new(RateLimiter::direct(quota))),
        None => {
            warn!(
                subsystem = "api",
                requests = config.rate_limit_requests,
                period_secs = config.rate_limit_period_secs,
                "Invalid rate limit settings; rate limiting disabled"
            );
            None
        }
    }
}

// =============================================================================
// RATE LIMITING MIDDLEWARE
// =============================================================================

async fn rate_limit_middleware(
    State(state): State<AppState>,
    request: axum::extract::Request,
    next: axum::middleware::Next,
) -> Result<impl IntoResponse, (StatusCode, Json<serde_json::Value>)> {
    if let Some(limiter) = &state.rate_limiter {
        if limiter.check().is_err() {
            warn!(subsystem = "api", "Rate limit exceeded");
            return Err((
                StatusCode::TOO_MANY_REQUESTS,
                Json(serde_json::json!({
                    "error": "Too many requests. Please wait before retrying."
                })),
            ));
        }
    }
    Ok(next.run(request).await)
}

// =============================================================================
// ROUTER
// =============================================================================

async fn openapi_json() -> impl IntoResponse {
    Json(openapi::ApiDoc::openapi())
}

fn cors_layer(config: &ApiConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = config
        .cors_origins()
        .into_iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(v) => Some(v),
            Err(e) => {
                warn!("Invalid CORS origin '{}': {}", origin, e);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE, header::ACCEPT])
        .allow_credentials(true)
        .max_age(Duration::from_secs(defaults::CORS_MAX_AGE_SECS))
}

/// Build the full application router.
pub fn build_router(state: AppState) -> Router {
    use handlers::{auth, feedbacks, merchant_types, merchants, users, utils};

    let api = Router::new()
        .route("/merchants", get(merchants::list_merchants))
        .route("/merchants/:id", get(merchants::get_merchant))
        .route("/merchants/:id/photos", get(merchants::get_merchant_photos))
        .route("/merchants/:id/reviews", get(merchants::get_merchant_reviews))
        .route("/merchants/:id/types", get(merchants::get_merchant_types))
        .route(
            "/merchants/:id/opening-hours",
            get(merchants::get_merchant_opening_hours),
        )
        .route(
            "/merchants/:id/amenities",
            get(merchants::get_merchant_amenities),
        )
        .route("/merchant-types", get(merchant_types::list_merchant_types))
        .route("/feedbacks", post(feedbacks::create_feedback))
        .route("/auth/login", post(auth::login))
        .route("/auth/register", post(auth::register))
        .route("/users/me", get(users::read_user_me))
        .route("/utils/", get(utils::health))
        .route("/utils/health", get(utils::health))
        .route("/openapi.json", get(openapi_json));

    let prefix = state.config.api_v1_str.clone();
    let app = if prefix.is_empty() {
        Router::new().merge(api)
    } else {
        Router::new().nest(&prefix, api)
    };

    let cors = cors_layer(&state.config);

    app.route("/", get(utils::root))
        .route("/health", get(utils::health_check))
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            rate_limit_middleware,
        ))
        .layer(TraceLayer::new_for_http().make_span_with(make_request_span))
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuidV7))
        .layer(cors)
        .with_state(state)
}

// =============================================================================
// TRACING
// =============================================================================

/// Initialize the global subscriber.
///
/// Environment variables:
///   LOG_FORMAT  - "json" or "text" (default: "text")
///   LOG_FILE    - path to log file (optional, enables daily-rotated file logging)
///   LOG_ANSI    - "true"/"false" override ANSI colors
///   RUST_LOG    - standard env filter (default: "kedai_api=debug,kedai_db=debug,tower_http=debug")
///
/// The returned guard must be held for the life of the process when file
/// logging is enabled.
pub fn init_tracing() -> Option<tracing_appender::non_blocking::WorkerGuard> {
    let log_format = std::env::var("LOG_FORMAT").unwrap_or_else(|_| "text".to_string());
    let log_file = std::env::var("LOG_FILE").ok().filter(|p| !p.trim().is_empty());
    let log_ansi = std::env::var("LOG_ANSI")
        .ok()
        .map(|v| v == "true" || v == "1");

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "kedai_api=debug,kedai_db=debug,tower_http=debug".into());

    let registry = tracing_subscriber::registry().with(env_filter);

    let guard = if let Some(ref path) = log_file {
        let path = std::path::Path::new(path);
        let file_dir = path.parent().unwrap_or(std::path::Path::new("."));
        let file_name = path
            .file_name()
            .and_then(|f| f.to_str())
            .unwrap_or("kedai-api.log");
        let file_appender = tracing_appender::rolling::daily(file_dir, file_name);
        let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

        if log_format == "json" {
            registry
                .with(
                    tracing_subscriber::fmt::layer()
                        .json()
                        .with_writer(non_blocking),
                )
                .init();
        } else {
            let layer = tracing_subscriber::fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(log_ansi.unwrap_or(false));
            registry.with(layer).init();
        }
        Some(guard)
    } else {
        if log_format == "json" {
            registry
                .with(tracing_subscriber::fmt::layer().json())
                .init();
        } else {
            let mut layer = tracing_subscriber::fmt::layer();
            if let Some(ansi) = log_ansi {
                layer = layer.with_ansi(ansi);
            }
            registry.with(layer).init();
        }
        None
    };

    info!(
        log_format = %log_format,
        log_file = log_file.as_deref().unwrap_or("(stdout)"),
        "Logging initialized"
    );
    guard
}
