//! Centralized default constants for kedai.
//!
//! **This module is the single source of truth** for shared default values.
//! Configuration loaders and request parsers reference these constants
//! instead of repeating magic numbers.

// =============================================================================
// PAGINATION
// =============================================================================

/// Default page number for list endpoints (1-based).
pub const PAGE: i64 = 1;

/// Default page size for the merchant list.
pub const PAGE_SIZE: i64 = 10;

/// Smallest accepted page size.
pub const PAGE_SIZE_MIN: i64 = 1;

/// Largest accepted page size.
pub const PAGE_SIZE_MAX: i64 = 100;

// =============================================================================
// SEARCH RANKING
// =============================================================================

/// Weight of the full-text rank in the combined relevance score.
pub const FTS_WEIGHT: f64 = 0.7;

/// Weight of the trigram similarity in the combined relevance score.
pub const SIMILARITY_WEIGHT: f64 = 0.3;

/// Threshold used by the `%` trigram match operator
/// (`pg_trgm.similarity_threshold`, PostgreSQL's own default).
pub const TRIGRAM_THRESHOLD: f64 = 0.3;

// =============================================================================
// VALIDATION
// =============================================================================

/// Merchant rating lower bound.
pub const MERCHANT_RATING_MIN: f64 = 0.0;

/// Merchant rating upper bound.
pub const MERCHANT_RATING_MAX: f64 = 5.0;

/// Review / feedback rating lower bound.
pub const REVIEW_RATING_MIN: i32 = 1;

/// Review / feedback rating upper bound.
pub const REVIEW_RATING_MAX: i32 = 5;

/// Maximum feedback author name length (characters).
pub const FEEDBACK_NAME_MAX: usize = 50;

/// Maximum feedback message length (characters).
pub const FEEDBACK_MESSAGE_MAX: usize = 255;

/// Maximum user name / email length (characters).
pub const USER_FIELD_MAX: usize = 255;

/// Minimum password length on registration.
pub const PASSWORD_MIN_LENGTH: usize = 8;

// =============================================================================
// SERVER
// =============================================================================

/// Default HTTP server port.
pub const SERVER_PORT: u16 = 8000;

/// Default API prefix.
pub const API_V1_STR: &str = "/api/v1";

/// Default frontend origin allowed by CORS.
pub const FRONTEND_HOST: &str = "http://localhost:3000";

/// Default rate limit: max requests per period.
pub const RATE_LIMIT_REQUESTS: u64 = 100;

/// Default rate limit: period in seconds.
pub const RATE_LIMIT_PERIOD_SECS: u64 = 60;

/// Default CORS max-age in seconds (1 hour).
pub const CORS_MAX_AGE_SECS: u64 = 3600;

/// Access token lifetime in minutes (one year).
pub const ACCESS_TOKEN_EXPIRES_MINUTES: i64 = 60 * 24 * 365;

/// JWT signing algorithm name.
pub const JWT_ALGORITHM: &str = "HS256";
