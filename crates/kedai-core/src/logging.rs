//! Structured logging schema for kedai.
//!
//! Event macros take field names as literal identifiers, so most fields are
//! written inline. The constants below cover the fields recorded onto an
//! existing span after it is created, where a typo would silently drop the
//! value.
//!
//! ## Common fields
//!
//! | Field | Meaning |
//! |-------|---------|
//! | `subsystem` | "api" or "database" |
//! | `op` | Logical operation: "list", "register", ... |
//! | `merchant_id` | Merchant being operated on |
//! | `duration_ms` | Wall-clock duration in milliseconds |
//! | `pool_size` | Open connections in the pool |
//! | `error` | Error message when an operation fails |
//!
//! ## Log Level Contract
//!
//! | Level | Usage |
//! |-------|-------|
//! | ERROR | Degraded service, requires operator attention |
//! | WARN  | Recoverable issue, fallback applied |
//! | INFO  | Lifecycle events (startup, shutdown, migrations) |
//! | DEBUG | Query plans, decision points, config choices |
//! | TRACE | Per-row data |

/// Correlation ID propagated from the `x-request-id` header (UUIDv7).
pub const REQUEST_ID: &str = "request_id";

/// Number of rows returned on the current page.
pub const RESULT_COUNT: &str = "result_count";

/// Number of rows matching the filter set.
pub const TOTAL: &str = "total";
