//! # kedai-db
//!
//! PostgreSQL database layer for the kedai merchant directory.
//!
//! This crate provides:
//! - Connection pool management (with the trigram threshold applied per connection)
//! - The merchant list query builder, ranking engine, and pager
//! - Repository implementations for merchants, feedback, and users
//!
//! ## Example
//!
//! ```rust,ignore
//! use kedai_db::{Database, ListMerchantsRequest, MerchantRepository};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let db = Database::connect("postgres://localhost/kedai").await?;
//!
//!     let page = db
//!         .merchants
//!         .list(&ListMerchantsRequest::new().with_search("kopi"))
//!         .await?;
//!
//!     println!("{} merchants match", page.meta.total);
//!     Ok(())
//! }
//! ```
pub mod feedbacks;
pub mod merchant_query;
pub mod merchants;
pub mod pager;
pub mod pool;
pub mod ranking;
pub mod users;

// Note: Always compiled so integration tests (in tests/) can use DEFAULT_TEST_DATABASE_URL
pub mod test_fixtures;

// Re-export core types
pub use kedai_core::*;

pub use feedbacks::PgFeedbackRepository;
pub use merchant_query::{MerchantQuery, MerchantQueryBuilder, QueryParam};
pub use merchants::PgMerchantRepository;
pub use pager::PageWindow;
pub use pool::{create_lazy_pool, create_pool, create_pool_with_config, log_pool_metrics, PoolConfig};
pub use ranking::{sort_column, RankingEngine, SortColumn};
pub use users::PgUserRepository;

/// Combined database context with all repositories.
#[derive(Clone)]
pub struct Database {
    /// The underlying connection pool.
    pub pool: sqlx::Pool<sqlx::Postgres>,
    /// Merchant directory reads, including the ranked list.
    pub merchants: PgMerchantRepository,
    pub feedbacks: PgFeedbackRepository,
    pub users: PgUserRepository,
}

impl Database {
    /// Create a new Database instance from a connection pool.
    pub fn new(pool: sqlx::Pool<sqlx::Postgres>) -> Self {
        Self::with_ranking(pool, RankingConfig::default())
    }

    /// Create a Database whose merchant list uses the given ranking weights.
    pub fn with_ranking(pool: sqlx::Pool<sqlx::Postgres>, ranking: RankingConfig) -> Self {
        Self {
            merchants: PgMerchantRepository::with_ranking(pool.clone(), ranking),
            feedbacks: PgFeedbackRepository::new(pool.clone()),
            users: PgUserRepository::new(pool.clone()),
            pool,
        }
    }

    /// Create a new Database instance by connecting to the given URL.
    pub async fn connect(url: &str) -> Result<Self> {
        let pool = create_pool(url).await?;
        Ok(Self::new(pool))
    }

    /// Create with custom pool configuration.
    pub async fn connect_with_config(url: &str, config: PoolConfig) -> Result<Self> {
        let pool = create_pool_with_config(url, config).await?;
        Ok(Self::new(pool))
    }

    /// Run pending migrations.
    #[cfg(feature = "migrations")]
    pub async fn migrate(&self) -> Result<()> {
        sqlx::migrate!("../../migrations")
            .run(&self.pool)
            .await
            .map_err(|e| Error::Database(sqlx::Error::Migrate(Box::new(e))))?;
        Ok(())
    }

    /// Get the underlying connection pool.
    pub fn pool(&self) -> &sqlx::Pool<sqlx::Postgres> {
        &self.pool
    }
}
