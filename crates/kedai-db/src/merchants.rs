//! Merchant repository implementation.

use std::time::Instant;

use async_trait::async_trait;
use sqlx::postgres::{PgArguments, PgRow};
use sqlx::query::Query;
use sqlx::{Pool, Postgres, Row};
use tracing::{debug, instrument, Span};

use kedai_core::{
    format_type_name, logging, Amenity, Error, ListMerchantsRequest, Merchant, MerchantListItem,
    MerchantRepository, MerchantsPage, OpeningHours, Photo, RankingConfig, Result, Review,
};

use crate::merchant_query::{MerchantQueryBuilder, QueryParam};
use crate::pager;
use crate::ranking::RankingEngine;

const MERCHANT_COLUMNS: &str = "id, google_place_id, name, display_name, primary_type, \
     formatted_address, short_address, phone_national, phone_international, website, \
     latitude, longitude, plus_code, rating, user_rating_count, business_status, \
     google_maps_uri, is_open_now, photo_url, description_en, description_id, \
     created_at, updated_at";

/// PostgreSQL implementation of MerchantRepository.
#[derive(Clone)]
pub struct PgMerchantRepository {
    pool: Pool<Postgres>,
    ranking: RankingEngine,
}

impl PgMerchantRepository {
    /// Create a repository with the default ranking weights.
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self::with_ranking(pool, RankingConfig::default())
    }

    pub fn with_ranking(pool: Pool<Postgres>, ranking: RankingConfig) -> Self {
        Self {
            pool,
            ranking: RankingEngine::new(ranking),
        }
    }
}

fn bind_params<'q>(
    mut q: Query<'q, Postgres, PgArguments>,
    params: &'q [QueryParam],
) -> Query<'q, Postgres, PgArguments> {
    for param in params {
        q = match param {
            QueryParam::String(s) => q.bind(s.as_str()),
            QueryParam::Float(f) => q.bind(*f),
            QueryParam::Bool(b) => q.bind(*b),
        };
    }
    q
}

fn map_row_to_list_item(row: &PgRow) -> Result<MerchantListItem> {
    let primary_type: Option<String> = row.try_get("primary_type")?;
    Ok(MerchantListItem {
        id: row.try_get("id")?,
        display_name: row.try_get("display_name")?,
        name: row.try_get("name")?,
        primary_type: primary_type.as_deref().map(format_type_name),
        short_address: row.try_get("short_address")?,
        rating: row.try_get("rating")?,
        user_rating_count: row.try_get("user_rating_count")?,
        photo_url: row.try_get("photo_url")?,
    })
}

#[async_trait]
impl MerchantRepository for PgMerchantRepository {
    #[instrument(
        skip(self, req),
        fields(
            subsystem = "database",
            component = "merchants",
            op = "list",
            total = tracing::field::Empty,
            result_count = tracing::field::Empty
        )
    )]
    async fn list(&self, req: &ListMerchantsRequest) -> Result<MerchantsPage> {
        let start = Instant::now();
        req.validate()?;

        let query = MerchantQueryBuilder::new(req, self.ranking).build();

        let count_sql = query.count_sql();
        let total: i64 = bind_params(sqlx::query(&count_sql), &query.params)
            .fetch_one(&self.pool)
            .await
            .map_err(Error::Database)?
            .try_get(0)?;

        let window = pager::window(req.page);
        let data_sql = query.data_sql();
        let rows = bind_params(sqlx::query(&data_sql), &query.params)
            .bind(window.limit)
            .bind(window.offset)
            .fetch_all(&self.pool)
            .await
            .map_err(Error::Database)?;

        let data = rows
            .iter()
            .map(map_row_to_list_item)
            .collect::<Result<Vec<_>>>()?;

        let span = Span::current();
        span.record(logging::TOTAL, total);
        span.record(logging::RESULT_COUNT, data.len());

        debug!(
            ranked = query.is_ranked(),
            language = %req.language,
            total,
            result_count = data.len(),
            duration_ms = start.elapsed().as_millis() as u64,
            "Merchant list query complete"
        );

        Ok(MerchantsPage {
            data,
            meta: pager::meta(total, req.page),
        })
    }

    async fn fetch(&self, id: i32) -> Result<Merchant> {
        let sql = format!("SELECT {} FROM merchants WHERE id = $1", MERCHANT_COLUMNS);
        sqlx::query_as::<_, Merchant>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(Error::Database)?
            .ok_or(Error::MerchantNotFound(id))
    }

    async fn exists(&self, id: i32) -> Result<bool> {
        let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM merchants WHERE id = $1)")
            .bind(id)
            .fetch_one(&self.pool)
            .await
            .map_err(Error::Database)?;
        Ok(exists)
    }

    async fn photos(&self, merchant_id: i32) -> Result<Vec<Photo>> {
        sqlx::query_as::<_, Photo>(
            "SELECT id, merchant_id, url, file_extension, width, height, blur_data_url, \
             is_primary, display_order \
             FROM photos WHERE merchant_id = $1 \
             ORDER BY is_primary DESC, display_order ASC, id ASC",
        )
        .bind(merchant_id)
        .fetch_all(&self.pool)
        .await
        .map_err(Error::Database)
    }

    async fn reviews(&self, merchant_id: i32) -> Result<Vec<Review>> {
        sqlx::query_as::<_, Review>(
            "SELECT id, merchant_id, google_review_id, rating, text, author_name, \
             author_photo_uri, published_at, relative_time \
             FROM reviews WHERE merchant_id = $1 \
             ORDER BY published_at DESC NULLS LAST, id ASC",
        )
        .bind(merchant_id)
        .fetch_all(&self.pool)
        .await
        .map_err(Error::Database)
    }

    async fn types(&self, merchant_id: i32) -> Result<Vec<String>> {
        sqlx::query_scalar(
            "SELECT DISTINCT type_name FROM merchant_types WHERE merchant_id = $1 ORDER BY type_name",
        )
        .bind(merchant_id)
        .fetch_all(&self.pool)
        .await
        .map_err(Error::Database)
    }

    async fn opening_hours(&self, merchant_id: i32) -> Result<Option<OpeningHours>> {
        sqlx::query_as::<_, OpeningHours>(
            "SELECT id, merchant_id, is_open_now, monday, tuesday, wednesday, thursday, \
             friday, saturday, sunday \
             FROM opening_hours WHERE merchant_id = $1",
        )
        .bind(merchant_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(Error::Database)
    }

    async fn amenities(&self, merchant_id: i32) -> Result<Option<Amenity>> {
        sqlx::query_as::<_, Amenity>("SELECT * FROM amenities WHERE merchant_id = $1")
            .bind(merchant_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(Error::Database)
    }

    async fn all_type_names(&self) -> Result<Vec<String>> {
        sqlx::query_scalar("SELECT DISTINCT type_name FROM merchant_types ORDER BY type_name")
            .fetch_all(&self.pool)
            .await
            .map_err(Error::Database)
    }
}
