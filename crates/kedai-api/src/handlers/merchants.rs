//! Merchant HTTP handlers.
//!
//! The list endpoint carries the search, filter and ranking logic; every
//! other endpoint is a lookup keyed by merchant id that answers 404 when
//! the merchant does not exist.

use axum::{
    extract::{rejection::PathRejection, rejection::QueryRejection, Path, Query, State},
    Json,
};
use tracing::debug;

use kedai_core::{
    format_type_name, Amenity, MerchantDetail, MerchantRepository, MerchantsPage, OpeningHours,
    Photo, Review,
};

use crate::query_types::ListMerchantsQuery;
use crate::{ApiError, AppState};

async fn ensure_merchant(state: &AppState, id: i32) -> Result<(), ApiError> {
    if state.db.merchants.exists(id).await? {
        Ok(())
    } else {
        Err(ApiError::NotFound("Merchant not found".to_string()))
    }
}

/// List merchants with search, filters, sorting and pagination.
///
/// # Returns
/// - 200 OK with `{ data, meta }`
/// - 400 Bad Request for out-of-range or unknown parameters
/// - 500 Internal Server Error if the database query fails
#[utoipa::path(
    get,
    path = "/api/v1/merchants",
    tag = "merchants",
    params(ListMerchantsQuery),
    responses(
        (status = 200, description = "Page of merchants", body = MerchantsPage),
        (status = 400, description = "Invalid query parameters")
    )
)]
pub async fn list_merchants(
    State(state): State<AppState>,
    query: Result<Query<ListMerchantsQuery>, QueryRejection>,
) -> Result<Json<MerchantsPage>, ApiError> {
    let Query(query) = query?;
    let req = query.into_request()?;
    debug!(
        subsystem = "api",
        op = "list_merchants",
        search = req.search_text().unwrap_or(""),
        language = %req.language,
        sort_by = %req.sort_by,
        page = req.page.page,
        page_size = req.page.page_size,
        "Listing merchants"
    );
    let page = state.db.merchants.list(&req).await?;
    Ok(Json(page))
}

/// Get a single merchant.
///
/// # Returns
/// - 200 OK with the merchant detail
/// - 404 Not Found if no merchant has this id
#[utoipa::path(
    get,
    path = "/api/v1/merchants/{id}",
    tag = "merchants",
    params(("id" = i32, Path, description = "Merchant id")),
    responses(
        (status = 200, description = "Merchant detail", body = MerchantDetail),
        (status = 404, description = "Merchant not found")
    )
)]
pub async fn get_merchant(
    State(state): State<AppState>,
    id: Result<Path<i32>, PathRejection>,
) -> Result<Json<MerchantDetail>, ApiError> {
    let Path(id) = id?;
    let merchant = state.db.merchants.fetch(id).await?;
    Ok(Json(merchant.into()))
}

/// Photos of a merchant, primary photo first.
#[utoipa::path(
    get,
    path = "/api/v1/merchants/{id}/photos",
    tag = "merchants",
    params(("id" = i32, Path, description = "Merchant id")),
    responses(
        (status = 200, description = "Merchant photos", body = [Photo]),
        (status = 404, description = "Merchant not found")
    )
)]
pub async fn get_merchant_photos(
    State(state): State<AppState>,
    id: Result<Path<i32>, PathRejection>,
) -> Result<Json<Vec<Photo>>, ApiError> {
    let Path(id) = id?;
    ensure_merchant(&state, id).await?;
    Ok(Json(state.db.merchants.photos(id).await?))
}

/// Reviews of a merchant, newest first.
#[utoipa::path(
    get,
    path = "/api/v1/merchants/{id}/reviews",
    tag = "merchants",
    params(("id" = i32, Path, description = "Merchant id")),
    responses(
        (status = 200, description = "Merchant reviews", body = [Review]),
        (status = 404, description = "Merchant not found")
    )
)]
pub async fn get_merchant_reviews(
    State(state): State<AppState>,
    id: Result<Path<i32>, PathRejection>,
) -> Result<Json<Vec<Review>>, ApiError> {
    let Path(id) = id?;
    ensure_merchant(&state, id).await?;
    Ok(Json(state.db.merchants.reviews(id).await?))
}

/// Category labels attached to a merchant.
///
/// # Returns
/// - 200 OK with formatted labels, e.g. `["Cafe", "Coffee Shop"]`
/// - 404 Not Found if no merchant has this id
#[utoipa::path(
    get,
    path = "/api/v1/merchants/{id}/types",
    tag = "merchants",
    params(("id" = i32, Path, description = "Merchant id")),
    responses(
        (status = 200, description = "Formatted type labels", body = [String]),
        (status = 404, description = "Merchant not found")
    )
)]
pub async fn get_merchant_types(
    State(state): State<AppState>,
    id: Result<Path<i32>, PathRejection>,
) -> Result<Json<Vec<String>>, ApiError> {
    let Path(id) = id?;
    ensure_merchant(&state, id).await?;
    let keys = state.db.merchants.types(id).await?;
    Ok(Json(format_labels(&keys)))
}

/// Weekly opening hours of a merchant.
#[utoipa::path(
    get,
    path = "/api/v1/merchants/{id}/opening-hours",
    tag = "merchants",
    params(("id" = i32, Path, description = "Merchant id")),
    responses(
        (status = 200, description = "Opening hours", body = OpeningHours),
        (status = 404, description = "Merchant or opening hours not found")
    )
)]
pub async fn get_merchant_opening_hours(
    State(state): State<AppState>,
    id: Result<Path<i32>, PathRejection>,
) -> Result<Json<OpeningHours>, ApiError> {
    let Path(id) = id?;
    ensure_merchant(&state, id).await?;
    state
        .db
        .merchants
        .opening_hours(id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::NotFound("Opening hours not found".to_string()))
}

/// Amenity flags of a merchant.
#[utoipa::path(
    get,
    path = "/api/v1/merchants/{id}/amenities",
    tag = "merchants",
    params(("id" = i32, Path, description = "Merchant id")),
    responses(
        (status = 200, description = "Amenities", body = Amenity),
        (status = 404, description = "Merchant or amenities not found")
    )
)]
pub async fn get_merchant_amenities(
    State(state): State<AppState>,
    id: Result<Path<i32>, PathRejection>,
) -> Result<Json<Amenity>, ApiError> {
    let Path(id) = id?;
    ensure_merchant(&state, id).await?;
    state
        .db
        .merchants
        .amenities(id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::NotFound("Amenities not found".to_string()))
}

/// Format type keys into sorted, distinct labels.
pub(crate) fn format_labels(keys: &[String]) -> Vec<String> {
    let mut labels: Vec<String> = keys.iter().map(|k| format_type_name(k)).collect();
    labels.sort();
    labels.dedup();
    labels
}
