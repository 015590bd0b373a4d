//! Category catalog handler.

use axum::{extract::State, Json};

use kedai_core::MerchantRepository;

use super::merchants::format_labels;
use crate::{ApiError, AppState};

/// All category labels in use, sorted.
///
/// # Returns
/// - 200 OK with labels such as `["Bakery", "Coffee Shop"]`
#[utoipa::path(
    get,
    path = "/api/v1/merchant-types",
    tag = "merchant-types",
    responses((status = 200, description = "Distinct category labels", body = [String]))
)]
pub async fn list_merchant_types(
    State(state): State<AppState>,
) -> Result<Json<Vec<String>>, ApiError> {
    let keys = state.db.merchants.all_type_names().await?;
    Ok(Json(format_labels(&keys)))
}
