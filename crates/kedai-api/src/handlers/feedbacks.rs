//! Feedback submission handler.

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    Json,
};
use tracing::info;

use kedai_core::{CreateFeedbackRequest, Feedback, FeedbackRepository};

use crate::{ApiError, AppState};

/// Submit site feedback.
///
/// # Returns
/// - 201 Created with the stored feedback
/// - 400 Bad Request if name, message or rating is out of range
#[utoipa::path(
    post,
    path = "/api/v1/feedbacks",
    tag = "feedbacks",
    request_body = CreateFeedbackRequest,
    responses(
        (status = 201, description = "Feedback stored", body = Feedback),
        (status = 400, description = "Validation failed")
    )
)]
pub async fn create_feedback(
    State(state): State<AppState>,
    body: Result<Json<CreateFeedbackRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Feedback>), ApiError> {
    let Json(req) = body?;
    req.validate()?;
    let feedback = state.db.feedbacks.insert(&req).await?;
    info!(
        subsystem = "api",
        op = "create_feedback",
        feedback_id = feedback.id,
        rating = feedback.rating,
        "Feedback received"
    );
    Ok((StatusCode::CREATED, Json(feedback)))
}
