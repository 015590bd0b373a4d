//! Feedback repository implementation.

use async_trait::async_trait;
use sqlx::{Pool, Postgres};
use tracing::debug;

use kedai_core::{CreateFeedbackRequest, Error, Feedback, FeedbackRepository, Result};

/// PostgreSQL implementation of FeedbackRepository.
#[derive(Clone)]
pub struct PgFeedbackRepository {
    pool: Pool<Postgres>,
}

impl PgFeedbackRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl FeedbackRepository for PgFeedbackRepository {
    async fn insert(&self, req: &CreateFeedbackRequest) -> Result<Feedback> {
        req.validate()?;

        let feedback = sqlx::query_as::<_, Feedback>(
            "INSERT INTO feedbacks (name, message, rating) VALUES ($1, $2, $3) \
             RETURNING id, name, message, rating, created_at",
        )
        .bind(req.name.trim())
        .bind(req.message.trim())
        .bind(req.rating)
        .fetch_one(&self.pool)
        .await
        .map_err(Error::Database)?;

        debug!(
            subsystem = "database",
            component = "feedbacks",
            op = "insert",
            feedback_id = feedback.id,
            "Feedback stored"
        );
        Ok(feedback)
    }
}
