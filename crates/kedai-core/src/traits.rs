//! Core traits for kedai repositories.
//!
//! These traits define the interfaces that the PostgreSQL layer
//! implements, keeping handlers decoupled from concrete storage.

use async_trait::async_trait;

use crate::error::Result;
use crate::models::*;
use crate::search::ListMerchantsRequest;

// =============================================================================
// MERCHANT REPOSITORY
// =============================================================================

/// Read access to the merchant directory.
#[async_trait]
pub trait MerchantRepository: Send + Sync {
    /// Filtered, ranked, paginated merchant list.
    async fn list(&self, req: &ListMerchantsRequest) -> Result<MerchantsPage>;

    /// Fetch a merchant by internal id.
    async fn fetch(&self, id: i32) -> Result<Merchant>;

    /// Check whether a merchant exists.
    async fn exists(&self, id: i32) -> Result<bool>;

    /// Photos ordered primary first, then by display order.
    async fn photos(&self, merchant_id: i32) -> Result<Vec<Photo>>;

    /// Reviews, newest first.
    async fn reviews(&self, merchant_id: i32) -> Result<Vec<Review>>;

    /// Raw type keys attached to the merchant, sorted.
    async fn types(&self, merchant_id: i32) -> Result<Vec<String>>;

    async fn opening_hours(&self, merchant_id: i32) -> Result<Option<OpeningHours>>;

    async fn amenities(&self, merchant_id: i32) -> Result<Option<Amenity>>;

    /// Distinct type keys across all merchants, sorted.
    async fn all_type_names(&self) -> Result<Vec<String>>;
}

// =============================================================================
// FEEDBACK REPOSITORY
// =============================================================================

#[async_trait]
pub trait FeedbackRepository: Send + Sync {
    /// Store validated feedback and return the stored row.
    async fn insert(&self, req: &CreateFeedbackRequest) -> Result<Feedback>;
}

// =============================================================================
// USER REPOSITORY
// =============================================================================

#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a user. Fails with `Error::Conflict` when the email is taken.
    async fn insert(&self, user: NewUser) -> Result<User>;

    async fn get_by_email(&self, email: &str) -> Result<Option<User>>;
}
