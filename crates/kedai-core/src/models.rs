//! Core data models for kedai.
//!
//! These types are shared across the kedai crates and represent the
//! merchant directory entities plus the request/response payloads built
//! from them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::defaults;
use crate::error::{Error, Result};

// =============================================================================
// MERCHANT TYPES
// =============================================================================

/// A merchant row as stored, minus the search vectors.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, utoipa::ToSchema)]
pub struct Merchant {
    pub id: i32,
    pub google_place_id: String,
    pub name: String,
    pub display_name: Option<String>,
    /// Category key, e.g. `coffee_shop`
    pub primary_type: Option<String>,
    pub formatted_address: Option<String>,
    pub short_address: Option<String>,
    pub phone_national: Option<String>,
    pub phone_international: Option<String>,
    pub website: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
    pub plus_code: Option<String>,
    pub rating: Option<f64>,
    pub user_rating_count: Option<i32>,
    pub business_status: Option<String>,
    pub google_maps_uri: Option<String>,
    pub is_open_now: Option<bool>,
    pub photo_url: Option<String>,
    pub description_en: Option<String>,
    pub description_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// One row of the merchant list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct MerchantListItem {
    pub id: i32,
    pub display_name: Option<String>,
    pub name: String,
    /// Formatted category label, e.g. `Coffee Shop`
    pub primary_type: Option<String>,
    pub short_address: Option<String>,
    pub rating: Option<f64>,
    pub user_rating_count: Option<i32>,
    pub photo_url: Option<String>,
}

/// Full merchant payload for the detail endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct MerchantDetail {
    pub id: i32,
    pub display_name: Option<String>,
    pub name: String,
    pub primary_type: Option<String>,
    pub formatted_address: Option<String>,
    pub short_address: Option<String>,
    pub phone_national: Option<String>,
    pub phone_international: Option<String>,
    pub website: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
    pub plus_code: Option<String>,
    pub rating: Option<f64>,
    pub user_rating_count: Option<i32>,
    pub business_status: Option<String>,
    pub google_maps_uri: Option<String>,
    pub is_open_now: Option<bool>,
    pub photo_url: Option<String>,
    pub description_en: Option<String>,
    pub description_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Merchant> for MerchantDetail {
    fn from(m: Merchant) -> Self {
        Self {
            id: m.id,
            display_name: m.display_name,
            name: m.name,
            primary_type: m.primary_type.as_deref().map(format_type_name),
            formatted_address: m.formatted_address,
            short_address: m.short_address,
            phone_national: m.phone_national,
            phone_international: m.phone_international,
            website: m.website,
            latitude: m.latitude,
            longitude: m.longitude,
            plus_code: m.plus_code,
            rating: m.rating,
            user_rating_count: m.user_rating_count,
            business_status: m.business_status,
            google_maps_uri: m.google_maps_uri,
            is_open_now: m.is_open_now,
            photo_url: m.photo_url,
            description_en: m.description_en,
            description_id: m.description_id,
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }
}

/// A stored merchant photo.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, utoipa::ToSchema)]
pub struct Photo {
    pub id: i32,
    pub merchant_id: i32,
    pub url: String,
    pub file_extension: String,
    pub width: Option<i32>,
    pub height: Option<i32>,
    /// Tiny base64 placeholder rendered while the full image loads
    pub blur_data_url: Option<String>,
    pub is_primary: bool,
    pub display_order: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, utoipa::ToSchema)]
pub struct Review {
    pub id: i32,
    pub merchant_id: i32,
    pub google_review_id: String,
    pub rating: i32,
    pub text: Option<String>,
    pub author_name: Option<String>,
    pub author_photo_uri: Option<String>,
    pub published_at: Option<DateTime<Utc>>,
    pub relative_time: Option<String>,
}

/// Weekly opening hours; one text description per weekday.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, utoipa::ToSchema)]
pub struct OpeningHours {
    pub id: i32,
    pub merchant_id: i32,
    pub is_open_now: Option<bool>,
    pub monday: Option<String>,
    pub tuesday: Option<String>,
    pub wednesday: Option<String>,
    pub thursday: Option<String>,
    pub friday: Option<String>,
    pub saturday: Option<String>,
    pub sunday: Option<String>,
}

/// Amenity flags. `None` means the source did not report the attribute.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, utoipa::ToSchema)]
pub struct Amenity {
    pub id: i32,
    pub merchant_id: i32,

    pub takeout: Option<bool>,
    pub dine_in: Option<bool>,
    pub outdoor_seating: Option<bool>,
    pub reservable: Option<bool>,

    pub serves_breakfast: Option<bool>,
    pub serves_lunch: Option<bool>,
    pub serves_dinner: Option<bool>,
    pub serves_brunch: Option<bool>,
    pub serves_beer: Option<bool>,
    pub serves_wine: Option<bool>,
    pub serves_vegetarian_food: Option<bool>,

    pub good_for_children: Option<bool>,
    pub good_for_groups: Option<bool>,

    pub accepts_credit_cards: Option<bool>,
    pub accepts_debit_cards: Option<bool>,
    pub accepts_cash_only: Option<bool>,
    pub accepts_nfc: Option<bool>,

    pub free_parking: Option<bool>,
    pub paid_parking: Option<bool>,
    pub valet_parking: Option<bool>,

    pub wheelchair_entrance: Option<bool>,
    pub wheelchair_restroom: Option<bool>,
    pub wheelchair_seating: Option<bool>,

    pub restroom: Option<bool>,
}

/// Turn a category key into its display label.
///
/// Underscores become spaces and every word is title-cased:
/// `coffee_shop` → `Coffee Shop`.
pub fn format_type_name(type_name: &str) -> String {
    let mut out = String::with_capacity(type_name.len());
    let mut prev_alpha = false;
    for ch in type_name.chars() {
        let ch = if ch == '_' { ' ' } else { ch };
        if ch.is_alphabetic() {
            if prev_alpha {
                out.extend(ch.to_lowercase());
            } else {
                out.extend(ch.to_uppercase());
            }
            prev_alpha = true;
        } else {
            out.push(ch);
            prev_alpha = false;
        }
    }
    out
}

/// Turn a category label or key into its stored key form.
///
/// Trims, lower-cases and collapses inner whitespace runs into `_`, so
/// `Coffee Shop` and `coffee_shop` normalize to the same key.
pub fn normalize_type_key(input: &str) -> String {
    input
        .split_whitespace()
        .map(|w| w.to_lowercase())
        .collect::<Vec<_>>()
        .join("_")
}

/// Reject text PostgreSQL cannot store or bind.
pub fn reject_nul(field: &str, value: &str) -> Result<()> {
    if value.contains('\0') {
        return Err(Error::InvalidInput(format!(
            "{} must not contain NUL characters",
            field
        )));
    }
    Ok(())
}

// =============================================================================
// PAGINATION TYPES
// =============================================================================

/// Page metadata for list responses.
///
/// Always computed from the count of rows matching the current filter set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct PaginationMeta {
    pub total: i64,
    pub page: i64,
    pub page_size: i64,
    pub total_pages: i64,
    pub has_next: bool,
    pub has_previous: bool,
}

/// Paginated merchant list response.
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct MerchantsPage {
    pub data: Vec<MerchantListItem>,
    pub meta: PaginationMeta,
}

// =============================================================================
// FEEDBACK TYPES
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, utoipa::ToSchema)]
pub struct Feedback {
    pub id: i32,
    pub name: String,
    pub message: String,
    pub rating: i32,
    pub created_at: DateTime<Utc>,
}

/// Request body for submitting feedback.
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct CreateFeedbackRequest {
    pub name: String,
    pub message: String,
    pub rating: i32,
}

impl CreateFeedbackRequest {
    /// Check field lengths and the rating range.
    pub fn validate(&self) -> Result<()> {
        reject_nul("name", &self.name)?;
        reject_nul("message", &self.message)?;
        let name_len = self.name.trim().chars().count();
        if name_len == 0 || name_len > defaults::FEEDBACK_NAME_MAX {
            return Err(Error::InvalidInput(format!(
                "name must be between 1 and {} characters",
                defaults::FEEDBACK_NAME_MAX
            )));
        }
        let message_len = self.message.trim().chars().count();
        if message_len == 0 || message_len > defaults::FEEDBACK_MESSAGE_MAX {
            return Err(Error::InvalidInput(format!(
                "message must be between 1 and {} characters",
                defaults::FEEDBACK_MESSAGE_MAX
            )));
        }
        if !(defaults::REVIEW_RATING_MIN..=defaults::REVIEW_RATING_MAX).contains(&self.rating) {
            return Err(Error::InvalidInput(format!(
                "rating must be between {} and {}",
                defaults::REVIEW_RATING_MIN,
                defaults::REVIEW_RATING_MAX
            )));
        }
        Ok(())
    }
}

// =============================================================================
// USER TYPES
// =============================================================================

/// A stored user account. Never serialized: carries the password hash.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct User {
    pub id: i32,
    pub name: String,
    pub email: String,
    pub hashed_password: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// User fields safe to return to clients.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct UserPublic {
    pub id: i32,
    pub name: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<User> for UserPublic {
    fn from(u: User) -> Self {
        Self {
            id: u.id,
            name: u.name,
            email: u.email,
            created_at: u.created_at,
            updated_at: u.updated_at,
        }
    }
}

/// Registration body.
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct CreateUserRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

/// Insert payload once the password has been hashed.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub hashed_password: String,
}

/// Bearer token response.
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct Token {
    pub access_token: String,
    pub token_type: String,
}

impl Token {
    pub fn bearer(access_token: String) -> Self {
        Self {
            access_token,
            token_type: "bearer".to_string(),
        }
    }
}

/// JWT claims. `sub` holds the user's email.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenPayload {
    pub sub: String,
    pub exp: i64,
}

// =============================================================================
// MISC RESPONSES
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct Message {
    pub message: String,
}

/// Liveness payload for `/utils/health`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, utoipa::ToSchema)]
pub struct Status {
    pub ok: bool,
}
