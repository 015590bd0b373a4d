//! OpenAPI document served at `{API_V1_STR}/openapi.json`.

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use kedai_core::{
    Amenity, CreateFeedbackRequest, CreateUserRequest, Feedback, Merchant, MerchantDetail,
    MerchantListItem, MerchantsPage, Message, OpeningHours, PaginationMeta, Photo, Review,
    SearchLanguage, SortField, SortOrder, Status, Token, UserPublic,
};

use crate::handlers;
use crate::query_types::LoginForm;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Kedai API",
        description = "Merchant directory with full-text and fuzzy search"
    ),
    paths(
        handlers::merchants::list_merchants,
        handlers::merchants::get_merchant,
        handlers::merchants::get_merchant_photos,
        handlers::merchants::get_merchant_reviews,
        handlers::merchants::get_merchant_types,
        handlers::merchants::get_merchant_opening_hours,
        handlers::merchants::get_merchant_amenities,
        handlers::merchant_types::list_merchant_types,
        handlers::feedbacks::create_feedback,
        handlers::auth::login,
        handlers::auth::register,
        handlers::users::read_user_me,
        handlers::utils::health,
    ),
    components(schemas(
        Merchant,
        MerchantListItem,
        MerchantDetail,
        MerchantsPage,
        PaginationMeta,
        Photo,
        Review,
        OpeningHours,
        Amenity,
        Feedback,
        CreateFeedbackRequest,
        CreateUserRequest,
        UserPublic,
        Token,
        LoginForm,
        Message,
        Status,
        SearchLanguage,
        SortField,
        SortOrder,
    )),
    modifiers(&BearerAuth),
    tags(
        (name = "merchants", description = "Merchant search and detail"),
        (name = "merchant-types", description = "Category catalog"),
        (name = "feedbacks", description = "Site feedback"),
        (name = "auth", description = "Registration and login"),
        (name = "users", description = "Account information"),
        (name = "utils", description = "Health checks")
    )
)]
pub struct ApiDoc;

struct BearerAuth;

impl Modify for BearerAuth {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}
