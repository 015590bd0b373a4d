//! Query string and form types for the HTTP boundary.
//!
//! Enum-valued parameters deserialize straight into the core enums, so an
//! unknown `sort_by` or `language` is rejected by the `Query` extractor
//! before any handler code runs.

use serde::Deserialize;

use kedai_core::{
    defaults, ListMerchantsRequest, PageRequest, Result, SearchLanguage, SortField, SortOrder,
};

/// Query parameters of `GET /merchants`.
#[derive(Debug, Default, Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListMerchantsQuery {
    /// 1-based page number (default 1)
    pub page: Option<i64>,
    /// Items per page, 1..=100 (default 10)
    pub page_size: Option<i64>,
    /// Free-text search over name, address and descriptions
    pub search: Option<String>,
    /// Search language: `en` or `id`
    #[serde(alias = "search_lang")]
    #[param(value_type = Option<String>)]
    pub language: Option<SearchLanguage>,
    /// Category key or label, e.g. `coffee_shop` or `Coffee Shop`
    #[serde(alias = "primary_type")]
    pub category: Option<String>,
    /// Minimum rating, 0..=5
    pub min_rating: Option<f64>,
    pub is_open: Option<bool>,
    /// `name`, `rating`, `created_at` or `distance`
    #[param(value_type = Option<String>)]
    pub sort_by: Option<SortField>,
    /// `asc` or `desc`
    #[param(value_type = Option<String>)]
    pub sort_order: Option<SortOrder>,
}

impl ListMerchantsQuery {
    /// Apply defaults and validate bounds.
    pub fn into_request(self) -> Result<ListMerchantsRequest> {
        let req = ListMerchantsRequest {
            search: self.search,
            language: self.language.unwrap_or_default(),
            category: self.category,
            min_rating: self.min_rating,
            is_open: self.is_open,
            sort_by: self.sort_by.unwrap_or_default(),
            sort_order: self.sort_order.unwrap_or_default(),
            page: PageRequest::new(
                self.page.unwrap_or(defaults::PAGE),
                self.page_size.unwrap_or(defaults::PAGE_SIZE),
            ),
        };
        req.validate()?;
        Ok(req)
    }
}

/// OAuth2 password-grant style login form. `username` carries the email.
#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}
