//! Merchant list/search request types and ranking configuration.
//!
//! A [`ListMerchantsRequest`] is the validated input of the merchant list
//! operation. The SQL built from it lives in `kedai-db`; this module only
//! owns the vocabulary (languages, sort keys, weights) and its validation.

use serde::{Deserialize, Serialize};

use crate::defaults;
use crate::error::{Error, Result};
use crate::models::{normalize_type_key, reject_nul};

// =============================================================================
// SEARCH LANGUAGE
// =============================================================================

/// Language used for full-text matching.
///
/// Accepts both the short code and the full name on input
/// (`en` / `english`, `id` / `indonesian`).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, utoipa::ToSchema)]
pub enum SearchLanguage {
    #[default]
    #[serde(rename = "en", alias = "english")]
    English,
    #[serde(rename = "id", alias = "indonesian")]
    Indonesian,
}

impl SearchLanguage {
    /// PostgreSQL text search configuration name.
    pub fn ts_config(self) -> &'static str {
        match self {
            Self::English => "english",
            Self::Indonesian => "indonesian",
        }
    }

    /// Per-language tsvector column on `merchants`.
    pub fn vector_column(self) -> &'static str {
        match self {
            Self::English => "search_vector_en",
            Self::Indonesian => "search_vector_id",
        }
    }

    pub fn code(self) -> &'static str {
        match self {
            Self::English => "en",
            Self::Indonesian => "id",
        }
    }
}

impl std::fmt::Display for SearchLanguage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl std::str::FromStr for SearchLanguage {
    type Err = String;
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "en" | "english" => Ok(Self::English),
            "id" | "indonesian" => Ok(Self::Indonesian),
            _ => Err(format!("Invalid search language: {}", s)),
        }
    }
}

// =============================================================================
// SORTING
// =============================================================================

/// Requested sort key for the merchant list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum SortField {
    Name,
    Rating,
    #[default]
    CreatedAt,
    /// No location input exists yet, so this orders by id only.
    Distance,
}

impl std::fmt::Display for SortField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Name => write!(f, "name"),
            Self::Rating => write!(f, "rating"),
            Self::CreatedAt => write!(f, "created_at"),
            Self::Distance => write!(f, "distance"),
        }
    }
}

impl std::str::FromStr for SortField {
    type Err = String;
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "name" => Ok(Self::Name),
            "rating" => Ok(Self::Rating),
            "created_at" => Ok(Self::CreatedAt),
            "distance" => Ok(Self::Distance),
            _ => Err(format!("Invalid sort field: {}", s)),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl SortOrder {
    pub fn as_sql(self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }
}

impl std::fmt::Display for SortOrder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Asc => write!(f, "asc"),
            Self::Desc => write!(f, "desc"),
        }
    }
}

// =============================================================================
// RANKING CONFIGURATION
// =============================================================================

/// Weights of the blended relevance score and the trigram match threshold.
///
/// `score = fts_weight * ts_rank + similarity_weight * similarity`.
/// The threshold is applied per pooled connection, not per query.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RankingConfig {
    pub fts_weight: f64,
    pub similarity_weight: f64,
    pub trigram_threshold: f64,
}

impl Default for RankingConfig {
    fn default() -> Self {
        Self {
            fts_weight: defaults::FTS_WEIGHT,
            similarity_weight: defaults::SIMILARITY_WEIGHT,
            trigram_threshold: defaults::TRIGRAM_THRESHOLD,
        }
    }
}

impl RankingConfig {
    /// Create a config with custom weights and the default threshold.
    pub fn with_weights(fts_weight: f64, similarity_weight: f64) -> Self {
        Self {
            fts_weight,
            similarity_weight,
            ..Default::default()
        }
    }

    /// Set the trigram threshold.
    pub fn with_trigram_threshold(mut self, threshold: f64) -> Self {
        self.trigram_threshold = threshold;
        self
    }

    /// Reject weights that would produce an unusable score expression.
    ///
    /// Weights are rendered into SQL as numeric literals, so they must be
    /// finite and non-negative.
    pub fn validate(&self) -> Result<()> {
        for (name, w) in [
            ("fts_weight", self.fts_weight),
            ("similarity_weight", self.similarity_weight),
        ] {
            if !w.is_finite() || w < 0.0 {
                return Err(Error::Config(format!(
                    "{} must be a finite non-negative number, got {}",
                    name, w
                )));
            }
        }
        if !self.trigram_threshold.is_finite() || !(0.0..=1.0).contains(&self.trigram_threshold) {
            return Err(Error::Config(format!(
                "trigram_threshold must be within [0, 1], got {}",
                self.trigram_threshold
            )));
        }
        Ok(())
    }
}

// =============================================================================
// LIST REQUEST
// =============================================================================

/// Page window requested by the client (1-based).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    pub page: i64,
    pub page_size: i64,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: defaults::PAGE,
            page_size: defaults::PAGE_SIZE,
        }
    }
}

impl PageRequest {
    pub fn new(page: i64, page_size: i64) -> Self {
        Self { page, page_size }
    }

    pub fn validate(&self) -> Result<()> {
        if self.page < 1 {
            return Err(Error::InvalidInput(format!(
                "page must be >= 1, got {}",
                self.page
            )));
        }
        if !(defaults::PAGE_SIZE_MIN..=defaults::PAGE_SIZE_MAX).contains(&self.page_size) {
            return Err(Error::InvalidInput(format!(
                "page_size must be between {} and {}, got {}",
                defaults::PAGE_SIZE_MIN,
                defaults::PAGE_SIZE_MAX,
                self.page_size
            )));
        }
        Ok(())
    }
}

/// Validated input of the merchant list operation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ListMerchantsRequest {
    pub search: Option<String>,
    pub language: SearchLanguage,
    pub category: Option<String>,
    pub min_rating: Option<f64>,
    pub is_open: Option<bool>,
    pub sort_by: SortField,
    pub sort_order: SortOrder,
    pub page: PageRequest,
}

impl ListMerchantsRequest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = Some(search.into());
        self
    }

    pub fn with_language(mut self, language: SearchLanguage) -> Self {
        self.language = language;
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn with_min_rating(mut self, min_rating: f64) -> Self {
        self.min_rating = Some(min_rating);
        self
    }

    pub fn with_is_open(mut self, is_open: bool) -> Self {
        self.is_open = Some(is_open);
        self
    }

    pub fn with_sort(mut self, sort_by: SortField, sort_order: SortOrder) -> Self {
        self.sort_by = sort_by;
        self.sort_order = sort_order;
        self
    }

    pub fn with_page(mut self, page: i64, page_size: i64) -> Self {
        self.page = PageRequest::new(page, page_size);
        self
    }

    /// Trimmed search text, `None` when absent or whitespace-only.
    pub fn search_text(&self) -> Option<&str> {
        self.search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }

    /// Category normalized to its stored key form, `None` when blank.
    pub fn category_key(&self) -> Option<String> {
        self.category
            .as_deref()
            .map(normalize_type_key)
            .filter(|k| !k.is_empty())
    }

    pub fn validate(&self) -> Result<()> {
        self.page.validate()?;
        if let Some(search) = &self.search {
            reject_nul("search", search)?;
        }
        if let Some(category) = &self.category {
            reject_nul("primary_type", category)?;
        }
        if let Some(r) = self.min_rating {
            if !r.is_finite()
                || !(defaults::MERCHANT_RATING_MIN..=defaults::MERCHANT_RATING_MAX).contains(&r)
            {
                return Err(Error::InvalidInput(format!(
                    "min_rating must be between {} and {}, got {}",
                    defaults::MERCHANT_RATING_MIN,
                    defaults::MERCHANT_RATING_MAX,
                    r
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_language_tables() {
        assert_eq!(SearchLanguage::English.ts_config(), "english");
        assert_eq!(SearchLanguage::English.vector_column(), "search_vector_en");
        assert_eq!(SearchLanguage::Indonesian.ts_config(), "indonesian");
        assert_eq!(SearchLanguage::Indonesian.vector_column(), "search_vector_id");
    }

    #[test]
    fn test_language_from_str_accepts_aliases() {
        assert_eq!("en".parse::<SearchLanguage>().unwrap(), SearchLanguage::English);
        assert_eq!("English".parse::<SearchLanguage>().unwrap(), SearchLanguage::English);
        assert_eq!("id".parse::<SearchLanguage>().unwrap(), SearchLanguage::Indonesian);
        assert_eq!(
            "indonesian".parse::<SearchLanguage>().unwrap(),
            SearchLanguage::Indonesian
        );
        assert!("fr".parse::<SearchLanguage>().is_err());
    }

    #[test]
    fn test_language_serde_aliases() {
        let lang: SearchLanguage = serde_json::from_str("\"indonesian\"").unwrap();
        assert_eq!(lang, SearchLanguage::Indonesian);
        let lang: SearchLanguage = serde_json::from_str("\"en\"").unwrap();
        assert_eq!(lang, SearchLanguage::English);
        assert_eq!(serde_json::to_string(&SearchLanguage::Indonesian).unwrap(), "\"id\"");
    }

    #[test]
    fn test_sort_field_serde() {
        let f: SortField = serde_json::from_str("\"created_at\"").unwrap();
        assert_eq!(f, SortField::CreatedAt);
        assert!(serde_json::from_str::<SortField>("\"popularity\"").is_err());
        assert_eq!("rating".parse::<SortField>().unwrap(), SortField::Rating);
    }

    #[test]
    fn test_defaults() {
        let req = ListMerchantsRequest::new();
        assert_eq!(req.sort_by, SortField::CreatedAt);
        assert_eq!(req.sort_order, SortOrder::Desc);
        assert_eq!(req.language, SearchLanguage::English);
        assert_eq!(req.page, PageRequest::new(1, 10));
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_search_text_trims_and_drops_blank() {
        assert_eq!(ListMerchantsRequest::new().search_text(), None);
        assert_eq!(ListMerchantsRequest::new().with_search("").search_text(), None);
        assert_eq!(ListMerchantsRequest::new().with_search("   ").search_text(), None);
        assert_eq!(
            ListMerchantsRequest::new().with_search("  kopi  ").search_text(),
            Some("kopi")
        );
    }

    #[test]
    fn test_category_key_normalizes_label() {
        let req = ListMerchantsRequest::new().with_category("Coffee Shop");
        assert_eq!(req.category_key().as_deref(), Some("coffee_shop"));
        let req = ListMerchantsRequest::new().with_category(" ");
        assert_eq!(req.category_key(), None);
    }

    #[test]
    fn test_page_bounds() {
        assert!(PageRequest::new(0, 10).validate().is_err());
        assert!(PageRequest::new(1, 0).validate().is_err());
        assert!(PageRequest::new(1, 101).validate().is_err());
        assert!(PageRequest::new(1, 100).validate().is_ok());
        assert!(PageRequest::new(999, 1).validate().is_ok());
    }

    #[test]
    fn test_min_rating_bounds() {
        assert!(ListMerchantsRequest::new().with_min_rating(0.0).validate().is_ok());
        assert!(ListMerchantsRequest::new().with_min_rating(5.0).validate().is_ok());
        assert!(ListMerchantsRequest::new().with_min_rating(5.1).validate().is_err());
        assert!(ListMerchantsRequest::new().with_min_rating(-0.5).validate().is_err());
        assert!(ListMerchantsRequest::new()
            .with_min_rating(f64::NAN)
            .validate()
            .is_err());
    }

    #[test]
    fn test_nul_in_text_filters_rejected() {
        let err = ListMerchantsRequest::new()
            .with_search("kop\0i")
            .validate()
            .unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
        assert!(ListMerchantsRequest::new()
            .with_category("coffee\0shop")
            .validate()
            .is_err());
        assert!(ListMerchantsRequest::new()
            .with_search("kopi")
            .with_category("coffee_shop")
            .validate()
            .is_ok());
    }

    #[test]
    fn test_ranking_config_default_and_validate() {
        let cfg = RankingConfig::default();
        assert_eq!(cfg.fts_weight, 0.7);
        assert_eq!(cfg.similarity_weight, 0.3);
        assert_eq!(cfg.trigram_threshold, 0.3);
        assert!(cfg.validate().is_ok());

        assert!(RankingConfig::with_weights(-1.0, 0.3).validate().is_err());
        assert!(RankingConfig::with_weights(f64::INFINITY, 0.3).validate().is_err());
        assert!(RankingConfig::default()
            .with_trigram_threshold(1.5)
            .validate()
            .is_err());
    }
}
