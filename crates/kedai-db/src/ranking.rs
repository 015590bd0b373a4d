//! Relevance scoring and ordering for the merchant list.
//!
//! When a search string is present, merchants are matched by full-text
//! search on the per-language vector or by trigram similarity on
//! `display_name` / `short_address`, and ranked by a blended score:
//!
//! ```text
//! score = fts_weight * COALESCE(ts_rank(vector, query), 0)
//!       + similarity_weight * GREATEST(similarity(display_name, q), similarity(short_address, q))
//! ```
//!
//! Weights are emitted as SQL numeric literals so the bind list stays
//! identical between the count and data queries.

use kedai_core::{RankingConfig, SearchLanguage, SortField, SortOrder};

/// Column resolved from a [`SortField`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortColumn {
    pub expr: &'static str,
    pub nullable: bool,
}

/// Sort key lookup shared by the ranked and unranked paths.
///
/// `Distance` has no backing column and resolves to `None`.
pub fn sort_column(field: SortField) -> Option<SortColumn> {
    match field {
        SortField::Name => Some(SortColumn {
            expr: "m.display_name",
            nullable: true,
        }),
        SortField::Rating => Some(SortColumn {
            expr: "m.rating",
            nullable: true,
        }),
        SortField::CreatedAt => Some(SortColumn {
            expr: "m.created_at",
            nullable: false,
        }),
        SortField::Distance => None,
    }
}

/// Final tie-break making every ordering total.
pub const ID_TIEBREAK: &str = "m.id ASC";

/// Alias of the score column in the data query.
pub const RELEVANCE_ALIAS: &str = "relevance";

/// Render a weight as a float8 literal.
fn float_literal(value: f64) -> String {
    format!("{:?}::float8", value)
}

/// Builds the search predicate, score expression and ORDER BY list.
#[derive(Debug, Clone, Copy)]
pub struct RankingEngine {
    config: RankingConfig,
}

impl Default for RankingEngine {
    fn default() -> Self {
        Self::new(RankingConfig::default())
    }
}

impl RankingEngine {
    pub fn new(config: RankingConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &RankingConfig {
        &self.config
    }

    /// Inclusion predicate for a search bound at `$param_idx`.
    pub fn match_predicate(&self, language: SearchLanguage, param_idx: usize) -> String {
        let vector = language.vector_column();
        let cfg = language.ts_config();
        format!(
            "((m.{vector} IS NOT NULL AND m.{vector} @@ websearch_to_tsquery('{cfg}', ${p}::text)) \
             OR m.display_name % ${p}::text \
             OR m.short_address % ${p}::text)",
            vector = vector,
            cfg = cfg,
            p = param_idx
        )
    }

    /// Full-text component of the score.
    pub fn fts_score(&self, language: SearchLanguage, param_idx: usize) -> String {
        format!(
            "COALESCE(ts_rank(m.{}, websearch_to_tsquery('{}', ${}::text)), 0)",
            language.vector_column(),
            language.ts_config(),
            param_idx
        )
    }

    /// Trigram component of the score.
    pub fn similarity_score(&self, param_idx: usize) -> String {
        format!(
            "GREATEST(COALESCE(similarity(m.display_name, ${p}::text), 0), \
             COALESCE(similarity(m.short_address, ${p}::text), 0))",
            p = param_idx
        )
    }

    /// Blended relevance expression.
    pub fn score_expr(&self, language: SearchLanguage, param_idx: usize) -> String {
        format!(
            "({} * {} + {} * {})",
            float_literal(self.config.fts_weight),
            self.fts_score(language, param_idx),
            float_literal(self.config.similarity_weight),
            self.similarity_score(param_idx)
        )
    }

    /// ORDER BY terms. `ranked` puts the relevance alias first.
    pub fn order_by(&self, ranked: bool, sort_by: SortField, sort_order: SortOrder) -> String {
        let mut terms = Vec::with_capacity(3);
        if ranked {
            terms.push(format!("{} DESC", RELEVANCE_ALIAS));
        }
        if let Some(col) = sort_column(sort_by) {
            if col.nullable {
                terms.push(format!("{} {} NULLS LAST", col.expr, sort_order.as_sql()));
            } else {
                terms.push(format!("{} {}", col.expr, sort_order.as_sql()));
            }
        }
        terms.push(ID_TIEBREAK.to_string());
        terms.join(", ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sort_column_lookup() {
        assert_eq!(sort_column(SortField::Name).unwrap().expr, "m.display_name");
        assert_eq!(sort_column(SortField::Rating).unwrap().expr, "m.rating");
        assert!(!sort_column(SortField::CreatedAt).unwrap().nullable);
        assert!(sort_column(SortField::Distance).is_none());
    }

    #[test]
    fn test_order_by_unranked() {
        let engine = RankingEngine::default();
        assert_eq!(
            engine.order_by(false, SortField::CreatedAt, SortOrder::Desc),
            "m.created_at DESC, m.id ASC"
        );
        assert_eq!(
            engine.order_by(false, SortField::Rating, SortOrder::Asc),
            "m.rating ASC NULLS LAST, m.id ASC"
        );
    }

    #[test]
    fn test_order_by_ranked() {
        let engine = RankingEngine::default();
        assert_eq!(
            engine.order_by(true, SortField::Name, SortOrder::Desc),
            "relevance DESC, m.display_name DESC NULLS LAST, m.id ASC"
        );
    }

    #[test]
    fn test_distance_falls_back_to_id() {
        let engine = RankingEngine::default();
        assert_eq!(
            engine.order_by(false, SortField::Distance, SortOrder::Desc),
            "m.id ASC"
        );
        assert_eq!(
            engine.order_by(true, SortField::Distance, SortOrder::Asc),
            "relevance DESC, m.id ASC"
        );
    }

    #[test]
    fn test_match_predicate_uses_language_tables() {
        let engine = RankingEngine::default();
        let sql = engine.match_predicate(SearchLanguage::Indonesian, 3);
        assert!(sql.contains("m.search_vector_id IS NOT NULL"));
        assert!(sql.contains("websearch_to_tsquery('indonesian', $3::text)"));
        assert!(sql.contains("m.display_name % $3::text"));
        assert!(sql.contains("m.short_address % $3::text"));
        assert!(!sql.contains("search_vector_en"));
    }

    #[test]
    fn test_score_expr_default_weights() {
        let engine = RankingEngine::default();
        let sql = engine.score_expr(SearchLanguage::English, 1);
        assert!(sql.starts_with("(0.7::float8 * COALESCE(ts_rank(m.search_vector_en"));
        assert!(sql.contains("+ 0.3::float8 * GREATEST("));
        assert!(sql.contains("similarity(m.display_name, $1::text)"));
        assert!(sql.contains("similarity(m.short_address, $1::text)"));
    }

    #[test]
    fn test_score_expr_custom_weights() {
        let engine = RankingEngine::new(RankingConfig::with_weights(1.0, 0.0));
        let sql = engine.score_expr(SearchLanguage::English, 2);
        assert!(sql.starts_with("(1.0::float8 * "));
        assert!(sql.contains("+ 0.0::float8 * "));
    }
}
