//! Merchant list query builder.
//!
//! Turns a [`ListMerchantsRequest`] into a [`MerchantQuery`]: a WHERE
//! fragment with its ordered bind parameters, an optional relevance
//! expression, and the ORDER BY list. The same fragment and parameters
//! feed both the count query and the data query.
//!
//! Predicates are always emitted in the same order: search, category,
//! min_rating, is_open.

use kedai_core::ListMerchantsRequest;

use crate::ranking::{RankingEngine, RELEVANCE_ALIAS};

/// Type-safe parameter binding for merchant queries.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryParam {
    /// Text parameter (search string, category key).
    String(String),
    /// Double precision parameter.
    Float(f64),
    /// Boolean parameter.
    Bool(bool),
}

/// Columns returned for each list row.
pub const LIST_COLUMNS: &str = "m.id, m.display_name, m.name, m.primary_type, m.short_address, \
     m.rating, m.user_rating_count, m.photo_url";

/// A fully planned merchant list query.
#[derive(Debug, Clone, PartialEq)]
pub struct MerchantQuery {
    /// WHERE fragment, `TRUE` when no filter is active.
    pub predicate: String,
    /// Parameters in placeholder order.
    pub params: Vec<QueryParam>,
    /// Relevance expression, present only when searching.
    pub relevance: Option<String>,
    /// ORDER BY terms.
    pub order_by: String,
}

impl MerchantQuery {
    /// Index the next appended placeholder would take.
    pub fn next_param_index(&self) -> usize {
        self.params.len() + 1
    }

    pub fn is_ranked(&self) -> bool {
        self.relevance.is_some()
    }

    /// Filtered, unpaginated row count.
    pub fn count_sql(&self) -> String {
        format!(
            "SELECT COUNT(*) FROM merchants m WHERE {}",
            self.predicate
        )
    }

    /// Data query. LIMIT and OFFSET are bound right after `params`.
    pub fn data_sql(&self) -> String {
        let relevance = self
            .relevance
            .as_deref()
            .unwrap_or("NULL::float8");
        let limit_idx = self.next_param_index();
        format!(
            "SELECT {}, {} AS {} FROM merchants m WHERE {} ORDER BY {} LIMIT ${} OFFSET ${}",
            LIST_COLUMNS,
            relevance,
            RELEVANCE_ALIAS,
            self.predicate,
            self.order_by,
            limit_idx,
            limit_idx + 1
        )
    }
}

/// Builds a [`MerchantQuery`] from a list request.
///
/// # Example
///
/// ```rust,ignore
/// use kedai_core::ListMerchantsRequest;
/// use kedai_db::{MerchantQueryBuilder, RankingEngine};
///
/// let req = ListMerchantsRequest::new().with_search("kopi").with_min_rating(4.0);
/// let query = MerchantQueryBuilder::new(&req, RankingEngine::default()).build();
/// // predicate: "(... @@ websearch_to_tsquery('english', $1::text) ...) AND m.rating >= $2"
/// ```
pub struct MerchantQueryBuilder<'a> {
    req: &'a ListMerchantsRequest,
    ranking: RankingEngine,
}

impl<'a> MerchantQueryBuilder<'a> {
    pub fn new(req: &'a ListMerchantsRequest, ranking: RankingEngine) -> Self {
        Self { req, ranking }
    }

    pub fn build(&self) -> MerchantQuery {
        let mut clauses = Vec::new();
        let mut params = Vec::new();
        let mut param_idx = 0;
        let mut relevance = None;

        if let Some(search) = self.req.search_text() {
            param_idx += 1;
            clauses.push(self.ranking.match_predicate(self.req.language, param_idx));
            relevance = Some(self.ranking.score_expr(self.req.language, param_idx));
            params.push(QueryParam::String(search.to_string()));
        }

        // Semi-join so a merchant listed under several matching types appears once.
        if let Some(category) = self.req.category_key() {
            param_idx += 1;
            clauses.push(format!(
                "(m.primary_type = ${p} OR EXISTS (SELECT 1 FROM merchant_types mt \
                 WHERE mt.merchant_id = m.id AND mt.type_name = ${p}))",
                p = param_idx
            ));
            params.push(QueryParam::String(category));
        }

        if let Some(min_rating) = self.req.min_rating {
            param_idx += 1;
            clauses.push(format!("m.rating >= ${}", param_idx));
            params.push(QueryParam::Float(min_rating));
        }

        if let Some(is_open) = self.req.is_open {
            param_idx += 1;
            clauses.push(format!("m.is_open_now = ${}", param_idx));
            params.push(QueryParam::Bool(is_open));
        }

        let predicate = if clauses.is_empty() {
            "TRUE".to_string()
        } else {
            clauses.join(" AND ")
        };

        let order_by = self.ranking.order_by(
            relevance.is_some(),
            self.req.sort_by,
            self.req.sort_order,
        );

        MerchantQuery {
            predicate,
            params,
            relevance,
            order_by,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kedai_core::{SearchLanguage, SortField, SortOrder};

    fn build(req: &ListMerchantsRequest) -> MerchantQuery {
        MerchantQueryBuilder::new(req, RankingEngine::default()).build()
    }

    #[test]
    fn test_no_filters() {
        let q = build(&ListMerchantsRequest::new());
        assert_eq!(q.predicate, "TRUE");
        assert!(q.params.is_empty());
        assert!(!q.is_ranked());
        assert_eq!(q.order_by, "m.created_at DESC, m.id ASC");
        assert_eq!(q.next_param_index(), 1);
    }

    #[test]
    fn test_blank_search_equals_absent_search() {
        let absent = build(&ListMerchantsRequest::new());
        let empty = build(&ListMerchantsRequest::new().with_search(""));
        let blank = build(&ListMerchantsRequest::new().with_search("   "));
        assert_eq!(absent, empty);
        assert_eq!(absent, blank);
    }

    #[test]
    fn test_search_is_trimmed_and_ranked() {
        let q = build(&ListMerchantsRequest::new().with_search("  kopi  "));
        assert_eq!(q.params, vec![QueryParam::String("kopi".into())]);
        assert!(q.is_ranked());
        assert!(q.predicate.contains("websearch_to_tsquery('english', $1::text)"));
        assert!(q.order_by.starts_with("relevance DESC"));
    }

    #[test]
    fn test_indonesian_search_uses_indonesian_tables() {
        let q = build(
            &ListMerchantsRequest::new()
                .with_search("kopi")
                .with_language(SearchLanguage::Indonesian),
        );
        assert!(q.predicate.contains("m.search_vector_id"));
        assert!(q.predicate.contains("'indonesian'"));
        assert!(q.relevance.unwrap().contains("ts_rank(m.search_vector_id"));
    }

    #[test]
    fn test_fixed_predicate_order_and_numbering() {
        let req = ListMerchantsRequest::new()
            .with_is_open(true)
            .with_min_rating(4.0)
            .with_category("Coffee Shop")
            .with_search("latte");
        let q = build(&req);

        assert_eq!(
            q.params,
            vec![
                QueryParam::String("latte".into()),
                QueryParam::String("coffee_shop".into()),
                QueryParam::Float(4.0),
                QueryParam::Bool(true),
            ]
        );
        let search_pos = q.predicate.find("$1::text").unwrap();
        let category_pos = q.predicate.find("m.primary_type = $2").unwrap();
        let rating_pos = q.predicate.find("m.rating >= $3").unwrap();
        let open_pos = q.predicate.find("m.is_open_now = $4").unwrap();
        assert!(search_pos < category_pos);
        assert!(category_pos < rating_pos);
        assert!(rating_pos < open_pos);
        assert_eq!(q.next_param_index(), 5);
    }

    #[test]
    fn test_category_uses_semi_join() {
        let q = build(&ListMerchantsRequest::new().with_category("coffee_shop"));
        assert_eq!(
            q.predicate,
            "(m.primary_type = $1 OR EXISTS (SELECT 1 FROM merchant_types mt \
             WHERE mt.merchant_id = m.id AND mt.type_name = $1))"
        );
        assert!(!q.predicate.contains("JOIN"));
    }

    #[test]
    fn test_count_and_data_share_predicate() {
        let req = ListMerchantsRequest::new()
            .with_search("kopi")
            .with_is_open(false);
        let q = build(&req);
        let count = q.count_sql();
        let data = q.data_sql();
        assert!(count.ends_with(&q.predicate));
        assert!(data.contains(&q.predicate));
        assert!(!count.contains("ORDER BY"));
        assert!(data.ends_with("LIMIT $3 OFFSET $4"));
    }

    #[test]
    fn test_data_sql_without_search_selects_null_relevance() {
        let q = build(&ListMerchantsRequest::new().with_sort(SortField::Name, SortOrder::Asc));
        let data = q.data_sql();
        assert!(data.contains("NULL::float8 AS relevance"));
        assert!(data.contains("ORDER BY m.display_name ASC NULLS LAST, m.id ASC"));
        assert!(data.ends_with("LIMIT $1 OFFSET $2"));
    }

    #[test]
    fn test_user_input_never_inlined() {
        let q = build(
            &ListMerchantsRequest::new()
                .with_search("'; DROP TABLE merchants; --")
                .with_category("x' OR '1'='1"),
        );
        assert!(!q.data_sql().contains("DROP TABLE"));
        assert!(!q.count_sql().contains("'1'='1"));
    }
}
