//! Listing filter and pagination primitives.
//!
//! A [`ListingQuery`] compiles to a WHERE clause with positional params;
//! criteria left as `None` do not filter. A [`PageWindow`] turns a requested
//! page number into a clamped LIMIT/OFFSET window over the counted result.

use rusqlite::types::Value;

#[derive(Debug, Default, Clone)]
pub struct ListingQuery {
    /// Case-insensitive substring match against the description.
    pub keywords: Option<String>,
    /// Case-insensitive exact match.
    pub city: Option<String>,
    /// Case-insensitive exact match.
    pub province: Option<String>,
    /// Inclusive upper bound.
    pub max_bedrooms: Option<i64>,
    /// Inclusive upper bound.
    pub max_price: Option<i64>,
    /// Browse and home views set this; the search view does not.
    pub published_only: bool,
}

impl ListingQuery {
    pub fn published() -> Self {
        Self {
            published_only: true,
            ..Self::default()
        }
    }

    /// WHERE clause (with leading `WHERE`, or empty) plus its params,
    /// predicates joined with AND.
    pub(crate) fn where_clause(&self) -> (String, Vec<Value>) {
        let mut predicates: Vec<&str> = Vec::new();
        let mut params: Vec<Value> = Vec::new();

        if self.published_only {
            predicates.push("is_published = 1");
        }
        if let Some(keywords) = &self.keywords {
            // SQLite LIKE is case-insensitive for ASCII.
            predicates.push("description LIKE '%' || ? || '%'");
            params.push(Value::Text(keywords.clone()));
        }
        if let Some(city) = &self.city {
            predicates.push("city = ? COLLATE NOCASE");
            params.push(Value::Text(city.clone()));
        }
        if let Some(province) = &self.province {
            predicates.push("province = ? COLLATE NOCASE");
            params.push(Value::Text(province.clone()));
        }
        if let Some(max_bedrooms) = self.max_bedrooms {
            predicates.push("bedrooms <= ?");
            params.push(Value::Integer(max_bedrooms));
        }
        if let Some(max_price) = self.max_price {
            predicates.push("price <= ?");
            params.push(Value::Integer(max_price));
        }

        if predicates.is_empty() {
            (String::new(), params)
        } else {
            (format!("WHERE {}", predicates.join(" AND ")), params)
        }
    }
}

/// A resolved pagination window. Pages are 1-based; a requested page outside
/// the valid range is clamped, never rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    pub page: i64,
    pub per_page: i64,
    pub total_pages: i64,
    pub total_count: i64,
}

impl PageWindow {
    pub fn resolve(requested: Option<i64>, per_page: i64, total_count: i64) -> Self {
        let total_pages = if total_count <= 0 {
            1
        } else {
            (total_count + per_page - 1) / per_page
        };
        let page = requested.unwrap_or(1).clamp(1, total_pages);
        Self {
            page,
            per_page,
            total_pages,
            total_count,
        }
    }

    pub fn offset(&self) -> i64 {
        (self.page - 1) * self.per_page
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_query_has_no_predicates() {
        let (clause, params) = ListingQuery::default().where_clause();
        assert_eq!(clause, "");
        assert!(params.is_empty());
    }

    #[test]
    fn predicates_join_with_and() {
        let query = ListingQuery {
            city: Some("Toronto".into()),
            max_price: Some(300_000),
            published_only: true,
            ..ListingQuery::default()
        };
        let (clause, params) = query.where_clause();
        assert_eq!(
            clause,
            "WHERE is_published = 1 AND city = ? COLLATE NOCASE AND price <= ?"
        );
        assert_eq!(params.len(), 2);
    }

    #[test]
    fn page_defaults_to_first() {
        let window = PageWindow::resolve(None, 6, 20);
        assert_eq!(window.page, 1);
        assert_eq!(window.total_pages, 4);
        assert_eq!(window.offset(), 0);
    }

    #[test]
    fn page_zero_and_negative_clamp_to_first() {
        assert_eq!(PageWindow::resolve(Some(0), 6, 20).page, 1);
        assert_eq!(PageWindow::resolve(Some(-3), 6, 20).page, 1);
    }

    #[test]
    fn page_past_the_end_clamps_to_last() {
        let window = PageWindow::resolve(Some(99), 6, 13);
        assert_eq!(window.page, 3);
        assert_eq!(window.offset(), 12);
    }

    #[test]
    fn empty_result_still_has_one_page() {
        let window = PageWindow::resolve(Some(5), 6, 0);
        assert_eq!(window.page, 1);
        assert_eq!(window.total_pages, 1);
    }

    #[test]
    fn exact_multiple_has_no_trailing_page() {
        assert_eq!(PageWindow::resolve(None, 6, 12).total_pages, 2);
    }
}
