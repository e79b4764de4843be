//! Product listing: filter, sort, paginate.
//!
//! The whole catalog is loaded and processed in memory in a fixed order:
//!
//! 1. category filter (case-insensitive exact match)
//! 2. availability filter (`"true"` selects available products, any other
//!    value selects unavailable ones)
//! 3. title filter (case-insensitive substring)
//! 4. price sort, only for `sort=asc` or `sort=desc`; otherwise storage order
//! 5. pagination
//!
//! Query values are taken as raw strings so that odd input never rejects the
//! request: empty values are ignored, a repeated key keeps its first value,
//! unknown keys are dropped, and `limit`/`page` fall back to their defaults
//! when they do not start with an integer and are clamped to `>= 1`.

use serde::{Deserialize, Serialize};
use shelf_core::Product;
use url::Url;

/// Products per page when `limit` is not given.
pub const DEFAULT_LIMIT: usize = 10;

/// Raw listing query parameters.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(from = "Vec<(String, String)>")]
pub struct ListingQuery {
    pub limit: Option<String>,
    pub page: Option<String>,
    pub sort: Option<String>,
    pub query: Option<String>,
    pub category: Option<String>,
    pub availability: Option<String>,
}

/// Price ordering requested through `sort`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Asc,
    Desc,
}

impl ListingQuery {
    /// Page size, at least 1.
    #[must_use]
    pub fn limit(&self) -> usize {
        parse_count(self.limit.as_deref(), DEFAULT_LIMIT)
    }

    /// Requested page number, at least 1.
    #[must_use]
    pub fn page(&self) -> usize {
        parse_count(self.page.as_deref(), 1)
    }

    /// Price ordering, if `sort` is exactly `asc` or `desc`.
    #[must_use]
    pub fn sort_order(&self) -> Option<SortOrder> {
        match self.sort.as_deref() {
            Some("asc") => Some(SortOrder::Asc),
            Some("desc") => Some(SortOrder::Desc),
            _ => None,
        }
    }

    /// Required availability status, if filtering by availability.
    #[must_use]
    pub fn availability(&self) -> Option<bool> {
        non_empty(self.availability.as_deref()).map(|v| v.eq_ignore_ascii_case("true"))
    }

    fn category(&self) -> Option<&str> {
        non_empty(self.category.as_deref())
    }

    fn title_query(&self) -> Option<&str> {
        non_empty(self.query.as_deref())
    }
}

impl FromIterator<(String, String)> for ListingQuery {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(pairs: I) -> Self {
        let mut query = Self::default();
        for (key, value) in pairs {
            let slot = match key.as_str() {
                "limit" => &mut query.limit,
                "page" => &mut query.page,
                "sort" => &mut query.sort,
                "query" => &mut query.query,
                "category" => &mut query.category,
                "availability" => &mut query.availability,
                _ => continue,
            };
            slot.get_or_insert(value);
        }
        query
    }
}

impl From<Vec<(String, String)>> for ListingQuery {
    fn from(pairs: Vec<(String, String)>) -> Self {
        pairs.into_iter().collect()
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

/// Parse the leading integer of `value` (`"12abc"` is 12), clamped to `>= 1`.
fn parse_count(value: Option<&str>, default: usize) -> usize {
    let Some(value) = value.map(str::trim_start) else {
        return default;
    };

    let (negative, digits) = match value.as_bytes().first() {
        Some(b'-') => (true, value.get(1..).unwrap_or_default()),
        Some(b'+') => (false, value.get(1..).unwrap_or_default()),
        _ => (false, value),
    };
    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    let digits = digits.get(..end).unwrap_or_default();

    if digits.is_empty() {
        return default;
    }
    if negative || digits.bytes().all(|b| b == b'0') {
        return 1;
    }
    digits.parse::<usize>().unwrap_or(usize::MAX)
}

/// One page of a filtered, sorted list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page: usize,
    pub limit: usize,
    pub total_items: usize,
    pub total_pages: usize,
}

impl<T> Page<T> {
    /// Slice `items` into the requested page.
    ///
    /// Pages past the end are empty.
    #[must_use]
    pub fn slice(items: Vec<T>, page: usize, limit: usize) -> Self {
        let page = page.max(1);
        let limit = limit.max(1);
        let total_items = items.len();
        let total_pages = total_items.div_ceil(limit);
        let start = (page - 1).saturating_mul(limit);

        Self {
            items: items.into_iter().skip(start).take(limit).collect(),
            page,
            limit,
            total_items,
            total_pages,
        }
    }

    #[must_use]
    pub const fn has_prev(&self) -> bool {
        self.page > 1
    }

    #[must_use]
    pub const fn has_next(&self) -> bool {
        self.page < self.total_pages
    }

    #[must_use]
    pub const fn prev_page(&self) -> Option<usize> {
        if self.has_prev() {
            Some(self.page - 1)
        } else {
            None
        }
    }

    #[must_use]
    pub const fn next_page(&self) -> Option<usize> {
        if self.has_next() {
            Some(self.page + 1)
        } else {
            None
        }
    }
}

/// Filter, sort and paginate `products` according to `query`.
#[must_use]
pub fn list_products(mut products: Vec<Product>, query: &ListingQuery) -> Page<Product> {
    if let Some(category) = query.category() {
        let category = category.to_lowercase();
        products.retain(|p| p.category.to_lowercase() == category);
    }

    if let Some(available) = query.availability() {
        products.retain(|p| p.status == available);
    }

    if let Some(needle) = query.title_query() {
        let needle = needle.to_lowercase();
        products.retain(|p| p.title.to_lowercase().contains(&needle));
    }

    match query.sort_order() {
        Some(SortOrder::Asc) => products.sort_by(|a, b| a.price.cmp(&b.price)),
        Some(SortOrder::Desc) => products.sort_by(|a, b| b.price.cmp(&a.price)),
        None => {}
    }

    Page::slice(products, query.page(), query.limit())
}

/// Build the URL of another page of the same listing.
///
/// Keeps every supplied filter and sort parameter and replaces `page`.
#[must_use]
pub fn page_link(base: &Url, query: &ListingQuery, page: usize) -> String {
    let mut url = base.clone();
    {
        let mut pairs = url.query_pairs_mut();
        pairs.clear();
        pairs.append_pair("limit", &query.limit().to_string());
        pairs.append_pair("page", &page.to_string());

        let optional = [
            ("sort", &query.sort),
            ("query", &query.query),
            ("category", &query.category),
            ("availability", &query.availability),
        ];
        for (key, value) in optional {
            if let Some(value) = non_empty(value.as_deref()) {
                pairs.append_pair(key, value);
            }
        }
    }
    url.to_string()
}

/// Pagination envelope returned by `GET /api/products`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListingEnvelope<T> {
    pub status: &'static str,
    pub payload: Vec<T>,
    pub total_pages: usize,
    pub prev_page: Option<usize>,
    pub next_page: Option<usize>,
    pub page: usize,
    pub has_prev_page: bool,
    pub has_next_page: bool,
    pub prev_link: Option<String>,
    pub next_link: Option<String>,
}

impl<T> ListingEnvelope<T> {
    /// Wrap a page, linking neighbours relative to `base`.
    #[must_use]
    pub fn new(page: Page<T>, query: &ListingQuery, base: &Url) -> Self {
        let prev_page = page.prev_page();
        let next_page = page.next_page();

        Self {
            status: "success",
            total_pages: page.total_pages,
            prev_page,
            next_page,
            page: page.page,
            has_prev_page: page.has_prev(),
            has_next_page: page.has_next(),
            prev_link: prev_page.map(|n| page_link(base, query, n)),
            next_link: next_page.map(|n| page_link(base, query, n)),
            payload: page.items,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use shelf_core::{Price, ProductId, Quantity};

    use super::*;

    fn product(id: &str, title: &str, cents: i64, category: &str, status: bool) -> Product {
        Product {
            id: ProductId::new(id),
            title: title.to_string(),
            description: "d".to_string(),
            code: id.to_string(),
            price: Price::from_cents(cents),
            status,
            stock: Quantity::from(1_u32),
            category: category.to_string(),
            thumbnails: Vec::new(),
        }
    }

    fn catalog() -> Vec<Product> {
        vec![
            product("1", "Red Shirt", 3000, "Clothes", true),
            product("2", "Blue Mug", 800, "kitchen", true),
            product("3", "red mug", 1200, "Kitchen", false),
            product("4", "Green Hat", 1500, "clothes", true),
            product("5", "Plate", 500, "KITCHEN", true),
        ]
    }

    fn query(pairs: &[(&str, &str)]) -> ListingQuery {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    #[test]
    fn test_repeated_keys_keep_first_value() {
        let q = query(&[("limit", "2"), ("limit", "3"), ("sort", "asc"), ("utm", "x")]);
        assert_eq!(q.limit(), 2);
        assert_eq!(q.sort_order(), Some(SortOrder::Asc));
        assert_eq!(q.page(), 1);
    }

    #[test]
    fn test_query_deserializes_from_pairs() {
        let q: ListingQuery = serde_json::from_value(serde_json::json!([
            ["page", "4"],
            ["page", "9"],
            ["category", "kitchen"]
        ]))
        .unwrap();
        assert_eq!(q.page(), 4);
        assert_eq!(q.category.as_deref(), Some("kitchen"));
    }

    fn ids(page: &Page<Product>) -> Vec<&str> {
        page.items.iter().map(|p| p.id.as_str()).collect()
    }

    #[test]
    fn test_defaults() {
        let q = ListingQuery::default();
        assert_eq!(q.limit(), 10);
        assert_eq!(q.page(), 1);
        assert_eq!(q.sort_order(), None);
        assert_eq!(q.availability(), None);
    }

    #[test]
    fn test_lenient_integer_parsing() {
        assert_eq!(parse_count(Some("25"), 10), 25);
        assert_eq!(parse_count(Some("7abc"), 10), 7);
        assert_eq!(parse_count(Some("abc"), 10), 10);
        assert_eq!(parse_count(Some(""), 10), 10);
        assert_eq!(parse_count(Some("0"), 10), 1);
        assert_eq!(parse_count(Some("-3"), 10), 1);
        assert_eq!(parse_count(Some(" +4"), 10), 4);
    }

    #[test]
    fn test_category_filter_is_case_insensitive() {
        let page = list_products(catalog(), &query(&[("category", "kitchen")]));
        assert_eq!(ids(&page), vec!["2", "3", "5"]);
        assert!(
            page.items
                .iter()
                .all(|p| p.category.eq_ignore_ascii_case("kitchen"))
        );
    }

    #[test]
    fn test_availability_filter() {
        let available = list_products(catalog(), &query(&[("availability", "true")]));
        assert_eq!(ids(&available), vec!["1", "2", "4", "5"]);

        let unavailable = list_products(catalog(), &query(&[("availability", "false")]));
        assert_eq!(ids(&unavailable), vec!["3"]);

        let other = list_products(catalog(), &query(&[("availability", "maybe")]));
        assert_eq!(ids(&other), vec!["3"]);
    }

    #[test]
    fn test_title_query_matches_substring() {
        let page = list_products(catalog(), &query(&[("query", "RED")]));
        assert_eq!(ids(&page), vec!["1", "3"]);
    }

    #[test]
    fn test_filters_combine() {
        let page = list_products(
            catalog(),
            &query(&[("category", "KITCHEN"), ("availability", "true"), ("query", "mug")]),
        );
        assert_eq!(ids(&page), vec!["2"]);
    }

    #[test]
    fn test_sort_by_price() {
        let asc = list_products(catalog(), &query(&[("sort", "asc")]));
        assert_eq!(ids(&asc), vec!["5", "2", "3", "4", "1"]);
        assert!(asc.items.windows(2).all(|w| w[0].price <= w[1].price));

        let desc = list_products(catalog(), &query(&[("sort", "desc")]));
        assert_eq!(ids(&desc), vec!["1", "4", "3", "2", "5"]);
    }

    #[test]
    fn test_unknown_sort_keeps_storage_order() {
        let page = list_products(catalog(), &query(&[("sort", "ASC")]));
        assert_eq!(ids(&page), vec!["1", "2", "3", "4", "5"]);
    }

    #[test]
    fn test_sort_is_stable_for_equal_prices() {
        let products = vec![
            product("a", "A", 100, "c", true),
            product("b", "B", 100, "c", true),
            product("c", "C", 50, "c", true),
        ];
        let page = list_products(products, &query(&[("sort", "asc")]));
        assert_eq!(ids(&page), vec!["c", "a", "b"]);
    }

    #[test]
    fn test_pagination_counts() {
        let page = list_products(catalog(), &query(&[("limit", "2"), ("page", "3")]));
        assert_eq!(page.total_pages, 3);
        assert_eq!(ids(&page), vec!["5"]);
        assert!(page.has_prev());
        assert!(!page.has_next());
        assert_eq!(page.prev_page(), Some(2));
        assert_eq!(page.next_page(), None);

        let middle = list_products(catalog(), &query(&[("limit", "2"), ("page", "2")]));
        assert_eq!(ids(&middle), vec!["3", "4"]);
        assert_eq!(middle.next_page(), Some(3));
    }

    #[test]
    fn test_page_past_end_is_empty() {
        let page = list_products(catalog(), &query(&[("limit", "2"), ("page", "9")]));
        assert!(page.items.is_empty());
        assert_eq!(page.total_pages, 3);
        assert!(!page.has_next());
        assert_eq!(page.prev_page(), Some(8));
    }

    #[test]
    fn test_empty_result_has_zero_pages() {
        let page = list_products(catalog(), &query(&[("category", "none")]));
        assert_eq!(page.total_pages, 0);
        assert!(!page.has_prev());
        assert!(!page.has_next());
    }

    #[test]
    fn test_zero_limit_is_clamped() {
        let page = list_products(catalog(), &query(&[("limit", "0")]));
        assert_eq!(page.limit, 1);
        assert_eq!(page.total_pages, 5);
        assert_eq!(page.items.len(), 1);
    }

    #[test]
    fn test_last_page_size() {
        for limit in 1..=6 {
            let total = catalog().len();
            let first = Page::slice(catalog(), 1, limit);
            let last = Page::slice(catalog(), first.total_pages, limit);
            assert_eq!(first.total_pages, total.div_ceil(limit));
            assert!(first.items.len() <= limit);
            assert_eq!(last.items.len(), total - limit * (first.total_pages - 1));
        }
    }

    #[test]
    fn test_links_keep_query() {
        let base = Url::parse("http://localhost:8080/api/products").unwrap();
        let q = query(&[
            ("limit", "2"),
            ("page", "2"),
            ("sort", "asc"),
            ("query", "red mug"),
            ("category", ""),
        ]);
        let page = list_products(catalog(), &q);
        let envelope = ListingEnvelope::new(page, &q, &base);

        assert_eq!(
            envelope.prev_link.as_deref(),
            Some("http://localhost:8080/api/products?limit=2&page=1&sort=asc&query=red+mug")
        );
        assert_eq!(envelope.next_link, None);
        assert_eq!(envelope.total_pages, 1);
    }

    #[test]
    fn test_envelope_shape() {
        let base = Url::parse("http://shop.test/api/products").unwrap();
        let q = query(&[("limit", "2")]);
        let envelope = ListingEnvelope::new(list_products(catalog(), &q), &q, &base);
        let value = serde_json::to_value(&envelope).unwrap();

        assert_eq!(value["status"], "success");
        assert_eq!(value["payload"].as_array().unwrap().len(), 2);
        assert_eq!(value["totalPages"], 3);
        assert_eq!(value["page"], 1);
        assert!(value["prevPage"].is_null());
        assert_eq!(value["nextPage"], 2);
        assert_eq!(value["hasPrevPage"], false);
        assert_eq!(value["hasNextPage"], true);
        assert!(value["prevLink"].is_null());
        assert_eq!(value["nextLink"], "http://shop.test/api/products?limit=2&page=2");
    }
}
