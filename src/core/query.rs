//! Pagination descriptors and query-string helpers

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Offset-based description of the page being rendered
///
/// # Example
/// ```
/// use jsonapi::core::query::PaginationDescriptor;
///
/// // Page 3 of a 25-row listing, 10 rows per page
/// let pag: PaginationDescriptor =
///     serde_json::from_str(r#"{ "offset": 20, "limit": 10, "rowCount": 25 }"#).unwrap();
/// assert_eq!(pag.total(), Some(25));
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaginationDescriptor {
    /// Index of the first row of the page
    #[serde(default)]
    pub offset: u64,

    /// Maximum number of rows per page
    pub limit: u64,

    /// Total number of rows, when known
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total: Option<u64>,

    /// Total reported by the ORM's paging helpers; wins over `total`
    #[serde(
        default,
        rename = "rowCount",
        alias = "row_count",
        skip_serializing_if = "Option::is_none"
    )]
    pub row_count: Option<u64>,
}

impl PaginationDescriptor {
    pub fn new(offset: u64, limit: u64, total: u64) -> Self {
        Self {
            offset,
            limit,
            total: Some(total),
            row_count: None,
        }
    }

    /// Descriptor whose total is not known
    pub fn open_ended(offset: u64, limit: u64) -> Self {
        Self {
            offset,
            limit,
            total: None,
            row_count: None,
        }
    }

    /// Effective total: `rowCount` when given, else `total`
    pub fn total(&self) -> Option<u64> {
        self.row_count.or(self.total)
    }

    /// More than one page exists
    pub fn has_many_pages(&self) -> bool {
        self.total()
            .is_some_and(|total| total > 0 && total > self.limit)
    }
}

/// Page-number pagination metadata, as advertised in `meta.pagination`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationMeta {
    /// Current page number (starts at 1)
    pub page: u64,

    /// Number of rows per page
    pub page_size: u64,

    /// Total number of rows
    pub row_count: u64,

    /// Total number of pages
    pub page_count: u64,
}

impl PaginationMeta {
    pub fn new(page: u64, page_size: u64, row_count: u64) -> Self {
        let page_count = if page_size == 0 {
            0
        } else {
            row_count.div_ceil(page_size)
        };
        Self {
            page: page.max(1),
            page_size,
            row_count,
            page_count,
        }
    }
}

impl From<&PaginationDescriptor> for PaginationMeta {
    fn from(pag: &PaginationDescriptor) -> Self {
        let page = match pag.limit {
            0 => 1,
            limit => (pag.offset / limit).saturating_add(1),
        };
        PaginationMeta::new(page, pag.limit, pag.total().unwrap_or(0))
    }
}

impl From<&PaginationMeta> for PaginationDescriptor {
    fn from(meta: &PaginationMeta) -> Self {
        PaginationDescriptor {
            offset: meta.page.saturating_sub(1).saturating_mul(meta.page_size),
            limit: meta.page_size,
            total: None,
            row_count: Some(meta.row_count),
        }
    }
}

/// Query keys that carry pagination and are rebuilt for each page link
pub const PAGE_KEYS: &[&str] = &["page", "page[limit]", "page[offset]"];

/// Copy of `query` without its pagination keys
pub fn without_page_keys(query: &Map<String, Value>) -> Map<String, Value> {
    query
        .iter()
        .filter(|(key, _)| !PAGE_KEYS.contains(&key.as_str()))
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect()
}

/// Stringify a query object with bracket notation, without percent-encoding
///
/// `{ "page": { "limit": 10, "offset": 0 } }` becomes
/// `page[limit]=10&page[offset]=0`; arrays use indices (`ids[0]=1`).
pub fn stringify(query: &Map<String, Value>) -> String {
    let mut pairs = Vec::new();
    for (key, value) in query {
        push_pairs(key, value, &mut pairs);
    }
    pairs.join("&")
}

fn push_pairs(prefix: &str, value: &Value, pairs: &mut Vec<String>) {
    match value {
        Value::Object(map) => {
            for (key, nested) in map {
                push_pairs(&format!("{}[{}]", prefix, key), nested, pairs);
            }
        }
        Value::Array(items) => {
            for (index, nested) in items.iter().enumerate() {
                push_pairs(&format!("{}[{}]", prefix, index), nested, pairs);
            }
        }
        Value::String(s) => pairs.push(format!("{}={}", prefix, s)),
        Value::Null => pairs.push(format!("{}=", prefix)),
        other => pairs.push(format!("{}={}", prefix, other)),
    }
}
