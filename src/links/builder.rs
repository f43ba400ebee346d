//! Link builders for top-level, pagination, resource and relationship links
//!
//! Every builder is a pure function of [`LinkOptions`]: identical options give
//! identical links, and dynamic links only read the resource they are resolved
//! against.

use crate::core::link::{LinkArgs, LinkValue, Links};
use crate::core::pluralize::Pluralizer;
use crate::core::query::{self, PaginationDescriptor};
use serde_json::{Map, Value, json};

/// Inputs shared by all link builders
#[derive(Debug, Clone, Default)]
pub struct LinkOptions {
    /// API root, without trailing slash (e.g. "https://api.example.com")
    pub base_url: String,

    /// Resource type the links are rooted at (pluralized for paths)
    pub resource_type: String,

    /// Page being rendered, for pagination links
    pub pagination: Option<PaginationDescriptor>,

    /// Request query, passed through on pagination links
    pub query: Map<String, Value>,
}

impl LinkOptions {
    pub fn new(base_url: impl Into<String>, resource_type: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            resource_type: resource_type.into(),
            pagination: None,
            query: Map::new(),
        }
    }

    pub fn with_pagination(mut self, pagination: PaginationDescriptor) -> Self {
        self.pagination = Some(pagination);
        self
    }

    pub fn with_query(mut self, query: Map<String, Value>) -> Self {
        self.query = query;
        self
    }

    /// Same options, rooted at another resource type
    pub fn for_type(&self, resource_type: impl Into<String>) -> Self {
        Self {
            resource_type: resource_type.into(),
            ..self.clone()
        }
    }

    /// `<base_url>/<pluralized type>`
    pub fn collection_url(&self) -> String {
        url_concat(&[
            &self.base_url,
            &Pluralizer::pluralize(&self.resource_type),
        ])
    }
}

/// Join URL segments with "/"
pub fn url_concat(parts: &[&str]) -> String {
    parts.join("/")
}

/// String form of a rendered resource's `id`
pub fn id_of(resource: &Value) -> String {
    match resource.get("id") {
        Some(Value::String(id)) => id.clone(),
        Some(Value::Null) | None => String::new(),
        Some(other) => other.to_string(),
    }
}

/// Top-level links: the collection URL, plus pagination links when more
/// than one page exists
pub fn top_links(opts: &LinkOptions) -> Links {
    let mut links = Links::new().with("self", opts.collection_url());

    if opts.pagination.is_some_and(|pag| pag.has_many_pages()) {
        if let Some(pagination) = pag_links(opts) {
            links.extend(pagination);
        }
    }
    links
}

/// Pagination links for the page described by `opts.pagination`
///
/// `first`/`prev` exist past the first page, `next`/`last` before the last
/// one. The last page keeps the current page alignment so it never overlaps
/// the penultimate page.
pub fn pag_links(opts: &LinkOptions) -> Option<Links> {
    let pag = opts.pagination?;
    let PaginationDescriptor { offset, limit, .. } = pag;
    if limit == 0 {
        return None;
    }

    let passthrough = query::stringify(&query::without_page_keys(&opts.query));
    let base = if passthrough.is_empty() {
        format!("{}?", opts.collection_url())
    } else {
        format!("{}?{}&", opts.collection_url(), passthrough)
    };
    let page_url = |limit: u64, offset: u64| -> LinkValue {
        let page = json!({ "page": { "limit": limit, "offset": offset } });
        let page = page.as_object().map(query::stringify).unwrap_or_default();
        LinkValue::Static(format!("{}{}", base, page))
    };

    let mut links = Links::new();
    if offset > 0 {
        links.insert("first", page_url(limit, 0));
        links.insert("prev", page_url(limit, offset.saturating_sub(limit)));
    }

    if let Some(total) = pag.total().filter(|total| *total > 0) {
        if let Some(next) = offset.checked_add(limit).filter(|next| *next < total) {
            links.insert("next", page_url(limit, next));
            let (last_limit, last_offset) = last_page(offset, limit, total);
            links.insert("last", page_url(last_limit, last_offset));
        }
    }

    tracing::trace!(
        resource_type = %opts.resource_type,
        offset,
        limit,
        links = links.len(),
        "built pagination links"
    );

    (!links.is_empty()).then_some(links)
}

/// Limit and offset of the last page, aligned on the current offset
///
/// `last_limit = (total - offset % limit) % limit`, or `limit` when that is
/// zero; `last_offset = total - last_limit`.
pub fn last_page(offset: u64, limit: u64, total: u64) -> (u64, u64) {
    let last_limit = match total.saturating_sub(offset % limit) % limit {
        0 => limit,
        rest => rest,
    };
    (last_limit, total.saturating_sub(last_limit))
}

/// Per-resource links: `self` points at the resource's canonical URL
pub fn data_links(opts: &LinkOptions) -> Links {
    let base = opts.collection_url();
    Links::new().with(
        "self",
        LinkValue::dynamic(move |args: &LinkArgs<'_>| {
            url_concat(&[&base, &id_of(args.current)])
        }),
    )
}

/// Relationship links, rooted at the parent resource's collection
pub fn relationship_links(opts: &LinkOptions, related: &str) -> Links {
    let base = opts.collection_url();
    let self_base = base.clone();
    let self_related = related.to_string();
    let related = related.to_string();

    Links::new()
        .with(
            "self",
            LinkValue::dynamic(move |args: &LinkArgs<'_>| {
                let parent = args.parent.map(id_of).unwrap_or_default();
                url_concat(&[&self_base, &parent, "relationships", &self_related])
            }),
        )
        .with(
            "related",
            LinkValue::dynamic(move |args: &LinkArgs<'_>| {
                let parent = args.parent.map(id_of).unwrap_or_default();
                url_concat(&[&base, &parent, &related])
            }),
        )
}

/// Links of a side-loaded resource to its own canonical URL
pub fn included_links(opts: &LinkOptions) -> Links {
    let base = opts.collection_url();
    Links::new().with(
        "self",
        LinkValue::dynamic(move |args: &LinkArgs<'_>| {
            url_concat(&[&base, &id_of(args.current)])
        }),
    )
}
