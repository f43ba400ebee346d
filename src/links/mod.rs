//! Link generation for documents
//!
//! Builders for top-level, pagination, per-resource and relationship links.
//! They only depend on the API base URL, the resource type and the page being
//! rendered.

pub mod builder;

pub use builder::{
    LinkOptions, data_links, id_of, included_links, last_page, pag_links, relationship_links,
    top_links, url_concat,
};
