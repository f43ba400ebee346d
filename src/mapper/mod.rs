//! Mapping entry point
//!
//! [`Mapper`] ties the pipeline together: it samples the graph, builds a
//! template, normalizes the graph to JSON and hands the three to a
//! [`DocumentSerializer`], which renders the final wire document.

pub mod actions;
pub mod options;
pub mod serializer;

pub use actions::{Action, ActionField};
pub use options::MapOptions;
pub use serializer::ResourceSerializer;

use crate::config::MapperConfig;
use crate::core::error::MapResult;
use crate::core::node::{Kind, Node};
use crate::core::normalize;
use crate::core::sample::sample;
use crate::links::LinkOptions;
use crate::template::{Template, TemplateOverrides, build_template};
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;

/// Renders `(type, template, normalized JSON)` into a wire document
///
/// Implementations resolve the template's links and meta while they render
/// each resource. Failures are reported through `anyhow` and surface as
/// [`MapError::Serializer`](crate::core::error::MapError::Serializer).
pub trait DocumentSerializer {
    fn serialize(
        &self,
        resource_type: &str,
        template: &Template,
        json: &Value,
    ) -> anyhow::Result<Value>;
}

impl<S: DocumentSerializer + ?Sized> DocumentSerializer for &S {
    fn serialize(
        &self,
        resource_type: &str,
        template: &Template,
        json: &Value,
    ) -> anyhow::Result<Value> {
        (**self).serialize(resource_type, template, json)
    }
}

impl<S: DocumentSerializer + ?Sized> DocumentSerializer for Arc<S> {
    fn serialize(
        &self,
        resource_type: &str,
        template: &Template,
        json: &Value,
    ) -> anyhow::Result<Value> {
        (**self).serialize(resource_type, template, json)
    }
}

/// A rendered document
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Document(pub Value);

impl Document {
    pub fn as_value(&self) -> &Value {
        &self.0
    }

    pub fn into_inner(self) -> Value {
        self.0
    }
}

/// Media type of JSON:API documents
pub const JSONAPI_MEDIA_TYPE: &str = "application/vnd.api+json";

#[cfg(feature = "axum")]
impl axum::response::IntoResponse for Document {
    fn into_response(self) -> axum::response::Response {
        (
            [(axum::http::header::CONTENT_TYPE, JSONAPI_MEDIA_TYPE)],
            axum::Json(self.0),
        )
            .into_response()
    }
}

/// Maps entity graphs into documents
///
/// Holds the API base URL, the document serializer and the caller template
/// fragments applied to single resources (`item`) and to collections
/// (`list`).
///
/// # Example
///
/// ```rust,ignore
/// let mapper = Mapper::new("https://api.example.com", JsonApiSerializer::default());
/// let document = mapper.map(&node, "widgets", &MapOptions::default())?;
/// ```
#[derive(Debug, Clone)]
pub struct Mapper<S> {
    base_url: String,
    serializer: S,
    defaults: MapOptions,
    item: TemplateOverrides,
    list: TemplateOverrides,
}

impl<S: DocumentSerializer> Mapper<S> {
    pub fn new(base_url: impl Into<String>, serializer: S) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            serializer,
            defaults: MapOptions::default(),
            item: TemplateOverrides::default(),
            list: TemplateOverrides::default(),
        }
    }

    /// Mapper whose base URL and default options come from configuration
    pub fn from_config(config: &MapperConfig, serializer: S) -> MapResult<Self> {
        Ok(Self::new(config.base_url.clone(), serializer).with_defaults(config.map_options()?))
    }

    pub fn with_defaults(mut self, defaults: MapOptions) -> Self {
        self.defaults = defaults;
        self
    }

    /// Fragment merged into templates of single resources
    pub fn with_item_overrides(mut self, overrides: TemplateOverrides) -> Self {
        self.item = overrides;
        self
    }

    /// Fragment merged into templates of collections
    pub fn with_list_overrides(mut self, overrides: TemplateOverrides) -> Self {
        self.list = overrides;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Default options, as loaded from configuration
    pub fn defaults(&self) -> &MapOptions {
        &self.defaults
    }

    pub fn serializer(&self) -> &S {
        &self.serializer
    }

    /// Link inputs for a root resource type
    pub fn link_options(&self, resource_type: &str, opts: &MapOptions) -> LinkOptions {
        let mut link_opts =
            LinkOptions::new(self.base_url.clone(), resource_type).with_query(opts.query.clone());
        if let Some(pagination) = opts.pagination {
            link_opts = link_opts.with_pagination(pagination);
        }
        link_opts
    }

    /// Generated template for a node, before any caller fragment is merged
    pub fn template(&self, node: &Node, resource_type: &str, opts: &MapOptions) -> Template {
        let shape = sample(node);
        tracing::trace!(
            resource_type = %resource_type,
            attributes = shape.attributes.len(),
            relations = shape.relations.len(),
            "sampled graph"
        );
        build_template(&shape, opts, &self.link_options(resource_type, opts))
    }

    /// Map a node, merging the item or list fragment by its kind
    pub fn map(&self, node: &Node, resource_type: &str, opts: &MapOptions) -> MapResult<Document> {
        let overrides = match node.kind() {
            Kind::Collection => &self.list,
            Kind::Entity | Kind::Empty => &self.item,
        };
        self.map_with(node, resource_type, opts, Some(overrides))
    }

    /// Map a node with an explicit caller fragment
    pub fn map_with(
        &self,
        node: &Node,
        resource_type: &str,
        opts: &MapOptions,
        overrides: Option<&TemplateOverrides>,
    ) -> MapResult<Document> {
        tracing::debug!(
            resource_type = %resource_type,
            kind = ?node.kind(),
            "mapping graph"
        );

        let mut template = self.template(node, resource_type, opts);
        if let Some(overrides) = overrides {
            overrides.apply_to(&mut template);
        }

        let json = normalize::to_json(node, resource_type, opts.output_virtuals)?;
        let document = self.serializer.serialize(resource_type, &template, &json)?;
        Ok(Document(document))
    }

    /// Map a graph and options given as JSON
    pub fn map_value(&self, data: &Value, resource_type: &str, opts: &Value) -> MapResult<Document> {
        let opts = MapOptions::from_value(opts)?;
        let node = Node::from_value(data)?;
        self.map(&node, resource_type, &opts)
    }
}
