//! Configuration loading and management

use crate::core::error::MapResult;
use crate::core::filter::{AttributeFilter, RelationFilter};
use crate::mapper::MapOptions;
use crate::template::{KeyForAttribute, TypeForModel};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::Path;

fn default_true() -> bool {
    true
}

/// Default mapping configuration of an API
///
/// ```yaml
/// base_url: https://api.example.com
/// enable_links: true
/// key_case: camelCase
/// attributes:
///   omit: [id, password_hash, { pattern: "_.*" }]
/// relations:
///   fields: [owner, tags]
///   included: [owner]
/// types:
///   owner: users
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MapperConfig {
    /// API root used for every link
    pub base_url: String,

    /// Attach links to generated templates
    #[serde(default = "default_true")]
    pub enable_links: bool,

    /// Force virtual attributes on or off
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_virtuals: Option<bool>,

    /// Default attribute rules (`omit`/`include` lists, or a bare include list)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attributes: Option<Value>,

    /// Default relation rules (a boolean, or `fields`/`included`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relations: Option<Value>,

    /// Relation name -> resource type
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub types: IndexMap<String, String>,

    /// Attribute key case (identity, camelCase, dash-case, snake_case)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key_case: Option<String>,
}

impl MapperConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            enable_links: true,
            output_virtuals: None,
            attributes: None,
            relations: None,
            types: IndexMap::new(),
            key_case: None,
        }
    }

    /// Load configuration from a YAML file
    pub fn from_yaml_file(path: impl AsRef<Path>) -> MapResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&content)
    }

    /// Load configuration from a YAML string
    pub fn from_yaml_str(yaml: &str) -> MapResult<Self> {
        let config: Self = serde_yaml::from_str(yaml)?;
        Ok(config)
    }

    /// Compile the configured rules into default mapping options
    ///
    /// Invalid rules and unknown key cases are reported here, so a bad
    /// configuration fails at startup rather than on the first request.
    pub fn map_options(&self) -> MapResult<MapOptions> {
        let mut options = MapOptions::default().enable_links(self.enable_links);

        if let Some(raw) = self.attributes.as_ref().filter(|v| !v.is_null()) {
            options = options.attributes(AttributeFilter::try_from(raw)?);
        }
        if let Some(raw) = self.relations.as_ref().filter(|v| !v.is_null()) {
            options = options.relations(RelationFilter::try_from(raw)?);
        }
        if let Some(case) = &self.key_case {
            options = options.key_for_attribute(KeyForAttribute::from_name(case)?);
        }
        if !self.types.is_empty() {
            options = options.type_for_model(TypeForModel::Table(self.types.clone()));
        }
        if let Some(enabled) = self.output_virtuals {
            options = options.output_virtuals(enabled);
        }

        Ok(options)
    }
}
