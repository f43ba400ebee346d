//! Serialization templates handed to the document serializer
//!
//! A [`Template`] tells the serializer, for the root resource type and every
//! relation reachable from it, which attributes are visible, which relations
//! are references (and whether they are embedded), how keys and related types
//! are named, and which links to attach.

pub mod builder;
pub mod naming;

pub use builder::build_template;
pub use naming::{KeyForAttribute, TypeForModel};

use crate::core::link::Links;
use crate::core::query::PaginationMeta;
use indexmap::IndexMap;
use serde_json::{Map, Value};
use std::fmt;
use std::sync::Arc;

/// Template for one resource level
///
/// Root-only fields (`top_level_links`, `data_links`, `data_meta`,
/// `key_for_attribute`, `type_for_attribute`, `meta`) are left at their
/// defaults on nested templates.
#[derive(Debug, Clone, Default)]
pub struct Template {
    /// Visible attribute names, relation names last
    pub attributes: Vec<String>,

    /// Sub-templates of walked relations
    pub relations: IndexMap<String, Template>,

    /// Key of the related resource's id (`ref`), set on nested templates
    pub reference: Option<String>,

    /// `Some(false)` when the relation is linked but not embedded
    pub included: Option<bool>,

    /// Document-level links
    pub top_level_links: Option<Links>,

    /// Links of each primary resource
    pub data_links: Option<Links>,

    /// Meta of each primary resource
    pub data_meta: Option<Meta>,

    /// Relationship links of a nested relation (rooted at the parent)
    pub relationship_links: Option<Links>,

    /// Links of embedded related resources
    pub included_links: Option<Links>,

    /// Naming of attribute keys
    pub key_for_attribute: KeyForAttribute,

    /// Naming of related resource types
    pub type_for_attribute: TypeForModel,

    /// Document-level meta
    pub meta: Option<Meta>,
}

impl Template {
    /// Template referencing related resources by their id
    pub fn reference(attributes: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            attributes: attributes.into_iter().map(Into::into).collect(),
            reference: Some(crate::core::normalize::ID_KEY.to_string()),
            ..Self::default()
        }
    }

    /// Sub-template of a relation, if walked
    pub fn relation(&self, name: &str) -> Option<&Template> {
        self.relations.get(name)
    }

    /// Whether an embedded relation is placed in `included`
    pub fn is_included(&self) -> bool {
        self.included.unwrap_or(true)
    }

    pub fn has_attribute(&self, name: &str) -> bool {
        self.attributes.iter().any(|a| a == name)
    }

    /// Resource type of a relation, per the type naming rule
    pub fn type_for(&self, attribute: &str) -> String {
        self.type_for_attribute.resolve(attribute)
    }

    /// Output key of an attribute, per the key naming rule
    pub fn key_for(&self, attribute: &str) -> String {
        self.key_for_attribute.apply(attribute)
    }
}

type MetaFn = dyn Fn(&Value) -> Value + Send + Sync;

/// A meta entry: fixed, or computed from the rendered record
#[derive(Clone)]
pub enum MetaValue {
    Static(Value),
    Dynamic(Arc<MetaFn>),
}

impl MetaValue {
    pub fn dynamic<F>(f: F) -> Self
    where
        F: Fn(&Value) -> Value + Send + Sync + 'static,
    {
        MetaValue::Dynamic(Arc::new(f))
    }

    pub fn resolve(&self, record: &Value) -> Value {
        match self {
            MetaValue::Static(value) => value.clone(),
            MetaValue::Dynamic(f) => f(record),
        }
    }
}

impl fmt::Debug for MetaValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MetaValue::Static(value) => f.debug_tuple("Static").field(value).finish(),
            MetaValue::Dynamic(_) => f.write_str("Dynamic(<fn>)"),
        }
    }
}

impl From<Value> for MetaValue {
    fn from(value: Value) -> Self {
        MetaValue::Static(value)
    }
}

impl From<&str> for MetaValue {
    fn from(value: &str) -> Self {
        MetaValue::Static(Value::String(value.to_string()))
    }
}

impl From<String> for MetaValue {
    fn from(value: String) -> Self {
        MetaValue::Static(Value::String(value))
    }
}

/// Meta advertised with a document: pagination plus arbitrary entries
#[derive(Debug, Clone, Default)]
pub struct Meta {
    pub pagination: Option<PaginationMeta>,
    pub entries: IndexMap<String, MetaValue>,
}

impl Meta {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_pagination(mut self, pagination: PaginationMeta) -> Self {
        self.pagination = Some(pagination);
        self
    }

    /// Add or replace an entry
    pub fn with(mut self, name: impl Into<String>, value: impl Into<MetaValue>) -> Self {
        self.entries.insert(name.into(), value.into());
        self
    }

    /// Static meta from a JSON object; a `pagination` key is parsed when it
    /// has the page-number shape, otherwise kept as a plain entry
    pub fn from_object(object: &Map<String, Value>) -> Self {
        let mut meta = Meta::new();
        for (name, value) in object {
            if name == "pagination" {
                if let Ok(pagination) = serde_json::from_value::<PaginationMeta>(value.clone()) {
                    meta.pagination = Some(pagination);
                    continue;
                }
            }
            meta.entries
                .insert(name.clone(), MetaValue::Static(value.clone()));
        }
        meta
    }

    /// Resolve every entry for the rendered record
    pub fn resolve(&self, record: &Value) -> Value {
        let mut object = Map::new();
        if let Some(pagination) = &self.pagination {
            object.insert(
                "pagination".to_string(),
                serde_json::to_value(pagination).unwrap_or(Value::Null),
            );
        }
        for (name, value) in &self.entries {
            object.insert(name.clone(), value.resolve(record));
        }
        Value::Object(object)
    }
}

/// Caller-supplied template fragment (the "item" or "list" mapper)
///
/// Each field that is set replaces the generated value wholesale. Links set
/// to `Some(None)` are removed from the generated template.
#[derive(Debug, Clone, Default)]
pub struct TemplateOverrides {
    pub attributes: Option<Vec<String>>,
    pub top_level_links: Option<Option<Links>>,
    pub data_links: Option<Option<Links>>,
    pub data_meta: Option<Option<Meta>>,
    pub meta: Option<Meta>,
    pub key_for_attribute: Option<KeyForAttribute>,
    pub type_for_attribute: Option<TypeForModel>,
    pub relations: IndexMap<String, Template>,
}

impl TemplateOverrides {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn attributes(mut self, attributes: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.attributes = Some(attributes.into_iter().map(Into::into).collect());
        self
    }

    pub fn top_level_links(mut self, links: Links) -> Self {
        self.top_level_links = Some(Some(links));
        self
    }

    pub fn without_top_level_links(mut self) -> Self {
        self.top_level_links = Some(None);
        self
    }

    pub fn data_links(mut self, links: Links) -> Self {
        self.data_links = Some(Some(links));
        self
    }

    pub fn without_data_links(mut self) -> Self {
        self.data_links = Some(None);
        self
    }

    /// Meta resolved against each primary resource
    pub fn data_meta(mut self, meta: Meta) -> Self {
        self.data_meta = Some(Some(meta));
        self
    }

    pub fn without_data_meta(mut self) -> Self {
        self.data_meta = Some(None);
        self
    }

    pub fn meta(mut self, meta: Meta) -> Self {
        self.meta = Some(meta);
        self
    }

    pub fn key_for_attribute(mut self, naming: KeyForAttribute) -> Self {
        self.key_for_attribute = Some(naming);
        self
    }

    pub fn type_for_attribute(mut self, naming: TypeForModel) -> Self {
        self.type_for_attribute = Some(naming);
        self
    }

    /// Hand-written sub-template for a relation
    pub fn relation(mut self, name: impl Into<String>, template: Template) -> Self {
        self.relations.insert(name.into(), template);
        self
    }

    /// Assign every set field over `template`
    pub fn apply_to(&self, template: &mut Template) {
        if let Some(attributes) = &self.attributes {
            template.attributes = attributes.clone();
        }
        if let Some(links) = &self.top_level_links {
            template.top_level_links = links.clone();
        }
        if let Some(links) = &self.data_links {
            template.data_links = links.clone();
        }
        if let Some(meta) = &self.data_meta {
            template.data_meta = meta.clone();
        }
        if let Some(meta) = &self.meta {
            template.meta = Some(meta.clone());
        }
        if let Some(naming) = &self.key_for_attribute {
            template.key_for_attribute = naming.clone();
        }
        if let Some(naming) = &self.type_for_attribute {
            template.type_for_attribute = naming.clone();
        }
        for (name, relation) in &self.relations {
            template.relations.insert(name.clone(), relation.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_meta_resolution() {
        let meta = Meta::new()
            .with_pagination(PaginationMeta::new(2, 10, 25))
            .with("version", "1.0")
            .with(
                "owner_id",
                MetaValue::dynamic(|record| record["owner_id"].clone()),
            );

        let resolved = meta.resolve(&json!({ "owner_id": 4 }));
        assert_eq!(
            resolved,
            json!({
                "pagination": { "page": 2, "pageSize": 10, "rowCount": 25, "pageCount": 3 },
                "version": "1.0",
                "owner_id": 4
            })
        );
    }

    #[test]
    fn test_meta_from_object() {
        let object = json!({
            "pagination": { "page": 1, "pageSize": 5, "rowCount": 6, "pageCount": 2 },
            "actions": []
        });
        let meta = Meta::from_object(object.as_object().unwrap());
        assert_eq!(meta.pagination, Some(PaginationMeta::new(1, 5, 6)));
        assert!(meta.entries.contains_key("actions"));

        let object = json!({ "pagination": "cursor" });
        let meta = Meta::from_object(object.as_object().unwrap());
        assert!(meta.pagination.is_none());
        assert!(meta.entries.contains_key("pagination"));
    }

    #[test]
    fn test_overrides_replace_and_clear() {
        let mut template = Template {
            attributes: vec!["name".into(), "owner".into()],
            data_links: Some(Links::new().with("self", "x")),
            top_level_links: Some(Links::new().with("self", "y")),
            ..Template::default()
        };

        TemplateOverrides::new()
            .attributes(["name"])
            .without_data_links()
            .relation("user", Template::reference(["email"]))
            .apply_to(&mut template);

        assert_eq!(template.attributes, vec!["name"]);
        assert!(template.data_links.is_none());
        assert!(template.top_level_links.is_some());
        assert_eq!(
            template.relation("user").and_then(|t| t.reference.as_deref()),
            Some("id")
        );
    }

    #[test]
    fn test_data_meta_override() {
        let mut template = Template::default();
        TemplateOverrides::new()
            .data_meta(Meta::new().with(
                "status",
                MetaValue::dynamic(|record| record["status"].clone()),
            ))
            .apply_to(&mut template);

        let meta = template.data_meta.as_ref().unwrap();
        assert_eq!(meta.resolve(&json!({ "status": "open" })), json!({ "status": "open" }));

        TemplateOverrides::new().without_data_meta().apply_to(&mut template);
        assert!(template.data_meta.is_none());
    }

    #[test]
    fn test_template_defaults() {
        let template = Template::default();
        assert!(template.is_included());
        assert_eq!(template.type_for("owner"), "owners");
        assert_eq!(template.key_for("first_name"), "first_name");
    }
}
