//! Per-call mapping options

use crate::core::error::{ConfigError, MapError, MapResult};
use crate::core::filter::{
    AttributeFilter, IncludedRule, RelationFilter, matchers_from_values,
};
use crate::core::query::PaginationDescriptor;
use crate::template::{KeyForAttribute, Meta, TypeForModel};
use serde_json::{Map, Value};

/// Options of one mapping call
///
/// # Example
/// ```
/// use jsonapi::prelude::*;
///
/// let options = MapOptions::default()
///     .attributes(AttributeFilter::omit(["id", "password"]))
///     .relations(RelationFilter::fields(["owner", "tags"])
///         .with_included(IncludedRule::Only(vec!["owner".into()])))
///     .pagination(PaginationDescriptor::new(0, 10, 25));
/// assert!(options.enable_links);
/// ```
#[derive(Debug, Clone)]
pub struct MapOptions {
    /// Attribute visibility; `None` omits the id attribute(s)
    pub attributes: Option<AttributeFilter>,

    /// Relation walking and embedding
    pub relations: RelationFilter,

    /// Attribute key naming
    pub key_for_attribute: KeyForAttribute,

    /// Related resource type naming
    pub type_for_model: TypeForModel,

    /// Attach self, pagination and relationship links
    pub enable_links: bool,

    /// Page being rendered
    pub pagination: Option<PaginationDescriptor>,

    /// Request query passed through on pagination links
    pub query: Map<String, Value>,

    /// Document-level meta
    pub meta: Option<Meta>,

    /// Force virtual attributes on or off for every entity
    pub output_virtuals: Option<bool>,
}

impl Default for MapOptions {
    fn default() -> Self {
        Self {
            attributes: None,
            relations: RelationFilter::All(true),
            key_for_attribute: KeyForAttribute::Identity,
            type_for_model: TypeForModel::Pluralize,
            enable_links: true,
            pagination: None,
            query: Map::new(),
            meta: None,
            output_virtuals: None,
        }
    }
}

impl MapOptions {
    pub fn attributes(mut self, filter: AttributeFilter) -> Self {
        self.attributes = Some(filter);
        self
    }

    pub fn relations(mut self, filter: RelationFilter) -> Self {
        self.relations = filter;
        self
    }

    pub fn key_for_attribute(mut self, naming: KeyForAttribute) -> Self {
        self.key_for_attribute = naming;
        self
    }

    pub fn type_for_model(mut self, naming: TypeForModel) -> Self {
        self.type_for_model = naming;
        self
    }

    pub fn enable_links(mut self, enabled: bool) -> Self {
        self.enable_links = enabled;
        self
    }

    pub fn pagination(mut self, pagination: PaginationDescriptor) -> Self {
        self.pagination = Some(pagination);
        self
    }

    pub fn query(mut self, query: Map<String, Value>) -> Self {
        self.query = query;
        self
    }

    pub fn meta(mut self, meta: Meta) -> Self {
        self.meta = Some(meta);
        self
    }

    pub fn output_virtuals(mut self, enabled: bool) -> Self {
        self.output_virtuals = Some(enabled);
        self
    }

    /// Parse options given as JSON
    ///
    /// Recognized keys: `attributes`, `relations`, `keyForAttr`,
    /// `typeForModel` (a lookup table), `enableLinks`, `pagination`, `query`,
    /// `meta`, `outputVirtuals`. Rules that are neither names nor patterns are
    /// rejected here, before any template is built.
    pub fn from_value(value: &Value) -> MapResult<Self> {
        let mut options = MapOptions::default();
        let Some(map) = value.as_object() else {
            return match value {
                Value::Null => Ok(options),
                other => Err(invalid("options", other)),
            };
        };

        if let Some(raw) = non_null(map.get("attributes")) {
            options.attributes = Some(AttributeFilter::try_from(raw)?);
        }
        if let Some(raw) = non_null(map.get("relations")) {
            options.relations = RelationFilter::try_from(raw)?;
        }
        if let Some(raw) = non_null(map.get("keyForAttr")) {
            let name = raw.as_str().ok_or_else(|| invalid("keyForAttr", raw))?;
            options.key_for_attribute = KeyForAttribute::from_name(name)?;
        }
        if let Some(raw) = non_null(map.get("typeForModel")) {
            let table = raw.as_object().ok_or_else(|| invalid("typeForModel", raw))?;
            let entries = table
                .iter()
                .map(|(k, v)| {
                    v.as_str()
                        .map(|v| (k.clone(), v.to_string()))
                        .ok_or_else(|| invalid("typeForModel", v))
                })
                .collect::<MapResult<Vec<_>>>()?;
            options.type_for_model = TypeForModel::table(entries);
        }
        if let Some(raw) = non_null(map.get("enableLinks")) {
            options.enable_links = raw.as_bool().ok_or_else(|| invalid("enableLinks", raw))?;
        }
        if let Some(raw) = non_null(map.get("pagination")) {
            options.pagination = Some(serde_json::from_value(raw.clone())?);
        }
        if let Some(raw) = non_null(map.get("query")) {
            options.query = raw
                .as_object()
                .cloned()
                .ok_or_else(|| invalid("query", raw))?;
        }
        if let Some(raw) = non_null(map.get("meta")) {
            let object = raw.as_object().ok_or_else(|| invalid("meta", raw))?;
            options.meta = Some(Meta::from_object(object));
        }
        if let Some(raw) = non_null(map.get("outputVirtuals")) {
            options.output_virtuals =
                Some(raw.as_bool().ok_or_else(|| invalid("outputVirtuals", raw))?);
        }

        Ok(options)
    }
}

fn non_null(value: Option<&Value>) -> Option<&Value> {
    value.filter(|v| !v.is_null())
}

fn invalid(what: &str, value: &Value) -> MapError {
    ConfigError::InvalidRule {
        rule: value.to_string(),
        message: format!("unexpected shape for {}", what),
    }
    .into()
}

fn string_list(what: &str, value: &Value) -> MapResult<Vec<String>> {
    let items = value.as_array().ok_or_else(|| invalid(what, value))?;
    items
        .iter()
        .map(|item| {
            item.as_str()
                .map(str::to_string)
                .ok_or_else(|| invalid(what, item))
        })
        .collect()
}

/// A bare list is an include list; an object may carry `omit` and `include`
impl TryFrom<&Value> for AttributeFilter {
    type Error = MapError;

    fn try_from(value: &Value) -> MapResult<Self> {
        let rules = |raw: Option<&Value>| -> MapResult<_> {
            match non_null(raw) {
                None => Ok(None),
                Some(Value::Array(items)) => matchers_from_values(items).map(Some),
                Some(other) => Err(invalid("attribute rules", other)),
            }
        };

        match value {
            Value::Array(items) => Ok(AttributeFilter {
                omit: None,
                include: Some(matchers_from_values(items)?),
            }),
            Value::Object(map) => Ok(AttributeFilter {
                omit: rules(map.get("omit"))?,
                include: rules(map.get("include"))?,
            }),
            other => Err(invalid("attributes", other)),
        }
    }
}

/// `true`/`false`, or `{ fields?: [..], included?: bool | [..] }`
impl TryFrom<&Value> for RelationFilter {
    type Error = MapError;

    fn try_from(value: &Value) -> MapResult<Self> {
        match value {
            Value::Bool(all) => Ok(RelationFilter::All(*all)),
            Value::Object(map) => {
                let fields = non_null(map.get("fields"))
                    .map(|raw| string_list("relations.fields", raw))
                    .transpose()?;
                let included = match non_null(map.get("included")) {
                    None => None,
                    Some(Value::Bool(all)) => Some(IncludedRule::All(*all)),
                    Some(raw) => Some(IncludedRule::Only(string_list("relations.included", raw)?)),
                };
                Ok(RelationFilter::Select { fields, included })
            }
            other => Err(invalid("relations", other)),
        }
    }
}
