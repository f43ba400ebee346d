//! Entity graph supplied by the persistence layer
//!
//! The mapper never fetches anything itself: callers hand over an already
//! loaded [`Node`], either built directly with the [`Entity`] builder or
//! decoded from the ORM's JSON shape with [`Node::from_value`].

use crate::core::error::{MapResult, ShapeError};
use indexmap::IndexMap;
use serde_json::{Map, Value};

/// Name of the default identifier attribute
pub const DEFAULT_ID_ATTRIBUTE: &str = "id";

/// Identifier attribute of an entity, possibly composite
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IdAttribute {
    /// A single attribute holds the id (e.g. "id", "uuid")
    Single(String),

    /// The id is the ordered combination of several attributes
    Composite(Vec<String>),
}

impl Default for IdAttribute {
    fn default() -> Self {
        IdAttribute::Single(DEFAULT_ID_ATTRIBUTE.to_string())
    }
}

impl IdAttribute {
    /// Names of every attribute taking part in the id
    pub fn names(&self) -> Vec<String> {
        match self {
            IdAttribute::Single(name) => vec![name.clone()],
            IdAttribute::Composite(names) => names.clone(),
        }
    }

    pub fn is_composite(&self) -> bool {
        matches!(self, IdAttribute::Composite(_))
    }

    fn from_value(value: &Value) -> MapResult<Self> {
        match value {
            Value::String(name) => Ok(IdAttribute::Single(name.clone())),
            Value::Array(parts) => parts
                .iter()
                .map(|part| match part {
                    Value::String(name) => Ok(name.clone()),
                    other => Err(ShapeError::InvalidIdAttribute {
                        found: other.to_string(),
                    }
                    .into()),
                })
                .collect::<MapResult<Vec<_>>>()
                .map(IdAttribute::Composite),
            other => Err(ShapeError::InvalidIdAttribute {
                found: other.to_string(),
            }
            .into()),
        }
    }
}

/// A single addressable record: id, attributes, and loaded relations
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Entity {
    /// Which attribute(s) identify the entity
    pub id_attribute: IdAttribute,

    /// Explicit id, used when no attribute carries it
    pub id: Option<Value>,

    /// Plain attributes, in declaration order
    pub attributes: IndexMap<String, Value>,

    /// Computed attributes, only output when virtuals are enabled
    pub virtuals: IndexMap<String, Value>,

    /// Whether this entity outputs its virtuals by default
    pub output_virtuals: bool,

    /// Loaded relations, in load order
    pub relations: IndexMap<String, Node>,
}

impl Entity {
    /// Create an entity whose `id` attribute holds `id`
    pub fn new(id: impl Into<Value>) -> Self {
        let mut entity = Self::default();
        entity
            .attributes
            .insert(DEFAULT_ID_ATTRIBUTE.to_string(), id.into());
        entity
    }

    /// Create an entity without any id (e.g. not persisted yet)
    pub fn anonymous() -> Self {
        Self::default()
    }

    /// Add or replace an attribute
    pub fn attr(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    /// Add or replace a virtual attribute
    pub fn virtual_attr(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.virtuals.insert(name.into(), value.into());
        self
    }

    /// Toggle virtual output for this entity
    pub fn with_output_virtuals(mut self, enabled: bool) -> Self {
        self.output_virtuals = enabled;
        self
    }

    /// Use a named attribute (other than "id") as the identifier
    pub fn id_attribute(mut self, name: impl Into<String>) -> Self {
        self.id_attribute = IdAttribute::Single(name.into());
        self
    }

    /// Use an ordered list of attributes as a composite identifier
    pub fn composite_id<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.id_attribute = IdAttribute::Composite(names.into_iter().map(Into::into).collect());
        self
    }

    /// Attach a related entity or collection
    pub fn relation(mut self, name: impl Into<String>, node: impl Into<Node>) -> Self {
        self.relations.insert(name.into(), node.into());
        self
    }

    /// The raw id value: the id attribute when single, else the explicit id
    pub fn id_value(&self) -> Option<&Value> {
        match &self.id_attribute {
            IdAttribute::Single(name) => self.attributes.get(name).or(self.id.as_ref()),
            IdAttribute::Composite(_) => self.id.as_ref(),
        }
    }
}

/// A value of the entity graph, classified once at the boundary
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Node {
    /// A single entity
    Entity(Box<Entity>),

    /// An ordered page of entities of one resource type
    Collection(Vec<Entity>),

    /// Nothing was loaded
    #[default]
    Empty,
}

impl From<Entity> for Node {
    fn from(entity: Entity) -> Self {
        Node::Entity(Box::new(entity))
    }
}

impl From<Vec<Entity>> for Node {
    fn from(entities: Vec<Entity>) -> Self {
        Node::Collection(entities)
    }
}

impl<T: Into<Node>> From<Option<T>> for Node {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(Node::Empty)
    }
}

/// What an input value represents
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    Entity,
    Collection,
    Empty,
}

/// Property under which collections expose their members
const MODELS_KEY: &str = "models";

/// Decide what a JSON value supplied by the persistence layer represents
///
/// Objects exposing a `models` list are collections, every other object is an
/// entity. `null` and scalars are empty.
pub fn classify(value: &Value) -> Kind {
    match value {
        Value::Object(map) => match map.get(MODELS_KEY) {
            Some(Value::Array(_)) => Kind::Collection,
            _ => Kind::Entity,
        },
        Value::Array(_) => Kind::Collection,
        _ => Kind::Empty,
    }
}

impl Node {
    pub fn kind(&self) -> Kind {
        match self {
            Node::Entity(_) => Kind::Entity,
            Node::Collection(_) => Kind::Collection,
            Node::Empty => Kind::Empty,
        }
    }

    /// Build a node from the persistence layer's JSON shape
    ///
    /// Entities look like
    /// `{ "idAttribute": "id", "attributes": {..}, "relations": {..} }`, with
    /// optional `id`, `virtuals` and `outputVirtuals`. Collections are
    /// `{ "models": [..] }` or a bare array.
    pub fn from_value(value: &Value) -> MapResult<Node> {
        match classify(value) {
            Kind::Empty => Ok(Node::Empty),
            Kind::Entity => Ok(Node::from(entity_from_value(value)?)),
            Kind::Collection => {
                let members = match value {
                    Value::Array(items) => items,
                    Value::Object(map) => match map.get(MODELS_KEY) {
                        Some(Value::Array(items)) => items,
                        _ => return Ok(Node::Collection(Vec::new())),
                    },
                    _ => return Ok(Node::Collection(Vec::new())),
                };
                members
                    .iter()
                    .enumerate()
                    .map(|(index, member)| match classify(member) {
                        Kind::Entity => entity_from_value(member),
                        _ => Err(ShapeError::InvalidMember {
                            index,
                            found: member.to_string(),
                        }
                        .into()),
                    })
                    .collect::<MapResult<Vec<_>>>()
                    .map(Node::Collection)
            }
        }
    }
}

fn entity_from_value(value: &Value) -> MapResult<Entity> {
    let empty = Map::new();
    let map = value.as_object().unwrap_or(&empty);

    let id_attribute = match map.get("idAttribute") {
        None | Some(Value::Null) => IdAttribute::default(),
        Some(raw) => IdAttribute::from_value(raw)?,
    };

    let object_entries = |key: &str| -> IndexMap<String, Value> {
        map.get(key)
            .and_then(Value::as_object)
            .map(|o| o.iter().map(|(k, v)| (k.clone(), v.clone())).collect())
            .unwrap_or_default()
    };

    let mut relations = IndexMap::new();
    if let Some(Value::Object(raw)) = map.get("relations") {
        for (name, related) in raw {
            relations.insert(name.clone(), Node::from_value(related)?);
        }
    }

    Ok(Entity {
        id_attribute,
        id: map.get("id").filter(|v| !v.is_null()).cloned(),
        attributes: object_entries("attributes"),
        virtuals: object_entries("virtuals"),
        output_virtuals: map
            .get("outputVirtuals")
            .and_then(Value::as_bool)
            .unwrap_or(false),
        relations,
    })
}
