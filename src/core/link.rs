//! Hyperlink values attached to templates
//!
//! The document serializer resolves links while it renders each resource, so
//! a link is either a fixed URL or a function of the resource being rendered.

use indexmap::IndexMap;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

/// Arguments passed to dynamic links while a document is rendered
///
/// - `record`: the primary data being serialized (a resource or the array)
/// - `current`: the resource the link belongs to
/// - `parent`: the resource holding the relationship, for relationship links
#[derive(Debug, Clone, Copy)]
pub struct LinkArgs<'a> {
    pub record: &'a Value,
    pub current: &'a Value,
    pub parent: Option<&'a Value>,
}

impl<'a> LinkArgs<'a> {
    /// Arguments for a link on the resource itself
    pub fn resource(resource: &'a Value) -> Self {
        Self {
            record: resource,
            current: resource,
            parent: None,
        }
    }

    /// Arguments for a link on a related resource of `parent`
    pub fn related(record: &'a Value, current: &'a Value, parent: &'a Value) -> Self {
        Self {
            record,
            current,
            parent: Some(parent),
        }
    }
}

type LinkFn = dyn Fn(&LinkArgs<'_>) -> String + Send + Sync;

/// A single link: fixed, or computed per rendered resource
#[derive(Clone)]
pub enum LinkValue {
    Static(String),
    Dynamic(Arc<LinkFn>),
}

impl LinkValue {
    pub fn dynamic<F>(f: F) -> Self
    where
        F: Fn(&LinkArgs<'_>) -> String + Send + Sync + 'static,
    {
        LinkValue::Dynamic(Arc::new(f))
    }

    /// Produce the URL for the given rendering context
    pub fn resolve(&self, args: &LinkArgs<'_>) -> String {
        match self {
            LinkValue::Static(url) => url.clone(),
            LinkValue::Dynamic(f) => f(args),
        }
    }

    pub fn as_static(&self) -> Option<&str> {
        match self {
            LinkValue::Static(url) => Some(url),
            LinkValue::Dynamic(_) => None,
        }
    }
}

impl fmt::Debug for LinkValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LinkValue::Static(url) => f.debug_tuple("Static").field(url).finish(),
            LinkValue::Dynamic(_) => f.write_str("Dynamic(<fn>)"),
        }
    }
}

impl From<&str> for LinkValue {
    fn from(url: &str) -> Self {
        LinkValue::Static(url.to_string())
    }
}

impl From<String> for LinkValue {
    fn from(url: String) -> Self {
        LinkValue::Static(url)
    }
}

/// Named links (`self`, `related`, `first`, ...) in insertion order
#[derive(Debug, Clone, Default)]
pub struct Links(IndexMap<String, LinkValue>);

impl Links {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a link
    pub fn with(mut self, name: impl Into<String>, link: impl Into<LinkValue>) -> Self {
        self.insert(name, link);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, link: impl Into<LinkValue>) {
        self.0.insert(name.into(), link.into());
    }

    /// Copy every link of `other` over this set
    pub fn extend(&mut self, other: Links) {
        self.0.extend(other.0);
    }

    pub fn get(&self, name: &str) -> Option<&LinkValue> {
        self.0.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Resolve one link for the given context
    pub fn resolve(&self, name: &str, args: &LinkArgs<'_>) -> Option<String> {
        self.0.get(name).map(|link| link.resolve(args))
    }

    /// Resolve every link into a JSON object
    pub fn resolve_all(&self, args: &LinkArgs<'_>) -> Value {
        Value::Object(
            self.0
                .iter()
                .map(|(name, link)| (name.clone(), Value::String(link.resolve(args))))
                .collect(),
        )
    }
}
