//! Key and type naming rules

use crate::core::error::{ConfigError, MapResult};
use crate::core::pluralize::Pluralizer;
use convert_case::{Case, Casing};
use indexmap::IndexMap;
use std::fmt;
use std::sync::Arc;

type NameFn = dyn Fn(&str) -> String + Send + Sync;

/// How attribute keys are written in the document
#[derive(Clone, Default)]
pub enum KeyForAttribute {
    /// Keys are written as stored
    #[default]
    Identity,
    CamelCase,
    DashCase,
    SnakeCase,
    Custom(Arc<NameFn>),
}

impl KeyForAttribute {
    pub fn custom<F>(f: F) -> Self
    where
        F: Fn(&str) -> String + Send + Sync + 'static,
    {
        KeyForAttribute::Custom(Arc::new(f))
    }

    /// Parse a case name as used in configuration files
    pub fn from_name(name: &str) -> MapResult<Self> {
        match name {
            "identity" | "none" => Ok(KeyForAttribute::Identity),
            "camelCase" | "camel" => Ok(KeyForAttribute::CamelCase),
            "dash-case" | "kebab-case" | "kebab" | "dash" => Ok(KeyForAttribute::DashCase),
            "snake_case" | "underscore_case" | "snake" => Ok(KeyForAttribute::SnakeCase),
            other => Err(ConfigError::InvalidRule {
                rule: other.to_string(),
                message: "unknown key case".to_string(),
            }
            .into()),
        }
    }

    pub fn apply(&self, key: &str) -> String {
        match self {
            KeyForAttribute::Identity => key.to_string(),
            KeyForAttribute::CamelCase => key.to_case(Case::Camel),
            KeyForAttribute::DashCase => key.to_case(Case::Kebab),
            KeyForAttribute::SnakeCase => key.to_case(Case::Snake),
            KeyForAttribute::Custom(f) => f(key),
        }
    }
}

impl fmt::Debug for KeyForAttribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeyForAttribute::Identity => f.write_str("Identity"),
            KeyForAttribute::CamelCase => f.write_str("CamelCase"),
            KeyForAttribute::DashCase => f.write_str("DashCase"),
            KeyForAttribute::SnakeCase => f.write_str("SnakeCase"),
            KeyForAttribute::Custom(_) => f.write_str("Custom(<fn>)"),
        }
    }
}

/// How the resource type of a relation is named
#[derive(Clone, Default)]
pub enum TypeForModel {
    /// Pluralized relation name
    #[default]
    Pluralize,

    /// Lookup table, falling back to the pluralized name
    Table(IndexMap<String, String>),

    Custom(Arc<NameFn>),
}

impl TypeForModel {
    pub fn custom<F>(f: F) -> Self
    where
        F: Fn(&str) -> String + Send + Sync + 'static,
    {
        TypeForModel::Custom(Arc::new(f))
    }

    pub fn table<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        TypeForModel::Table(
            entries
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    /// Resource type for a relation (or attribute) name
    pub fn resolve(&self, attribute: &str) -> String {
        match self {
            TypeForModel::Pluralize => Pluralizer::pluralize(attribute),
            TypeForModel::Table(table) => table
                .get(attribute)
                .filter(|t| !t.is_empty())
                .cloned()
                .unwrap_or_else(|| Pluralizer::pluralize(attribute)),
            TypeForModel::Custom(f) => f(attribute),
        }
    }
}

impl fmt::Debug for TypeForModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeForModel::Pluralize => f.write_str("Pluralize"),
            TypeForModel::Table(table) => f.debug_tuple("Table").field(table).finish(),
            TypeForModel::Custom(_) => f.write_str("Custom(<fn>)"),
        }
    }
}
