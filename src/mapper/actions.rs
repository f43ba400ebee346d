//! Hypermedia actions advertised in document meta
//!
//! An action tells clients which request they may send next (method, URL and
//! the form fields it accepts). Lists of actions are usually placed under
//! `meta.actions`.

use crate::links::url_concat;
use crate::template::MetaValue;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A form field of an action
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionField {
    pub name: String,

    #[serde(rename = "type")]
    pub field_type: String,

    /// Current value, when pre-filled
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,

    /// Extra options, written next to the other keys
    #[serde(flatten)]
    pub options: Map<String, Value>,
}

impl ActionField {
    pub fn new(name: impl Into<String>, field_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            field_type: field_type.into(),
            value: None,
            options: Map::new(),
        }
    }

    /// Pre-fill the field; `null` is kept as an explicit empty value
    pub fn with_value(mut self, value: impl Into<Value>) -> Self {
        self.value = Some(value.into());
        self
    }

    pub fn with_option(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.options.insert(name.into(), value.into());
        self
    }
}

/// A request clients may send
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Action {
    pub name: String,
    pub method: String,
    pub url: String,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<ActionField>,
}

impl Action {
    /// Action on `path`, resolved against `api_url` unless already absolute
    pub fn new(
        api_url: &str,
        method: impl Into<String>,
        name: impl Into<String>,
        path: &str,
    ) -> Self {
        let url = if path.starts_with("http") {
            path.to_string()
        } else {
            url_concat(&[api_url.trim_end_matches('/'), path.trim_start_matches('/')])
        };
        Self {
            name: name.into(),
            method: method.into(),
            url,
            fields: Vec::new(),
        }
    }

    pub fn with_field(mut self, field: ActionField) -> Self {
        self.fields.push(field);
        self
    }

    pub fn with_fields(mut self, fields: impl IntoIterator<Item = ActionField>) -> Self {
        self.fields.extend(fields);
        self
    }
}

impl From<Vec<Action>> for MetaValue {
    fn from(actions: Vec<Action>) -> Self {
        MetaValue::Static(serde_json::to_value(actions).unwrap_or(Value::Null))
    }
}

/// `{ value, label }` pairs for select-style fields
pub fn select_options<I, K, V>(entries: I) -> Value
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<Value>,
    V: Into<Value>,
{
    Value::Array(
        entries
            .into_iter()
            .map(|(value, label)| {
                let mut option = Map::new();
                option.insert("value".to_string(), value.into());
                option.insert("label".to_string(), label.into());
                Value::Object(option)
            })
            .collect(),
    )
}
