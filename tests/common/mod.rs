//! Shared harness for mapper integration tests
//!
//! Provides a `RecordingSerializer` that captures the `(type, template, json)`
//! triple handed to the document serializer, a small JSON:API renderer built
//! on the captured template, and graph fixtures.
//!
//! # Usage
//!
//! From any integration test file in `tests/`:
//! ```rust,ignore
//! mod common;
//! use common::*;
//! ```

#![allow(dead_code)]

use jsonapi::prelude::*;
use std::sync::{Arc, Mutex, Once};

pub const BASE: &str = "https://api.test";

static TRACING: Once = Once::new();

/// Install a test subscriber once; filter with `RUST_LOG`
pub fn init_tracing() {
    TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

/// One call received by the serializer
#[derive(Debug, Clone)]
pub struct Call {
    pub resource_type: String,
    pub template: Template,
    pub json: Value,
}

/// Captures every call and renders a minimal document
#[derive(Debug, Clone, Default)]
pub struct RecordingSerializer {
    calls: Arc<Mutex<Vec<Call>>>,
}

impl RecordingSerializer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last(&self) -> Call {
        self.calls
            .lock()
            .unwrap()
            .last()
            .cloned()
            .expect("serializer was not called")
    }

    pub fn count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

impl DocumentSerializer for RecordingSerializer {
    fn serialize(
        &self,
        resource_type: &str,
        template: &Template,
        json: &Value,
    ) -> anyhow::Result<Value> {
        self.calls.lock().unwrap().push(Call {
            resource_type: resource_type.to_string(),
            template: template.clone(),
            json: json.clone(),
        });
        Ok(render(resource_type, template, json))
    }
}

/// Render a compound document the way a JSON:API serializer reads the
/// template: attributes, relationships by reference, embedded resources in
/// `included`, links and meta resolved against each resource
pub fn render(resource_type: &str, template: &Template, json: &Value) -> Value {
    let mut included = Vec::new();
    let data = match json {
        Value::Array(items) => Value::Array(
            items
                .iter()
                .map(|item| resource(resource_type, template, item, json, &mut included))
                .collect(),
        ),
        Value::Null => Value::Null,
        item => resource(resource_type, template, item, json, &mut included),
    };

    let mut document = serde_json::Map::new();
    if let Some(links) = &template.top_level_links {
        document.insert("links".into(), links.resolve_all(&LinkArgs::resource(json)));
    }
    document.insert("data".into(), data);
    if !included.is_empty() {
        document.insert("included".into(), Value::Array(included));
    }
    if let Some(meta) = &template.meta {
        document.insert("meta".into(), meta.resolve(json));
    }
    Value::Object(document)
}

fn resource(
    resource_type: &str,
    template: &Template,
    item: &Value,
    record: &Value,
    included: &mut Vec<Value>,
) -> Value {
    let mut attributes = serde_json::Map::new();
    let mut relationships = serde_json::Map::new();

    for name in &template.attributes {
        match template.relation(name) {
            Some(sub) => {
                let related = item.get(name).cloned().unwrap_or(Value::Null);
                let related_type = template.type_for(name);
                let identifier = |value: &Value| {
                    json!({ "type": related_type, "id": value.get("id").cloned().unwrap_or(Value::Null) })
                };
                let data = match &related {
                    Value::Array(items) => Value::Array(items.iter().map(identifier).collect()),
                    Value::Null => Value::Null,
                    value => identifier(value),
                };

                let mut relationship = serde_json::Map::new();
                if let Some(links) = &sub.relationship_links {
                    relationship.insert(
                        "links".into(),
                        links.resolve_all(&LinkArgs::related(record, &related, item)),
                    );
                }
                relationship.insert("data".into(), data);
                relationships.insert(template.key_for(name), Value::Object(relationship));

                if sub.is_included() {
                    let members = match &related {
                        Value::Array(items) => items.clone(),
                        Value::Null => Vec::new(),
                        value => vec![value.clone()],
                    };
                    for member in members {
                        let mut embedded = resource(&related_type, sub, &member, record, included);
                        if let Some(links) = &sub.included_links {
                            embedded["links"] =
                                links.resolve_all(&LinkArgs::related(record, &member, item));
                        }
                        included.push(embedded);
                    }
                }
            }
            None => {
                if let Some(value) = item.get(name) {
                    attributes.insert(template.key_for(name), value.clone());
                }
            }
        }
    }

    let mut out = serde_json::Map::new();
    out.insert("type".into(), json!(resource_type));
    out.insert("id".into(), item.get("id").cloned().unwrap_or(Value::Null));
    out.insert("attributes".into(), Value::Object(attributes));
    if !relationships.is_empty() {
        out.insert("relationships".into(), Value::Object(relationships));
    }
    if let Some(links) = &template.data_links {
        out.insert("links".into(), links.resolve_all(&LinkArgs::resource(item)));
    }
    if let Some(meta) = &template.data_meta {
        out.insert("meta".into(), meta.resolve(item));
    }
    Value::Object(out)
}

/// A widget owned by a user, tagged twice
pub fn widget(id: u64) -> Entity {
    Entity::new(id)
        .attr("name", format!("widget {}", id))
        .attr("password", "hunter2")
        .relation(
            "owner",
            Entity::new(100 + id).attr("email", format!("owner{}@example.com", id)),
        )
        .relation(
            "tags",
            vec![
                Entity::new(1).attr("label", "red"),
                Entity::new(2).attr("label", "blue"),
            ],
        )
}

pub fn mapper() -> (Mapper<RecordingSerializer>, RecordingSerializer) {
    init_tracing();
    let serializer = RecordingSerializer::new();
    (Mapper::new(BASE, serializer.clone()), serializer)
}
