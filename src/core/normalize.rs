//! Conversion of entity graphs into plain JSON trees
//!
//! The normalized tree mirrors the graph one to one: every entity becomes an
//! object holding its attributes, a string `id`, and its relations normalized
//! recursively. Filtering is left to the template.

use crate::core::error::{MapResult, ShapeError};
use crate::core::node::{Entity, IdAttribute, Node};
use serde_json::{Map, Value};

/// Key under which every normalized entity carries its id
pub const ID_KEY: &str = "id";

/// Normalize a node
///
/// `resource_type` names the root for error reporting; nested entities are
/// reported under their relation name. `output_virtuals` overrides each
/// entity's own virtual output setting when given.
pub fn to_json(node: &Node, resource_type: &str, output_virtuals: Option<bool>) -> MapResult<Value> {
    match node {
        Node::Entity(entity) => entity_to_json(entity, resource_type, output_virtuals),
        Node::Collection(entities) => entities
            .iter()
            .map(|entity| entity_to_json(entity, resource_type, output_virtuals))
            .collect::<MapResult<Vec<_>>>()
            .map(Value::Array),
        Node::Empty => Ok(Value::Null),
    }
}

fn entity_to_json(
    entity: &Entity,
    resource_type: &str,
    output_virtuals: Option<bool>,
) -> MapResult<Value> {
    let mut json: Map<String, Value> = entity
        .attributes
        .iter()
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect();

    if output_virtuals.unwrap_or(entity.output_virtuals) {
        for (name, value) in &entity.virtuals {
            json.insert(name.clone(), value.clone());
        }
    }

    if !json.contains_key(ID_KEY) {
        let id = match &entity.id_attribute {
            IdAttribute::Composite(parts) => Value::String(
                parts
                    .iter()
                    .map(|part| {
                        stringify_id(
                            entity.attributes.get(part).unwrap_or(&Value::Null),
                            resource_type,
                        )
                    })
                    .collect::<MapResult<Vec<_>>>()?
                    .join(","),
            ),
            IdAttribute::Single(_) => entity.id_value().cloned().unwrap_or(Value::Null),
        };
        json.insert(ID_KEY.to_string(), id);
    }

    let id = json.get(ID_KEY).cloned().unwrap_or(Value::Null);
    json.insert(ID_KEY.to_string(), Value::String(stringify_id(&id, resource_type)?));

    for (name, related) in &entity.relations {
        json.insert(name.clone(), to_json(related, name, output_virtuals)?);
    }

    Ok(Value::Object(json))
}

/// String form of an id value; structured values cannot be ids
fn stringify_id(value: &Value, resource_type: &str) -> MapResult<String> {
    match value {
        Value::String(s) => Ok(s.clone()),
        Value::Number(n) => Ok(n.to_string()),
        Value::Bool(b) => Ok(b.to_string()),
        Value::Null => {
            tracing::debug!(resource_type = %resource_type, "entity has no id, using an empty one");
            Ok(String::new())
        }
        Value::Array(_) | Value::Object(_) => Err(ShapeError::InvalidId {
            resource_type: resource_type.to_string(),
            found: value.to_string(),
        }
        .into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_entity_id_is_stringified() {
        let node = Node::from(Entity::new(1).attr("name", "x"));
        assert_eq!(
            to_json(&node, "widgets", None).unwrap(),
            json!({ "id": "1", "name": "x" })
        );
    }

    #[test]
    fn test_composite_id() {
        let node = Node::from(
            Entity::anonymous()
                .composite_id(["org_id", "seq"])
                .attr("org_id", 7)
                .attr("seq", 3),
        );
        let json = to_json(&node, "memberships", None).unwrap();
        assert_eq!(json["id"], json!("7,3"));
        assert_eq!(json["org_id"], json!(7));
    }

    #[test]
    fn test_custom_id_attribute() {
        let node = Node::from(Entity::anonymous().id_attribute("uuid").attr("uuid", "abc"));
        let json = to_json(&node, "users", None).unwrap();
        assert_eq!(json, json!({ "uuid": "abc", "id": "abc" }));
    }

    #[test]
    fn test_explicit_id_field() {
        let mut entity = Entity::anonymous().attr("name", "n");
        entity.id = Some(json!(12));
        let json = to_json(&Node::from(entity), "users", None).unwrap();
        assert_eq!(json["id"], json!("12"));
    }

    #[test]
    fn test_relations_are_normalized_recursively() {
        let node = Node::from(
            Entity::new(1)
                .relation("owner", Entity::new(2).relation("company", Entity::new(3)))
                .relation("tags", vec![Entity::new(4), Entity::new(5)])
                .relation("editor", Node::Empty),
        );
        let json = to_json(&node, "widgets", None).unwrap();
        assert_eq!(
            json,
            json!({
                "id": "1",
                "owner": { "id": "2", "company": { "id": "3" } },
                "tags": [{ "id": "4" }, { "id": "5" }],
                "editor": null
            })
        );
    }

    #[test]
    fn test_collection_preserves_order() {
        let node = Node::from(vec![Entity::new(3), Entity::new(1), Entity::new(2)]);
        let json = to_json(&node, "widgets", None).unwrap();
        assert_eq!(json, json!([{ "id": "3" }, { "id": "1" }, { "id": "2" }]));
    }

    #[test]
    fn test_empty() {
        assert_eq!(to_json(&Node::Empty, "widgets", None).unwrap(), Value::Null);
        assert_eq!(
            to_json(&Node::Collection(Vec::new()), "widgets", None).unwrap(),
            json!([])
        );
    }

    #[test]
    fn test_virtuals() {
        let entity = Entity::new(1).virtual_attr("full_name", "A B");
        let node = Node::from(entity.clone());
        assert_eq!(to_json(&node, "users", None).unwrap(), json!({ "id": "1" }));
        assert_eq!(
            to_json(&node, "users", Some(true)).unwrap(),
            json!({ "id": "1", "full_name": "A B" })
        );

        let node = Node::from(entity.with_output_virtuals(true));
        assert_eq!(
            to_json(&node, "users", None).unwrap()["full_name"],
            json!("A B")
        );
        assert_eq!(to_json(&node, "users", Some(false)).unwrap(), json!({ "id": "1" }));
    }

    #[test]
    fn test_structured_id_is_a_shape_error() {
        let node = Node::from(Entity::new(json!({ "nested": true })));
        let err = to_json(&node, "widgets", None).unwrap_err();
        assert_eq!(err.error_code(), "INVALID_ID");

        let node = Node::from(Entity::new(1).relation("owner", Entity::new(json!([1, 2]))));
        let err = to_json(&node, "widgets", None).unwrap_err();
        assert!(err.to_string().contains("owner"));
    }
}
