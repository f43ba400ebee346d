//! Tests for the typed error handling system
//!
//! These tests verify that:
//! - Malformed graphs surface as shape errors from normalization
//! - Invalid rules are rejected before any template is built
//! - Serializer failures propagate untouched
//! - Error responses are properly formatted

mod common;

use common::*;
use jsonapi::prelude::*;

struct FailingSerializer;

impl DocumentSerializer for FailingSerializer {
    fn serialize(&self, resource_type: &str, _: &Template, _: &Value) -> anyhow::Result<Value> {
        Err(anyhow::anyhow!("template refused").context(format!("rendering {}", resource_type)))
    }
}

// =============================================================================
// Shape Errors
// =============================================================================

mod shape_error_tests {
    use super::*;

    #[test]
    fn test_structured_id_is_rejected() {
        let (mapper, recorder) = mapper();
        let node = Node::from(Entity::new(json!({ "a": 1 })));

        let err = mapper.map(&node, "widgets", &MapOptions::default()).unwrap_err();
        assert!(matches!(
            err,
            MapError::Shape(ShapeError::InvalidId { ref resource_type, .. }) if resource_type == "widgets"
        ));
        assert_eq!(recorder.count(), 0);
    }

    #[test]
    fn test_nested_structured_id_names_the_relation() {
        let (mapper, _) = mapper();
        let node = Node::from(Entity::new(1).relation("owner", Entity::new(json!([1, 2]))));

        let err = mapper.map(&node, "widgets", &MapOptions::default()).unwrap_err();
        match err {
            MapError::Shape(ShapeError::InvalidId { resource_type, found }) => {
                assert_eq!(resource_type, "owner");
                assert_eq!(found, "[1,2]");
            }
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn test_missing_id_is_not_an_error() {
        let (mapper, recorder) = mapper();
        let node = Node::from(Entity::anonymous().attr("name", "draft"));

        mapper.map(&node, "widgets", &MapOptions::default()).unwrap();
        assert_eq!(recorder.last().json["id"], json!(""));
    }

    #[test]
    fn test_invalid_id_attribute_in_json() {
        let (mapper, _) = mapper();
        let err = mapper
            .map_value(&json!({ "idAttribute": 3, "attributes": {} }), "widgets", &Value::Null)
            .unwrap_err();
        assert_eq!(err.error_code(), "INVALID_ID_ATTRIBUTE");
    }

    #[test]
    fn test_non_entity_collection_member() {
        let (mapper, _) = mapper();
        let err = mapper
            .map_value(&json!({ "models": [{ "attributes": {} }, 4] }), "widgets", &Value::Null)
            .unwrap_err();
        assert!(matches!(
            err,
            MapError::Shape(ShapeError::InvalidMember { index: 1, .. })
        ));
    }
}

// =============================================================================
// Config Errors
// =============================================================================

mod config_error_tests {
    use super::*;

    #[test]
    fn test_unrecognized_rule_is_rejected_before_mapping() {
        let (mapper, recorder) = mapper();
        let err = mapper
            .map_value(
                &json!({ "attributes": { "id": 1 } }),
                "widgets",
                &json!({ "attributes": { "omit": [42] } }),
            )
            .unwrap_err();

        assert_eq!(err.error_code(), "INVALID_RULE");
        assert_eq!(recorder.count(), 0);
    }

    #[test]
    fn test_bad_pattern() {
        let err = Matcher::pattern("[a-").unwrap_err();
        assert!(matches!(err, MapError::Config(ConfigError::InvalidPattern { .. })));
        assert!(err.to_string().contains("[a-"));

        let response = serde_json::to_value(err.to_response()).unwrap();
        assert_eq!(response["code"], json!("INVALID_PATTERN"));
        assert_eq!(response["details"], json!({ "pattern": "[a-" }));
    }

    #[test]
    fn test_bad_pagination_shape() {
        let err = MapOptions::from_value(&json!({ "pagination": { "offset": "ten" } })).unwrap_err();
        assert_eq!(err.error_code(), "CONFIG_PARSE_ERROR");
    }
}

// =============================================================================
// Serializer Errors
// =============================================================================

mod serializer_error_tests {
    use super::*;

    #[test]
    fn test_serializer_failure_keeps_context() {
        init_tracing();
        let mapper = Mapper::new(BASE, FailingSerializer);
        let err = mapper
            .map(&Node::from(Entity::new(1)), "widgets", &MapOptions::default())
            .unwrap_err();

        assert_eq!(err.error_code(), "SERIALIZER_ERROR");
        assert!(err.to_string().contains("rendering widgets"));
        assert!(err.to_string().contains("template refused"));
    }
}

// =============================================================================
// Error Response Tests
// =============================================================================

mod response_tests {
    use super::*;

    #[test]
    fn test_shape_error_response() {
        let err = MapError::Shape(ShapeError::InvalidId {
            resource_type: "widgets".to_string(),
            found: "{}".to_string(),
        });
        let response = serde_json::to_value(err.to_response()).unwrap();
        assert_eq!(response["code"], json!("INVALID_ID"));
        assert_eq!(
            response["details"],
            json!({ "resource_type": "widgets", "found": "{}" })
        );
    }

    #[test]
    fn test_response_without_details_omits_key() {
        let err = MapError::Serializer("boom".to_string());
        let response = serde_json::to_value(err.to_response()).unwrap();
        assert_eq!(response["code"], json!("SERIALIZER_ERROR"));
        assert!(response.get("details").is_none());
    }

    #[test]
    fn test_error_source() {
        use std::error::Error;

        let err = MapError::Config(ConfigError::ParseError {
            message: "bad".to_string(),
        });
        assert!(err.source().is_some());
        assert!(MapError::Serializer("x".to_string()).source().is_none());
    }
}
