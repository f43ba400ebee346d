//! Typed error handling for the mapping engine
//!
//! The mapper itself is pure and almost total; the few things that can go
//! wrong are grouped by where they are detected.
//!
//! # Error Categories
//!
//! - [`ShapeError`]: malformed entity graphs (bad id attribute, id values
//!   that cannot be stringified)
//! - [`ConfigError`]: visibility rules or configuration files that cannot be
//!   compiled, rejected before any template is built
//! - [`MapError::Serializer`]: failures reported by the external document
//!   serializer, propagated untouched
//!
//! # Example
//!
//! ```rust,ignore
//! match mapper.map(&node, "widgets", &options, &serializer) {
//!     Ok(document) => send(document),
//!     Err(MapError::Shape(ShapeError::InvalidId { resource_type, .. })) => {
//!         eprintln!("{} carries an unusable id", resource_type);
//!     }
//!     Err(e) => eprintln!("mapping failed: {}", e),
//! }
//! ```

use serde::Serialize;
use std::fmt;

/// The main error type of the mapping engine
#[derive(Debug)]
pub enum MapError {
    /// The entity graph has a shape no document can be produced from
    Shape(ShapeError),

    /// Visibility rules or configuration are invalid
    Config(ConfigError),

    /// The external document serializer failed
    Serializer(String),
}

impl fmt::Display for MapError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MapError::Shape(e) => write!(f, "{}", e),
            MapError::Config(e) => write!(f, "{}", e),
            MapError::Serializer(msg) => write!(f, "Document serializer failed: {}", msg),
        }
    }
}

impl std::error::Error for MapError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            MapError::Shape(e) => Some(e),
            MapError::Config(e) => Some(e),
            MapError::Serializer(_) => None,
        }
    }
}

/// Error body suitable for returning to API clients
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error code for programmatic handling
    pub code: String,
    /// Human-readable error message
    pub message: String,
    /// Optional additional details
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl MapError {
    /// Get the error code for this error
    pub fn error_code(&self) -> &'static str {
        match self {
            MapError::Shape(e) => e.error_code(),
            MapError::Config(e) => e.error_code(),
            MapError::Serializer(_) => "SERIALIZER_ERROR",
        }
    }

    /// Convert to an error response
    pub fn to_response(&self) -> ErrorResponse {
        ErrorResponse {
            code: self.error_code().to_string(),
            message: self.to_string(),
            details: self.details(),
        }
    }

    fn details(&self) -> Option<serde_json::Value> {
        match self {
            MapError::Shape(ShapeError::InvalidId {
                resource_type,
                found,
            }) => Some(serde_json::json!({
                "resource_type": resource_type,
                "found": found,
            })),
            MapError::Config(ConfigError::InvalidRule { rule, .. }) => {
                Some(serde_json::json!({ "rule": rule }))
            }
            MapError::Config(ConfigError::InvalidPattern { pattern, .. }) => {
                Some(serde_json::json!({ "pattern": pattern }))
            }
            _ => None,
        }
    }
}

#[cfg(feature = "axum")]
impl axum::response::IntoResponse for MapError {
    fn into_response(self) -> axum::response::Response {
        let body = axum::Json(self.to_response());
        (axum::http::StatusCode::INTERNAL_SERVER_ERROR, body).into_response()
    }
}

// =============================================================================
// Shape Errors
// =============================================================================

/// Errors caused by entity graphs that cannot be mapped
#[derive(Debug)]
pub enum ShapeError {
    /// `idAttribute` is neither a string nor a list of strings
    InvalidIdAttribute { found: String },

    /// The id (or one of the composite id parts) is an object or an array
    InvalidId {
        resource_type: String,
        found: String,
    },

    /// A collection member is not an entity
    InvalidMember { index: usize, found: String },
}

impl fmt::Display for ShapeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShapeError::InvalidIdAttribute { found } => {
                write!(
                    f,
                    "idAttribute must be a string or a list of strings, found {}",
                    found
                )
            }
            ShapeError::InvalidId {
                resource_type,
                found,
            } => {
                write!(
                    f,
                    "Cannot derive a string id for {} from {}",
                    resource_type, found
                )
            }
            ShapeError::InvalidMember { index, found } => {
                write!(f, "Collection member {} is not an entity: {}", index, found)
            }
        }
    }
}

impl std::error::Error for ShapeError {}

impl ShapeError {
    pub fn error_code(&self) -> &'static str {
        match self {
            ShapeError::InvalidIdAttribute { .. } => "INVALID_ID_ATTRIBUTE",
            ShapeError::InvalidId { .. } => "INVALID_ID",
            ShapeError::InvalidMember { .. } => "INVALID_COLLECTION_MEMBER",
        }
    }
}

impl From<ShapeError> for MapError {
    fn from(err: ShapeError) -> Self {
        MapError::Shape(err)
    }
}

// =============================================================================
// Config Errors
// =============================================================================

/// Errors related to visibility rules and configuration files
#[derive(Debug)]
pub enum ConfigError {
    /// A rule is neither an exact name nor a pattern
    InvalidRule { rule: String, message: String },

    /// A pattern rule does not compile
    InvalidPattern { pattern: String, message: String },

    /// Failed to parse a configuration document
    ParseError { message: String },

    /// Failed to read a configuration file
    IoError { message: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidRule { rule, message } => {
                write!(f, "Invalid visibility rule {}: {}", rule, message)
            }
            ConfigError::InvalidPattern { pattern, message } => {
                write!(f, "Invalid pattern '{}': {}", pattern, message)
            }
            ConfigError::ParseError { message } => {
                write!(f, "Failed to parse configuration: {}", message)
            }
            ConfigError::IoError { message } => {
                write!(f, "Failed to read configuration: {}", message)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

impl ConfigError {
    pub fn error_code(&self) -> &'static str {
        match self {
            ConfigError::InvalidRule { .. } => "INVALID_RULE",
            ConfigError::InvalidPattern { .. } => "INVALID_PATTERN",
            ConfigError::ParseError { .. } => "CONFIG_PARSE_ERROR",
            ConfigError::IoError { .. } => "CONFIG_IO_ERROR",
        }
    }
}

impl From<ConfigError> for MapError {
    fn from(err: ConfigError) -> Self {
        MapError::Config(err)
    }
}

// =============================================================================
// Conversions from external error types
// =============================================================================

impl From<serde_json::Error> for MapError {
    fn from(err: serde_json::Error) -> Self {
        MapError::Config(ConfigError::ParseError {
            message: err.to_string(),
        })
    }
}

impl From<serde_yaml::Error> for MapError {
    fn from(err: serde_yaml::Error) -> Self {
        MapError::Config(ConfigError::ParseError {
            message: err.to_string(),
        })
    }
}

impl From<std::io::Error> for MapError {
    fn from(err: std::io::Error) -> Self {
        MapError::Config(ConfigError::IoError {
            message: err.to_string(),
        })
    }
}

/// Serializer implementations report failures through `anyhow`
impl From<anyhow::Error> for MapError {
    fn from(err: anyhow::Error) -> Self {
        MapError::Serializer(format!("{:#}", err))
    }
}

/// A specialized Result type for mapping operations
pub type MapResult<T> = Result<T, MapError>;
