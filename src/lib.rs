//! # This-RS JSON:API Mapper
//!
//! Maps in-memory resource graphs (entities, collections and their loaded
//! relations) into JSON:API documents.
//!
//! ## Features
//!
//! - **Shape Sampling**: One template per graph, built from the union of every
//!   member's attributes and relations
//! - **Visibility Rules**: Exact or anchored-pattern attribute rules, omit wins
//!   over include
//! - **Compound Documents**: Choose which relations are walked, and which of
//!   those are embedded in `included`
//! - **Links**: Collection, resource, relationship and pagination links
//! - **Auto-Pluralization**: Resource types from relation names (owner → owners)
//! - **Configuration-Based**: Default rules loaded from YAML
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use jsonapi::prelude::*;
//!
//! let widget = Entity::new(1)
//!     .attr("name", "x")
//!     .relation("owner", Entity::new(9).attr("email", "a@example.com"));
//!
//! let mapper = Mapper::new("https://api.example.com", MySerializer);
//! let options = MapOptions::default().relations(
//!     RelationFilter::fields(["owner"]).with_included(IncludedRule::All(true)),
//! );
//! let document = mapper.map(&Node::from(widget), "widgets", &options)?;
//! ```

pub mod config;
pub mod core;
pub mod links;
pub mod mapper;
pub mod template;

/// Re-exports of commonly used types and traits
pub mod prelude {
    // === Graph model ===
    pub use crate::core::{
        node::{Entity, IdAttribute, Kind, Node, classify},
        pluralize::Pluralizer,
        query::{PaginationDescriptor, PaginationMeta},
        sample::{Sample, sample},
    };

    // === Rules ===
    pub use crate::core::filter::{AttributeFilter, IncludedRule, Matcher, RelationFilter};

    // === Links ===
    pub use crate::core::link::{LinkArgs, LinkValue, Links};
    pub use crate::links::LinkOptions;

    // === Templates ===
    pub use crate::template::{
        KeyForAttribute, Meta, MetaValue, Template, TemplateOverrides, TypeForModel,
        build_template,
    };

    // === Mapping ===
    pub use crate::mapper::{
        Action, ActionField, Document, DocumentSerializer, MapOptions, Mapper,
        ResourceSerializer,
    };

    // === Config ===
    pub use crate::config::MapperConfig;

    // === Errors ===
    pub use crate::core::error::{ConfigError, MapError, MapResult, ShapeError};

    // === External dependencies ===
    pub use serde::{Deserialize, Serialize};
    pub use serde_json::{Value, json};
}
