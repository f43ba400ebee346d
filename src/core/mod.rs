//! Core module containing the entity graph model and the mapping primitives

pub mod error;
pub mod filter;
pub mod link;
pub mod node;
pub mod normalize;
pub mod pluralize;
pub mod query;
pub mod sample;

pub use error::{ConfigError, ErrorResponse, MapError, MapResult, ShapeError};
pub use filter::{AttributeFilter, IncludedRule, Matcher, RelationFilter};
pub use link::{LinkArgs, LinkValue, Links};
pub use node::{Entity, IdAttribute, Kind, Node, classify};
pub use pluralize::Pluralizer;
pub use query::{PaginationDescriptor, PaginationMeta};
pub use sample::{Sample, sample};
