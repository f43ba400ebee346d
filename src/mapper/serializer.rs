//! Per-resource serializers
//!
//! A [`ResourceSerializer`] describes how one resource type is presented:
//! its type name and the template fragments merged for single resources and
//! for pages of resources.

use crate::core::error::MapResult;
use crate::core::filter::RelationFilter;
use crate::core::node::{Kind, Node};
use crate::core::query::{PaginationDescriptor, PaginationMeta};
use crate::mapper::{Action, Document, DocumentSerializer, Mapper};
use crate::template::{Meta, TemplateOverrides};

/// Presentation of one resource type
///
/// # Example
///
/// ```rust,ignore
/// struct OrderSerializer;
///
/// impl ResourceSerializer for OrderSerializer {
///     fn resource_type(&self) -> &str {
///         "orders"
///     }
///
///     fn api_url(&self) -> &str {
///         "https://api.example.com"
///     }
///
///     fn item_overrides(&self) -> TemplateOverrides {
///         TemplateOverrides::new().attributes(["status", "total"]).without_data_links()
///     }
/// }
///
/// let document = OrderSerializer.to_document(&mapper, &node, None)?;
/// ```
pub trait ResourceSerializer {
    /// Resource type of the primary data
    fn resource_type(&self) -> &str;

    /// API root used for action URLs
    fn api_url(&self) -> &str;

    /// Absolute URL of a path under the API root
    fn url(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.api_url().trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    /// Action on a path under the API root
    fn action(&self, method: &str, name: &str, path: &str) -> Action {
        Action::new(self.api_url(), method, name, path)
    }

    /// Fragment merged into single-resource templates
    fn item_overrides(&self) -> TemplateOverrides {
        TemplateOverrides::default()
    }

    /// Fragment merged into collection templates; advertises the page by
    /// default
    fn list_overrides(&self, pagination: Option<&PaginationDescriptor>) -> TemplateOverrides {
        match pagination {
            Some(pagination) => TemplateOverrides::new()
                .meta(Meta::new().with_pagination(PaginationMeta::from(pagination))),
            None => TemplateOverrides::default(),
        }
    }

    /// Map a node with every loaded relation walked and embedded
    fn to_document<S: DocumentSerializer>(
        &self,
        mapper: &Mapper<S>,
        node: &Node,
        pagination: Option<PaginationDescriptor>,
    ) -> MapResult<Document> {
        let mut opts = mapper.defaults().clone().relations(RelationFilter::All(true));
        if let Some(pagination) = pagination {
            opts = opts.pagination(pagination);
        }

        let overrides = match node.kind() {
            Kind::Collection => self.list_overrides(pagination.as_ref()),
            Kind::Entity | Kind::Empty => self.item_overrides(),
        };
        mapper.map_with(node, self.resource_type(), &opts, Some(&overrides))
    }
}
