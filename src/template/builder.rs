//! Template generation from a sample

use crate::core::filter::{attribute_allowed, include_allowed, relation_allowed};
use crate::core::normalize::ID_KEY;
use crate::core::query::PaginationMeta;
use crate::core::sample::Sample;
use crate::links::{LinkOptions, data_links, included_links, relationship_links, top_links};
use crate::mapper::MapOptions;
use crate::template::{Meta, Template};

/// Build the template for a sampled graph
///
/// Attribute and relation visibility is applied at every level. Root-only
/// parts (per-resource and top-level links, naming rules, meta) are set on
/// the returned template only.
pub fn build_template(sample: &Sample, opts: &MapOptions, link_opts: &LinkOptions) -> Template {
    let mut template = process_sample(sample, opts, link_opts);
    if sample.is_empty() {
        template.attributes = fallback_attributes(sample, opts);
    }

    if opts.enable_links {
        template.data_links = Some(data_links(link_opts));
        template.top_level_links = Some(top_links(link_opts));
    }
    template.type_for_attribute = opts.type_for_model.clone();
    template.key_for_attribute = opts.key_for_attribute.clone();
    template.meta = root_meta(opts);

    template
}

fn process_sample(sample: &Sample, opts: &MapOptions, link_opts: &LinkOptions) -> Template {
    let mut template = Template {
        attributes: visible_attributes(sample, opts),
        ..Template::default()
    };

    for (name, related) in &sample.relations {
        if !relation_allowed(name, &opts.relations) {
            tracing::trace!(
                resource_type = %link_opts.resource_type,
                relation = %name,
                "relation not walked"
            );
            continue;
        }

        let related_opts = link_opts.for_type(name.as_str());
        let mut sub = process_sample(related, opts, &related_opts);
        sub.reference = Some(ID_KEY.to_string());

        if opts.enable_links {
            sub.relationship_links = Some(relationship_links(link_opts, name));
            sub.included_links = Some(included_links(&related_opts));
        }

        if !include_allowed(name, &opts.relations) {
            tracing::trace!(
                resource_type = %link_opts.resource_type,
                relation = %name,
                "relation linked but not included"
            );
            sub.included = Some(false);
        }

        template.attributes.push(name.clone());
        template.relations.insert(name.clone(), sub);
    }

    tracing::debug!(
        resource_type = %link_opts.resource_type,
        attributes = template.attributes.len(),
        relations = template.relations.len(),
        "built template level"
    );

    template
}

/// Attributes of a root listing with no entity to sample: the exact names
/// of the include rules
fn fallback_attributes(sample: &Sample, opts: &MapOptions) -> Vec<String> {
    let id_names = sample.id_attribute.names();
    let filter = opts.attributes.as_ref();
    filter
        .map(|f| f.included_names())
        .unwrap_or_default()
        .into_iter()
        .filter(|name| attribute_allowed(name, &id_names, filter))
        .collect()
}

/// Sampled attribute names that pass the attribute rules, in sample order
fn visible_attributes(sample: &Sample, opts: &MapOptions) -> Vec<String> {
    let id_names = sample.id_attribute.names();
    let filter = opts.attributes.as_ref();

    let with_virtuals = opts.output_virtuals.unwrap_or(sample.output_virtuals);
    let mut names: Vec<&String> = sample.attributes.iter().collect();
    if with_virtuals {
        names.extend(sample.virtuals.iter().filter(|v| !sample.attributes.contains(*v)));
    }

    names
        .into_iter()
        .filter(|name| attribute_allowed(name, &id_names, filter))
        .cloned()
        .collect()
}

/// Caller meta, with pagination filled in from the page descriptor
fn root_meta(opts: &MapOptions) -> Option<Meta> {
    let pagination = opts.pagination.as_ref().map(PaginationMeta::from);
    match (opts.meta.clone(), pagination) {
        (Some(mut meta), Some(pagination)) => {
            meta.pagination.get_or_insert(pagination);
            Some(meta)
        }
        (Some(meta), None) => Some(meta),
        (None, Some(pagination)) => Some(Meta::new().with_pagination(pagination)),
        (None, None) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::filter::{AttributeFilter, IncludedRule, Matcher, RelationFilter};
    use crate::core::link::{LinkArgs, LinkValue};
    use crate::core::node::{Entity, Node};
    use crate::core::query::PaginationDescriptor;
    use crate::core::sample::sample;
    use serde_json::json;

    const BASE: &str = "https://api.test";

    fn build(node: &Node, opts: &MapOptions) -> Template {
        let link_opts = LinkOptions::new(BASE, "widgets");
        build_template(&sample(node), opts, &link_opts)
    }

    #[test]
    fn test_single_widget() {
        let node = Node::from(Entity::new(1).attr("name", "x"));
        let template = build(&node, &MapOptions::default());

        assert_eq!(template.attributes, vec!["name"]);
        let record = json!({ "id": "1", "name": "x" });
        assert_eq!(
            template
                .data_links
                .as_ref()
                .and_then(|l| l.resolve("self", &LinkArgs::resource(&record)))
                .as_deref(),
            Some("https://api.test/widgets/1")
        );
        assert_eq!(
            template
                .top_level_links
                .as_ref()
                .and_then(|l| l.get("self"))
                .and_then(LinkValue::as_static),
            Some("https://api.test/widgets")
        );
        assert!(template.meta.is_none());
    }

    #[test]
    fn test_heterogeneous_collection_keeps_owner() {
        let node = Node::from(vec![
            Entity::new(1).attr("name", "a").relation("owner", Entity::new(9).attr("email", "e")),
            Entity::new(2).attr("name", "b"),
        ]);
        let template = build(&node, &MapOptions::default());

        assert_eq!(template.attributes, vec!["name", "owner"]);
        let owner = template.relation("owner").unwrap();
        assert_eq!(owner.reference.as_deref(), Some("id"));
        assert_eq!(owner.attributes, vec!["email"]);
        assert!(owner.is_included());
    }

    #[test]
    fn test_embed_versus_link_only() {
        let node = Node::from(
            Entity::new(1)
                .relation("owner", Entity::new(2))
                .relation("tags", vec![Entity::new(3)])
                .relation("editor", Entity::new(4)),
        );
        let opts = MapOptions::default().relations(
            RelationFilter::fields(["owner", "tags"])
                .with_included(IncludedRule::Only(vec!["owner".into()])),
        );
        let template = build(&node, &opts);

        assert_eq!(template.attributes, vec!["owner", "tags"]);
        assert!(template.relation("owner").unwrap().is_included());
        assert_eq!(template.relation("tags").unwrap().included, Some(false));
        assert!(template.relation("editor").is_none());
    }

    #[test]
    fn test_relations_disabled() {
        let node = Node::from(Entity::new(1).attr("name", "n").relation("owner", Entity::new(2)));
        let template = build(&node, &MapOptions::default().relations(RelationFilter::All(false)));
        assert_eq!(template.attributes, vec!["name"]);
        assert!(template.relations.is_empty());
    }

    #[test]
    fn test_relationship_links_rooted_at_parent() {
        let node = Node::from(Entity::new(1).relation("owner", Entity::new(2)));
        let template = build(&node, &MapOptions::default());
        let owner = template.relation("owner").unwrap();

        let record = json!({ "id": "1" });
        let related = json!({ "id": "2" });
        let args = LinkArgs::related(&record, &related, &record);
        assert_eq!(
            owner
                .relationship_links
                .as_ref()
                .and_then(|l| l.resolve("related", &args))
                .as_deref(),
            Some("https://api.test/widgets/1/owner")
        );
        assert_eq!(
            owner
                .included_links
                .as_ref()
                .and_then(|l| l.resolve("self", &args))
                .as_deref(),
            Some("https://api.test/owners/2")
        );
        assert!(owner.data_links.is_none());
        assert!(owner.top_level_links.is_none());
    }

    #[test]
    fn test_links_disabled() {
        let node = Node::from(Entity::new(1).relation("owner", Entity::new(2)));
        let template = build(&node, &MapOptions::default().enable_links(false));
        assert!(template.data_links.is_none());
        assert!(template.top_level_links.is_none());
        assert!(template.relation("owner").unwrap().relationship_links.is_none());
    }

    #[test]
    fn test_attribute_rules_apply_at_every_level() {
        let node = Node::from(
            Entity::new(1)
                .attr("name", "n")
                .attr("_rev", 3)
                .relation("owner", Entity::new(2).attr("email", "e").attr("_rev", 1)),
        );
        let opts = MapOptions::default().attributes(
            AttributeFilter::omit([Matcher::exact("id"), Matcher::pattern("_.*").unwrap()]),
        );
        let template = build(&node, &opts);
        assert_eq!(template.attributes, vec!["name", "owner"]);
        assert_eq!(template.relation("owner").unwrap().attributes, vec!["email"]);
    }

    #[test]
    fn test_empty_collection_falls_back_to_include_names() {
        let opts = MapOptions::default().attributes(AttributeFilter::include([
            Matcher::exact("name"),
            Matcher::pattern("x.*").unwrap(),
        ]));
        let template = build(&Node::Collection(Vec::new()), &opts);
        assert_eq!(template.attributes, vec!["name"]);

        let template = build(&Node::Empty, &MapOptions::default());
        assert!(template.attributes.is_empty());
    }

    #[test]
    fn test_empty_relation_has_no_attributes() {
        let node = Node::from(
            Entity::new(1)
                .attr("name", "x")
                .relation("owner", Node::Empty)
                .relation("tags", Vec::<Entity>::new()),
        );
        let opts = MapOptions::default().attributes(AttributeFilter::include([Matcher::exact("name")]));
        let template = build(&node, &opts);

        assert_eq!(template.attributes, vec!["name", "owner", "tags"]);
        assert!(template.relation("owner").unwrap().attributes.is_empty());
        assert!(template.relation("tags").unwrap().attributes.is_empty());
    }

    #[test]
    fn test_virtuals() {
        let node = Node::from(Entity::new(1).attr("first", "a").virtual_attr("full_name", "a b"));
        assert_eq!(build(&node, &MapOptions::default()).attributes, vec!["first"]);
        assert_eq!(
            build(&node, &MapOptions::default().output_virtuals(true)).attributes,
            vec!["first", "full_name"]
        );
    }

    #[test]
    fn test_meta_gets_pagination() {
        let node = Node::from(vec![Entity::new(1)]);
        let opts = MapOptions::default()
            .pagination(PaginationDescriptor::new(10, 10, 25))
            .meta(Meta::new().with("version", "1"));
        let link_opts = LinkOptions::new(BASE, "widgets")
            .with_pagination(PaginationDescriptor::new(10, 10, 25));
        let template = build_template(&sample(&node), &opts, &link_opts);

        let meta = template.meta.unwrap();
        assert_eq!(meta.pagination, Some(PaginationMeta::new(2, 10, 25)));
        assert!(meta.entries.contains_key("version"));

        let links = template.top_level_links.unwrap();
        assert!(links.contains("first"));
        assert!(links.contains("last"));
    }
}
