//! Shape sampling of entity graphs
//!
//! A [`Sample`] is the union of every attribute and relation name found in a
//! node, recursively. Templates are generated from one sample instead of
//! re-deriving structure entity by entity, which also covers collections whose
//! members did not all load the same relations.

use crate::core::node::{Entity, IdAttribute, Node};
use indexmap::{IndexMap, IndexSet};

/// Shape descriptor of an entity graph
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Sample {
    /// Id attribute of the sampled resource type
    pub id_attribute: IdAttribute,

    /// Attribute names, in first-seen order
    pub attributes: IndexSet<String>,

    /// Virtual attribute names, in first-seen order
    pub virtuals: IndexSet<String>,

    /// Whether any sampled entity outputs its virtuals
    pub output_virtuals: bool,

    /// Nested relation samples, in first-seen order
    pub relations: IndexMap<String, Sample>,
}

impl Sample {
    /// True when no entity contributed to this sample
    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty() && self.virtuals.is_empty() && self.relations.is_empty()
    }

    /// Union `other` into this sample, recursing into relations
    ///
    /// Name sets are unions, so merging is commutative and idempotent up to
    /// the insertion order of names.
    pub fn merge(mut self, other: Sample) -> Sample {
        if self.is_empty() && !other.is_empty() {
            self.id_attribute = other.id_attribute;
        }
        self.attributes.extend(other.attributes);
        self.virtuals.extend(other.virtuals);
        self.output_virtuals |= other.output_virtuals;

        for (name, related) in other.relations {
            match self.relations.get_mut(&name) {
                Some(existing) => {
                    let current = std::mem::take(existing);
                    *existing = current.merge(related);
                }
                None => {
                    self.relations.insert(name, related);
                }
            }
        }
        self
    }
}

/// Sample a node: an entity's own shape, or the union over a collection
pub fn sample(node: &Node) -> Sample {
    match node {
        Node::Entity(entity) => sample_entity(entity),
        Node::Collection(entities) => {
            let mut members = entities.iter();
            match members.next() {
                Some(head) => members.fold(sample_entity(head), |acc, member| {
                    acc.merge(sample_entity(member))
                }),
                None => Sample::default(),
            }
        }
        Node::Empty => Sample::default(),
    }
}

fn sample_entity(entity: &Entity) -> Sample {
    Sample {
        id_attribute: entity.id_attribute.clone(),
        attributes: entity.attributes.keys().cloned().collect(),
        virtuals: entity.virtuals.keys().cloned().collect(),
        output_virtuals: entity.output_virtuals,
        relations: entity
            .relations
            .iter()
            .map(|(name, related)| (name.clone(), sample(related)))
            .collect(),
    }
}
