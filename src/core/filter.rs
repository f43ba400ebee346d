//! Attribute and relation visibility rules
//!
//! Two independent decisions are made for every resource level of a
//! template: which attributes are exposed, and which relations are walked
//! (and, among those, embedded in the compound document's `included` array
//! rather than only linked).

use crate::core::error::{ConfigError, MapResult};
use regex::Regex;
use serde_json::Value;

/// A single visibility rule: an exact name or an anchored pattern
#[derive(Debug, Clone)]
pub enum Matcher {
    /// Case-sensitive exact name
    Exact(String),

    /// Regular expression that must match the whole name
    Pattern(Regex),
}

impl Matcher {
    /// Exact, case-sensitive name rule
    pub fn exact(name: impl Into<String>) -> Self {
        Matcher::Exact(name.into())
    }

    /// Pattern rule, anchored on both ends
    pub fn pattern(pattern: &str) -> MapResult<Self> {
        Regex::new(&format!("^(?:{})$", pattern))
            .map(Matcher::Pattern)
            .map_err(|e| {
                ConfigError::InvalidPattern {
                    pattern: pattern.to_string(),
                    message: e.to_string(),
                }
                .into()
            })
    }

    /// Whether this rule matches the whole candidate name
    pub fn matches(&self, candidate: &str) -> bool {
        match self {
            Matcher::Exact(name) => name == candidate,
            Matcher::Pattern(re) => re.is_match(candidate),
        }
    }

    /// The exact name, if this is an exact rule
    pub fn as_exact(&self) -> Option<&str> {
        match self {
            Matcher::Exact(name) => Some(name),
            Matcher::Pattern(_) => None,
        }
    }
}

impl From<&str> for Matcher {
    fn from(name: &str) -> Self {
        Matcher::Exact(name.to_string())
    }
}

impl From<String> for Matcher {
    fn from(name: String) -> Self {
        Matcher::Exact(name)
    }
}

impl From<Regex> for Matcher {
    fn from(re: Regex) -> Self {
        let anchored = format!("^(?:{})$", re.as_str());
        // Re-anchoring an already valid pattern cannot fail
        Matcher::Pattern(Regex::new(&anchored).unwrap_or(re))
    }
}

/// Rules arriving as JSON: a string is an exact name, `{ "pattern": ".." }`
/// is a pattern. Anything else is rejected.
impl TryFrom<&Value> for Matcher {
    type Error = crate::core::error::MapError;

    fn try_from(value: &Value) -> MapResult<Self> {
        match value {
            Value::String(name) => Ok(Matcher::Exact(name.clone())),
            Value::Object(map) => match map.get("pattern") {
                Some(Value::String(pattern)) if map.len() == 1 => Matcher::pattern(pattern),
                _ => Err(invalid_rule(value)),
            },
            _ => Err(invalid_rule(value)),
        }
    }
}

fn invalid_rule(value: &Value) -> crate::core::error::MapError {
    ConfigError::InvalidRule {
        rule: value.to_string(),
        message: "expected a name or { \"pattern\": \"...\" }".to_string(),
    }
    .into()
}

/// Compile a list of JSON rules, failing on the first invalid one
pub fn matchers_from_values(values: &[Value]) -> MapResult<Vec<Matcher>> {
    values.iter().map(Matcher::try_from).collect()
}

fn any_match(rules: &[Matcher], name: &str) -> bool {
    rules.iter().any(|m| m.matches(name))
}

/// Attribute visibility rules
///
/// Without explicit rules the id attribute(s) are omitted, since the id is
/// already carried by the resource identifier.
#[derive(Debug, Clone, Default)]
pub struct AttributeFilter {
    /// Names that are never exposed; wins over `include`
    pub omit: Option<Vec<Matcher>>,

    /// When set, only matching names are exposed
    pub include: Option<Vec<Matcher>>,
}

impl AttributeFilter {
    /// Expose only matching attributes
    pub fn include<I, M>(rules: I) -> Self
    where
        I: IntoIterator<Item = M>,
        M: Into<Matcher>,
    {
        Self {
            omit: None,
            include: Some(rules.into_iter().map(Into::into).collect()),
        }
    }

    /// Hide matching attributes
    pub fn omit<I, M>(rules: I) -> Self
    where
        I: IntoIterator<Item = M>,
        M: Into<Matcher>,
    {
        Self {
            omit: Some(rules.into_iter().map(Into::into).collect()),
            include: None,
        }
    }

    /// Add omit rules on top of the current ones
    pub fn and_omit<I, M>(mut self, rules: I) -> Self
    where
        I: IntoIterator<Item = M>,
        M: Into<Matcher>,
    {
        self.omit
            .get_or_insert_with(Vec::new)
            .extend(rules.into_iter().map(Into::into));
        self
    }

    /// Exact names listed in `include`, used when no entity was sampled
    pub fn included_names(&self) -> Vec<String> {
        self.include
            .iter()
            .flatten()
            .filter_map(Matcher::as_exact)
            .map(str::to_string)
            .collect()
    }
}

/// Decide whether an attribute is exposed
///
/// `filter == None` means "no rules given": the id attribute names are
/// omitted. `omit` always wins over `include`.
pub fn attribute_allowed(name: &str, id_names: &[String], filter: Option<&AttributeFilter>) -> bool {
    let Some(filter) = filter else {
        return !id_names.iter().any(|id| id == name);
    };

    let included = filter
        .include
        .as_deref()
        .is_none_or(|rules| any_match(rules, name));
    let omitted = filter
        .omit
        .as_deref()
        .is_some_and(|rules| any_match(rules, name));

    included && !omitted
}

/// Which relations are embedded in `included`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IncludedRule {
    /// Embed every walked relation, or none
    All(bool),

    /// Embed only these relations (intersected with `fields` when present)
    Only(Vec<String>),
}

/// Relation visibility rules
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RelationFilter {
    /// Walk and embed every relation, or none
    All(bool),

    /// Walk `fields` (all when absent), embed per `included`
    Select {
        fields: Option<Vec<String>>,
        included: Option<IncludedRule>,
    },
}

impl Default for RelationFilter {
    fn default() -> Self {
        RelationFilter::All(true)
    }
}

impl RelationFilter {
    /// Walk only the given relations
    pub fn fields<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        RelationFilter::Select {
            fields: Some(fields.into_iter().map(Into::into).collect()),
            included: None,
        }
    }

    /// Set the embedding rule
    pub fn with_included(self, rule: IncludedRule) -> Self {
        match self {
            RelationFilter::Select { fields, .. } => RelationFilter::Select {
                fields,
                included: Some(rule),
            },
            RelationFilter::All(_) => RelationFilter::Select {
                fields: None,
                included: Some(rule),
            },
        }
    }
}

/// Decide whether a relation is walked at all
pub fn relation_allowed(name: &str, filter: &RelationFilter) -> bool {
    match filter {
        RelationFilter::All(walk) => *walk,
        RelationFilter::Select { fields, .. } => fields
            .as_ref()
            .is_none_or(|fields| fields.iter().any(|f| f == name)),
    }
}

/// Decide whether a walked relation is embedded in the compound document
///
/// With a name list, a relation is embedded only if it is listed in both
/// `included` and `fields` (when `fields` is given). No `included` rule at
/// all embeds nothing.
pub fn include_allowed(name: &str, filter: &RelationFilter) -> bool {
    match filter {
        RelationFilter::All(embed) => *embed,
        RelationFilter::Select { fields, included } => match included {
            Some(IncludedRule::All(embed)) => *embed,
            Some(IncludedRule::Only(names)) => {
                let listed = names.iter().any(|n| n == name);
                let walked = fields
                    .as_ref()
                    .is_none_or(|fields| fields.iter().any(|f| f == name));
                listed && walked
            }
            None => false,
        },
    }
}
