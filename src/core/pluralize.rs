//! English pluralization used for resource type names and URL segments
//!
//! Relation names are often already plural (`tags`, `orders`), so words that
//! look plural are left untouched instead of gaining a second suffix.

use regex::Regex;
use std::sync::OnceLock;

/// Words with identical singular and plural forms
const UNCOUNTABLES: &[&str] = &[
    "equipment",
    "information",
    "rice",
    "money",
    "species",
    "series",
    "fish",
    "sheep",
    "moose",
    "deer",
    "news",
    "police",
];

/// Rules matching words that are already plural
const PLURAL_FORMS: &[&str] = &[
    r"(m)en$",
    r"(pe)ople$",
    r"(child)ren$",
    r"([ti])a$",
    r"((a)naly|(b)a|(d)iagno|(p)arenthe|(p)rogno|(s)ynop|(t)he)ses$",
    r"(hive)s$",
    r"(tive)s$",
    r"(curve)s$",
    r"([lr])ves$",
    r"([^fo])ves$",
    r"([^aeiouy]|qu)ies$",
    r"(m)ovies$",
    r"(x|ch|ss|sh)es$",
    r"([ml])ice$",
    r"(bus)es$",
    r"(o)es$",
    r"(shoe)s$",
    r"(cris|ax|test)es$",
    r"(octop|vir)i$",
    r"(alias|canvas|status|campus)es$",
    r"^(summons)es$",
    r"^(ox)en",
    r"(matr)ices$",
    r"(vert|ind)ices$",
    r"(quiz)zes$",
];

/// Singular -> plural rewrites, first match wins
const SINGULAR_RULES: &[(&str, &str)] = &[
    (r"(m)an$", "${1}en"),
    (r"(pe)rson$", "${1}ople"),
    (r"(child)$", "${1}ren"),
    (r"^(ox)$", "${1}en"),
    (r"(ax|test)is$", "${1}es"),
    (r"(octop|vir)us$", "${1}i"),
    (r"(alias|canvas|status|campus)$", "${1}es"),
    (r"^(summons)$", "${1}es"),
    (r"(bu)s$", "${1}ses"),
    (r"(buffal|tomat|potat|ech|her|vet)o$", "${1}oes"),
    (r"([ti])um$", "${1}a"),
    (r"sis$", "ses"),
    (r"(?:([^f])fe|([lr])f)$", "${1}${2}ves"),
    (r"(hive)$", "${1}s"),
    (r"([^aeiouy]|qu)y$", "${1}ies"),
    (r"(x|ch|ss|sh)$", "${1}es"),
    (r"(matr|vert|ind)(?:ix|ex)$", "${1}ices"),
    (r"([ml])ouse$", "${1}ice"),
    (r"(quiz)$", "${1}zes"),
    (r"s$", "s"),
    (r"$", "s"),
];

struct Rules {
    plural_forms: Vec<Regex>,
    singular_rules: Vec<(Regex, &'static str)>,
}

fn rules() -> &'static Rules {
    static RULES: OnceLock<Rules> = OnceLock::new();
    RULES.get_or_init(|| Rules {
        plural_forms: PLURAL_FORMS
            .iter()
            .map(|p| Regex::new(&format!("(?i){}", p)).expect("plural form rule compiles"))
            .collect(),
        singular_rules: SINGULAR_RULES
            .iter()
            .map(|(p, r)| {
                (
                    Regex::new(&format!("(?i){}", p)).expect("singular rule compiles"),
                    *r,
                )
            })
            .collect(),
    })
}

/// Utility for converting resource names to their plural form
pub struct Pluralizer;

impl Pluralizer {
    /// Convert a noun to its plural form
    ///
    /// # Examples
    ///
    /// ```
    /// use jsonapi::core::pluralize::Pluralizer;
    ///
    /// assert_eq!(Pluralizer::pluralize("user"), "users");
    /// assert_eq!(Pluralizer::pluralize("users"), "users");
    /// assert_eq!(Pluralizer::pluralize("company"), "companies");
    /// assert_eq!(Pluralizer::pluralize("person"), "people");
    /// ```
    pub fn pluralize(word: &str) -> String {
        if word.is_empty() {
            return String::new();
        }

        let lower = word.to_lowercase();
        if UNCOUNTABLES.contains(&lower.as_str()) {
            return word.to_string();
        }

        let rules = rules();
        if rules.plural_forms.iter().any(|re| re.is_match(word)) {
            return word.to_string();
        }

        for (re, replacement) in &rules.singular_rules {
            if re.is_match(word) {
                return re.replace(word, *replacement).into_owned();
            }
        }

        word.to_string()
    }
}
