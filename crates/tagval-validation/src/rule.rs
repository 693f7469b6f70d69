//! The rule-tag grammar.
//!
//! A tag is a comma-separated list of rules, each either `name` or
//! `name=param`:
//!
//! ```text
//! required,gt=18
//! datetime=2006-01-02T15:04:05Z07:00
//! ```
//!
//! Parts are not trimmed and there is no escaping, so a parameter cannot
//! contain a comma.

/// A single named directive parsed from a tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationRule {
    pub name: String,
    /// Zero or one parameter.
    pub params: Vec<String>,
}

impl ValidationRule {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            params: Vec::new(),
        }
    }

    pub fn with_param(name: impl Into<String>, param: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            params: vec![param.into()],
        }
    }

    /// The first parameter, or `""` when the rule has none.
    pub fn param(&self) -> &str {
        self.params.first().map(String::as_str).unwrap_or("")
    }
}

/// Parse a tag string into its ordered rules.
///
/// Every comma-separated part becomes one rule, so the result is never
/// empty: `""` yields a single rule with an empty name.
pub fn parse_tag(tag: &str) -> Vec<ValidationRule> {
    tag.split(',')
        .map(|part| match part.split_once('=') {
            Some((name, param)) => ValidationRule::with_param(name, param),
            None => ValidationRule::new(part),
        })
        .collect()
}

/// True when any of the rules is `required`.
pub fn tag_contains_required(rules: &[ValidationRule]) -> bool {
    rules.iter().any(|rule| rule.name == "required")
}
