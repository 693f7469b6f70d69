//! Settings for a validation pass.

/// What to do with a rule whose name has no registered validator.
///
/// The rule is logged at `warn` level either way.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum UnknownRulePolicy {
    /// Ignore the rule
    #[default]
    Skip,
    /// Report [`ValidationErrorKind::UnknownValidator`](crate::ValidationErrorKind::UnknownValidator)
    /// at the field's node
    Fail,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationOptions {
    pub unknown_rule: UnknownRulePolicy,
}

impl ValidationOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_unknown_rule(mut self, policy: UnknownRulePolicy) -> Self {
        self.unknown_rule = policy;
        self
    }

    /// Options that turn unknown rule names into errors.
    pub fn strict() -> Self {
        Self::new().with_unknown_rule(UnknownRulePolicy::Fail)
    }
}
