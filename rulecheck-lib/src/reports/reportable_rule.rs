use crate::expr::Outcome;
use crate::rule::Rule;

/// The outcome of one run, with enough of the rule to describe it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportableRule {
    /// Path the rule was loaded from.
    pub source: String,

    /// Absent when the rule couldn't be loaded.
    pub title: Option<String>,
    pub expression: Option<String>,
    pub outcome: Outcome,
}

impl ReportableRule {
    #[must_use]
    pub fn new(source: impl Into<String>, rule: Option<&Rule>, outcome: Outcome) -> Self {
        Self {
            source: source.into(),
            title: rule.map(|r| r.title().to_string()),
            expression: rule.map(|r| r.expression().to_string()),
            outcome,
        }
    }

    /// Title to show the user, falling back to the source path for untitled or unloaded rules.
    #[must_use]
    pub fn display_title(&self) -> &str {
        self.title.as_deref().filter(|t| !t.is_empty()).unwrap_or(&self.source)
    }
}
