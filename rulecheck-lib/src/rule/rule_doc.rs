use super::{Input, LoadError};
use serde::Deserialize;
use std::collections::HashSet;

/// A declarative compliance check: inputs, a boolean expression over them, and messaging.
///
/// Rules are immutable once loaded.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Rule {
    #[serde(default)]
    kind: String,

    #[serde(default)]
    check_type: CheckType,

    #[serde(default)]
    title: String,

    expression: String,

    #[serde(default)]
    inputs: Vec<Input>,

    #[serde(default)]
    error_message: Option<String>,
}

/// Selects the provider family allowed to process a rule's inputs.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "String")]
pub enum CheckType {
    /// Cluster and node level checks, served by the cluster and file providers.
    Platform,

    /// A check type this build doesn't process. Holds the name as written.
    Unrecognized(String),
}

impl Default for CheckType {
    fn default() -> Self {
        Self::Unrecognized(String::new())
    }
}

impl From<String> for CheckType {
    fn from(value: String) -> Self {
        match value.as_str() {
            "Platform" => Self::Platform,
            _ => Self::Unrecognized(value),
        }
    }
}

impl CheckType {
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Platform => "Platform",
            Self::Unrecognized(name) => name,
        }
    }
}

impl Rule {
    #[must_use]
    pub fn new(
        kind: impl Into<String>,
        check_type: CheckType,
        title: impl Into<String>,
        expression: impl Into<String>,
        inputs: Vec<Input>,
        error_message: Option<String>,
    ) -> Self {
        Self {
            kind: kind.into(),
            check_type,
            title: title.into(),
            expression: expression.into(),
            inputs,
            error_message,
        }
    }

    /// Parse a rule from YAML text.
    ///
    /// Fields are typed individually; the expression is not checked against the inputs here.
    pub fn from_yaml(text: &str) -> Result<Self, LoadError> {
        let rule: Self = serde_yaml::from_str(text).map_err(|e| LoadError::ParseError { message: e.to_string() })?;
        rule.check_unique_input_names()?;
        Ok(rule)
    }

    fn check_unique_input_names(&self) -> Result<(), LoadError> {
        let mut seen = HashSet::with_capacity(self.inputs.len());
        for input in &self.inputs {
            if !seen.insert(input.name()) {
                return Err(LoadError::DuplicateInputName(input.name().to_string()));
            }
        }

        Ok(())
    }

    #[must_use]
    pub fn kind(&self) -> &str {
        &self.kind
    }

    #[must_use]
    pub const fn check_type(&self) -> &CheckType {
        &self.check_type
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub fn expression(&self) -> &str {
        &self.expression
    }

    #[must_use]
    pub fn inputs(&self) -> &[Input] {
        &self.inputs
    }

    /// Message shown when the expression evaluates to false, if the rule sets one.
    #[must_use]
    pub fn error_message(&self) -> Option<&str> {
        self.error_message.as_deref().filter(|m| !m.is_empty())
    }

    #[must_use]
    pub fn input(&self, name: &str) -> Option<&Input> {
        self.inputs.iter().find(|input| input.name() == name)
    }
}
