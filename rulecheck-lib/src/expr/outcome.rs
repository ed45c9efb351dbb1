use super::{CompileError, EvalError};
use crate::inputs::CollectionError;
use crate::rule::{LoadError, Rule};
use cel_interpreter::Value;
use strum::Display;

/// Final result of evaluating one rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The expression returned `true`.
    Satisfied,

    /// The expression returned `false`. Carries the rule's error message, if it has one.
    Violated { message: Option<String> },

    /// The expression read a key the collected data doesn't have.
    MissingData {
        key: String,

        /// First input the expression references, if any.
        input: Option<String>,

        /// Where that input's data came from.
        hint: Option<String>,
    },

    Fatal(FatalCause),
}

/// Why a run could not produce a verdict.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FatalCause {
    #[error(transparent)]
    Load(#[from] LoadError),

    #[error(transparent)]
    Collection(#[from] CollectionError),

    #[error(transparent)]
    Compile(#[from] CompileError),

    #[error(transparent)]
    Evaluation(#[from] EvalError),

    #[error("expression did not return a boolean, got '{0}' instead")]
    NonBoolean(String),
}

/// Coarse outcome category, as shown in machine-readable output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "snake_case")]
pub enum OutcomeKind {
    Satisfied,
    Violated,
    MissingData,
    Fatal,
}

impl Outcome {
    #[must_use]
    pub const fn kind(&self) -> OutcomeKind {
        match self {
            Self::Satisfied => OutcomeKind::Satisfied,
            Self::Violated { .. } => OutcomeKind::Violated,
            Self::MissingData { .. } => OutcomeKind::MissingData,
            Self::Fatal(_) => OutcomeKind::Fatal,
        }
    }

    /// The boolean verdict reported to the user. Only a satisfied rule is `true`.
    #[must_use]
    pub const fn passed(&self) -> bool {
        matches!(self, Self::Satisfied)
    }
}

impl FatalCause {
    /// Name of the input involved, when the failure is tied to one.
    #[must_use]
    pub fn input(&self) -> Option<&str> {
        match self {
            Self::Collection(e) => Some(e.input()),
            _ => None,
        }
    }
}

/// Turn an evaluation result into an [`Outcome`].
///
/// `referenced_inputs` are the declared inputs the expression mentions, in
/// declaration order; the first one is blamed for missing data.
#[must_use]
pub fn classify(result: Result<Value, EvalError>, rule: &Rule, referenced_inputs: &[String]) -> Outcome {
    match result {
        Ok(Value::Bool(true)) => Outcome::Satisfied,
        Ok(Value::Bool(false)) => Outcome::Violated {
            message: rule.error_message().map(str::to_string),
        },
        Ok(other) => Outcome::Fatal(FatalCause::NonBoolean(format!("{other:?}"))),
        Err(EvalError::MissingBinding { key }) => {
            let input = referenced_inputs.first().cloned();
            let hint = input.as_deref().and_then(|name| rule.input(name)).map(crate::rule::Input::coordinates);
            Outcome::MissingData { key, input, hint }
        }
        Err(err @ EvalError::Other { .. }) => Outcome::Fatal(FatalCause::Evaluation(err)),
    }
}
