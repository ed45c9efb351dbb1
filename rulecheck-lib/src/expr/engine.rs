//! Compiling and running rule expressions

use super::EvaluationContext;
use cel_interpreter::{ExecutionError, Program, Value};
use regex::Regex;
use std::collections::HashSet;
use std::sync::LazyLock;

/// Iteration variable of a comprehension macro, e.g. `n` in `items.all(n, n.ready)`.
static MACRO_VARIABLE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\.\s*(?:all|exists_one|exists|map|filter)\s*\(\s*([A-Za-z_][A-Za-z0-9_]*)\s*,").expect("invalid regex")
});

/// The expression could not be parsed, or reads a name that is not declared.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("could not compile expression: {message}")]
pub struct CompileError {
    pub message: String,
}

/// Evaluation failure, classified by the engine's error kind.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EvalError {
    /// The expression looked up a key that isn't bound.
    #[error("no such key: {key}")]
    MissingBinding { key: String },

    #[error("{message}")]
    Other { message: String },
}

/// Names declared for a run, used to compile and classify against.
#[derive(Debug, Clone, Default)]
pub struct Environment {
    declarations: Vec<String>,
}

/// A parsed expression ready to evaluate.
pub struct CompiledProgram {
    program: Program,
    referenced_inputs: Vec<String>,
    declarations: Vec<String>,
}

impl Environment {
    #[must_use]
    pub fn new<I, S>(declarations: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            declarations: declarations.into_iter().map(Into::into).collect(),
        }
    }

    /// Declare every variable bound in `context`.
    #[must_use]
    pub fn for_context(context: &EvaluationContext) -> Self {
        Self::new(context.declarations())
    }

    /// Parse `expression` and check that every name it reads is declared.
    ///
    /// Every branch is checked, including ones `&&` and `||` would skip at run time.
    /// Iteration variables of `all`, `exists`, `exists_one`, `map` and `filter` count as declared.
    pub fn compile(&self, expression: &str) -> Result<CompiledProgram, CompileError> {
        let program = Program::compile(expression).map_err(|e| CompileError { message: e.to_string() })?;

        let references = program.references();
        let variables = references.variables();

        let bound: HashSet<&str> = MACRO_VARIABLE_REGEX
            .captures_iter(expression)
            .filter_map(|caps| caps.get(1))
            .map(|m| m.as_str())
            .collect();

        if let Some(undeclared) = variables
            .iter()
            .find(|name| !bound.contains(**name) && !self.declarations.iter().any(|d| d == **name))
        {
            return Err(CompileError {
                message: format!("undeclared reference to '{undeclared}'"),
            });
        }

        let referenced_inputs = self
            .declarations
            .iter()
            .filter(|name| variables.contains(&name.as_str()))
            .cloned()
            .collect();

        Ok(CompiledProgram {
            program,
            referenced_inputs,
            declarations: self.declarations.clone(),
        })
    }
}

impl core::fmt::Debug for CompiledProgram {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("CompiledProgram")
            .field("referenced_inputs", &self.referenced_inputs)
            .field("declarations", &self.declarations)
            .finish_non_exhaustive()
    }
}

impl CompiledProgram {
    /// Declared inputs the expression mentions, in declaration order.
    #[must_use]
    pub fn referenced_inputs(&self) -> &[String] {
        &self.referenced_inputs
    }

    pub fn evaluate(&self, context: &EvaluationContext) -> Result<Value, EvalError> {
        self.program.execute(context.cel_context()).map_err(|e| self.classify_error(e))
    }

    fn classify_error(&self, err: ExecutionError) -> EvalError {
        match err {
            ExecutionError::NoSuchKey(key) => EvalError::MissingBinding { key: key.to_string() },
            ExecutionError::UndeclaredReference(name) if self.declarations.iter().any(|d| d == name.as_str()) => {
                EvalError::MissingBinding { key: name.to_string() }
            }
            other => EvalError::Other { message: other.to_string() },
        }
    }
}
