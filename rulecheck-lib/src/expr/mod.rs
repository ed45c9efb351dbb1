//! Rule expression evaluation using CEL
//!
//! This module turns collected inputs into something an expression can run
//! against, runs it, and classifies what came back.
//!
//! # Implementation Model
//!
//! An [`EvaluationContext`] is built fresh for every run. Each collected input
//! is normalized and bound as a dynamically typed variable named after the
//! input, and the `parseJSON` / `parseYAML` decode helpers are registered
//! alongside the engine's builtins.
//!
//! An [`Environment`] compiles the rule's expression into a
//! [`CompiledProgram`]. Evaluation failures are sorted by the engine's error
//! kind: a lookup of an absent key becomes [`EvalError::MissingBinding`],
//! everything else [`EvalError::Other`].
//!
//! Finally [`classify`] maps the result onto an [`Outcome`].

mod context;
mod engine;
mod functions;
mod outcome;
mod values;

pub use context::EvaluationContext;
pub use engine::{CompileError, CompiledProgram, Environment, EvalError};
pub use functions::{PARSE_JSON, PARSE_YAML};
pub use outcome::{FatalCause, Outcome, OutcomeKind, classify};
pub use values::{DecodeError, decode_json, decode_yaml, encode_json, encode_yaml, to_cel_value};
