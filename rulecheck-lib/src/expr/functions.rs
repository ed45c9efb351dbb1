//! Decode helpers callable from rule expressions
//!
//! Both functions accept a string either as the receiver (`s.parseJSON()`) or
//! as the only argument (`parseJSON(s)`) and return a map. Malformed text
//! fails the evaluation, not the run setup.

use super::values::{decode_json, decode_yaml, object_to_cel};
use cel_interpreter::extractors::This;
use cel_interpreter::{Context, ExecutionError, Value};
use std::sync::Arc;

pub const PARSE_JSON: &str = "parseJSON";
pub const PARSE_YAML: &str = "parseYAML";

/// Register the decode helpers with `context`.
pub fn register(context: &mut Context<'_>) {
    context.add_function(PARSE_JSON, parse_json);
    context.add_function(PARSE_YAML, parse_yaml);
}

fn parse_json(This(text): This<Arc<String>>) -> Result<Value, ExecutionError> {
    decode_json(&text)
        .map(|object| object_to_cel(&object))
        .map_err(|e| ExecutionError::function_error(PARSE_JSON, e))
}

fn parse_yaml(This(text): This<Arc<String>>) -> Result<Value, ExecutionError> {
    decode_yaml(&text)
        .map(|object| object_to_cel(&object))
        .map_err(|e| ExecutionError::function_error(PARSE_YAML, e))
}
