use super::functions;
use super::values::to_cel_value;
use crate::inputs::CollectedInputs;
use cel_interpreter::Context;
use core::fmt;
use serde_json::Value;

/// Variables and functions visible to one evaluation.
///
/// Each collected input becomes one dynamically typed variable named after the
/// input, bound to its normalized value. The decode helpers are always present.
pub struct EvaluationContext {
    bindings: Vec<(String, Value)>,
    cel: Context<'static>,
}

impl EvaluationContext {
    #[must_use]
    pub fn build(collected: CollectedInputs) -> Self {
        let mut cel = Context::default();
        functions::register(&mut cel);

        let mut bindings = Vec::with_capacity(collected.len());
        for (name, value) in collected {
            let normalized = value.normalize();
            cel.add_variable_from_value(name.clone(), to_cel_value(&normalized));
            bindings.push((name, normalized));
        }

        log::debug!("built evaluation context with {} variable(s)", bindings.len());

        Self { bindings, cel }
    }

    /// Names of the declared variables, in input order.
    pub fn declarations(&self) -> impl Iterator<Item = &str> {
        self.bindings.iter().map(|(name, _)| name.as_str())
    }

    /// The normalized value bound to `name`.
    #[must_use]
    pub fn binding(&self, name: &str) -> Option<&Value> {
        self.bindings.iter().find(|(existing, _)| existing == name).map(|(_, value)| value)
    }

    #[must_use]
    pub const fn cel_context(&self) -> &Context<'static> {
        &self.cel
    }
}

impl fmt::Debug for EvaluationContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EvaluationContext")
            .field("declarations", &self.declarations().collect::<Vec<_>>())
            .field("cel", &"<cel context>")
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inputs::{CollectedValue, Object};
    use serde_json::json;

    fn object(value: Value) -> Object {
        match value {
            Value::Object(map) => map,
            other => panic!("not an object: {other}"),
        }
    }

    #[test]
    fn test_one_declaration_per_input() {
        let mut collected = CollectedInputs::new();
        collected.insert("nodes", CollectedValue::Collection(vec![object(json!({"kind": "Node"}))]));
        collected.insert("kubelet", CollectedValue::Object(object(json!({"content": "{}"}))));
        collected.insert("empty", CollectedValue::Collection(Vec::new()));

        let context = EvaluationContext::build(collected);

        assert_eq!(context.declarations().collect::<Vec<_>>(), ["nodes", "kubelet", "empty"]);
        assert_eq!(context.binding("nodes"), Some(&json!({"items": [{"kind": "Node"}]})));
        assert_eq!(context.binding("kubelet"), Some(&json!({"content": "{}"})));
        assert_eq!(context.binding("empty"), Some(&json!({"items": []})));
        assert_eq!(context.binding("other"), None);
    }

    #[test]
    fn test_empty_context_has_no_declarations() {
        let context = EvaluationContext::build(CollectedInputs::new());
        assert_eq!(context.declarations().count(), 0);
    }

    #[test]
    fn test_debug_lists_declarations() {
        let mut collected = CollectedInputs::new();
        collected.insert("pods", CollectedValue::Collection(Vec::new()));

        let rendered = format!("{:?}", EvaluationContext::build(collected));

        assert!(rendered.contains("\"pods\""), "{rendered}");
    }
}
