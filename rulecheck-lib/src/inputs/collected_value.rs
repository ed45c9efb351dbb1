use serde_json::Value;

/// Attribute mapping of a single fetched object.
pub type Object = serde_json::Map<String, Value>;

/// Raw result of fetching one input, before it's exposed to expressions.
#[derive(Debug, Clone, PartialEq)]
pub enum CollectedValue {
    /// A single named object.
    Object(Object),

    /// Every object of a kind, in the order the provider returned them.
    Collection(Vec<Object>),
}

impl CollectedValue {
    /// Normalize into the generic shape bound to an expression variable.
    ///
    /// A single object becomes its attribute mapping. A collection becomes a
    /// mapping with one key, `items`, holding the objects in order.
    #[must_use]
    pub fn normalize(self) -> Value {
        match self {
            Self::Object(object) => Value::Object(object),
            Self::Collection(items) => {
                let mut wrapper = Object::new();
                let _ = wrapper.insert("items".to_string(), Value::Array(items.into_iter().map(Value::Object).collect()));
                Value::Object(wrapper)
            }
        }
    }

    #[must_use]
    pub const fn is_collection(&self) -> bool {
        matches!(self, Self::Collection(_))
    }
}

/// Values collected for a rule, keyed by input name, in rule document order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CollectedInputs {
    entries: Vec<(String, CollectedValue)>,
}

impl CollectedInputs {
    #[must_use]
    pub const fn new() -> Self {
        Self { entries: Vec::new() }
    }

    /// Bind `value` to `name`. Input names are unique within a loaded rule, so
    /// a repeated name only happens through direct construction; the later value wins.
    pub fn insert(&mut self, name: impl Into<String>, value: CollectedValue) {
        let name = name.into();
        if let Some(entry) = self.entries.iter_mut().find(|(existing, _)| *existing == name) {
            entry.1 = value;
        } else {
            self.entries.push((name, value));
        }
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&CollectedValue> {
        self.entries.iter().find(|(existing, _)| existing == name).map(|(_, value)| value)
    }

    #[must_use]
    pub const fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(name, _)| name.as_str())
    }
}

impl IntoIterator for CollectedInputs {
    type Item = (String, CollectedValue);
    type IntoIter = std::vec::IntoIter<(String, CollectedValue)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn object(value: Value) -> Object {
        match value {
            Value::Object(map) => map,
            other => panic!("not an object: {other}"),
        }
    }

    #[test]
    fn test_single_object_normalizes_to_itself() {
        let pod = object(json!({"kind": "Pod", "metadata": {"name": "a"}}));
        let normalized = CollectedValue::Object(pod.clone()).normalize();
        assert_eq!(normalized, Value::Object(pod));
    }

    #[test]
    fn test_collection_normalizes_to_items_mapping() {
        let a = object(json!({"metadata": {"name": "a"}}));
        let b = object(json!({"metadata": {"name": "b"}}));

        let normalized = CollectedValue::Collection(vec![a, b]).normalize();

        assert_eq!(
            normalized,
            json!({"items": [{"metadata": {"name": "a"}}, {"metadata": {"name": "b"}}]})
        );
    }

    #[test]
    fn test_empty_collection_still_has_items() {
        let normalized = CollectedValue::Collection(Vec::new()).normalize();
        assert_eq!(normalized, json!({"items": []}));
    }

    #[test]
    fn test_collected_inputs_preserve_insertion_order() {
        let mut inputs = CollectedInputs::new();
        inputs.insert("zeta", CollectedValue::Collection(Vec::new()));
        inputs.insert("alpha", CollectedValue::Object(Object::new()));

        assert_eq!(inputs.names().collect::<Vec<_>>(), vec!["zeta", "alpha"]);
        assert_eq!(inputs.len(), 2);
        assert!(inputs.get("zeta").unwrap().is_collection());
        assert!(inputs.get("missing").is_none());
    }

    #[test]
    fn test_collected_inputs_last_write_wins() {
        let mut inputs = CollectedInputs::new();
        inputs.insert("a", CollectedValue::Collection(Vec::new()));
        inputs.insert("a", CollectedValue::Object(Object::new()));

        assert_eq!(inputs.len(), 1);
        assert!(!inputs.get("a").unwrap().is_collection());
    }
}
