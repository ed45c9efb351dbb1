//! Conversions between generic document values and CEL values

use crate::inputs::Object;
use cel_interpreter::Value;
use cel_interpreter::objects::{Key, Map};
use std::collections::HashMap;
use std::sync::Arc;

/// Text that couldn't be decoded into a mapping.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DecodeError {
    #[error("invalid JSON: {0}")]
    Json(String),

    #[error("invalid YAML: {0}")]
    Yaml(String),

    #[error("expected a mapping at the top level, found {0}")]
    NotAMapping(&'static str),
}

/// Convert a generic value into the engine's value model.
///
/// Integers that fit in `i64` become `Int`, larger ones `UInt`, everything else `Float`.
#[must_use]
pub fn to_cel_value(value: &serde_json::Value) -> Value {
    match value {
        serde_json::Value::Null => Value::Null,
        serde_json::Value::Bool(b) => Value::Bool(*b),
        serde_json::Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Value::Int(i)
            } else if let Some(u) = n.as_u64() {
                Value::UInt(u)
            } else {
                Value::Float(n.as_f64().unwrap_or(f64::NAN))
            }
        }
        serde_json::Value::String(s) => Value::String(Arc::new(s.clone())),
        serde_json::Value::Array(items) => Value::List(Arc::new(items.iter().map(to_cel_value).collect())),
        serde_json::Value::Object(object) => object_to_cel(object),
    }
}

/// Convert an attribute mapping into a CEL map keyed by string.
#[must_use]
pub fn object_to_cel(object: &Object) -> Value {
    let map: HashMap<Key, Value> = object
        .iter()
        .map(|(k, v)| (Key::String(Arc::new(k.clone())), to_cel_value(v)))
        .collect();

    Value::Map(Map::from(map))
}

pub fn decode_json(text: &str) -> Result<Object, DecodeError> {
    let value: serde_json::Value = serde_json::from_str(text).map_err(|e| DecodeError::Json(e.to_string()))?;
    into_object(value)
}

pub fn decode_yaml(text: &str) -> Result<Object, DecodeError> {
    let value: serde_json::Value = serde_yaml::from_str(text).map_err(|e| DecodeError::Yaml(e.to_string()))?;
    into_object(value)
}

#[must_use]
pub fn encode_json(object: &Object) -> String {
    serde_json::Value::Object(object.clone()).to_string()
}

pub fn encode_yaml(object: &Object) -> Result<String, serde_yaml::Error> {
    serde_yaml::to_string(object)
}

fn into_object(value: serde_json::Value) -> Result<Object, DecodeError> {
    match value {
        serde_json::Value::Object(object) => Ok(object),
        other => Err(DecodeError::NotAMapping(kind_name(&other))),
    }
}

const fn kind_name(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "a boolean",
        serde_json::Value::Number(_) => "a number",
        serde_json::Value::String(_) => "a string",
        serde_json::Value::Array(_) => "a sequence",
        serde_json::Value::Object(_) => "a mapping",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn object(value: serde_json::Value) -> Object {
        match value {
            serde_json::Value::Object(map) => map,
            other => panic!("not an object: {other}"),
        }
    }

    fn sample() -> Object {
        object(json!({
            "apiVersion": "kubelet.config.k8s.io/v1beta1",
            "maxPods": 110,
            "evictionHard": {"memory.available": "100Mi"},
            "featureGates": {"RotateKubeletServerCertificate": true},
            "clusterDNS": ["10.96.0.10"],
            "cpuCFSQuotaPeriod": null,
            "imageGCHighThresholdPercent": 85.5
        }))
    }

    #[test]
    fn test_scalars() {
        assert_eq!(to_cel_value(&json!(null)), Value::Null);
        assert_eq!(to_cel_value(&json!(true)), Value::Bool(true));
        assert_eq!(to_cel_value(&json!(-3)), Value::Int(-3));
        assert_eq!(to_cel_value(&json!(u64::MAX)), Value::UInt(u64::MAX));
        assert_eq!(to_cel_value(&json!(0.25)), Value::Float(0.25));
        assert_eq!(to_cel_value(&json!("x")), Value::String(Arc::new("x".to_string())));
    }

    #[test]
    fn test_list_preserves_order() {
        let value = to_cel_value(&json!([3, 1, 2]));
        assert_eq!(value, Value::List(Arc::new(vec![Value::Int(3), Value::Int(1), Value::Int(2)])));
    }

    #[test]
    fn test_json_round_trip() {
        let value = sample();
        assert_eq!(decode_json(&encode_json(&value)).unwrap(), value);
    }

    #[test]
    fn test_yaml_round_trip() {
        let value = sample();
        assert_eq!(decode_yaml(&encode_yaml(&value).unwrap()).unwrap(), value);
    }

    #[test]
    fn test_decode_yaml_document() {
        let decoded = decode_yaml("authentication:\n  anonymous:\n    enabled: false\n").unwrap();
        assert_eq!(
            serde_json::Value::Object(decoded),
            json!({"authentication": {"anonymous": {"enabled": false}}})
        );
    }

    #[test]
    fn test_decode_json_malformed() {
        let err = decode_json("{\"a\": ").unwrap_err();
        assert!(matches!(err, DecodeError::Json(_)), "{err:?}");
    }

    #[test]
    fn test_decode_yaml_malformed() {
        let err = decode_yaml("a: [1, 2").unwrap_err();
        assert!(matches!(err, DecodeError::Yaml(_)), "{err:?}");
    }

    #[test]
    fn test_top_level_must_be_mapping() {
        assert_eq!(decode_json("[1, 2]").unwrap_err(), DecodeError::NotAMapping("a sequence"));
        assert_eq!(decode_yaml("just text").unwrap_err(), DecodeError::NotAMapping("a string"));
        assert_eq!(
            decode_json("42").unwrap_err().to_string(),
            "expected a mapping at the top level, found a number"
        );
    }
}
