use crate::inputs::{CollectedValue, FetchError, InputProvider, Object};
use crate::rule::FileLocator;
use serde_json::Value;
use std::io::ErrorKind;

/// Reads local files named by a [`FileLocator`].
///
/// The collected object carries the path as written in the rule, the file's
/// text content, and its size in bytes.
#[derive(Debug, Clone, Copy, Default)]
pub struct Provider;

impl Provider {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl InputProvider for Provider {
    type Locator = FileLocator;

    async fn fetch(&self, locator: &FileLocator) -> Result<CollectedValue, FetchError> {
        log::debug!("reading file '{}'", locator.path);

        let content = tokio::fs::read_to_string(&locator.path).await.map_err(|e| match e.kind() {
            ErrorKind::NotFound => FetchError::NotFound(format!("file '{}'", locator.path)),
            _ => FetchError::Unavailable(format!("could not read file '{}': {e}", locator.path)),
        })?;

        let mut object = Object::new();
        let _ = object.insert("path".to_string(), Value::String(locator.path.clone()));
        let _ = object.insert("size".to_string(), Value::from(content.len()));
        let _ = object.insert("content".to_string(), Value::String(content));

        Ok(CollectedValue::Object(object))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::fs;

    #[tokio::test]
    async fn test_reads_file_into_object() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("kubelet.yaml");
        fs::write(&path, "maxPods: 110\n").unwrap();
        let path = path.to_str().unwrap().to_string();

        let value = Provider::new().fetch(&FileLocator { path: path.clone() }).await.unwrap();

        let CollectedValue::Object(object) = value else {
            panic!("expected an object");
        };
        assert_eq!(
            Value::Object(object),
            json!({"path": path, "content": "maxPods: 110\n", "size": 13})
        );
    }

    #[tokio::test]
    async fn test_missing_file_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.json").to_str().unwrap().to_string();

        let err = Provider::new().fetch(&FileLocator { path: path.clone() }).await.unwrap_err();

        assert_eq!(err, FetchError::NotFound(format!("file '{path}'")));
    }

    #[tokio::test]
    async fn test_directory_is_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().to_str().unwrap().to_string();

        let err = Provider::new().fetch(&FileLocator { path }).await.unwrap_err();

        assert!(matches!(err, FetchError::Unavailable(_)), "{err:?}");
    }
}
