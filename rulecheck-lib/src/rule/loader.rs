use super::Rule;
use camino::Utf8Path;
use std::fs;

/// Why a rule document could not be turned into a [`Rule`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LoadError {
    #[error("could not read rule file '{path}': {message}")]
    FileNotFound { path: String, message: String },

    #[error("could not parse rule document: {message}")]
    ParseError { message: String },

    #[error("input '{0}' is declared more than once")]
    DuplicateInputName(String),
}

/// Read and parse the rule document at `path`.
///
/// Either the whole rule loads or an error is returned; there is no partially populated rule.
pub fn load(path: &Utf8Path) -> Result<Rule, LoadError> {
    let text = fs::read_to_string(path).map_err(|e| LoadError::FileNotFound {
        path: path.to_string(),
        message: e.to_string(),
    })?;

    log::debug!("loaded rule document '{path}' ({} bytes)", text.len());
    Rule::from_yaml(&text)
}
