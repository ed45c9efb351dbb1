use super::cluster::{self, ClusterClient};
use super::{CancelSignal, CollectedInputs, CollectedValue, FetchError, InputProvider, file};
use crate::rule::{CheckType, Input, InputSource, Rule};
use serde::{Deserialize, Serialize};

/// What to do with inputs this build can't collect.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnrecognizedInputPolicy {
    /// Leave the input out of the context and log a warning.
    #[default]
    Skip,

    /// Fail collection.
    Error,
}

/// Reasons collection aborts. Each names the input being processed when it failed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CollectionError {
    #[error("no cluster credentials for input '{input}': {message}")]
    MissingCredentials { input: String, message: String },

    #[error("could not collect input '{input}': {message}")]
    ProviderUnavailable { input: String, message: String },

    #[error("input '{input}': {what} not found")]
    ResourceNotFound { input: String, what: String },

    #[error("input '{input}': access to {what} is forbidden")]
    Forbidden { input: String, what: String },

    #[error("input '{input}' has unsupported type '{input_type}'")]
    UnsupportedInputType { input: String, input_type: String },

    #[error("input '{input}' belongs to unsupported check type '{check_type}'")]
    UnsupportedCheckType { input: String, check_type: String },

    #[error("collection cancelled while processing input '{input}'")]
    Cancelled { input: String },
}

impl CollectionError {
    /// Name of the input being processed when collection failed.
    #[must_use]
    pub fn input(&self) -> &str {
        match self {
            Self::MissingCredentials { input, .. }
            | Self::ProviderUnavailable { input, .. }
            | Self::ResourceNotFound { input, .. }
            | Self::Forbidden { input, .. }
            | Self::UnsupportedInputType { input, .. }
            | Self::UnsupportedCheckType { input, .. }
            | Self::Cancelled { input } => input,
        }
    }

    fn from_fetch(input: &str, err: FetchError) -> Self {
        let input = input.to_string();
        match err {
            FetchError::NotFound(what) => Self::ResourceNotFound { input, what },
            FetchError::Forbidden(what) => Self::Forbidden { input, what },
            FetchError::Unauthorized(message) => Self::MissingCredentials { input, message },
            FetchError::Unavailable(message) => Self::ProviderUnavailable { input, message },
        }
    }
}

/// Collects the inputs of a rule, one at a time in document order.
#[derive(Debug)]
pub struct Collector<C> {
    cluster: Option<cluster::Provider<C>>,
    files: file::Provider,
    policy: UnrecognizedInputPolicy,
}

impl<C: ClusterClient> Collector<C> {
    /// Create a collector. Without a cluster client, any rule that needs one fails with
    /// [`CollectionError::MissingCredentials`].
    #[must_use]
    pub fn new(cluster: Option<C>, policy: UnrecognizedInputPolicy) -> Self {
        Self {
            cluster: cluster.map(cluster::Provider::new),
            files: file::Provider::new(),
            policy,
        }
    }

    /// Fetch every processed input of `rule`.
    ///
    /// The first failure aborts collection; nothing partial is returned.
    pub async fn collect(&self, rule: &Rule, cancel: &CancelSignal) -> Result<CollectedInputs, CollectionError> {
        let inputs = self.processed_inputs(rule)?;

        // fail fast so a missing kubeconfig is reported before any file is read
        if self.cluster.is_none()
            && let Some(input) = inputs.iter().find(|input| matches!(input.source(), InputSource::ClusterResource(_)))
        {
            return Err(CollectionError::MissingCredentials {
                input: input.name().to_string(),
                message: "no kubeconfig was provided".to_string(),
            });
        }

        log::info!("collecting {} input(s) for rule '{}'", inputs.len(), rule.title());

        let mut collected = CollectedInputs::new();
        for input in inputs {
            if cancel.is_cancelled() {
                return Err(CollectionError::Cancelled {
                    input: input.name().to_string(),
                });
            }

            log::debug!("fetching input '{}' from {}", input.name(), input.coordinates());

            let value = tokio::select! {
                biased;
                () = cancel.cancelled() => {
                    return Err(CollectionError::Cancelled { input: input.name().to_string() });
                }
                result = self.fetch(input) => result?,
            };

            collected.insert(input.name(), value);
        }

        log::info!("collected {} input(s)", collected.len());
        Ok(collected)
    }

    /// Inputs that will be fetched, after applying the unrecognized-input policy.
    fn processed_inputs<'a>(&self, rule: &'a Rule) -> Result<Vec<&'a Input>, CollectionError> {
        if let CheckType::Unrecognized(check_type) = rule.check_type() {
            if let Some(input) = rule.inputs().first()
                && self.policy == UnrecognizedInputPolicy::Error
            {
                return Err(CollectionError::UnsupportedCheckType {
                    input: input.name().to_string(),
                    check_type: check_type.clone(),
                });
            }

            for input in rule.inputs() {
                log::warn!("skipping input '{}': check type '{check_type}' is not supported", input.name());
            }

            return Ok(Vec::new());
        }

        let mut processed = Vec::with_capacity(rule.inputs().len());
        for input in rule.inputs() {
            if let InputSource::Unrecognized(input_type) = input.source() {
                if self.policy == UnrecognizedInputPolicy::Error {
                    return Err(CollectionError::UnsupportedInputType {
                        input: input.name().to_string(),
                        input_type: input_type.clone(),
                    });
                }

                log::warn!("skipping input '{}': input type '{input_type}' is not supported", input.name());
                continue;
            }

            processed.push(input);
        }

        Ok(processed)
    }

    async fn fetch(&self, input: &Input) -> Result<CollectedValue, CollectionError> {
        let result = match input.source() {
            InputSource::ClusterResource(locator) => match &self.cluster {
                Some(provider) => provider.fetch(locator).await,
                None => Err(FetchError::Unauthorized("no kubeconfig was provided".to_string())),
            },
            InputSource::File(locator) => self.files.fetch(locator).await,
            InputSource::Unrecognized(input_type) => {
                return Err(CollectionError::UnsupportedInputType {
                    input: input.name().to_string(),
                    input_type: input_type.clone(),
                });
            }
        };

        result.map_err(|e| CollectionError::from_fetch(input.name(), e))
    }
}

/// Whether collecting `rule` will touch the cluster.
///
/// Lets callers skip reading a kubeconfig for rules that only read files.
#[must_use]
pub fn needs_cluster(rule: &Rule) -> bool {
    *rule.check_type() == CheckType::Platform
        && rule
            .inputs()
            .iter()
            .any(|input| matches!(input.source(), InputSource::ClusterResource(_)))
}
