use core::fmt;
use serde::Deserialize;

/// A named data source referenced by a rule expression.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "InputDoc")]
pub struct Input {
    name: String,
    source: InputSource,
}

/// Where an input's data comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputSource {
    /// A Kubernetes resource, selected by group/version/resource.
    ClusterResource(ResourceLocator),

    /// A file on the local filesystem.
    File(FileLocator),

    /// An input type this build doesn't know how to collect. Holds the type name as written.
    Unrecognized(String),
}

/// Coordinates of a cluster resource.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceLocator {
    pub api_group: String,
    pub version: String,
    pub resource: String,

    /// Name of a single object to fetch. When absent, the whole collection is listed.
    pub sub_resource: Option<String>,

    /// Namespace scope. When absent, the resource is treated as cluster-scoped.
    pub namespace: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileLocator {
    pub path: String,
}

/// Input type names as they appear in rule documents.
pub const CLUSTER_RESOURCE_TYPE: &str = "KubeGroupVersionResource";
pub const FILE_TYPE: &str = "File";

impl Input {
    #[must_use]
    pub fn new(name: impl Into<String>, source: InputSource) -> Self {
        Self { name: name.into(), source }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub const fn source(&self) -> &InputSource {
        &self.source
    }

    /// Human-readable description of where this input's data lives.
    #[must_use]
    pub fn coordinates(&self) -> String {
        match &self.source {
            InputSource::ClusterResource(locator) => locator.to_string(),
            InputSource::File(locator) => format!("file {}", locator.path),
            InputSource::Unrecognized(kind) => format!("unrecognized input type '{kind}'"),
        }
    }
}

impl InputSource {
    /// The input type name used in rule documents.
    #[must_use]
    pub fn type_name(&self) -> &str {
        match self {
            Self::ClusterResource(_) => CLUSTER_RESOURCE_TYPE,
            Self::File(_) => FILE_TYPE,
            Self::Unrecognized(kind) => kind,
        }
    }
}

impl ResourceLocator {
    #[must_use]
    pub fn is_single_object(&self) -> bool {
        self.sub_resource.is_some()
    }

    #[must_use]
    pub fn is_namespaced(&self) -> bool {
        self.namespace.is_some()
    }
}

impl fmt::Display for ResourceLocator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.api_group.is_empty() {
            write!(f, "{}/{}", self.version, self.resource)?;
        } else {
            write!(f, "{}/{}/{}", self.api_group, self.version, self.resource)?;
        }

        if let Some(name) = &self.sub_resource {
            write!(f, "/{name}")?;
        }

        if let Some(namespace) = &self.namespace {
            write!(f, " in namespace {namespace}")?;
        }

        Ok(())
    }
}

/// Wire shape of an input in a rule document.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct InputDoc {
    name: String,
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    api_group: String,
    #[serde(default)]
    version: String,
    #[serde(default)]
    resource: String,
    #[serde(default)]
    sub_resource: Option<String>,
    #[serde(default)]
    namespace: Option<String>,
    #[serde(default)]
    path: String,
}

impl From<InputDoc> for Input {
    fn from(doc: InputDoc) -> Self {
        let source = match doc.kind.as_str() {
            CLUSTER_RESOURCE_TYPE => InputSource::ClusterResource(ResourceLocator {
                api_group: doc.api_group,
                version: doc.version,
                resource: doc.resource,
                sub_resource: doc.sub_resource.filter(|s| !s.is_empty()),
                namespace: doc.namespace.filter(|s| !s.is_empty()),
            }),
            FILE_TYPE => InputSource::File(FileLocator { path: doc.path }),
            _ => InputSource::Unrecognized(doc.kind),
        };

        Self { name: doc.name, source }
    }
}
