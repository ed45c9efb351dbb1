use crate::inputs::{FetchError, Object};
use crate::rule::ResourceLocator;
use core::fmt;

/// Identifies a kind of cluster resource.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GroupVersionResource {
    /// API group; empty for the core group.
    pub group: String,
    pub version: String,
    pub resource: String,
}

impl GroupVersionResource {
    #[must_use]
    pub fn new(group: impl Into<String>, version: impl Into<String>, resource: impl Into<String>) -> Self {
        Self {
            group: group.into(),
            version: version.into(),
            resource: resource.into(),
        }
    }
}

impl From<&ResourceLocator> for GroupVersionResource {
    fn from(locator: &ResourceLocator) -> Self {
        Self::new(&locator.api_group, &locator.version, &locator.resource)
    }
}

impl fmt::Display for GroupVersionResource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.group.is_empty() {
            write!(f, "{}/{}", self.version, self.resource)
        } else {
            write!(f, "{}/{}/{}", self.group, self.version, self.resource)
        }
    }
}

/// Read access to a cluster's resources.
///
/// A `namespace` of `None` addresses cluster-scoped resources.
pub trait ClusterClient {
    /// Fetch one named object.
    fn get(&self, gvr: &GroupVersionResource, name: &str, namespace: Option<&str>) -> impl Future<Output = Result<Object, FetchError>>;

    /// Fetch every object of a kind, in server order.
    fn list(&self, gvr: &GroupVersionResource, namespace: Option<&str>) -> impl Future<Output = Result<Vec<Object>, FetchError>>;
}

impl<C: ClusterClient> ClusterClient for &C {
    fn get(&self, gvr: &GroupVersionResource, name: &str, namespace: Option<&str>) -> impl Future<Output = Result<Object, FetchError>> {
        (**self).get(gvr, name, namespace)
    }

    fn list(&self, gvr: &GroupVersionResource, namespace: Option<&str>) -> impl Future<Output = Result<Vec<Object>, FetchError>> {
        (**self).list(gvr, namespace)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_core_group() {
        assert_eq!(GroupVersionResource::new("", "v1", "pods").to_string(), "v1/pods");
    }

    #[test]
    fn test_display_named_group() {
        assert_eq!(
            GroupVersionResource::new("rbac.authorization.k8s.io", "v1", "clusterroles").to_string(),
            "rbac.authorization.k8s.io/v1/clusterroles"
        );
    }

    #[test]
    fn test_from_locator() {
        let locator = ResourceLocator {
            api_group: "apps".to_string(),
            version: "v1".to_string(),
            resource: "daemonsets".to_string(),
            sub_resource: Some("kube-proxy".to_string()),
            namespace: Some("kube-system".to_string()),
        };

        assert_eq!(GroupVersionResource::from(&locator), GroupVersionResource::new("apps", "v1", "daemonsets"));
    }
}
