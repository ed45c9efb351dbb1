//! Kubernetes API client over plain HTTP(S)
//!
//! Issues unauthenticated-by-default `GET`s against the REST paths of the API
//! server named by a kubeconfig. Each request is tried once; timeouts come
//! from the underlying `reqwest` client.

use super::kubeconfig::{Auth, Connection, Kubeconfig};
use super::{ClusterClient, GroupVersionResource};
use crate::Result;
use crate::inputs::{FetchError, Object};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use camino::Utf8Path;
use core::time::Duration;
use ohno::IntoAppError;
use reqwest::StatusCode;
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use serde::Deserialize;
use serde_json::Value;
use url::Url;

#[derive(Debug, Clone)]
pub struct HttpClusterClient {
    client: reqwest::Client,
    server: Url,
}

/// Shape of a Kubernetes list response.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListResponse {
    #[serde(default)]
    api_version: Option<String>,
    #[serde(default)]
    kind: Option<String>,
    #[serde(default)]
    items: Option<Vec<Object>>,
}

impl HttpClusterClient {
    /// Build a client for the current context of the kubeconfig at `path`.
    pub fn from_kubeconfig(path: &Utf8Path, timeout: Duration) -> Result<Self> {
        let connection = Kubeconfig::load(path)?.connection()?;
        Self::new(&connection, timeout)
    }

    pub fn new(connection: &Connection, timeout: Duration) -> Result<Self> {
        let mut builder = reqwest::Client::builder().user_agent("rulecheck").timeout(timeout);

        if let Some(ca) = &connection.ca_pem {
            let certificate = reqwest::Certificate::from_pem(ca).into_app_err("parsing cluster certificate authority")?;
            builder = builder.add_root_certificate(certificate);
        }

        if connection.insecure_skip_tls_verify {
            builder = builder.danger_accept_invalid_certs(true);
        }

        match &connection.auth {
            Auth::None => {}
            Auth::Bearer(token) => builder = builder.default_headers(authorization(&format!("Bearer {token}"))?),
            Auth::Basic { username, password } => {
                let encoded = STANDARD.encode(format!("{username}:{password}"));
                builder = builder.default_headers(authorization(&format!("Basic {encoded}"))?);
            }
            Auth::ClientCertificate(pem) => {
                let identity = reqwest::Identity::from_pem(pem).into_app_err("parsing client certificate and key")?;
                builder = builder.identity(identity);
            }
        }

        Ok(Self {
            client: builder.build()?,
            server: connection.server.clone(),
        })
    }

    /// Get the API server URL for this client
    #[must_use]
    pub const fn server(&self) -> &Url {
        &self.server
    }

    /// REST path of a resource: `/api/{v}` for the core group, `/apis/{g}/{v}` otherwise.
    fn resource_url(&self, gvr: &GroupVersionResource, namespace: Option<&str>, name: Option<&str>) -> Result<Url, FetchError> {
        let mut url = self.server.clone();
        {
            let mut segments = url
                .path_segments_mut()
                .map_err(|()| FetchError::Unavailable(format!("cluster server URL '{}' cannot be used as a base", self.server)))?;
            let _ = segments.pop_if_empty();

            if gvr.group.is_empty() {
                let _ = segments.extend(["api", gvr.version.as_str()]);
            } else {
                let _ = segments.extend(["apis", gvr.group.as_str(), gvr.version.as_str()]);
            }

            if let Some(namespace) = namespace {
                let _ = segments.extend(["namespaces", namespace]);
            }

            let _ = segments.push(&gvr.resource);

            if let Some(name) = name {
                let _ = segments.push(name);
            }
        }

        Ok(url)
    }

    async fn get_json(&self, url: Url, what: &str) -> Result<Value, FetchError> {
        log::debug!("GET {url}");

        let resp = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| FetchError::Unavailable(format!("request to {url} failed: {e}")))?;

        let status = resp.status();
        if status.is_success() {
            return resp
                .json::<Value>()
                .await
                .map_err(|e| FetchError::Unavailable(format!("invalid response from {url}: {e}")));
        }

        let detail = status_message(resp).await;
        log::debug!("GET {url} returned {status}: {detail}");

        Err(match status {
            StatusCode::NOT_FOUND => FetchError::NotFound(what.to_string()),
            StatusCode::FORBIDDEN => FetchError::Forbidden(format!("{what} ({detail})")),
            StatusCode::UNAUTHORIZED => FetchError::Unauthorized(detail),
            _ => FetchError::Unavailable(format!("{url} returned HTTP {status}: {detail}")),
        })
    }
}

impl ClusterClient for HttpClusterClient {
    async fn get(&self, gvr: &GroupVersionResource, name: &str, namespace: Option<&str>) -> Result<Object, FetchError> {
        let url = self.resource_url(gvr, namespace, Some(name))?;
        let what = describe(gvr, namespace, Some(name));

        match self.get_json(url, &what).await? {
            Value::Object(object) => Ok(object),
            other => Err(FetchError::Unavailable(format!("expected an object for {what}, got {other}"))),
        }
    }

    async fn list(&self, gvr: &GroupVersionResource, namespace: Option<&str>) -> Result<Vec<Object>, FetchError> {
        let url = self.resource_url(gvr, namespace, None)?;
        let what = describe(gvr, namespace, None);

        let body = self.get_json(url, &what).await?;
        let list: ListResponse =
            serde_json::from_value(body).map_err(|e| FetchError::Unavailable(format!("expected a list for {what}: {e}")))?;

        Ok(fill_item_types(list))
    }
}

/// List items usually omit `apiVersion` and `kind`; recover them from the list itself.
fn fill_item_types(list: ListResponse) -> Vec<Object> {
    let item_kind = list.kind.as_deref().and_then(|kind| kind.strip_suffix("List")).filter(|kind| !kind.is_empty());
    let mut items = list.items.unwrap_or_default();

    for item in &mut items {
        if let Some(api_version) = &list.api_version
            && !item.contains_key("apiVersion")
        {
            let _ = item.insert("apiVersion".to_string(), Value::String(api_version.clone()));
        }

        if let Some(kind) = item_kind
            && !item.contains_key("kind")
        {
            let _ = item.insert("kind".to_string(), Value::String(kind.to_string()));
        }
    }

    items
}

fn describe(gvr: &GroupVersionResource, namespace: Option<&str>, name: Option<&str>) -> String {
    let mut what = gvr.to_string();
    if let Some(name) = name {
        what.push('/');
        what.push_str(name);
    }

    if let Some(namespace) = namespace {
        what.push_str(" in namespace ");
        what.push_str(namespace);
    }

    what
}

/// Pull the human-readable message out of a Kubernetes `Status` body, falling back to the raw text.
async fn status_message(resp: reqwest::Response) -> String {
    let text = resp.text().await.unwrap_or_default();
    serde_json::from_str::<Value>(&text)
        .ok()
        .and_then(|body| body.get("message").and_then(Value::as_str).map(str::to_string))
        .unwrap_or(text)
}

fn authorization(value: &str) -> Result<HeaderMap> {
    let mut auth_val = HeaderValue::from_str(value)?;
    auth_val.set_sensitive(true);

    let mut headers = HeaderMap::new();
    let _ = headers.insert(AUTHORIZATION, auth_val);
    Ok(headers)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn client(server: &str) -> HttpClusterClient {
        let connection = Connection {
            server: Url::parse(server).unwrap(),
            ca_pem: None,
            insecure_skip_tls_verify: false,
            auth: Auth::None,
        };
        HttpClusterClient::new(&connection, Duration::from_secs(5)).unwrap()
    }

    #[test]
    fn test_core_group_collection_url() {
        let url = client("https://k8s.example.com:6443")
            .resource_url(&GroupVersionResource::new("", "v1", "nodes"), None, None)
            .unwrap();
        assert_eq!(url.as_str(), "https://k8s.example.com:6443/api/v1/nodes");
    }

    #[test]
    fn test_named_group_namespaced_object_url() {
        let url = client("https://k8s.example.com")
            .resource_url(&GroupVersionResource::new("apps", "v1", "deployments"), Some("kube-system"), Some("coredns"))
            .unwrap();
        assert_eq!(url.as_str(), "https://k8s.example.com/apis/apps/v1/namespaces/kube-system/deployments/coredns");
    }

    #[test]
    fn test_server_path_prefix_is_kept() {
        let url = client("https://rancher.example.com/k8s/clusters/c-1/")
            .resource_url(&GroupVersionResource::new("", "v1", "namespaces"), None, Some("default"))
            .unwrap();
        assert_eq!(url.as_str(), "https://rancher.example.com/k8s/clusters/c-1/api/v1/namespaces/default");
    }

    #[test]
    fn test_fill_item_types() {
        let list: ListResponse = serde_json::from_value(json!({
            "apiVersion": "v1",
            "kind": "PodList",
            "items": [
                {"metadata": {"name": "a"}},
                {"apiVersion": "v2", "kind": "Other", "metadata": {"name": "b"}}
            ]
        }))
        .unwrap();

        let items = fill_item_types(list);

        assert_eq!(Value::Object(items[0].clone()), json!({"apiVersion": "v1", "kind": "Pod", "metadata": {"name": "a"}}));
        assert_eq!(items[1]["apiVersion"], "v2");
        assert_eq!(items[1]["kind"], "Other");
    }

    #[test]
    fn test_fill_item_types_without_items() {
        let list: ListResponse = serde_json::from_value(json!({"kind": "PodList", "items": null})).unwrap();
        assert!(fill_item_types(list).is_empty());
    }

    #[test]
    fn test_describe() {
        let gvr = GroupVersionResource::new("", "v1", "configmaps");
        assert_eq!(describe(&gvr, Some("kube-system"), Some("kubelet")), "v1/configmaps/kubelet in namespace kube-system");
        assert_eq!(describe(&gvr, None, None), "v1/configmaps");
    }
}
