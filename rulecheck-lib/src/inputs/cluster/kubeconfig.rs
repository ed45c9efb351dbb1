//! Kubeconfig parsing
//!
//! Only the parts needed to reach a cluster's API server are understood: the
//! current context, its cluster's server and CA, and its user's token, basic
//! credentials, or client certificate. Exec and auth-provider plugins are not
//! supported.

use crate::Result;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use camino::{Utf8Path, Utf8PathBuf};
use ohno::{IntoAppError, app_err, bail};
use serde::Deserialize;
use std::fs;
use url::Url;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Kubeconfig {
    #[serde(default)]
    pub current_context: Option<String>,
    #[serde(default)]
    pub clusters: Vec<NamedCluster>,
    #[serde(default)]
    pub contexts: Vec<NamedContext>,
    #[serde(default)]
    pub users: Vec<NamedUser>,

    /// Directory relative file references are resolved against.
    #[serde(skip)]
    base_dir: Option<Utf8PathBuf>,
}

#[derive(Debug, Deserialize)]
pub struct NamedCluster {
    pub name: String,
    pub cluster: ClusterEntry,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ClusterEntry {
    pub server: String,
    #[serde(default)]
    pub certificate_authority: Option<String>,
    #[serde(default)]
    pub certificate_authority_data: Option<String>,
    #[serde(default)]
    pub insecure_skip_tls_verify: bool,
}

#[derive(Debug, Deserialize)]
pub struct NamedContext {
    pub name: String,
    pub context: ContextEntry,
}

#[derive(Debug, Deserialize)]
pub struct ContextEntry {
    pub cluster: String,
    #[serde(default)]
    pub user: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct NamedUser {
    pub name: String,
    #[serde(default)]
    pub user: UserEntry,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct UserEntry {
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default, rename = "tokenFile")]
    pub token_file: Option<String>,
    #[serde(default)]
    pub client_certificate: Option<String>,
    #[serde(default)]
    pub client_certificate_data: Option<String>,
    #[serde(default)]
    pub client_key: Option<String>,
    #[serde(default)]
    pub client_key_data: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

/// Everything needed to open a connection to the current context's API server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Connection {
    pub server: Url,
    pub ca_pem: Option<Vec<u8>>,
    pub insecure_skip_tls_verify: bool,
    pub auth: Auth,
}

#[derive(Clone, PartialEq, Eq)]
pub enum Auth {
    None,
    Bearer(String),
    Basic { username: String, password: String },

    /// PEM-encoded certificate chain followed by the private key.
    ClientCertificate(Vec<u8>),
}

impl core::fmt::Debug for Auth {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::None => f.write_str("None"),
            Self::Bearer(_) => f.write_str("Bearer(<redacted>)"),
            Self::Basic { username, .. } => f.debug_struct("Basic").field("username", username).finish_non_exhaustive(),
            Self::ClientCertificate(_) => f.write_str("ClientCertificate(<redacted>)"),
        }
    }
}

impl Kubeconfig {
    /// Read and parse a kubeconfig file.
    pub fn load(path: &Utf8Path) -> Result<Self> {
        let text = fs::read_to_string(path).into_app_err_with(|| format!("reading kubeconfig '{path}'"))?;
        let mut config = Self::from_yaml(&text).into_app_err_with(|| format!("parsing kubeconfig '{path}'"))?;
        config.base_dir = path.parent().map(Utf8Path::to_path_buf);
        Ok(config)
    }

    pub fn from_yaml(text: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(text)?)
    }

    /// Resolve the current context into connection settings.
    pub fn connection(&self) -> Result<Connection> {
        let context_name = self
            .current_context
            .as_deref()
            .filter(|name| !name.is_empty())
            .into_app_err("kubeconfig has no current-context")?;

        let context = self
            .contexts
            .iter()
            .find(|c| c.name == context_name)
            .map(|c| &c.context)
            .into_app_err_with(|| format!("kubeconfig has no context named '{context_name}'"))?;

        let cluster = self
            .clusters
            .iter()
            .find(|c| c.name == context.cluster)
            .map(|c| &c.cluster)
            .into_app_err_with(|| format!("kubeconfig has no cluster named '{}'", context.cluster))?;

        let server = Url::parse(&cluster.server).into_app_err_with(|| format!("invalid cluster server URL '{}'", cluster.server))?;

        let ca_pem = self.data_or_file(cluster.certificate_authority_data.as_deref(), cluster.certificate_authority.as_deref())?;

        let auth = match &context.user {
            Some(user_name) => {
                let user = self
                    .users
                    .iter()
                    .find(|u| u.name == *user_name)
                    .map(|u| &u.user)
                    .into_app_err_with(|| format!("kubeconfig has no user named '{user_name}'"))?;
                self.auth_for(user)?
            }
            None => Auth::None,
        };

        Ok(Connection {
            server,
            ca_pem,
            insecure_skip_tls_verify: cluster.insecure_skip_tls_verify,
            auth,
        })
    }

    fn auth_for(&self, user: &UserEntry) -> Result<Auth> {
        if let Some(token) = user.token.as_deref().filter(|t| !t.is_empty()) {
            return Ok(Auth::Bearer(token.to_string()));
        }

        if let Some(token_file) = &user.token_file {
            let path = self.resolve(token_file);
            let token = fs::read_to_string(&path).into_app_err_with(|| format!("reading token file '{path}'"))?;
            return Ok(Auth::Bearer(token.trim().to_string()));
        }

        let cert = self.data_or_file(user.client_certificate_data.as_deref(), user.client_certificate.as_deref())?;
        let key = self.data_or_file(user.client_key_data.as_deref(), user.client_key.as_deref())?;
        match (cert, key) {
            (Some(mut cert), Some(key)) => {
                if !cert.ends_with(b"\n") {
                    cert.push(b'\n');
                }
                cert.extend_from_slice(&key);
                return Ok(Auth::ClientCertificate(cert));
            }
            (Some(_), None) => bail!("kubeconfig user has a client certificate but no client key"),
            (None, Some(_)) => bail!("kubeconfig user has a client key but no client certificate"),
            (None, None) => {}
        }

        if let (Some(username), Some(password)) = (&user.username, &user.password) {
            return Ok(Auth::Basic {
                username: username.clone(),
                password: password.clone(),
            });
        }

        Ok(Auth::None)
    }

    /// Inline base64 data takes precedence over a file reference.
    fn data_or_file(&self, data: Option<&str>, file: Option<&str>) -> Result<Option<Vec<u8>>> {
        if let Some(data) = data.filter(|d| !d.is_empty()) {
            let bytes = STANDARD
                .decode(data.trim())
                .map_err(|e| app_err!("invalid base64 data in kubeconfig: {e}"))?;
            return Ok(Some(bytes));
        }

        if let Some(file) = file.filter(|f| !f.is_empty()) {
            let path = self.resolve(file);
            let bytes = fs::read(&path).into_app_err_with(|| format!("reading '{path}' referenced by kubeconfig"))?;
            return Ok(Some(bytes));
        }

        Ok(None)
    }

    fn resolve(&self, file: &str) -> Utf8PathBuf {
        let path = Utf8PathBuf::from(file);
        match &self.base_dir {
            Some(base) if path.is_relative() => base.join(path),
            _ => path,
        }
    }
}
