//! Workspace credential resolution.
//!
//! Credentials come from an ordered list of sources. The first source that
//! yields both a host and a token wins; failures while probing a source are
//! logged and skipped, and only running out of sources is an error.

use once_cell::sync::OnceCell;
use std::collections::HashMap;
use std::fmt;
use std::path::PathBuf;

use crate::config::CredentialEnv;
use crate::error::ResetError;

/// Workspace host and access token used for every API call.
#[derive(Clone, PartialEq, Eq)]
pub struct EndpointCredentials {
    host: String,
    token: String,
}

impl EndpointCredentials {
    /// Build credentials, returning `None` unless both values are non-empty.
    pub fn new(host: &str, token: &str) -> Option<Self> {
        let host = normalize_host(host);
        let token = token.trim();
        if host.is_empty() || token.is_empty() {
            return None;
        }

        Some(Self {
            host,
            token: token.to_string(),
        })
    }

    /// Workspace base URL, without a trailing slash.
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Bearer token.
    pub fn token(&self) -> &str {
        &self.token
    }
}

impl fmt::Debug for EndpointCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EndpointCredentials")
            .field("host", &self.host)
            .field("token", &"<redacted>")
            .finish()
    }
}

/// Normalize a workspace host into a base URL.
///
/// Whitespace and trailing slashes are stripped and `https://` is assumed when
/// no scheme is given.
pub fn normalize_host(raw: &str) -> String {
    let host = raw.trim().trim_end_matches('/');
    if host.is_empty() {
        return String::new();
    }
    if host.contains("://") {
        host.to_string()
    } else {
        format!("https://{}", host)
    }
}

/// A place credentials may be found.
pub trait CredentialSource: Send + Sync {
    /// Source name used in logs.
    fn name(&self) -> &'static str;

    /// Look for credentials. `Ok(None)` means the source has nothing to offer.
    fn probe(&self) -> Result<Option<EndpointCredentials>, ResetError>;
}

/// Host and token configured explicitly, usually through the environment.
#[derive(Clone, Default)]
pub struct ExplicitSource {
    host: Option<String>,
    token: Option<String>,
}

impl ExplicitSource {
    pub fn new(host: Option<String>, token: Option<String>) -> Self {
        Self { host, token }
    }
}

impl CredentialSource for ExplicitSource {
    fn name(&self) -> &'static str {
        "environment"
    }

    fn probe(&self) -> Result<Option<EndpointCredentials>, ResetError> {
        match (&self.host, &self.token) {
            (Some(host), Some(token)) => Ok(EndpointCredentials::new(host, token)),
            _ => Ok(None),
        }
    }
}

/// Credentials from a workspace configuration profile file.
///
/// The file is INI-style, one `[section]` per profile with `host` and `token`
/// keys, as written by the workspace CLI.
#[derive(Clone)]
pub struct ProfileSource {
    path: Option<PathBuf>,
    profile: String,
}

impl ProfileSource {
    pub fn new(path: Option<PathBuf>, profile: impl Into<String>) -> Self {
        Self {
            path,
            profile: profile.into(),
        }
    }
}

impl CredentialSource for ProfileSource {
    fn name(&self) -> &'static str {
        "profile"
    }

    fn probe(&self) -> Result<Option<EndpointCredentials>, ResetError> {
        let Some(path) = &self.path else {
            return Ok(None);
        };
        if !path.exists() {
            return Ok(None);
        }

        let contents = std::fs::read_to_string(path)?;
        let section = parse_profile(&contents, &self.profile);
        match (section.get("host"), section.get("token")) {
            (Some(host), Some(token)) => Ok(EndpointCredentials::new(host, token)),
            _ => Ok(None),
        }
    }
}

/// Key/value pairs of one profile section. Keys are lowercased.
fn parse_profile(contents: &str, profile: &str) -> HashMap<String, String> {
    let mut values = HashMap::new();
    let mut in_section = false;

    for line in contents.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') || line.starts_with(';') {
            continue;
        }

        if let Some(name) = line.strip_prefix('[').and_then(|l| l.strip_suffix(']')) {
            in_section = name.trim() == profile;
            continue;
        }

        if !in_section {
            continue;
        }

        if let Some((key, value)) = line.split_once('=') {
            values.insert(key.trim().to_ascii_lowercase(), value.trim().to_string());
        }
    }

    values
}

/// Resolves workspace credentials once and caches the result.
pub struct CredentialResolver {
    sources: Vec<Box<dyn CredentialSource>>,
    resolved: OnceCell<EndpointCredentials>,
}

impl CredentialResolver {
    /// Create a resolver that probes `sources` in order.
    pub fn new(sources: Vec<Box<dyn CredentialSource>>) -> Self {
        Self {
            sources,
            resolved: OnceCell::new(),
        }
    }

    /// Explicit environment credentials first, then the configuration profile.
    pub fn from_env(env: &CredentialEnv) -> Self {
        Self::new(vec![
            Box::new(ExplicitSource::new(env.host.clone(), env.token.clone())),
            Box::new(ProfileSource::new(env.profile_path(), env.profile_name())),
        ])
    }

    /// Resolve credentials, probing sources only on the first successful call.
    pub fn resolve(&self) -> Result<&EndpointCredentials, ResetError> {
        self.resolved.get_or_try_init(|| self.probe_sources())
    }

    fn probe_sources(&self) -> Result<EndpointCredentials, ResetError> {
        for source in &self.sources {
            match source.probe() {
                Ok(Some(credentials)) => {
                    tracing::debug!(
                        source = source.name(),
                        host = %credentials.host(),
                        "Resolved workspace credentials"
                    );
                    return Ok(credentials);
                }
                Ok(None) => {
                    tracing::debug!(source = source.name(), "No credentials from source");
                }
                Err(e) => {
                    tracing::debug!(source = source.name(), error = %e, "Credential source failed");
                }
            }
        }

        Err(ResetError::Credentials(
            "Unable to determine workspace credentials. Set DATABRICKS_HOST and \
             DATABRICKS_TOKEN environment variables or configure a profile in \
             ~/.databrickscfg."
                .to_string(),
        ))
    }
}
