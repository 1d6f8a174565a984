//! Configuration module for endpoints, credentials and publishing policy
//!
//! Raw options come from an optional JSON file, `OPENSTACK_PUBLISHER_*`
//! environment variables and command-line flags, in increasing precedence.
//! They are resolved once into an immutable [`PublisherConfig`].

use crate::error::handlers::ValidationErrorHandler;
use crate::error::{PublishError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use url::Url;

pub const DEFAULT_HOST: &str = "localhost";
pub const DEFAULT_SCHEME: &str = "http";
pub const DEFAULT_CATALOG_PORT: u16 = 9292;
pub const DEFAULT_IDENTITY_PORT: u16 = 5000;
pub const DEFAULT_TIMEOUT: u64 = 7200;

const ENV_PREFIX: &str = "OPENSTACK_PUBLISHER_";

/// Recognized option keys, all optional
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PublisherOptions {
    pub schema: Option<String>,
    pub host: Option<String>,
    pub port: Option<u16>,
    pub nova_host: Option<String>,
    pub nova_port: Option<u16>,
    pub glance_host: Option<String>,
    pub glance_port: Option<u16>,
    pub overwrite: Option<bool>,
    pub public: Option<bool>,
    pub tenant_id: Option<String>,
    pub user: Option<String>,
    pub password: Option<String>,
    pub skip_tls: Option<bool>,
    pub timeout: Option<u64>,
}

impl PublisherOptions {
    /// Load options from a JSON file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| PublishError::io(path, e))?;
        serde_json::from_str(&content).map_err(|e| {
            PublishError::Config(format!("Invalid configuration file {}: {}", path.display(), e))
        })
    }

    /// Options read from `OPENSTACK_PUBLISHER_*` environment variables.
    /// Values that are set but malformed are rejected, not ignored.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(format!("{}{}", ENV_PREFIX, key)).ok())
    }

    fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let invalid = |key: &str, value: &str, expected: &str| {
            PublishError::Config(format!(
                "Invalid value '{}' for {}{}: expected {}",
                value, ENV_PREFIX, key, expected
            ))
        };
        let flag = |key: &str| -> Result<Option<bool>> {
            match lookup(key) {
                None => Ok(None),
                Some(v) => match v.trim().to_ascii_lowercase().as_str() {
                    "true" | "1" | "yes" => Ok(Some(true)),
                    "false" | "0" | "no" => Ok(Some(false)),
                    _ => Err(invalid(key, &v, "true or false")),
                },
            }
        };
        let port = |key: &str| -> Result<Option<u16>> {
            lookup(key)
                .map(|v| v.trim().parse::<u16>().map_err(|_| invalid(key, &v, "a port number")))
                .transpose()
        };

        Ok(Self {
            schema: lookup("SCHEMA"),
            host: lookup("HOST"),
            port: port("PORT")?,
            nova_host: lookup("NOVA_HOST"),
            nova_port: port("NOVA_PORT")?,
            glance_host: lookup("GLANCE_HOST"),
            glance_port: port("GLANCE_PORT")?,
            overwrite: flag("OVERWRITE")?,
            public: flag("PUBLIC")?,
            tenant_id: lookup("TENANT_ID"),
            user: lookup("USER"),
            password: lookup("PASSWORD"),
            skip_tls: flag("SKIP_TLS")?,
            timeout: lookup("TIMEOUT")
                .map(|v| v.trim().parse::<u64>().map_err(|_| invalid("TIMEOUT", &v, "seconds")))
                .transpose()?,
        })
    }

    /// Overlay `other` on top of `self`; values set in `other` win
    pub fn merge(self, other: PublisherOptions) -> Self {
        Self {
            schema: other.schema.or(self.schema),
            host: other.host.or(self.host),
            port: other.port.or(self.port),
            nova_host: other.nova_host.or(self.nova_host),
            nova_port: other.nova_port.or(self.nova_port),
            glance_host: other.glance_host.or(self.glance_host),
            glance_port: other.glance_port.or(self.glance_port),
            overwrite: other.overwrite.or(self.overwrite),
            public: other.public.or(self.public),
            tenant_id: other.tenant_id.or(self.tenant_id),
            user: other.user.or(self.user),
            password: other.password.or(self.password),
            skip_tls: other.skip_tls.or(self.skip_tls),
            timeout: other.timeout.or(self.timeout),
        }
    }
}

/// Scheme, host and port of one service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Endpoint {
    pub scheme: String,
    pub host: String,
    pub port: u16,
}

impl Endpoint {
    pub fn new(scheme: impl Into<String>, host: impl Into<String>, port: u16) -> Self {
        Self {
            scheme: scheme.into(),
            host: host.into(),
            port,
        }
    }

    /// `{scheme}://{host}:{port}`, a pure function of the endpoint
    pub fn base_url(&self) -> String {
        format!("{}://{}:{}", self.scheme, self.host, self.port)
    }

    /// Join an absolute API path onto the endpoint
    pub fn url(&self, path: &str) -> Result<Url> {
        let base = Url::parse(&self.base_url())?;
        Ok(base.join(path)?)
    }

    pub fn validate(&self) -> Result<()> {
        if self.host.trim().is_empty() {
            return Err(PublishError::Validation("Host cannot be empty".to_string()));
        }
        if self.scheme != "http" && self.scheme != "https" {
            return Err(PublishError::Validation(format!(
                "Invalid schema '{}'. Must be http or https",
                self.scheme
            )));
        }
        if self.port == 0 {
            return Err(PublishError::Validation(
                "Port must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }
}

/// Identity service credentials; only usable when all three are present
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    pub tenant_id: String,
    pub user: String,
    pub password: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("tenant_id", &self.tenant_id)
            .field("user", &self.user)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Resolved, immutable configuration for one publishing run
#[derive(Debug, Clone, PartialEq)]
pub struct PublisherConfig {
    pub identity: Endpoint,
    pub catalog: Endpoint,
    pub overwrite: bool,
    pub public: bool,
    pub credentials: Option<Credentials>,
    pub skip_tls: bool,
    pub timeout: u64,
}

impl Default for PublisherConfig {
    fn default() -> Self {
        Self {
            identity: Endpoint::new(DEFAULT_SCHEME, DEFAULT_HOST, DEFAULT_IDENTITY_PORT),
            catalog: Endpoint::new(DEFAULT_SCHEME, DEFAULT_HOST, DEFAULT_CATALOG_PORT),
            overwrite: false,
            public: false,
            credentials: None,
            skip_tls: false,
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl PublisherConfig {
    /// Resolve raw options into a validated configuration.
    ///
    /// `host` is the fallback for both services, `port` only for the catalog.
    /// Credentials are all-or-nothing: a partial set resolves to `None`.
    pub fn from_options(options: &PublisherOptions) -> Result<Self> {
        let scheme = options.schema.clone().unwrap_or_else(|| DEFAULT_SCHEME.to_string());
        let shared_host = options.host.clone().unwrap_or_else(|| DEFAULT_HOST.to_string());

        let identity = Endpoint::new(
            scheme.clone(),
            options.nova_host.clone().unwrap_or_else(|| shared_host.clone()),
            options.nova_port.unwrap_or(DEFAULT_IDENTITY_PORT),
        );
        let catalog = Endpoint::new(
            scheme,
            options.glance_host.clone().unwrap_or(shared_host),
            options.glance_port.or(options.port).unwrap_or(DEFAULT_CATALOG_PORT),
        );

        let credentials = match (&options.tenant_id, &options.user, &options.password) {
            (Some(tenant_id), Some(user), Some(password)) => Some(Credentials {
                tenant_id: tenant_id.clone(),
                user: user.clone(),
                password: password.clone(),
            }),
            _ => None,
        };

        let config = Self {
            identity,
            catalog,
            overwrite: options.overwrite.unwrap_or(false),
            public: options.public.unwrap_or(false),
            credentials,
            skip_tls: options.skip_tls.unwrap_or(false),
            timeout: options.timeout.unwrap_or(DEFAULT_TIMEOUT),
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        self.identity.validate()?;
        self.catalog.validate()?;
        ValidationErrorHandler::validate_timeout(self.timeout)
    }
}

/// True when some, but not all, credential fields are set
pub fn has_partial_credentials(options: &PublisherOptions) -> bool {
    let set = [&options.tenant_id, &options.user, &options.password]
        .iter()
        .filter(|v| v.is_some())
        .count();
    set > 0 && set < 3
}
