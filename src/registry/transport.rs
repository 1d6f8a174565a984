//! Transport seams for the identity service and the image catalog
//!
//! The workflow only talks to these traits; [`IdentityClient`](crate::registry::IdentityClient)
//! and [`CatalogClient`](crate::registry::CatalogClient) are the HTTP implementations.

use crate::config::Credentials;
use crate::error::{PublishError, Result};
use crate::image::{ContainerFormat, DiskArtifact, DiskFormat, ImageDescriptor};
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use std::fmt;
use std::time::Duration;

pub const AUTH_TOKEN_HEADER: &str = "x-auth-token";

/// Opaque bearer token issued by the identity service, valid for one run
#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken(String);

impl AccessToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AccessToken(<{} chars>)", self.0.len())
    }
}

/// Result of a token request that reached the identity service
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenOutcome {
    Issued(AccessToken),
    /// The service answered without issuing a token; the run continues unauthenticated
    Rejected { status: u16, reason: String },
}

/// Everything the catalog needs to register a new image
#[derive(Debug, Clone, PartialEq)]
pub struct CreateImage {
    pub artifact: DiskArtifact,
    pub size: u64,
    pub name: String,
    pub disk_format: DiskFormat,
    pub container_format: ContainerFormat,
    pub is_public: bool,
    pub distro: String,
}

#[async_trait]
pub trait IdentityService: Send + Sync {
    /// Exchange credentials for a token. Transport failures are errors,
    /// a refusal by the service is [`TokenOutcome::Rejected`].
    async fn retrieve_token(&self, credentials: &Credentials) -> Result<TokenOutcome>;
}

#[async_trait]
pub trait ImageCatalog: Send + Sync {
    /// Images whose name equals `name`
    async fn list_images(&self, name: &str, token: Option<&AccessToken>) -> Result<Vec<ImageDescriptor>>;

    async fn delete_image(&self, id: &str, token: Option<&AccessToken>) -> Result<()>;

    /// Upload the artifact and register it in one request
    async fn create_image(&self, image: &CreateImage, token: Option<&AccessToken>) -> Result<ImageDescriptor>;
}

/// Attach the auth header when a token is available
pub fn authorized(request: RequestBuilder, token: Option<&AccessToken>) -> RequestBuilder {
    match token {
        Some(token) => request.header(AUTH_TOKEN_HEADER, token.as_str()),
        None => request,
    }
}

/// Shared HTTP client for both services.
///
/// `timeout` bounds connecting and each idle read, never the whole request:
/// an upload of any size completes as long as the connection keeps moving.
pub fn build_http_client(skip_tls: bool, timeout: u64) -> Result<Client> {
    let timeout = Duration::from_secs(timeout);
    let builder = Client::builder()
        .connect_timeout(timeout)
        .read_timeout(timeout)
        .tcp_keepalive(Duration::from_secs(60));
    let builder = if skip_tls {
        builder
            .danger_accept_invalid_certs(true)
            .danger_accept_invalid_hostnames(true)
    } else {
        builder
    };

    builder
        .build()
        .map_err(|e| PublishError::Network(format!("Failed to create HTTP client: {}", e)))
}
