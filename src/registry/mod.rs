//! Service clients for publishing images
//!
//! This module provides the identity client that exchanges credentials for a
//! token and the catalog client that lists, deletes and uploads images. Both
//! sit behind the traits in [`transport`] so the workflow can run against any
//! implementation.

pub mod auth;
pub mod client;
pub mod transport;

#[cfg(test)]
mod stub_server;

pub use auth::IdentityClient;
pub use client::CatalogClient;
pub use transport::{
    authorized, build_http_client, AccessToken, CreateImage, IdentityService, ImageCatalog, TokenOutcome,
};
