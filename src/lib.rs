//! OpenStack Image Publisher Library
//!
//! Registers locally built virtual machine disk images in an OpenStack image
//! catalog, optionally authenticating against the identity service first.

pub mod cli;
pub mod config;
pub mod error;
pub mod image;
pub mod logging;
pub mod publisher;
pub mod registry;

pub use config::{Credentials, Endpoint, PublisherConfig, PublisherOptions};
pub use error::{PublishError, Result};
pub use logging::Logger;
pub use publisher::{ImagePublisher, PublishOutcome, PublishState};
