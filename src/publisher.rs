//! Image registration workflow
//!
//! [`ImagePublisher`] drives one publishing run:
//! authenticate (when credentials are configured), look for images already
//! registered under the derived name, remove them if overwriting is allowed,
//! then upload the disk artifact as a new image.

use crate::config::PublisherConfig;
use crate::error::Result;
use crate::image::{derive_image_name, resolve_formats, ApplianceInfo, DiskArtifact, ImageDescriptor};
use crate::logging::Logger;
use crate::registry::{AccessToken, CreateImage, IdentityService, ImageCatalog, TokenOutcome};
use std::fmt;

/// Stages of a publishing run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PublishState {
    Init,
    Authenticating,
    Searching,
    Reconciling,
    Uploading,
    Done,
    Blocked,
}

impl fmt::Display for PublishState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PublishState::Init => "init",
            PublishState::Authenticating => "authenticating",
            PublishState::Searching => "searching",
            PublishState::Reconciling => "reconciling",
            PublishState::Uploading => "uploading",
            PublishState::Done => "done",
            PublishState::Blocked => "blocked",
        };
        f.write_str(name)
    }
}

/// How a run that did not fail ended
#[derive(Debug, Clone, PartialEq)]
pub enum PublishOutcome {
    /// The artifact was uploaded and registered
    Registered(ImageDescriptor),
    /// Images with the same name exist and overwriting is disabled
    Blocked {
        name: String,
        existing: Vec<ImageDescriptor>,
    },
}

impl PublishOutcome {
    pub fn image(&self) -> Option<&ImageDescriptor> {
        match self {
            PublishOutcome::Registered(image) => Some(image),
            PublishOutcome::Blocked { .. } => None,
        }
    }
}

pub struct ImagePublisher<'a> {
    config: &'a PublisherConfig,
    appliance: &'a ApplianceInfo,
    artifact: DiskArtifact,
    output: Logger,
    image_name: String,
}

impl<'a> ImagePublisher<'a> {
    pub fn new(
        config: &'a PublisherConfig,
        appliance: &'a ApplianceInfo,
        artifact: DiskArtifact,
        output: Logger,
    ) -> Self {
        let (disk_format, _) = resolve_formats(appliance.upstream);
        let image_name = derive_image_name(appliance, disk_format);

        Self {
            config,
            appliance,
            artifact,
            output,
            image_name,
        }
    }

    /// Name the image is registered and searched under
    pub fn image_name(&self) -> &str {
        &self.image_name
    }

    pub async fn execute(
        &self,
        identity: &dyn IdentityService,
        catalog: &dyn ImageCatalog,
    ) -> Result<PublishOutcome> {
        self.enter(PublishState::Init);
        let size = self.artifact.size()?;

        let token = self.authenticate(identity).await?;

        self.enter(PublishState::Searching);
        self.output.debug(&format!(
            "Checking if '{}' appliance is already registered...",
            self.image_name
        ));
        let existing = catalog.list_images(&self.image_name, token.as_ref()).await?;

        if !existing.is_empty() {
            self.output.debug(&format!(
                "We found {} appliance(s) with the name '{}'.",
                existing.len(),
                self.image_name
            ));

            if !self.config.overwrite {
                self.enter(PublishState::Blocked);
                self.output.error(&format!(
                    "One or more appliances are already registered with the name '{}'. You can specify 'overwrite' parameter to remove them.",
                    self.image_name
                ));
                return Ok(PublishOutcome::Blocked {
                    name: self.image_name.clone(),
                    existing,
                });
            }

            self.enter(PublishState::Reconciling);
            self.output.info(&format!(
                "Removing all images with name '{}' because 'overwrite' parameter is set to true...",
                self.image_name
            ));
            for image in &existing {
                catalog.delete_image(&image.id, token.as_ref()).await?;
            }
            self.output.info("Images removed.");
        }

        self.enter(PublishState::Uploading);
        // Formats are resolved again here rather than carried over from construction.
        let (disk_format, container_format) = resolve_formats(self.appliance.upstream);
        self.output.info(&format!(
            "Uploading and registering '{}' appliance in OpenStack...",
            self.image_name
        ));

        let request = CreateImage {
            artifact: self.artifact.clone(),
            size,
            name: self.image_name.clone(),
            disk_format,
            container_format,
            is_public: self.config.public,
            distro: self.appliance.os.distro_label(),
        };
        let image = catalog.create_image(&request, token.as_ref()).await?;

        self.enter(PublishState::Done);
        self.output
            .success(&format!("Appliance registered under id = {}.", image.id));
        Ok(PublishOutcome::Registered(image))
    }

    async fn authenticate(&self, identity: &dyn IdentityService) -> Result<Option<AccessToken>> {
        let Some(credentials) = &self.config.credentials else {
            self.output
                .debug("No identity credentials configured, continuing without a token");
            return Ok(None);
        };

        self.enter(PublishState::Authenticating);
        match identity.retrieve_token(credentials).await? {
            TokenOutcome::Issued(token) => {
                self.output.debug("Authentication token obtained");
                Ok(Some(token))
            }
            TokenOutcome::Rejected { status, reason } => {
                self.output.warning(&format!(
                    "Identity service did not issue a token (status {}): {}. Continuing unauthenticated",
                    status, reason
                ));
                Ok(None)
            }
        }
    }

    fn enter(&self, state: PublishState) {
        self.output.trace(&format!("Publishing state: {}", state));
    }
}
