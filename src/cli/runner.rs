//! Runner wiring command-line arguments to the publishing workflow

use crate::cli::args::Args;
use crate::config::{has_partial_credentials, PublisherConfig, PublisherOptions};
use crate::error::handlers::ValidationErrorHandler;
use crate::error::Result;
use crate::image::{ApplianceInfo, DiskArtifact, OsInfo, UpstreamPlatform};
use crate::logging::Logger;
use crate::publisher::{ImagePublisher, PublishOutcome};
use crate::registry::{build_http_client, CatalogClient, IdentityClient};

pub struct Runner {
    args: Args,
    output: Logger,
}

impl Runner {
    pub fn new(args: Args) -> Self {
        let output = if args.quiet {
            Logger::new_quiet()
        } else {
            Logger::new(args.verbose)
        };

        Self { args, output }
    }

    pub fn output(&self) -> &Logger {
        &self.output
    }

    pub async fn run(&self) -> Result<PublishOutcome> {
        self.output.section("OpenStack Image Publisher");

        let options = self.load_options()?;
        if has_partial_credentials(&options) {
            self.output.warning(
                "Incomplete credentials: 'tenant_id', 'user' and 'password' are all required, continuing without authentication",
            );
        }
        let config = PublisherConfig::from_options(&options)?;
        let appliance = self.appliance();

        ValidationErrorHandler::validate_disk_path(&self.args.disk)?;
        self.output.detail(&format!("Identity endpoint: {}", config.identity.base_url()));
        self.output.detail(&format!("Catalog endpoint: {}", config.catalog.base_url()));

        let http = build_http_client(config.skip_tls, config.timeout)?;
        let identity = IdentityClient::new(http.clone(), config.identity.clone(), self.output.clone());
        let catalog = CatalogClient::new(http, config.catalog.clone(), self.output.clone());

        let publisher = ImagePublisher::new(
            &config,
            &appliance,
            DiskArtifact::new(&self.args.disk),
            self.output.clone(),
        );
        let outcome = publisher.execute(&identity, &catalog).await?;

        self.report(&outcome);
        Ok(outcome)
    }

    /// File, then environment, then flags
    fn load_options(&self) -> Result<PublisherOptions> {
        let file = match &self.args.config {
            Some(path) => {
                self.output.detail(&format!("Loading configuration from {}", path.display()));
                PublisherOptions::from_file(path)?
            }
            None => PublisherOptions::default(),
        };

        Ok(file
            .merge(PublisherOptions::from_env()?)
            .merge(self.args.to_options()))
    }

    fn appliance(&self) -> ApplianceInfo {
        let upstream = self.args.platform.as_deref().and_then(|platform| {
            platform
                .parse::<UpstreamPlatform>()
                .map_err(|e| self.output.warning(&format!("{}; publishing as a raw disk", e)))
                .ok()
        });

        ApplianceInfo {
            name: self.args.name.clone(),
            version: self.args.appliance_version.clone(),
            release: self.args.release.clone(),
            os: OsInfo {
                name: self.args.os_name.clone(),
                version: self.args.os_version.clone(),
            },
            upstream,
        }
    }

    fn report(&self, outcome: &PublishOutcome) {
        match outcome {
            PublishOutcome::Registered(image) => {
                self.output.summary_kv(
                    "Registered image",
                    &[
                        ("Id", image.id.clone()),
                        ("Name", image.name.clone().unwrap_or_default()),
                        ("Status", image.status.clone().unwrap_or_else(|| "unknown".to_string())),
                        ("Distro", image.distro().unwrap_or("-").to_string()),
                        ("Elapsed", self.output.format_duration(self.output.elapsed())),
                    ],
                );
            }
            PublishOutcome::Blocked { name, existing } => {
                self.output.summary_kv(
                    "Nothing uploaded",
                    &[
                        ("Name", name.clone()),
                        ("Existing images", existing.len().to_string()),
                    ],
                );
            }
        }
    }
}
