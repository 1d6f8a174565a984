//! Command-line argument parsing

use crate::config::PublisherOptions;
use clap::{ArgAction, Parser};
use std::path::PathBuf;

#[derive(Parser, Debug, Clone)]
#[command(name = "openstack-image-publisher")]
#[command(about = "Register a built virtual machine disk image in an OpenStack image catalog")]
#[command(author)]
pub struct Args {
    /// Path to the disk image produced by the build
    #[arg(long = "disk", short = 'd', help = "Path to the disk image to upload")]
    pub disk: PathBuf,

    #[arg(long = "name", short = 'n', help = "Appliance name")]
    pub name: String,

    #[arg(long = "version", help = "Appliance version")]
    pub appliance_version: String,

    #[arg(long = "release", help = "Appliance release")]
    pub release: String,

    #[arg(long = "os-name", help = "Operating system name, e.g. fedora")]
    pub os_name: String,

    #[arg(long = "os-version", help = "Operating system version, e.g. 16")]
    pub os_version: String,

    /// Platform stage that produced the disk (ec2, vmware, virtualbox)
    #[arg(long = "platform", short = 'P', help = "Platform the disk was converted for: ec2, vmware, virtualbox")]
    pub platform: Option<String>,

    /// Configuration file path
    #[arg(long = "config", short = 'c', help = "Path to a JSON configuration file")]
    pub config: Option<PathBuf>,

    #[arg(long = "schema", help = "URL scheme for both services (default: http)")]
    pub schema: Option<String>,

    #[arg(long = "host", help = "Host shared by both services (default: localhost)")]
    pub host: Option<String>,

    #[arg(long = "port", help = "Image catalog port (default: 9292)")]
    pub port: Option<u16>,

    #[arg(long = "nova-host", help = "Identity service host")]
    pub nova_host: Option<String>,

    #[arg(long = "nova-port", help = "Identity service port (default: 5000)")]
    pub nova_port: Option<u16>,

    #[arg(long = "glance-host", help = "Image catalog host")]
    pub glance_host: Option<String>,

    #[arg(long = "glance-port", help = "Image catalog port")]
    pub glance_port: Option<u16>,

    #[arg(long = "tenant-id", help = "Tenant for identity service authentication")]
    pub tenant_id: Option<String>,

    #[arg(long = "user", short = 'u', help = "Username for identity service authentication")]
    pub user: Option<String>,

    #[arg(long = "password", short = 'p', help = "Password for identity service authentication")]
    pub password: Option<String>,

    /// Replace images already registered under the same name.
    /// `--overwrite=false` turns off a value set by the file or environment.
    #[arg(long = "overwrite", value_name = "BOOL", num_args = 0..=1, require_equals = true, default_missing_value = "true", action = ArgAction::Set, help = "Remove existing images with the same name before uploading")]
    pub overwrite: Option<bool>,

    #[arg(long = "public", value_name = "BOOL", num_args = 0..=1, require_equals = true, default_missing_value = "true", action = ArgAction::Set, help = "Make the registered image public")]
    pub public: Option<bool>,

    #[arg(long = "skip-tls", short = 'k', value_name = "BOOL", num_args = 0..=1, require_equals = true, default_missing_value = "true", action = ArgAction::Set, help = "Skip TLS certificate verification")]
    pub skip_tls: Option<bool>,

    #[arg(long = "timeout", short = 't', help = "Timeout for network operations in seconds (default: 7200)")]
    pub timeout: Option<u64>,

    #[arg(long = "verbose", short = 'v', help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long = "quiet", short = 'q', help = "Only report errors", conflicts_with = "verbose")]
    pub quiet: bool,
}

impl Args {
    pub fn parse_args() -> Self {
        Args::parse()
    }

    /// Options given on the command line; anything left out defers to file and environment
    pub fn to_options(&self) -> PublisherOptions {
        PublisherOptions {
            schema: self.schema.clone(),
            host: self.host.clone(),
            port: self.port,
            nova_host: self.nova_host.clone(),
            nova_port: self.nova_port,
            glance_host: self.glance_host.clone(),
            glance_port: self.glance_port,
            overwrite: self.overwrite,
            public: self.public,
            tenant_id: self.tenant_id.clone(),
            user: self.user.clone(),
            password: self.password.clone(),
            skip_tls: self.skip_tls,
            timeout: self.timeout,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(extra: &[&str]) -> Args {
        let mut argv = vec![
            "openstack-image-publisher",
            "--disk",
            "build/foo.raw",
            "--name",
            "foo",
            "--version",
            "1",
            "--release",
            "2",
            "--os-name",
            "fedora",
            "--os-version",
            "16",
        ];
        argv.extend_from_slice(extra);
        Args::try_parse_from(argv).unwrap()
    }

    #[test]
    fn test_minimal_arguments() {
        let args = parse(&[]);
        assert_eq!(args.name, "foo");
        assert_eq!(args.appliance_version, "1");
        assert_eq!(args.release, "2");
        assert!(args.platform.is_none());
        assert_eq!(args.to_options(), PublisherOptions::default());
    }

    #[test]
    fn test_switches_map_to_options() {
        let args = parse(&["--overwrite", "--public", "--glance-host", "glance", "--nova-port", "35357"]);
        let options = args.to_options();
        assert_eq!(options.overwrite, Some(true));
        assert_eq!(options.public, Some(true));
        assert_eq!(options.glance_host.as_deref(), Some("glance"));
        assert_eq!(options.nova_port, Some(35357));
        assert_eq!(options.skip_tls, None);
    }

    #[test]
    fn test_switches_accept_explicit_values() {
        let options = parse(&["--overwrite=false", "--public=true", "-k"]).to_options();
        assert_eq!(options.overwrite, Some(false));
        assert_eq!(options.public, Some(true));
        assert_eq!(options.skip_tls, Some(true));

        let options = parse(&["--skip-tls=false"]).to_options();
        assert_eq!(options.skip_tls, Some(false));
        assert_eq!(options.overwrite, None);
    }

    #[test]
    fn test_switch_rejects_non_boolean_value() {
        let result = Args::try_parse_from([
            "openstack-image-publisher",
            "-d", "a.raw", "-n", "foo", "--version", "1", "--release", "2",
            "--os-name", "fedora", "--os-version", "16", "--overwrite=maybe",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_verbose_and_quiet_conflict() {
        let result = Args::try_parse_from([
            "openstack-image-publisher",
            "-d", "a.raw", "-n", "foo", "--version", "1", "--release", "2",
            "--os-name", "fedora", "--os-version", "16", "-v", "-q",
        ]);
        assert!(result.is_err());
    }
}
