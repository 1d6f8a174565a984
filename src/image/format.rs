//! Disk and container format vocabulary and the format resolver

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Binary layout of the virtual disk
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiskFormat {
    Raw,
    Vhd,
    Vmdk,
    Vdi,
    Qcow2,
    Aki,
    Ari,
    Ami,
}

impl DiskFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            DiskFormat::Raw => "raw",
            DiskFormat::Vhd => "vhd",
            DiskFormat::Vmdk => "vmdk",
            DiskFormat::Vdi => "vdi",
            DiskFormat::Qcow2 => "qcow2",
            DiskFormat::Aki => "aki",
            DiskFormat::Ari => "ari",
            DiskFormat::Ami => "ami",
        }
    }
}

impl fmt::Display for DiskFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Envelope around the disk payload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContainerFormat {
    Ovf,
    Bare,
    Aki,
    Ari,
    Ami,
}

impl ContainerFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContainerFormat::Ovf => "ovf",
            ContainerFormat::Bare => "bare",
            ContainerFormat::Aki => "aki",
            ContainerFormat::Ari => "ari",
            ContainerFormat::Ami => "ami",
        }
    }
}

impl fmt::Display for ContainerFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Platform stage that produced the disk artifact
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UpstreamPlatform {
    Ec2,
    Vmware,
    Virtualbox,
}

impl UpstreamPlatform {
    pub const SUPPORTED: [UpstreamPlatform; 3] = [
        UpstreamPlatform::Ec2,
        UpstreamPlatform::Vmware,
        UpstreamPlatform::Virtualbox,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            UpstreamPlatform::Ec2 => "ec2",
            UpstreamPlatform::Vmware => "vmware",
            UpstreamPlatform::Virtualbox => "virtualbox",
        }
    }
}

impl FromStr for UpstreamPlatform {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ec2" => Ok(UpstreamPlatform::Ec2),
            "vmware" => Ok(UpstreamPlatform::Vmware),
            "virtualbox" => Ok(UpstreamPlatform::Virtualbox),
            other => Err(format!(
                "Unsupported platform '{}'. Supported: ec2, vmware, virtualbox",
                other
            )),
        }
    }
}

impl fmt::Display for UpstreamPlatform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Derive the catalog formats for an artifact from the stage that built it.
///
/// Anything without a dedicated mapping, including no platform stage at all,
/// is published as a bare raw disk.
pub fn resolve_formats(upstream: Option<UpstreamPlatform>) -> (DiskFormat, ContainerFormat) {
    match upstream {
        Some(UpstreamPlatform::Ec2) => (DiskFormat::Ami, ContainerFormat::Ami),
        Some(UpstreamPlatform::Vmware) | Some(UpstreamPlatform::Virtualbox) => {
            (DiskFormat::Vmdk, ContainerFormat::Bare)
        }
        None => (DiskFormat::Raw, ContainerFormat::Bare),
    }
}
