//! Build pipeline inputs: appliance metadata and the finished disk artifact

use crate::error::{PublishError, Result};
use crate::image::format::UpstreamPlatform;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OsInfo {
    pub name: String,
    pub version: String,
}

impl OsInfo {
    /// Distro label published as an image property, e.g. `Fedora 16`
    pub fn distro_label(&self) -> String {
        let mut chars = self.name.chars();
        let name = match chars.next() {
            Some(first) => first
                .to_uppercase()
                .chain(chars.flat_map(char::to_lowercase))
                .collect::<String>(),
            None => String::new(),
        };
        format!("{} {}", name, self.version)
    }
}

/// Appliance identity as produced by the build pipeline
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplianceInfo {
    pub name: String,
    pub version: String,
    pub release: String,
    pub os: OsInfo,
    /// Platform stage the disk went through, `None` for a plain base image
    pub upstream: Option<UpstreamPlatform>,
}

/// Disk image produced by an earlier build stage. Read-only here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiskArtifact {
    path: PathBuf,
}

impl DiskArtifact {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Size on disk; fails if the artifact is missing
    pub fn size(&self) -> Result<u64> {
        let metadata = std::fs::metadata(&self.path).map_err(|e| PublishError::io(&self.path, e))?;
        if !metadata.is_file() {
            return Err(PublishError::Validation(format!(
                "Disk image path is not a file: {}",
                self.path.display()
            )));
        }
        Ok(metadata.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_distro_label_capitalizes_name() {
        let os = OsInfo {
            name: "fedora".to_string(),
            version: "16".to_string(),
        };
        assert_eq!(os.distro_label(), "Fedora 16");

        let os = OsInfo {
            name: "rHEL".to_string(),
            version: "6".to_string(),
        };
        assert_eq!(os.distro_label(), "Rhel 6");
    }

    #[test]
    fn test_artifact_size() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("disk.raw");
        std::fs::write(&path, vec![0u8; 4096]).unwrap();

        assert_eq!(DiskArtifact::new(&path).size().unwrap(), 4096);
    }

    #[test]
    fn test_missing_artifact_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = DiskArtifact::new(dir.path().join("absent.raw")).size().unwrap_err();
        assert!(matches!(err, PublishError::Io { .. }));
    }
}
