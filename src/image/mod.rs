//! Image metadata module
//!
//! Types describing what gets published: the appliance produced by the build
//! pipeline, its disk artifact, the catalog's image records and the
//! disk/container format vocabulary.

pub mod appliance;
pub mod descriptor;
pub mod format;

pub use appliance::{ApplianceInfo, DiskArtifact, OsInfo};
pub use descriptor::{derive_image_name, ImageDescriptor};
pub use format::{resolve_formats, ContainerFormat, DiskFormat, UpstreamPlatform};
