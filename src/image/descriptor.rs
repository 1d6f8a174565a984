//! Catalog image records and the derived registration name

use crate::image::appliance::ApplianceInfo;
use crate::image::format::DiskFormat;
use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Image record as returned by the catalog.
///
/// The `id` is assigned by the catalog and is the only identity; names are
/// not unique there. Catalogs disagree on whether it is a string or an
/// integer, so both are read into a string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageDescriptor {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub disk_format: Option<String>,
    #[serde(default)]
    pub container_format: Option<String>,
    #[serde(default)]
    pub is_public: Option<bool>,
    #[serde(default)]
    pub size: Option<u64>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub properties: HashMap<String, String>,
}

impl ImageDescriptor {
    /// Distro label stored as a custom image property
    pub fn distro(&self) -> Option<&str> {
        self.properties.get("distro").map(String::as_str)
    }
}

fn deserialize_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(id) => Ok(id),
        serde_json::Value::Number(id) => Ok(id.to_string()),
        other => Err(de::Error::custom(format!(
            "image id must be a string or a number, got {}",
            other
        ))),
    }
}

/// Name used both to register the image and to look for earlier registrations
pub fn derive_image_name(appliance: &ApplianceInfo, disk_format: DiskFormat) -> String {
    format!(
        "{}-{}.{}-{}",
        appliance.name, appliance.version, appliance.release, disk_format
    )
}
