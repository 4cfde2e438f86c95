use std::path::Path;

use serde::Serialize;

use crate::types::Appliance;

/// Accessory type registered by the Homebridge plugin that consumes the token file.
pub const ACCESSORY_TYPE: &str = "HCDevice";

/// Configuration block pasted into Homebridge's `accessories` array.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessorySnippet {
    pub accessory: String,
    pub name: String,
    pub token_path: String,
    #[serde(rename = "haId")]
    pub ha_id: String,
}

impl AccessorySnippet {
    pub fn new(appliance: &Appliance, token_path: &Path) -> Self {
        Self {
            accessory: ACCESSORY_TYPE.to_string(),
            name: appliance.display_name(),
            token_path: token_path.display().to_string(),
            ha_id: appliance.ha_id.clone(),
        }
    }

    pub fn to_pretty_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
