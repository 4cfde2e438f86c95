use serde::{Deserialize, Serialize};

/// One entry of `data.homeappliances` in the device-listing response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Appliance {
    #[serde(rename = "haId")]
    pub ha_id: String,
    #[serde(default)]
    pub brand: String,
    #[serde(default)]
    pub name: String,
    /// Model code ("vib" in the API).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vib: Option<String>,
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default)]
    pub connected: bool,
}

impl Appliance {
    /// Human name used in the accessory snippet, e.g. "Bosch Oven".
    pub fn display_name(&self) -> String {
        match (self.brand.trim(), self.name.trim()) {
            ("", "") => self.ha_id.clone(),
            (brand, "") => brand.to_string(),
            ("", name) => name.to_string(),
            (brand, name) => format!("{brand} {name}"),
        }
    }

    /// Dropdown label: display name plus model code and identifier.
    pub fn label(&self) -> String {
        match self.vib.as_deref().filter(|v| !v.is_empty()) {
            Some(vib) => format!("{} {} ({})", self.display_name(), vib, self.ha_id),
            None => format!("{} ({})", self.display_name(), self.ha_id),
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct ApplianceListResponse {
    pub data: ApplianceListData,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ApplianceListData {
    #[serde(default)]
    pub homeappliances: Vec<Appliance>,
}
