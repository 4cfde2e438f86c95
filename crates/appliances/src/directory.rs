use std::collections::BTreeMap;

use crate::types::Appliance;

/// Devices fetched in one authorization flow, keyed by `haId`.
///
/// Built once per flow and never refreshed; a new flow builds a new directory.
#[derive(Debug, Clone, Default)]
pub struct DeviceDirectory {
    devices: BTreeMap<String, Appliance>,
    order: Vec<String>,
}

impl DeviceDirectory {
    /// Keeps the first record for each `haId`; later duplicates are dropped.
    pub fn from_appliances(appliances: Vec<Appliance>) -> Self {
        let mut dir = Self::default();
        for appliance in appliances {
            if dir.devices.contains_key(&appliance.ha_id) {
                tracing::warn!(
                    ha_id = %appliance.ha_id,
                    "duplicate appliance id in listing, ignoring"
                );
                continue;
            }
            dir.order.push(appliance.ha_id.clone());
            dir.devices.insert(appliance.ha_id.clone(), appliance);
        }
        dir
    }

    pub fn get(&self, ha_id: &str) -> Option<&Appliance> {
        self.devices.get(ha_id)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Devices in the order the provider listed them.
    pub fn iter(&self) -> impl Iterator<Item = &Appliance> {
        self.order.iter().filter_map(|id| self.devices.get(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn appliance(ha_id: &str, name: &str) -> Appliance {
        Appliance {
            ha_id: ha_id.into(),
            brand: "Bosch".into(),
            name: name.into(),
            vib: None,
            kind: None,
            connected: true,
        }
    }

    #[test]
    fn test_lookup_and_order() {
        let dir = DeviceDirectory::from_appliances(vec![
            appliance("B2", "Washer"),
            appliance("A1", "Oven"),
        ]);
        assert_eq!(dir.len(), 2);
        assert_eq!(dir.get("A1").unwrap().display_name(), "Bosch Oven");
        let ids: Vec<_> = dir.iter().map(|a| a.ha_id.as_str()).collect();
        assert_eq!(ids, vec!["B2", "A1"]);
    }

    #[test]
    fn test_duplicates_keep_first() {
        let dir = DeviceDirectory::from_appliances(vec![
            appliance("A1", "Oven"),
            appliance("A1", "Fridge"),
        ]);
        assert_eq!(dir.len(), 1);
        assert_eq!(dir.get("A1").unwrap().name, "Oven");
    }

    #[test]
    fn test_empty_directory_lookup_fails() {
        let dir = DeviceDirectory::default();
        assert!(dir.is_empty());
        assert!(dir.get("A1").is_none());
    }
}
