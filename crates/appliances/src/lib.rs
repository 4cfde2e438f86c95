//! Home appliance discovery and the accessory snippet handed to Homebridge.

pub mod accessory;
pub mod client;
pub mod directory;
pub mod types;

pub use accessory::{ACCESSORY_TYPE, AccessorySnippet};
pub use client::ApplianceClient;
pub use directory::DeviceDirectory;
pub use types::Appliance;
