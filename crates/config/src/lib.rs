//! Local configuration: the client credentials file and the provider endpoints.

pub mod credentials;
pub mod endpoints;

pub use credentials::{ClientCredentials, load_credentials};
pub use endpoints::{DEFAULT_API_BASE, ProviderEndpoints};
