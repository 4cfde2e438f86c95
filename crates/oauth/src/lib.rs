pub mod flow;
pub mod storage;
pub mod types;

pub use flow::OAuthFlow;
pub use storage::TokenStore;
pub use types::{OAuthConfig, TokenRecord, TokenResponse};

/// Seconds since the Unix epoch, with sub-second precision.
pub fn unix_now() -> f64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs_f64()
}
