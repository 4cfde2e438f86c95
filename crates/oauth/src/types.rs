use std::fmt;

use {
    hcauth_config::{ClientCredentials, ProviderEndpoints},
    secrecy::{ExposeSecret, SecretString},
    serde::{Deserialize, Serialize},
    serde_json::{Map, Value},
};

/// OAuth 2.0 authorization-code client configuration.
pub struct OAuthConfig {
    pub client_id: String,
    pub client_secret: SecretString,
    pub auth_url: String,
    pub token_url: String,
    /// Space-separated scope string, passed through as configured.
    pub scope: String,
}

impl OAuthConfig {
    pub fn from_credentials(creds: &ClientCredentials, endpoints: &ProviderEndpoints) -> Self {
        Self {
            client_id: creds.client_id.clone(),
            client_secret: SecretString::new(creds.client_secret.expose_secret().clone()),
            auth_url: endpoints.authorize_url(),
            token_url: endpoints.token_url(),
            scope: creds.scope.clone(),
        }
    }
}

impl fmt::Debug for OAuthConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OAuthConfig")
            .field("client_id", &self.client_id)
            .field("client_secret", &"[REDACTED]")
            .field("auth_url", &self.auth_url)
            .field("token_url", &self.token_url)
            .field("scope", &self.scope)
            .finish()
    }
}

/// Token endpoint response. Fields other than `access_token` are kept verbatim.
#[derive(Clone, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl fmt::Debug for TokenResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenResponse")
            .field("access_token", &"[REDACTED]")
            .field("fields", &self.extra.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// Keys of the token record that always come from local configuration.
const LOCAL_KEYS: [&str; 4] = ["access_token", "client_id", "client_secret", "timestamp"];

/// The token file: the provider's response plus the client registration and
/// the capture time.
#[derive(Clone, Serialize, Deserialize)]
pub struct TokenRecord {
    pub access_token: String,
    pub client_id: String,
    pub client_secret: String,
    /// Capture time in seconds since the Unix epoch.
    pub timestamp: f64,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl TokenRecord {
    pub fn new(response: TokenResponse, config: &OAuthConfig, timestamp: f64) -> Self {
        let TokenResponse {
            access_token,
            mut extra,
        } = response;
        extra.retain(|k, _| !LOCAL_KEYS.contains(&k.as_str()));
        Self {
            access_token,
            client_id: config.client_id.clone(),
            client_secret: config.client_secret.expose_secret().clone(),
            timestamp,
            extra,
        }
    }

    pub fn refresh_token(&self) -> Option<&str> {
        self.extra.get("refresh_token").and_then(Value::as_str)
    }

    pub fn token_type(&self) -> Option<&str> {
        self.extra.get("token_type").and_then(Value::as_str)
    }

    pub fn expires_in(&self) -> Option<u64> {
        self.extra.get("expires_in").and_then(Value::as_u64)
    }

    /// Unix time at which the access token expires, if the provider said.
    pub fn expires_at(&self) -> Option<f64> {
        self.expires_in().map(|secs| self.timestamp + secs as f64)
    }

    pub fn is_expired_at(&self, now: f64) -> bool {
        self.expires_at().is_some_and(|at| at <= now)
    }
}

impl fmt::Debug for TokenRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenRecord")
            .field("client_id", &self.client_id)
            .field("timestamp", &self.timestamp)
            .field("expires_in", &self.expires_in())
            .finish_non_exhaustive()
    }
}
