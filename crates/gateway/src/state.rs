use {
    axum::http::{HeaderMap, header},
    hcauth_appliances::ApplianceClient,
    hcauth_config::{ClientCredentials, ProviderEndpoints},
    hcauth_oauth::{OAuthConfig, OAuthFlow, TokenStore},
    hcauth_sessions::SessionStore,
};

/// Route the provider redirects back to after consent.
pub const CALLBACK_PATH: &str = "/login/authorized";

#[derive(Debug, Clone)]
pub struct GatewayOptions {
    /// List devices after authorization and offer the accessory snippet.
    /// When off, the flow ends once the token file is written.
    pub device_selection: bool,
    /// Externally visible base URL used to build the callback address.
    /// When unset, the request's Host header is used.
    pub public_url: Option<String>,
}

impl Default for GatewayOptions {
    fn default() -> Self {
        Self {
            device_selection: true,
            public_url: None,
        }
    }
}

/// Everything the handlers share.
pub struct GatewayState {
    pub oauth: OAuthFlow,
    pub appliances: ApplianceClient,
    pub tokens: TokenStore,
    pub sessions: SessionStore,
    pub options: GatewayOptions,
}

impl GatewayState {
    pub fn new(
        credentials: &ClientCredentials,
        endpoints: &ProviderEndpoints,
        tokens: TokenStore,
        options: GatewayOptions,
    ) -> Self {
        let client = reqwest::Client::new();
        Self {
            oauth: OAuthFlow::with_client(
                OAuthConfig::from_credentials(credentials, endpoints),
                client.clone(),
            ),
            appliances: ApplianceClient::with_client(endpoints, client),
            tokens,
            sessions: SessionStore::new(),
            options,
        }
    }

    /// Absolute callback URL for this service, as the provider should see it.
    pub fn callback_url(&self, headers: &HeaderMap) -> String {
        if let Some(base) = self.options.public_url.as_deref() {
            return format!("{}{CALLBACK_PATH}", base.trim_end_matches('/'));
        }
        let host = headers
            .get(header::HOST)
            .and_then(|v| v.to_str().ok())
            .filter(|h| !h.is_empty())
            .unwrap_or("localhost");
        format!("http://{host}{CALLBACK_PATH}")
    }
}
