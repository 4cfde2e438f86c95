//! Authorization-code grant against the provider's authorize and token endpoints.

use {
    anyhow::{Context, bail},
    secrecy::ExposeSecret,
    tracing::{debug, info},
};

use crate::types::{OAuthConfig, TokenResponse};

/// Holds the client registration and drives the two provider-facing steps of
/// the grant. The authorization URL carries no local state; the callback is
/// stateless apart from the code it receives.
pub struct OAuthFlow {
    config: OAuthConfig,
    client: reqwest::Client,
}

impl OAuthFlow {
    pub fn new(config: OAuthConfig) -> Self {
        Self::with_client(config, reqwest::Client::new())
    }

    pub fn with_client(config: OAuthConfig, client: reqwest::Client) -> Self {
        Self { config, client }
    }

    pub fn config(&self) -> &OAuthConfig {
        &self.config
    }

    /// Build the URL the browser is redirected to for consent.
    pub fn authorization_url(&self, redirect_uri: &str) -> anyhow::Result<String> {
        let params = [
            ("client_id", self.config.client_id.as_str()),
            ("redirect_uri", redirect_uri),
            ("response_type", "code"),
            ("scope", self.config.scope.as_str()),
        ];
        let url = url::Url::parse_with_params(&self.config.auth_url, &params)
            .with_context(|| format!("invalid authorize URL: {}", self.config.auth_url))?;
        Ok(url.into())
    }

    /// Exchange an authorization code for tokens.
    ///
    /// `redirect_uri` must be the same value sent in the authorization URL.
    pub async fn exchange_code(
        &self,
        code: &str,
        redirect_uri: &str,
    ) -> anyhow::Result<TokenResponse> {
        let form = [
            ("grant_type", "authorization_code"),
            ("code", code),
            ("client_id", self.config.client_id.as_str()),
            ("client_secret", self.config.client_secret.expose_secret().as_str()),
            ("redirect_uri", redirect_uri),
        ];

        debug!(token_url = %self.config.token_url, "exchanging authorization code");

        let resp = self
            .client
            .post(&self.config.token_url)
            .header("Accept", "application/json")
            .form(&form)
            .send()
            .await
            .context("token request failed")?;

        let status = resp.status();
        let body = resp.text().await.context("failed to read token response")?;
        if !status.is_success() {
            bail!("token endpoint returned HTTP {status}: {body}");
        }

        let token: TokenResponse =
            serde_json::from_str(&body).context("token response is not a valid token object")?;
        if token.access_token.is_empty() {
            bail!("token response contained an empty access_token");
        }

        info!(
            fields = token.extra.len(),
            has_refresh_token = token.extra.contains_key("refresh_token"),
            "authorization code exchanged"
        );
        Ok(token)
    }
}
