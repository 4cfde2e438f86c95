use {
    anyhow::{Context, bail},
    hcauth_config::ProviderEndpoints,
    secrecy::{ExposeSecret, SecretString},
    tracing::{debug, info},
};

use crate::types::{Appliance, ApplianceListResponse};

const SDK_MEDIA_TYPE: &str = "application/vnd.bsh.sdk.v1+json";

/// Client for the device-listing endpoint. Builds its own bearer header from
/// the token it is given rather than from any session.
pub struct ApplianceClient {
    url: String,
    client: reqwest::Client,
}

impl ApplianceClient {
    pub fn new(endpoints: &ProviderEndpoints) -> Self {
        Self::with_client(endpoints, reqwest::Client::new())
    }

    pub fn with_client(endpoints: &ProviderEndpoints, client: reqwest::Client) -> Self {
        Self {
            url: endpoints.appliances_url(),
            client,
        }
    }

    pub async fn list(&self, access_token: &SecretString) -> anyhow::Result<Vec<Appliance>> {
        debug!(url = %self.url, "listing home appliances");

        let resp = self
            .client
            .get(&self.url)
            .header("Accept", SDK_MEDIA_TYPE)
            .header("Accept-Language", "en-GB")
            .bearer_auth(access_token.expose_secret())
            .send()
            .await
            .context("appliance listing request failed")?;

        let status = resp.status();
        let body = resp
            .text()
            .await
            .context("failed to read appliance listing")?;
        if !status.is_success() {
            bail!("appliance listing returned HTTP {status}: {body}");
        }

        let parsed: ApplianceListResponse =
            serde_json::from_str(&body).context("unexpected appliance listing format")?;
        let appliances = parsed.data.homeappliances;
        info!(count = appliances.len(), "fetched home appliances");
        Ok(appliances)
    }
}
