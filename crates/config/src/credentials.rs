use std::path::Path;

use {
    anyhow::{Context, bail},
    secrecy::{ExposeSecret, SecretString},
    serde::Deserialize,
};

/// OAuth client registration read from the secrets file.
///
/// The file is a JSON object of the form
/// `{"ID": "...", "SECRET": "...", "SCOPE": "IdentifyAppliance Monitor"}`.
#[derive(Debug, Deserialize)]
pub struct ClientCredentials {
    #[serde(rename = "ID")]
    pub client_id: String,
    #[serde(rename = "SECRET")]
    pub client_secret: SecretString,
    #[serde(rename = "SCOPE")]
    pub scope: String,
}

impl ClientCredentials {
    pub fn new(
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
        scope: impl Into<String>,
    ) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: SecretString::new(client_secret.into()),
            scope: scope.into(),
        }
    }

    fn validate(&self) -> anyhow::Result<()> {
        if self.client_id.trim().is_empty() {
            bail!("client credentials: \"ID\" must not be empty");
        }
        if self.client_secret.expose_secret().trim().is_empty() {
            bail!("client credentials: \"SECRET\" must not be empty");
        }
        if self.scope.trim().is_empty() {
            bail!("client credentials: \"SCOPE\" must not be empty");
        }
        Ok(())
    }
}

/// Parse credentials from the JSON text of a secrets file.
pub fn parse_credentials(content: &str) -> anyhow::Result<ClientCredentials> {
    let creds: ClientCredentials =
        serde_json::from_str(content).context("invalid client credentials JSON")?;
    creds.validate()?;
    Ok(creds)
}

/// Load the client credentials file. Any failure here is fatal for startup.
pub fn load_credentials(path: &Path) -> anyhow::Result<ClientCredentials> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read client credentials from {}", path.display()))?;
    let creds = parse_credentials(&content)
        .with_context(|| format!("failed to load {}", path.display()))?;
    tracing::debug!(
        path = %path.display(),
        client_id = %creds.client_id,
        "loaded client credentials"
    );
    Ok(creds)
}
