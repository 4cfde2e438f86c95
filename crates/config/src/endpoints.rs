use anyhow::Context;

pub const DEFAULT_API_BASE: &str = "https://api.home-connect.com";

/// Home Connect endpoints derived from a single base URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderEndpoints {
    base: String,
}

impl Default for ProviderEndpoints {
    fn default() -> Self {
        Self {
            base: DEFAULT_API_BASE.to_string(),
        }
    }
}

impl ProviderEndpoints {
    /// Accepts any absolute http(s) URL; a trailing slash is dropped.
    pub fn new(base: &str) -> anyhow::Result<Self> {
        let parsed =
            url::Url::parse(base).with_context(|| format!("invalid API base URL: {base}"))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            anyhow::bail!("API base URL must be http or https: {base}");
        }
        Ok(Self {
            base: base.trim_end_matches('/').to_string(),
        })
    }

    pub fn authorize_url(&self) -> String {
        format!("{}/security/oauth/authorize", self.base)
    }

    pub fn token_url(&self) -> String {
        format!("{}/security/oauth/token", self.base)
    }

    pub fn appliances_url(&self) -> String {
        format!("{}/api/homeappliances", self.base)
    }
}
