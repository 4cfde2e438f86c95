use std::{
    io::Write,
    path::{Path, PathBuf},
};

use {anyhow::Context, tempfile::NamedTempFile};

use crate::types::TokenRecord;

/// File-backed store for the single token record.
///
/// Each save writes a uniquely named temp file next to the target and renames
/// it over the old record, so readers only ever see a complete file. On Unix
/// the file is owner read/write only. Concurrent saves each publish a whole
/// record; the last rename wins.
#[derive(Debug, Clone)]
pub struct TokenStore {
    path: PathBuf,
}

impl TokenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The token path made absolute against the current directory, without
    /// resolving symlinks. This is what consumers of the file are told.
    pub fn absolute_path(&self) -> anyhow::Result<PathBuf> {
        std::path::absolute(&self.path)
            .with_context(|| format!("cannot make {} absolute", self.path.display()))
    }

    pub fn load(&self) -> anyhow::Result<Option<TokenRecord>> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(e).with_context(|| format!("failed to read {}", self.path.display()));
            },
        };
        let record = serde_json::from_str(&content)
            .with_context(|| format!("invalid token record in {}", self.path.display()))?;
        Ok(Some(record))
    }

    pub fn save(&self, record: &TokenRecord) -> anyhow::Result<()> {
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        std::fs::create_dir_all(dir)
            .with_context(|| format!("failed to create {}", dir.display()))?;

        let json = serde_json::to_string_pretty(record)?;
        let mut tmp = NamedTempFile::new_in(dir)
            .with_context(|| format!("failed to create a temp file in {}", dir.display()))?;
        tmp.write_all(json.as_bytes())
            .with_context(|| format!("failed to write {}", tmp.path().display()))?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            tmp.as_file()
                .set_permissions(std::fs::Permissions::from_mode(0o600))
                .with_context(|| {
                    format!("failed to restrict permissions on {}", tmp.path().display())
                })?;
        }

        tmp.persist(&self.path)
            .with_context(|| format!("failed to replace {}", self.path.display()))?;

        tracing::info!(path = %self.path.display(), "token record saved");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use {
        super::*,
        crate::types::{OAuthConfig, TokenResponse},
        hcauth_config::{ClientCredentials, ProviderEndpoints},
    };

    fn record(access_token: &str, timestamp: f64) -> TokenRecord {
        let config = OAuthConfig::from_credentials(
            &ClientCredentials::new("client-1", "secret-1", "Monitor"),
            &ProviderEndpoints::default(),
        );
        let resp: TokenResponse = serde_json::from_value(serde_json::json!({
            "access_token": access_token,
            "refresh_token": "rt",
            "expires_in": 86400,
        }))
        .unwrap();
        TokenRecord::new(resp, &config, timestamp)
    }

    #[test]
    fn test_load_missing_is_none() {
        let tmp = tempfile::tempdir().unwrap();
        let store = TokenStore::new(tmp.path().join("token.json"));
        assert!(store.load().unwrap().is_none());
    }

    #[test]
    fn test_save_then_load() {
        let tmp = tempfile::tempdir().unwrap();
        let store = TokenStore::new(tmp.path().join("token.json"));
        store.save(&record("at-1", 10.0)).unwrap();

        let loaded = store.load().unwrap().unwrap();
        assert_eq!(loaded.access_token, "at-1");
        assert_eq!(loaded.client_secret, "secret-1");
        assert_eq!(loaded.refresh_token(), Some("rt"));
        let names: Vec<_> = std::fs::read_dir(tmp.path())
            .unwrap()
            .map(|e| e.unwrap().file_name())
            .collect();
        assert_eq!(names, vec![std::ffi::OsString::from("token.json")]);
    }

    #[test]
    fn test_save_overwrites_previous_record() {
        let tmp = tempfile::tempdir().unwrap();
        let store = TokenStore::new(tmp.path().join("token.json"));
        store.save(&record("first", 1.0)).unwrap();
        store.save(&record("second", 2.0)).unwrap();

        let raw = std::fs::read_to_string(store.path()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(value["access_token"], "second");
        assert_eq!(value["timestamp"], 2.0);
        assert!(!raw.contains("first"));
    }

    #[test]
    fn test_save_creates_parent_dirs() {
        let tmp = tempfile::tempdir().unwrap();
        let store = TokenStore::new(tmp.path().join("token/token.json"));
        store.save(&record("at", 1.0)).unwrap();
        assert!(store.path().is_file());
    }

    #[cfg(unix)]
    #[test]
    fn test_saved_file_is_owner_only() {
        use std::os::unix::fs::PermissionsExt;

        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("token.json");
        std::fs::write(&path, "{}").unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o666)).unwrap();

        TokenStore::new(&path).save(&record("at", 1.0)).unwrap();
        let mode = std::fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }

    #[test]
    fn test_concurrent_saves_publish_whole_records() {
        let tmp = tempfile::tempdir().unwrap();
        let store = TokenStore::new(tmp.path().join("token.json"));

        std::thread::scope(|scope| {
            for i in 0..8 {
                let store = &store;
                scope.spawn(move || {
                    for round in 0..10 {
                        store
                            .save(&record(&format!("at-{i}-{round}"), f64::from(round)))
                            .unwrap();
                    }
                });
            }
        });

        let loaded = store.load().unwrap().unwrap();
        assert!(loaded.access_token.starts_with("at-"));
        assert_eq!(std::fs::read_dir(tmp.path()).unwrap().count(), 1);
    }

    #[test]
    fn test_load_invalid_json_errors() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("token.json");
        std::fs::write(&path, "not json").unwrap();
        assert!(TokenStore::new(&path).load().is_err());
    }

    #[test]
    fn test_absolute_path() {
        let store = TokenStore::new("token.json");
        let abs = store.absolute_path().unwrap();
        assert!(abs.is_absolute());
        assert!(abs.ends_with("token.json"));
    }
}
