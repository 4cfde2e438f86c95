use hcauth_oauth::{TokenRecord, TokenStore, unix_now};

pub fn print_status(store: &TokenStore) -> anyhow::Result<()> {
    let Some(record) = store.load()? else {
        println!(
            "No token at {}. Run `hcauth serve` and authorize in a browser.",
            store.path().display()
        );
        return Ok(());
    };
    println!("Token file: {}", store.path().display());
    for line in describe(&record, unix_now()) {
        println!("{line}");
    }
    Ok(())
}

fn hours_minutes(secs: f64) -> String {
    let secs = secs.max(0.0) as u64;
    format!("{}h {}m", secs / 3600, (secs % 3600) / 60)
}

/// Human summary of a token record. Never includes token or secret values.
fn describe(record: &TokenRecord, now: f64) -> Vec<String> {
    let expiry = match record.expires_at() {
        None => "unknown (no expires_in recorded)".to_string(),
        Some(_) if record.is_expired_at(now) => "expired".to_string(),
        Some(at) => format!("valid ({} remaining)", hours_minutes(at - now)),
    };
    vec![
        format!("Client:     {}", record.client_id),
        format!("Token type: {}", record.token_type().unwrap_or("unknown")),
        format!("Captured:   {} ago", hours_minutes(now - record.timestamp)),
        format!("Access:     {expiry}"),
        format!(
            "Refresh:    {}",
            if record.refresh_token().is_some() {
                "present"
            } else {
                "missing"
            }
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(json: serde_json::Value) -> TokenRecord {
        serde_json::from_value(json).unwrap()
    }

    #[test]
    fn test_describe_valid_token() {
        let rec = record(serde_json::json!({
            "access_token": "secret-access",
            "client_id": "client-1",
            "client_secret": "secret-client",
            "timestamp": 1000.0,
            "expires_in": 86400,
            "refresh_token": "secret-refresh",
            "token_type": "Bearer",
        }));
        let lines = describe(&rec, 1000.0 + 3600.0 + 120.0).join("\n");
        assert!(lines.contains("client-1"));
        assert!(lines.contains("Bearer"));
        assert!(lines.contains("valid (22h 58m remaining)"));
        assert!(lines.contains("Captured:   1h 2m ago"));
        assert!(lines.contains("present"));
        assert!(!lines.contains("secret-"));
    }

    #[test]
    fn test_describe_expired_and_unknown() {
        let expired = record(serde_json::json!({
            "access_token": "a",
            "client_id": "c",
            "client_secret": "s",
            "timestamp": 0.0,
            "expires_in": 60,
        }));
        let lines = describe(&expired, 61.0).join("\n");
        assert!(lines.contains("expired"));
        assert!(lines.contains("missing"));

        let unknown = record(serde_json::json!({
            "access_token": "a",
            "client_id": "c",
            "client_secret": "s",
            "timestamp": 0.0,
        }));
        assert!(describe(&unknown, 1.0).join("\n").contains("unknown"));
    }

    #[test]
    fn test_print_status_missing_file() {
        let tmp = tempfile::tempdir().unwrap();
        let store = TokenStore::new(tmp.path().join("token.json"));
        assert!(print_status(&store).is_ok());
    }
}
