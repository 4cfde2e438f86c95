use std::{
    io::Write,
    sync::{Arc, Mutex},
};

use {
    hcauth_config::{ClientCredentials, ProviderEndpoints},
    hcauth_gateway::{GatewayOptions, GatewayState, server},
    hcauth_oauth::TokenStore,
    reqwest::StatusCode,
    tokio::net::TcpListener,
    tracing::Level,
};

const CODE: &str = "AUTHCODE-7f3a91";

#[derive(Clone, Default)]
struct Captured(Arc<Mutex<Vec<u8>>>);

impl Captured {
    fn text(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

impl Write for Captured {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

#[tokio::test]
async fn debug_request_logs_never_contain_the_authorization_code() {
    let captured = Captured::default();
    let writer = captured.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(Level::DEBUG)
        .with_ansi(false)
        .with_writer(move || writer.clone())
        .finish();
    tracing::subscriber::set_global_default(subscriber).unwrap();

    let mut provider = mockito::Server::new_async().await;
    let _token = provider
        .mock("POST", "/security/oauth/token")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"access_token":"at-1","expires_in":86400}"#)
        .create_async()
        .await;

    let tmp = tempfile::tempdir().unwrap();
    let state = GatewayState::new(
        &ClientCredentials::new("client-1", "secret-1", "IdentifyAppliance"),
        &ProviderEndpoints::new(&provider.url()).unwrap(),
        TokenStore::new(tmp.path().join("token.json")),
        GatewayOptions {
            device_selection: false,
            public_url: None,
        },
    );
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(server::serve(listener, Arc::new(state)));

    let resp = reqwest::get(format!("http://{addr}/login/authorized?code={CODE}"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    resp.text().await.unwrap();

    let logs = captured.text();
    assert!(logs.contains("path=/login/authorized"), "{logs}");
    assert!(logs.contains("token record saved"), "{logs}");
    assert!(!logs.contains(CODE), "{logs}");
}
