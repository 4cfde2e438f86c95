use std::sync::Arc;

use {anyhow::Context, tokio::net::TcpListener, tracing::info};

use crate::{routes::build_router, state::GatewayState};

/// Bind and serve until Ctrl-C.
pub async fn start_gateway(bind: &str, port: u16, state: Arc<GatewayState>) -> anyhow::Result<()> {
    let listener = TcpListener::bind((bind, port))
        .await
        .with_context(|| format!("failed to bind {bind}:{port}"))?;
    serve(listener, state).await
}

/// Serve on an already bound listener.
pub async fn serve(listener: TcpListener, state: Arc<GatewayState>) -> anyhow::Result<()> {
    let addr = listener.local_addr()?;
    info!(
        %addr,
        device_selection = state.options.device_selection,
        token_path = %state.tokens.path().display(),
        "gateway listening"
    );
    axum::serve(listener, build_router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;
    info!("gateway stopped");
    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_err() {
        // Without a signal handler, run until the process is killed.
        std::future::pending::<()>().await;
    }
}
