mod status;

use std::{path::PathBuf, sync::Arc};

use {
    clap::{Parser, Subcommand},
    hcauth_config::{ProviderEndpoints, load_credentials},
    hcauth_gateway::{GatewayOptions, GatewayState, server::start_gateway},
    hcauth_oauth::TokenStore,
    tracing::info,
    tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt},
};

#[derive(Parser)]
#[command(name = "hcauth", about = "Home Connect token helper for Homebridge")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Where the token record is written and read.
    #[arg(long, global = true, env = "HCAUTH_TOKEN_PATH", default_value = "token.json")]
    token_path: PathBuf,

    /// Log level (trace, debug, info, warn, error).
    #[arg(long, global = true, default_value = "info")]
    log_level: String,

    /// Output logs as JSON instead of human-readable.
    #[arg(long, global = true, default_value_t = false)]
    json_logs: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the authorization web flow (default).
    Serve(ServeArgs),
    /// Show the stored token record.
    Status,
}

#[derive(Parser)]
struct ServeArgs {
    /// Client credentials file with ID, SECRET and SCOPE.
    #[arg(long, env = "HCAUTH_SECRETS", default_value = "secrets.json")]
    secrets: PathBuf,
    #[arg(long, env = "HCAUTH_BIND", default_value = "0.0.0.0")]
    bind: String,
    #[arg(long, env = "HCAUTH_PORT", default_value_t = 80)]
    port: u16,
    /// Home Connect API base URL.
    #[arg(long, env = "HCAUTH_API_BASE", default_value = hcauth_config::DEFAULT_API_BASE)]
    api_base: String,
    /// Base URL the browser reaches this service at, for the OAuth callback.
    /// Defaults to the request's Host header.
    #[arg(long, env = "HCAUTH_PUBLIC_URL")]
    public_url: Option<String>,
    /// Stop after saving the token instead of offering device selection.
    #[arg(long, env = "HCAUTH_NO_DEVICES", default_value_t = false)]
    no_devices: bool,
}

fn init_telemetry(cli: &Cli) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level));

    if cli.json_logs {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json().with_target(true).with_thread_ids(false))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_thread_ids(false)
                    .with_ansi(true),
            )
            .init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    init_telemetry(&cli);

    info!(version = env!("CARGO_PKG_VERSION"), "hcauth starting");

    let tokens = TokenStore::new(&cli.token_path);
    let command = cli
        .command
        .unwrap_or_else(|| Commands::Serve(ServeArgs::parse_from(["hcauth"])));

    match command {
        Commands::Serve(args) => serve(args, tokens).await,
        Commands::Status => status::print_status(&tokens),
    }
}

async fn serve(args: ServeArgs, tokens: TokenStore) -> anyhow::Result<()> {
    let credentials = load_credentials(&args.secrets)?;
    let endpoints = ProviderEndpoints::new(&args.api_base)?;
    let options = GatewayOptions {
        device_selection: !args.no_devices,
        public_url: args.public_url,
    };
    let state = GatewayState::new(&credentials, &endpoints, tokens, options);
    start_gateway(&args.bind, args.port, Arc::new(state)).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cli = Cli::parse_from(["hcauth"]);
        assert!(cli.command.is_none());
        assert_eq!(cli.token_path, PathBuf::from("token.json"));

        let serve = ServeArgs::parse_from(["hcauth"]);
        assert_eq!(serve.port, 80);
        assert_eq!(serve.bind, "0.0.0.0");
        assert_eq!(serve.secrets, PathBuf::from("secrets.json"));
        assert_eq!(serve.api_base, "https://api.home-connect.com");
        assert!(!serve.no_devices);
    }

    #[test]
    fn test_serve_flags() {
        let cli = Cli::parse_from([
            "hcauth",
            "serve",
            "--port",
            "8080",
            "--no-devices",
            "--public-url",
            "https://hc.example.org",
        ]);
        let Some(Commands::Serve(args)) = cli.command else {
            panic!("expected serve");
        };
        assert_eq!(args.port, 8080);
        assert!(args.no_devices);
        assert_eq!(args.public_url.as_deref(), Some("https://hc.example.org"));
    }

    #[test]
    fn test_status_with_token_path() {
        let cli = Cli::parse_from(["hcauth", "status", "--token-path", "/tmp/t.json"]);
        assert!(matches!(cli.command, Some(Commands::Status)));
        assert_eq!(cli.token_path, PathBuf::from("/tmp/t.json"));
    }
}
