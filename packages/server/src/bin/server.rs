//! Watch party relay server.
//!
//! Relays playback commands and chat between every connected client and
//! replays the last playback command to anyone who joins late.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin watchparty-server
//! cargo run --bin watchparty-server -- --host 0.0.0.0 --port 3000 --path /party
//! WATCHPARTY_ALLOWED_ORIGINS=https://watch.example.com cargo run --bin watchparty-server
//! ```

use std::sync::Arc;

use clap::Parser;
use watchparty_server::{
    infrastructure::{
        registry::WebSocketConnectionRegistry, repository::InMemoryPlaybackStateRepository,
    },
    ui::{DEFAULT_WEBSOCKET_PATH, OriginPolicy, Server, ServerConfig},
    usecase::RelayEngine,
};
use watchparty_shared::logger::setup_logger;

#[derive(Parser, Debug)]
#[command(name = "watchparty-server")]
#[command(about = "WebSocket relay for synchronized video playback and chat", long_about = None)]
struct Args {
    /// Host address to bind the server to
    #[arg(
        short = 'H',
        long,
        env = "WATCHPARTY_HOST",
        default_value = "127.0.0.1"
    )]
    host: String,

    /// Port number to bind the server to
    #[arg(short = 'p', long, env = "WATCHPARTY_PORT", default_value = "8080")]
    port: u16,

    /// WebSocket endpoint path
    #[arg(long, env = "WATCHPARTY_PATH", default_value = DEFAULT_WEBSOCKET_PATH)]
    path: String,

    /// Allowed browser origins (comma separated, `*` wildcards allowed)
    #[arg(
        long = "allowed-origin",
        env = "WATCHPARTY_ALLOWED_ORIGINS",
        value_delimiter = ',',
        default_value = "*"
    )]
    allowed_origins: Vec<String>,
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), "debug");

    let args = Args::parse();

    let origin_policy = OriginPolicy::from_patterns(&args.allowed_origins);
    let config = match ServerConfig::new(args.host, args.port, args.path, origin_policy) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Invalid configuration: {}", e);
            std::process::exit(1);
        }
    };
    tracing::debug!("Server configuration: {:?}", config);

    // 1. Registry and playback state
    let registry = Arc::new(WebSocketConnectionRegistry::new());
    let playback_repository = Arc::new(InMemoryPlaybackStateRepository::new());

    // 2. Relay engine
    let engine = Arc::new(RelayEngine::new(registry, playback_repository));

    // 3. Server
    let server = Server::new(engine, config);
    if let Err(e) = server.run().await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
