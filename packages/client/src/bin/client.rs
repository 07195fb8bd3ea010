//! Watch party terminal client with reconnection support.
//!
//! Connects to the relay, shows playback commands and chat from everyone in
//! the party, and sends the commands you type (`/load`, `/play`, `/pause`,
//! `/seek`) or chat lines. Reconnects on disconnection (max 5 attempts with
//! 5 second interval).
//!
//! Run with:
//! ```not_rust
//! cargo run --bin watchparty-client -- --name Alice
//! cargo run --bin watchparty-client -- -n Bob --url ws://127.0.0.1:3000/watchparty
//! ```

use clap::Parser;

use watchparty_shared::logger::setup_logger;

#[derive(Parser, Debug)]
#[command(name = "watchparty-client")]
#[command(about = "Terminal client for synchronized video playback and chat", long_about = None)]
struct Args {
    /// Name shown as the sender of your chat messages
    #[arg(short = 'n', long)]
    name: String,

    /// WebSocket relay URL
    #[arg(short = 'u', long, default_value = "ws://127.0.0.1:8080/watchparty")]
    url: String,
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), "info");

    let args = Args::parse();

    if let Err(e) = watchparty_client::run_client(args.url, args.name).await {
        tracing::error!("Client error: {}", e);
        std::process::exit(1);
    }
}
