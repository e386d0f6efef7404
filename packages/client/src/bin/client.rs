//! Number Hunt player client.
//!
//! Logs in (or restores a saved session), lists rooms and plays rounds from
//! the terminal. The backend owns all game state; the client polls the
//! current room every two seconds and redraws the screen.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin numberhunt
//! cargo run --bin numberhunt -- -u http://game.example.com:8000
//! cargo run --bin numberhunt -- --token-file /tmp/alice-token --log-level debug
//! ```

use std::{path::PathBuf, time::Duration};

use clap::Parser;

use numberhunt_client::{
    ui::{
        ClientConfig,
        config::{DEFAULT_SERVER_URL, PLAYER_TOKEN_FILE},
        run_player_client,
    },
    usecase::poller::GAME_POLL_INTERVAL,
};
use numberhunt_shared::logger::setup_logger;

#[derive(Parser, Debug)]
#[command(name = "numberhunt")]
#[command(about = "Terminal client for the Number Hunt party game", long_about = None)]
struct Args {
    /// Game server base URL
    #[arg(short = 'u', long, env = "NUMBERHUNT_SERVER_URL", default_value = DEFAULT_SERVER_URL)]
    server_url: String,

    /// Where the auth token is persisted (default: ~/.numberhunt/token)
    #[arg(short = 't', long)]
    token_file: Option<PathBuf>,

    /// Room polling interval in milliseconds
    #[arg(
        long,
        default_value_t = GAME_POLL_INTERVAL.as_millis() as u64,
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    poll_interval_ms: u64,

    /// Default log level when RUST_LOG is unset
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), &args.log_level);

    let config = ClientConfig::new(
        args.server_url,
        args.token_file,
        PLAYER_TOKEN_FILE,
        Duration::from_millis(args.poll_interval_ms),
    );

    if let Err(e) = run_player_client(config).await {
        tracing::error!("Client error: {}", e);
        std::process::exit(1);
    }
}
