//! Number Hunt admin client.
//!
//! Staff-only console for the backend: overview, player and game
//! management, statistics, cleanup and data export. The overview panel
//! refreshes itself every thirty seconds while it is open.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin numberhunt-admin
//! cargo run --bin numberhunt-admin -- -u http://game.example.com:8000 --refresh-interval-ms 10000
//! ```

use std::{path::PathBuf, time::Duration};

use clap::Parser;

use numberhunt_client::{
    ui::{
        ClientConfig,
        config::{ADMIN_TOKEN_FILE, DEFAULT_SERVER_URL},
        run_admin_client,
    },
    usecase::poller::ADMIN_POLL_INTERVAL,
};
use numberhunt_shared::logger::setup_logger;

#[derive(Parser, Debug)]
#[command(name = "numberhunt-admin")]
#[command(about = "Admin console for the Number Hunt backend", long_about = None)]
struct Args {
    /// Game server base URL
    #[arg(short = 'u', long, env = "NUMBERHUNT_SERVER_URL", default_value = DEFAULT_SERVER_URL)]
    server_url: String,

    /// Where the staff token is persisted (default: ~/.numberhunt/admin-token)
    #[arg(short = 't', long)]
    token_file: Option<PathBuf>,

    /// Overview refresh interval in milliseconds
    #[arg(
        long,
        default_value_t = ADMIN_POLL_INTERVAL.as_millis() as u64,
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    refresh_interval_ms: u64,

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
        ADMIN_TOKEN_FILE,
        Duration::from_millis(args.refresh_interval_ms),
    );

    if let Err(e) = run_admin_client(config).await {
        tracing::error!("Admin client error: {}", e);
        std::process::exit(1);
    }
}
