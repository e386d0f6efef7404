//! Event loops for the two terminal clients.
//!
//! Readline runs on a dedicated thread and forwards lines over a channel.
//! The loop selects between those lines and poller events, so the
//! controller is only ever touched from this one task.

use std::sync::Arc;

use numberhunt_shared::time::{Clock, SystemClock};
use rustyline::{DefaultEditor, error::ReadlineError};
use tokio::sync::mpsc;

use crate::{
    domain::{AdminApi, ApiError, GameApi, Notification, NotificationLevel},
    infrastructure::{FileTokenStore, RestClient},
};

use super::{
    admin_controller::AdminController,
    command::{CommandError, parse_admin_command, parse_player_command},
    config::ClientConfig,
    controller::{Flow, GameController},
    render::Renderer,
    terminal::TerminalRenderer,
};

const PLAYER_PROMPT: &str = "numberhunt> ";
const ADMIN_PROMPT: &str = "admin> ";

/// Run the player client until the user quits or closes stdin
pub async fn run_player_client(config: ClientConfig) -> Result<(), ApiError> {
    let client = Arc::new(RestClient::new(&config.server_url)?);
    tracing::info!("Using game server at {}", client.base_url());

    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let renderer = Arc::new(TerminalRenderer::new(PLAYER_PROMPT, Arc::clone(&clock)));
    let (poll_tx, mut poll_rx) = mpsc::unbounded_channel();
    let api: Arc<dyn GameApi> = client;
    let mut controller = GameController::new(
        api,
        Arc::new(FileTokenStore::new(config.token_file.clone())),
        renderer.clone(),
        Arc::clone(&clock),
        config.poll_interval,
        poll_tx,
    );

    println!("\nNumber Hunt. Type `help` for commands, `quit` to exit.\n");
    controller.start().await;
    let mut input_rx = spawn_readline(PLAYER_PROMPT);

    loop {
        tokio::select! {
            line = input_rx.recv() => {
                let Some(line) = line else {
                    break;
                };
                match parse_player_command(&line) {
                    Ok(command) => {
                        if controller.handle_command(command).await == Flow::Quit {
                            break;
                        }
                    }
                    Err(e) => report_parse_error(renderer.as_ref(), clock.as_ref(), e),
                }
            }
            Some(event) = poll_rx.recv() => controller.handle_poll_event(event).await,
        }
    }

    controller.teardown();
    tracing::info!("Player client stopped");
    Ok(())
}

/// Run the admin client until the user quits or closes stdin
pub async fn run_admin_client(config: ClientConfig) -> Result<(), ApiError> {
    let client = Arc::new(RestClient::new(&config.server_url)?);
    tracing::info!("Using game server at {}", client.base_url());

    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let renderer = Arc::new(TerminalRenderer::new(ADMIN_PROMPT, Arc::clone(&clock)));
    let (refresh_tx, mut refresh_rx) = mpsc::unbounded_channel();
    let game_api: Arc<dyn GameApi> = client.clone();
    let admin_api: Arc<dyn AdminApi> = client;
    let mut controller = AdminController::new(
        game_api,
        admin_api,
        Arc::new(FileTokenStore::new(config.token_file.clone())),
        renderer.clone(),
        Arc::clone(&clock),
        config.poll_interval,
        refresh_tx,
    );

    println!("\nNumber Hunt admin. Type `help` for commands, `quit` to exit.\n");
    controller.start().await;
    let mut input_rx = spawn_readline(ADMIN_PROMPT);

    loop {
        tokio::select! {
            line = input_rx.recv() => {
                let Some(line) = line else {
                    break;
                };
                match parse_admin_command(&line) {
                    Ok(command) => {
                        if controller.handle_command(command).await == Flow::Quit {
                            break;
                        }
                    }
                    Err(e) => report_parse_error(renderer.as_ref(), clock.as_ref(), e),
                }
            }
            Some(refresh) = refresh_rx.recv() => controller.handle_refresh(refresh).await,
        }
    }

    controller.teardown();
    tracing::info!("Admin client stopped");
    Ok(())
}

fn report_parse_error(renderer: &dyn Renderer, clock: &dyn Clock, error: CommandError) {
    renderer.notify(&Notification {
        level: NotificationLevel::Error,
        message: error.to_string(),
        at_millis: clock.now_millis(),
    });
}

/// Spawn a blocking thread for rustyline (synchronous readline)
fn spawn_readline(prompt: &'static str) -> mpsc::UnboundedReceiver<String> {
    let (input_tx, input_rx) = mpsc::unbounded_channel::<String>();

    std::thread::spawn(move || {
        let mut rl = match DefaultEditor::new() {
            Ok(rl) => rl,
            Err(e) => {
                eprintln!("Failed to initialize readline: {}", e);
                return;
            }
        };

        loop {
            match rl.readline(prompt) {
                Ok(line) => {
                    let line = line.trim();
                    if !line.is_empty() {
                        rl.add_history_entry(line).ok();
                        if input_tx.send(line.to_string()).is_err() {
                            break;
                        }
                    }
                }
                Err(ReadlineError::Interrupted) => {
                    // Ctrl+C
                    tracing::info!("Interrupted");
                    break;
                }
                Err(ReadlineError::Eof) => {
                    // Ctrl+D
                    tracing::info!("EOF");
                    break;
                }
                Err(err) => {
                    tracing::error!("Readline error: {}", err);
                    break;
                }
            }
        }
    });

    input_rx
}
