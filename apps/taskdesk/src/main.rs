//! # Taskdesk
//!
//! Console client for the task manager API. Reads one command per line from
//! stdin; logs go to stderr.

use std::io::Write;

use anyhow::Context;
use taskdesk_core::ports::{Navigator, Route};
use tokio::io::{AsyncBufReadExt, BufReader};

mod command;
mod config;
mod console;
mod navigation;
mod render;
mod state;
mod telemetry;

use command::Command;
use config::AppConfig;
use console::Flow;
use state::AppState;
use telemetry::TelemetryConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    telemetry::init_telemetry(&TelemetryConfig::from_env());

    let config = AppConfig::from_env().context("invalid configuration")?;
    tracing::info!(api = %config.api.base_url, "Starting taskdesk");

    let state = AppState::new(&config).context("failed to build HTTP client")?;

    state.session.initialize().await;
    match state.session.user().await {
        Some(user) => {
            println!("Welcome back, {}", user.display_name());
            state.navigator.navigate(Route::Dashboard);
            console::execute(&state, Command::List).await;
        }
        None => println!("Not logged in. Type 'login <email> <password>' or 'help'."),
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print!("{}", state.navigator.prompt());
        std::io::stdout().flush().ok();

        let Some(line) = lines.next_line().await.context("failed to read stdin")? else {
            break;
        };

        let command = match command::parse(&line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(e) => {
                println!("{e}");
                continue;
            }
        };

        if let Flow::Quit = console::execute(&state, command).await {
            break;
        }
    }

    tracing::info!("Bye");
    Ok(())
}
