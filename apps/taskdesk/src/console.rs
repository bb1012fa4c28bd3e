//! Executes parsed commands against the application state.

use std::time::Duration;

use chrono::Utc;

use taskdesk_core::ClientError;
use taskdesk_core::domain::{Credentials, TokenKind};
use taskdesk_core::services::FetchOutcome;

use crate::command::{Command, HELP};
use crate::render;
use crate::state::AppState;

const SEARCH_POLL: Duration = Duration::from_millis(25);

pub enum Flow {
    Continue,
    Quit,
}

/// Run one command and print its outcome to stdout.
pub async fn execute(state: &AppState, command: Command) -> Flow {
    match run(state, command).await {
        Ok(flow) => flow,
        Err(e) => {
            println!("{}", render::error(&e));
            Flow::Continue
        }
    }
}

async fn run(state: &AppState, command: Command) -> Result<Flow, ClientError> {
    match command {
        Command::Quit => return Ok(Flow::Quit),
        Command::Help => println!("{HELP}"),
        Command::Login { email, password } => {
            let user = state
                .session
                .login(&Credentials::new(email, password))
                .await?;
            println!("Welcome, {}", user.display_name());
            state.tasks.fetch_page().await?;
            show_list(state).await;
        }
        Command::Register(registration) => {
            state.session.register(&registration).await?;
            println!("Account created, please log in");
        }
        Command::Logout => {
            state.session.logout().await;
            println!("Logged out");
        }
        Command::Whoami => whoami(state).await,
        command => {
            state.session.require_user().await?;
            run_task_command(state, command).await?;
        }
    }
    Ok(Flow::Continue)
}

async fn run_task_command(state: &AppState, command: Command) -> Result<(), ClientError> {
    let list = &state.tasks;
    let actions = &state.actions;

    match command {
        Command::List => {
            list.fetch_page().await?;
        }
        Command::Search(text) => {
            list.set_search(text).await;
            wait_for_search(state).await;
        }
        Command::Status(status) => {
            list.set_status(status).await?;
        }
        Command::Sort(sort) => {
            list.set_sort(sort).await?;
        }
        Command::Page(page) => page_changed(list.set_page(page).await?),
        Command::Next => page_changed(list.next_page().await?),
        Command::Prev => page_changed(list.previous_page().await?),
        Command::Add(task) => {
            actions.create(task).await?;
            println!("Task added");
        }
        Command::Edit { id, patch } => {
            actions.update(&id, patch).await?;
            println!("Task {id} updated");
        }
        Command::Toggle(id) => {
            actions.toggle(&id).await?;
            println!("Task {id} toggled");
        }
        Command::Delete(id) => {
            actions.delete(&id).await?;
            println!("Task {id} deleted");
        }
        Command::Stats => {
            let view = list.snapshot().await;
            println!("{}", render::stats_line(&view.stats(Utc::now())));
            return Ok(());
        }
        _ => return Ok(()),
    }

    show_list(state).await;
    Ok(())
}

fn page_changed(outcome: Option<FetchOutcome>) {
    if outcome.is_none() {
        println!("No such page");
    }
}

/// Blocks the prompt until the debounced search has fired and its request
/// has settled.
async fn wait_for_search(state: &AppState) {
    while state.tasks.search_pending() {
        tokio::time::sleep(SEARCH_POLL).await;
    }
}

async fn show_list(state: &AppState) {
    let view = state.tasks.snapshot().await;
    println!("{}", render::task_list(&view, Utc::now()));
}

async fn whoami(state: &AppState) {
    let Some(user) = state.session.user().await else {
        println!("Not logged in");
        return;
    };

    println!("{}", user.display_name());
    if let Some(email) = &user.email {
        println!("  email: {email}");
    }

    let token = state.tokens.get(TokenKind::Access).await;
    match token.and_then(|t| state.inspector.inspect(&t)) {
        Some(info) => {
            let now = Utc::now();
            match (info.expires_at, info.remaining(now)) {
                (Some(at), _) if info.is_expired(now) => {
                    println!("  access token expired at {at}")
                }
                (Some(at), Some(left)) => println!(
                    "  access token expires at {at} ({} min left)",
                    left.num_minutes()
                ),
                _ => println!("  access token has no expiry"),
            }
        }
        None => println!("  access token is opaque"),
    }
}
