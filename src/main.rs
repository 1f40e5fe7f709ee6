use anyhow::Result;
use dirscout::app::{self, events::UserEvent, proxy::EventProxy, state::AppState};
use dirscout::config::AppConfig;
use serde_json::json;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use tokio::io::AsyncBufReadExt;

/// Renders published state straight to the terminal. This is the stand-in
/// for a real presentation layer: it only consumes `UserEvent`s and never
/// reaches into the controller.
#[derive(Clone)]
struct ConsoleProxy;

impl EventProxy for ConsoleProxy {
    fn send_event(&self, event: UserEvent) {
        match event {
            UserEvent::StateUpdate(ui_state) => {
                println!();
                println!("-- {} --", ui_state.current_directory);
                for entry in &ui_state.entries {
                    println!("  {}", entry);
                }
                println!("[{}]", ui_state.status_message);
            }
            UserEvent::ShowError(message) => {
                eprintln!("error: {}", message);
            }
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let state = Arc::new(Mutex::new(AppState::default()));
    let proxy = ConsoleProxy;

    let start_directory = {
        let state_guard = state
            .lock()
            .expect("Mutex was poisoned. This should not happen.");
        initial_directory(&state_guard.config)
    };
    app::commands::change_directory(start_directory, proxy.clone(), state.clone());

    print_usage();
    let mut lines = tokio::io::BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if line == "quit" || line == "exit" {
            break;
        }
        match to_command_message(line) {
            Some(message) => app::handle_command_message(&message, proxy.clone(), state.clone()),
            None => print_usage(),
        }
    }

    Ok(())
}

/// The saved directory when configured, otherwise the user's home.
fn initial_directory(config: &AppConfig) -> PathBuf {
    if config.auto_load_last_directory {
        if let Some(last) = &config.last_directory {
            if last.is_dir() {
                return last.clone();
            }
        }
    }
    dirs::home_dir().unwrap_or_else(|| PathBuf::from("."))
}

/// Translates a shell line into the JSON command format the controller accepts.
fn to_command_message(line: &str) -> Option<String> {
    let (verb, rest) = line
        .split_once(' ')
        .map(|(verb, rest)| (verb, rest.trim()))
        .unwrap_or((line, ""));

    let message = match verb {
        // A bare `search` clears the query and restores the plain listing.
        "search" => json!({ "command": "search", "payload": { "text": rest } }),
        "cd" if !rest.is_empty() => {
            json!({ "command": "changeDirectory", "payload": { "path": rest } })
        }
        "mkdir" if !rest.is_empty() => {
            json!({ "command": "createDirectory", "payload": { "name": rest } })
        }
        "touch" if !rest.is_empty() => {
            json!({ "command": "createFile", "payload": { "name": rest } })
        }
        "rm" if !rest.is_empty() => json!({ "command": "delete", "payload": { "path": rest } }),
        "mv" => {
            let (path, new_name) = rest.split_once(' ')?;
            json!({
                "command": "rename",
                "payload": { "path": path.trim(), "new_name": new_name.trim() }
            })
        }
        "ls" => json!({ "command": "refresh", "payload": {} }),
        _ => return None,
    };
    Some(message.to_string())
}

fn print_usage() {
    println!("commands: ls | cd <path> | search <text> | mkdir <name> | touch <name> | rm <path> | mv <path> <new name> | quit");
}
