//! The controller layer: shared state, command dispatch, background search
//! tasks, and the event interface toward the presentation layer.

pub mod commands;
pub mod events;
pub mod helpers;
pub mod proxy;
pub mod state;
pub mod tasks;
pub mod view_model;

use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use events::{CommandMessage, UserEvent};
use proxy::EventProxy;
use state::AppState;

#[derive(Deserialize)]
struct SearchPayload {
    #[serde(default)]
    text: String,
}

#[derive(Deserialize)]
struct DirectoryPayload {
    path: PathBuf,
}

#[derive(Deserialize)]
struct CreatePayload {
    #[serde(default)]
    parent: Option<PathBuf>,
    name: String,
}

#[derive(Deserialize)]
struct DeletePayload {
    path: PathBuf,
}

#[derive(Deserialize)]
struct RenamePayload {
    path: PathBuf,
    new_name: String,
}

/// Parses a raw command message and dispatches it to the matching handler.
///
/// Unknown commands are logged and dropped; malformed messages and payloads
/// are reported through the error channel, leaving state untouched.
pub fn handle_command_message<P: EventProxy>(message: &str, proxy: P, state: Arc<Mutex<AppState>>) {
    let parsed: CommandMessage = match serde_json::from_str(message) {
        Ok(parsed) => parsed,
        Err(err) => {
            tracing::warn!("Ignoring malformed command message: {}", err);
            proxy.send_event(UserEvent::ShowError(format!("Malformed command: {}", err)));
            return;
        }
    };

    tracing::debug!("Dispatching command '{}'", parsed.command);
    match parsed.command.as_str() {
        "search" => {
            if let Some(p) = parse_payload::<SearchPayload, _>("search", parsed.payload, &proxy) {
                commands::search(p.text, proxy, state);
            }
        }
        "changeDirectory" => {
            if let Some(p) =
                parse_payload::<DirectoryPayload, _>("changeDirectory", parsed.payload, &proxy)
            {
                commands::change_directory(p.path, proxy, state);
            }
        }
        "createDirectory" => {
            if let Some(p) =
                parse_payload::<CreatePayload, _>("createDirectory", parsed.payload, &proxy)
            {
                commands::create_directory(p.parent, p.name, proxy, state);
            }
        }
        "createFile" => {
            if let Some(p) = parse_payload::<CreatePayload, _>("createFile", parsed.payload, &proxy)
            {
                commands::create_file(p.parent, p.name, proxy, state);
            }
        }
        "delete" => {
            if let Some(p) = parse_payload::<DeletePayload, _>("delete", parsed.payload, &proxy) {
                commands::delete_entry(p.path, proxy, state);
            }
        }
        "rename" => {
            if let Some(p) = parse_payload::<RenamePayload, _>("rename", parsed.payload, &proxy) {
                commands::rename_entry(p.path, p.new_name, proxy, state);
            }
        }
        "refresh" => commands::refresh(proxy, state),
        other => tracing::warn!("Unknown command '{}'", other),
    }
}

fn parse_payload<T: DeserializeOwned, P: EventProxy>(
    command: &str,
    payload: serde_json::Value,
    proxy: &P,
) -> Option<T> {
    match serde_json::from_value(payload) {
        Ok(parsed) => Some(parsed),
        Err(err) => {
            tracing::warn!("Invalid payload for '{}': {}", command, err);
            proxy.send_event(UserEvent::ShowError(format!(
                "Invalid payload for '{}': {}",
                command, err
            )));
            None
        }
    }
}
