//! Defines the event and message structures for communication between the
//! controller and the presentation layer.

use serde::Deserialize;

use super::view_model::UiState;

/// Events sent from the controller to the presentation layer.
#[derive(Debug)]
pub enum UserEvent {
    /// A complete state update to re-render the listing.
    StateUpdate(Box<UiState>),
    /// An error message to be displayed to the user.
    ShowError(String),
}

/// A command received from the presentation layer.
#[derive(Deserialize, Debug)]
pub struct CommandMessage {
    /// The name of the command to execute.
    pub command: String,
    /// The payload associated with the command, as a JSON value.
    #[serde(default)]
    pub payload: serde_json::Value,
}
