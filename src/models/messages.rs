use actix::Message;
use serde::{Deserialize, Serialize};

use crate::game::board::{Board, Color, Position};
use crate::models::game_session::{GameSession, MoveApplied};

/// Message sent from client to server
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct ClientMessage {
    pub message_type: String,
    pub name: Option<String>,
    pub game_id: Option<String>,
    pub from: Option<Position>,
    pub to: Option<Position>,
}

/// Message sent from server to client
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct ServerMessage {
    pub message_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub game_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session: Option<GameSession>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from: Option<Position>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to: Option<Position>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub board: Option<Board>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_turn: Option<Color>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ServerMessage {
    fn bare(message_type: &str) -> ServerMessage {
        ServerMessage {
            message_type: message_type.to_string(),
            game_id: None,
            session: None,
            from: None,
            to: None,
            board: None,
            current_turn: None,
            error: None,
        }
    }

    /// Acknowledgment to a lone queued connection.
    pub fn waiting() -> ServerMessage {
        ServerMessage::bare("waiting")
    }

    /// Sent to both paired connections; carries the full session.
    pub fn game_start(session: &GameSession) -> ServerMessage {
        ServerMessage {
            game_id: Some(session.id.clone()),
            session: Some(session.clone()),
            ..ServerMessage::bare("game_start")
        }
    }

    /// Sent to both connections after a legal move.
    pub fn move_made(game_id: &str, applied: &MoveApplied) -> ServerMessage {
        ServerMessage {
            game_id: Some(game_id.to_string()),
            from: Some(applied.from),
            to: Some(applied.to),
            board: Some(applied.board.clone()),
            current_turn: Some(applied.current_turn),
            ..ServerMessage::bare("move_made")
        }
    }

    /// Sent to the remaining room members when a participant disconnects.
    pub fn player_disconnected(game_id: &str) -> ServerMessage {
        ServerMessage {
            game_id: Some(game_id.to_string()),
            ..ServerMessage::bare("player_disconnected")
        }
    }

    /// Rejection notice to the requesting connection.
    pub fn error(game_id: Option<String>, text: impl Into<String>) -> ServerMessage {
        ServerMessage {
            game_id,
            error: Some(text.into()),
            ..ServerMessage::bare("error")
        }
    }
}

/// Message type for WebSocket communication
#[derive(Message)]
#[rtype(result = "()")]
pub struct ChessWebSocketMessage(pub String);

/// Tells a waiting actor it has been seated in a new game.
#[derive(Message, Debug, Clone)]
#[rtype(result = "()")]
pub struct SeatAssignment {
    pub game_id: String,
    pub color: Color,
}

/// Tells a surviving actor its game was torn down.
#[derive(Message, Debug, Clone)]
#[rtype(result = "()")]
pub struct SessionClosed {
    pub game_id: String,
}
