use serde::{Deserialize, Serialize};

use crate::game::board::{Board, Color, Position};
use crate::game::rules;

/// A seated player: the connection it belongs to and the display name it
/// queued with.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct PlayerSeat {
    pub id: String,
    pub name: String,
}

/// Session lifecycle. Sessions are created `Playing` and flipped to
/// `Terminated` when a participant disconnects, just before removal.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum GameStatus {
    Playing,
    Terminated,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Players {
    pub white: PlayerSeat,
    pub black: PlayerSeat,
}

/// One in-progress two-player game: both seats, the board, and whose turn it
/// is. Owned exclusively by the session registry and mutated in place on each
/// accepted move.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct GameSession {
    pub id: String,
    pub players: Players,
    pub board: Board,
    pub current_turn: Color,
    pub status: GameStatus,
}

/// Why a move request was rejected. Every rejection leaves the session
/// untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveError {
    SessionNotFound,
    NotYourTurn,
    OutOfBounds,
    IllegalMove,
}

/// Snapshot of an accepted move, broadcast to both players.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct MoveApplied {
    pub from: Position,
    pub to: Position,
    pub board: Board,
    pub current_turn: Color,
}

impl GameSession {
    pub fn new(id: String, white: PlayerSeat, black: PlayerSeat) -> GameSession {
        GameSession {
            id,
            players: Players { white, black },
            board: Board::initial(),
            current_turn: Color::White,
            status: GameStatus::Playing,
        }
    }

    /// The color seated for `connection_id`, if it is a participant.
    pub fn seat_color(&self, connection_id: &str) -> Option<Color> {
        if self.players.white.id == connection_id {
            Some(Color::White)
        } else if self.players.black.id == connection_id {
            Some(Color::Black)
        } else {
            None
        }
    }

    /// Attempts the move for the given connection: ownership and turn checks,
    /// the bounds gate, then piece legality. On success the destination is
    /// overwritten, the source cleared, and the turn flipped.
    pub fn try_move(
        &mut self,
        connection_id: &str,
        from: Position,
        to: Position,
    ) -> Result<MoveApplied, MoveError> {
        let color = self.seat_color(connection_id).ok_or(MoveError::NotYourTurn)?;
        if color != self.current_turn {
            return Err(MoveError::NotYourTurn);
        }
        if !from.in_bounds() || !to.in_bounds() {
            return Err(MoveError::OutOfBounds);
        }
        if !rules::is_legal_move(&self.board, from, to, color) {
            return Err(MoveError::IllegalMove);
        }

        let piece = self.board.get(from);
        self.board.set(to, piece);
        self.board.set(from, None);
        self.current_turn = color.opposite();

        Ok(MoveApplied {
            from,
            to,
            board: self.board.clone(),
            current_turn: self.current_turn,
        })
    }
}
