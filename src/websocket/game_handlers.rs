use actix_web_actors::ws;
use log::{info, warn};

use crate::game::board::Color;
use crate::models::app_state::MatchOutcome;
use crate::models::game_session::MoveError;
use crate::models::messages::{ClientMessage, SeatAssignment, ServerMessage};
use crate::websocket::handler::{ChessWebSocket, ConnectionPhase};

impl ChessWebSocket {
    pub fn handle_find_game(&mut self, msg: ClientMessage, ctx: &mut ws::WebsocketContext<Self>) {
        let name = match msg.name {
            Some(name) => name,
            None => {
                warn!("find_game without a player name");
                self.send_message(
                    ctx,
                    &ServerMessage::error(None, "find_game requires a player name"),
                );
                return;
            }
        };

        // Only unmatched or waiting connections may request a game.
        match &self.phase {
            ConnectionPhase::InGame { game_id, .. } => {
                warn!("Player {} requested a game while in game {}", self.id, game_id);
                self.send_message(
                    ctx,
                    &ServerMessage::error(Some(game_id.clone()), "Already in a game"),
                );
                return;
            }
            ConnectionPhase::Terminated => return,
            ConnectionPhase::Unmatched | ConnectionPhase::Waiting => {}
        }

        info!("Player {} ({}) is looking for a game", self.id, name);

        match self.app_state.find_game(&self.id, &name) {
            MatchOutcome::Queued => {
                self.phase = ConnectionPhase::Waiting;
                info!("Player {} is waiting for an opponent", self.id);
                self.send_message(ctx, &ServerMessage::waiting());
            }
            MatchOutcome::Paired(session) => {
                info!(
                    "Paired {} (white) with {} (black) in game {}",
                    session.players.white.id, session.players.black.id, session.id
                );

                // Join both connections to the game's room.
                {
                    let mut connections = self.app_state.connections.lock().unwrap();
                    connections.insert(
                        session.id.clone(),
                        vec![
                            session.players.white.id.clone(),
                            session.players.black.id.clone(),
                        ],
                    );
                }

                // The requester takes black; the waiting opponent is seated
                // as white through its mailbox.
                self.phase = ConnectionPhase::InGame {
                    game_id: session.id.clone(),
                    color: Color::Black,
                };
                {
                    let sessions = self.app_state.sessions.lock().unwrap();
                    if let Some(addr) = sessions.get(&session.players.white.id) {
                        addr.do_send(SeatAssignment {
                            game_id: session.id.clone(),
                            color: Color::White,
                        });
                    } else {
                        warn!(
                            "Opponent {} not found in sessions",
                            session.players.white.id
                        );
                    }
                }

                let start = ServerMessage::game_start(&session);
                self.broadcast_to_game(&session.id, &start);
            }
        }
    }

    pub fn handle_make_move(&mut self, msg: ClientMessage, ctx: &mut ws::WebsocketContext<Self>) {
        let (game_id, from, to) = match (msg.game_id, msg.from, msg.to) {
            (Some(game_id), Some(from), Some(to)) => (game_id, from, to),
            _ => {
                warn!("make_move with missing fields");
                self.send_message(
                    ctx,
                    &ServerMessage::error(None, "make_move requires game_id, from and to"),
                );
                return;
            }
        };

        match self.app_state.apply_move(&self.id, &game_id, from, to) {
            Ok(applied) => {
                info!(
                    "Move applied in game {}: ({},{}) -> ({},{})",
                    game_id, applied.from.row, applied.from.col, applied.to.row, applied.to.col
                );
                let update = ServerMessage::move_made(&game_id, &applied);
                self.broadcast_to_game(&game_id, &update);
            }
            Err(e) => {
                warn!("Rejected move from {} in game {}: {:?}", self.id, game_id, e);
                let text = match e {
                    MoveError::SessionNotFound => "Game not found",
                    MoveError::NotYourTurn => "Not your turn",
                    MoveError::OutOfBounds => "Position is off the board",
                    MoveError::IllegalMove => "Illegal move",
                };
                self.send_message(ctx, &ServerMessage::error(Some(game_id), text));
            }
        }
    }
}
