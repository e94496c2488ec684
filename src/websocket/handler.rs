use actix::*;
use actix_web::{web, Error, HttpRequest, HttpResponse};
use actix_web_actors::ws;
use log::{info, warn};
use uuid::Uuid;

use crate::game::board::Color;
use crate::models::app_state::{AppState, DisconnectOutcome};
use crate::models::messages::{
    ChessWebSocketMessage, ClientMessage, SeatAssignment, ServerMessage, SessionClosed,
};

/// Where a connection is in its lifecycle. Transitions are guarded by the
/// message handlers; only unmatched or waiting connections may request a game.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectionPhase {
    Unmatched,
    Waiting,
    InGame { game_id: String, color: Color },
    Terminated,
}

/// WebSocket handler for chess connections
pub struct ChessWebSocket {
    pub id: String,
    pub phase: ConnectionPhase,
    pub app_state: web::Data<AppState>,
}

impl Actor for ChessWebSocket {
    type Context = ws::WebsocketContext<Self>;

    fn started(&mut self, ctx: &mut Self::Context) {
        // Register the actor with the application state
        let addr = ctx.address();
        self.app_state.sessions.lock().unwrap().insert(self.id.clone(), addr);

        let total_sessions = self.app_state.sessions.lock().unwrap().len();
        info!("WebSocket connection started: {}", self.id);
        info!("Total active connections: {}", total_sessions);
    }

    fn stopping(&mut self, _: &mut Self::Context) -> Running {
        self.phase = ConnectionPhase::Terminated;

        // Purge the connection from the queue or tear down its game.
        match self.app_state.handle_disconnect(&self.id) {
            DisconnectOutcome::LeftQueue => {
                info!("Removed waiting player {} from the queue", self.id);
            }
            DisconnectOutcome::SessionEnded(session) => {
                info!("Player {} disconnected from game {}", self.id, session.id);

                // Notify the room before dropping its membership.
                let notice = ServerMessage::player_disconnected(&session.id);
                self.broadcast_to_game(&session.id, &notice);

                // Let the surviving actor fall back to the unmatched state.
                {
                    let sessions = self.app_state.sessions.lock().unwrap();
                    for seat in [&session.players.white, &session.players.black] {
                        if seat.id != self.id {
                            if let Some(addr) = sessions.get(&seat.id) {
                                addr.do_send(SessionClosed {
                                    game_id: session.id.clone(),
                                });
                            }
                        }
                    }
                }

                self.app_state.connections.lock().unwrap().remove(&session.id);
            }
            DisconnectOutcome::Untracked => {}
        }

        // Remove the actor from the sessions
        self.app_state.sessions.lock().unwrap().remove(&self.id);
        let total_sessions = self.app_state.sessions.lock().unwrap().len();
        info!("WebSocket connection closed: {}", self.id);
        info!("Total active connections: {}", total_sessions);

        Running::Stop
    }
}

impl Handler<ChessWebSocketMessage> for ChessWebSocket {
    type Result = ();

    fn handle(&mut self, msg: ChessWebSocketMessage, ctx: &mut Self::Context) {
        ctx.text(msg.0);
    }
}

impl Handler<SeatAssignment> for ChessWebSocket {
    type Result = ();

    fn handle(&mut self, msg: SeatAssignment, _: &mut Self::Context) {
        info!(
            "Player {} seated in game {} as {:?}",
            self.id, msg.game_id, msg.color
        );
        self.phase = ConnectionPhase::InGame {
            game_id: msg.game_id,
            color: msg.color,
        };
    }
}

impl Handler<SessionClosed> for ChessWebSocket {
    type Result = ();

    fn handle(&mut self, msg: SessionClosed, _: &mut Self::Context) {
        let in_closed_game = matches!(
            &self.phase,
            ConnectionPhase::InGame { game_id, .. } if *game_id == msg.game_id
        );
        if in_closed_game {
            info!(
                "Game {} ended for player {}; back to unmatched",
                msg.game_id, self.id
            );
            self.phase = ConnectionPhase::Unmatched;
        }
    }
}

// WebSocket message handler
impl StreamHandler<Result<ws::Message, ws::ProtocolError>> for ChessWebSocket {
    fn handle(&mut self, msg: Result<ws::Message, ws::ProtocolError>, ctx: &mut Self::Context) {
        match msg {
            Ok(ws::Message::Ping(msg)) => {
                ctx.pong(&msg);
            }
            Ok(ws::Message::Pong(_)) => {
                // Do nothing for pong messages
            }
            Ok(ws::Message::Text(text)) => {
                info!("Received text message: {}", text);
                match serde_json::from_str::<ClientMessage>(text.as_ref()) {
                    Ok(client_msg) => {
                        self.handle_message(client_msg, ctx);
                    }
                    Err(e) => {
                        warn!("Error parsing client message: {}", e);
                        self.send_message(
                            ctx,
                            &ServerMessage::error(None, format!("Invalid message format: {}", e)),
                        );
                    }
                }
            }
            Ok(ws::Message::Binary(_)) => {
                warn!("Binary messages are not supported");
                self.send_message(
                    ctx,
                    &ServerMessage::error(None, "Binary messages are not supported"),
                );
            }
            Ok(ws::Message::Close(reason)) => {
                info!("Connection closed: {:?}", reason);
                ctx.close(reason);
                ctx.stop();
            }
            _ => {
                ctx.stop();
            }
        }
    }
}

impl ChessWebSocket {
    pub fn handle_message(&mut self, msg: ClientMessage, ctx: &mut ws::WebsocketContext<Self>) {
        match msg.message_type.as_str() {
            "find_game" => self.handle_find_game(msg, ctx),
            "make_move" => self.handle_make_move(msg, ctx),
            _ => {
                warn!("Unknown message type: {}", msg.message_type);
                self.send_message(
                    ctx,
                    &ServerMessage::error(
                        None,
                        format!("Unknown message type: {}", msg.message_type),
                    ),
                );
            }
        }
    }

    /// Serializes a message and sends it to this connection alone.
    pub fn send_message(&self, ctx: &mut ws::WebsocketContext<Self>, message: &ServerMessage) {
        match serde_json::to_string(message) {
            Ok(message_str) => ctx.text(message_str),
            Err(e) => {
                warn!("Error serializing message: {}", e);
            }
        }
    }

    /// Serializes a message once and sends it to every connection in the
    /// game's room. Best-effort: missing members are logged and skipped.
    pub fn broadcast_to_game(&self, game_id: &str, message: &ServerMessage) {
        info!("Broadcasting {} to game {}", message.message_type, game_id);

        // Copy the room membership and addresses out of the locks before
        // sending anything.
        let connection_ids;
        let sessions_copy;
        {
            let connections = self.app_state.connections.lock().unwrap();
            connection_ids = match connections.get(game_id) {
                Some(ids) => ids.clone(),
                None => {
                    warn!("No connections found for game {}", game_id);
                    return;
                }
            };

            let sessions = self.app_state.sessions.lock().unwrap();
            sessions_copy = sessions.clone();
        }

        let message_str = match serde_json::to_string(message) {
            Ok(s) => s,
            Err(e) => {
                warn!("Error serializing message: {}", e);
                return;
            }
        };

        for conn_id in connection_ids {
            if let Some(addr) = sessions_copy.get(&conn_id) {
                addr.do_send(ChessWebSocketMessage(message_str.clone()));
            } else {
                warn!("Session not found for connection ID: {}", conn_id);
            }
        }
    }
}

/// WebSocket connection handler
pub async fn ws_index(
    req: HttpRequest,
    stream: web::Payload,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, Error> {
    let id = Uuid::new_v4().to_string();
    info!("New WebSocket connection: {}", id);

    let ws = ChessWebSocket {
        id,
        phase: ConnectionPhase::Unmatched,
        app_state: app_state.clone(),
    };

    ws::start(ws, &req, stream)
}
