use actix::Addr;
use std::collections::HashMap;
use std::sync::Mutex;

use crate::game::board::Position;
use crate::matchmaking::MatchmakingQueue;
use crate::models::game_session::{GameSession, GameStatus, MoveApplied, MoveError, PlayerSeat};
use crate::models::registry::SessionRegistry;
use crate::websocket::ChessWebSocket;

/// Result of a find-game request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchOutcome {
    /// No opponent available (or already waiting); the connection is queued.
    Queued,
    /// Paired with the oldest waiting player; carries the new session.
    Paired(GameSession),
}

/// What a disconnect cleanup found and removed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DisconnectOutcome {
    /// The connection was still queued and has been removed.
    LeftQueue,
    /// The connection was in a game; the session has been torn down.
    SessionEnded(GameSession),
    /// The connection was neither queued nor in a game.
    Untracked,
}

/// Application state shared between connections. Each operation acquires the
/// locks it needs and completes its mutation before returning, so connect,
/// find-game, move, and disconnect are atomic with respect to each other.
/// Lock order: queue, games, connections, sessions.
pub struct AppState {
    pub queue: Mutex<MatchmakingQueue>,
    pub games: Mutex<SessionRegistry>,
    pub connections: Mutex<HashMap<String, Vec<String>>>,
    pub sessions: Mutex<HashMap<String, Addr<ChessWebSocket>>>,
}

impl AppState {
    pub fn new() -> AppState {
        AppState {
            queue: Mutex::new(MatchmakingQueue::new()),
            games: Mutex::new(SessionRegistry::new()),
            connections: Mutex::new(HashMap::new()),
            sessions: Mutex::new(HashMap::new()),
        }
    }

    /// Pairs the requester with the oldest waiting player, or queues it.
    /// The waiting player takes white, the requester black. A connection
    /// already queued is re-acknowledged, not enqueued twice.
    pub fn find_game(&self, connection_id: &str, name: &str) -> MatchOutcome {
        let mut queue = self.queue.lock().unwrap();
        if queue.contains(connection_id) {
            return MatchOutcome::Queued;
        }

        match queue.pop_oldest() {
            Some(opponent) => {
                let white = PlayerSeat {
                    id: opponent.connection_id,
                    name: opponent.name,
                };
                let black = PlayerSeat {
                    id: connection_id.to_string(),
                    name: name.to_string(),
                };
                let session = self.games.lock().unwrap().create(white, black);
                MatchOutcome::Paired(session)
            }
            None => {
                queue.enqueue(connection_id, name);
                MatchOutcome::Queued
            }
        }
    }

    /// Looks up the session and attempts the move on behalf of the
    /// connection. Rejections come back as typed errors and mutate nothing.
    pub fn apply_move(
        &self,
        connection_id: &str,
        game_id: &str,
        from: Position,
        to: Position,
    ) -> Result<MoveApplied, MoveError> {
        let mut games = self.games.lock().unwrap();
        let session = games.get_mut(game_id).ok_or(MoveError::SessionNotFound)?;
        session.try_move(connection_id, from, to)
    }

    /// Disconnect cleanup: a queued connection is dropped from the queue;
    /// an in-game connection tears down its session (at most one). The
    /// returned session snapshot is already marked terminated.
    pub fn handle_disconnect(&self, connection_id: &str) -> DisconnectOutcome {
        if self.queue.lock().unwrap().remove(connection_id) {
            return DisconnectOutcome::LeftQueue;
        }

        let mut games = self.games.lock().unwrap();
        let game_id = match games.find_by_participant(connection_id) {
            Some(session) => session.id.clone(),
            None => return DisconnectOutcome::Untracked,
        };
        match games.remove(&game_id) {
            Some(mut session) => {
                session.status = GameStatus::Terminated;
                DisconnectOutcome::SessionEnded(session)
            }
            None => DisconnectOutcome::Untracked,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::board::Color;

    #[test]
    fn first_requester_waits() {
        let state = AppState::new();
        assert_eq!(state.find_game("a", "Alice"), MatchOutcome::Queued);
        assert!(state.queue.lock().unwrap().contains("a"));
    }

    #[test]
    fn fifo_pairing_assigns_the_oldest_waiter_white() {
        let state = AppState::new();
        assert_eq!(state.find_game("a", "Alice"), MatchOutcome::Queued);

        let session = match state.find_game("b", "Bob") {
            MatchOutcome::Paired(session) => session,
            outcome => panic!("expected pairing, got {:?}", outcome),
        };
        assert_eq!(session.players.white.id, "a");
        assert_eq!(session.players.white.name, "Alice");
        assert_eq!(session.players.black.id, "b");
        assert_eq!(session.current_turn, Color::White);

        // The third requester finds an empty queue again.
        assert_eq!(state.find_game("c", "Carol"), MatchOutcome::Queued);
        assert!(state.queue.lock().unwrap().contains("c"));
        assert_eq!(state.games.lock().unwrap().len(), 1);
    }

    #[test]
    fn repeated_find_game_does_not_duplicate_the_entry() {
        let state = AppState::new();
        assert_eq!(state.find_game("a", "Alice"), MatchOutcome::Queued);
        assert_eq!(state.find_game("a", "Alice"), MatchOutcome::Queued);
        assert_eq!(state.queue.lock().unwrap().len(), 1);

        // The waiter is still matched exactly once.
        assert!(matches!(
            state.find_game("b", "Bob"),
            MatchOutcome::Paired(_)
        ));
    }

    #[test]
    fn queued_connection_that_disconnects_is_never_paired() {
        let state = AppState::new();
        state.find_game("a", "Alice");
        assert_eq!(state.handle_disconnect("a"), DisconnectOutcome::LeftQueue);

        // The next requester waits instead of being paired with the ghost.
        assert_eq!(state.find_game("b", "Bob"), MatchOutcome::Queued);
    }

    #[test]
    fn disconnect_mid_game_tears_the_session_down() {
        let state = AppState::new();
        state.find_game("a", "Alice");
        let session = match state.find_game("b", "Bob") {
            MatchOutcome::Paired(session) => session,
            outcome => panic!("expected pairing, got {:?}", outcome),
        };

        let ended = match state.handle_disconnect("a") {
            DisconnectOutcome::SessionEnded(ended) => ended,
            outcome => panic!("expected teardown, got {:?}", outcome),
        };
        assert_eq!(ended.id, session.id);
        assert_eq!(ended.status, GameStatus::Terminated);
        assert!(state.games.lock().unwrap().is_empty());

        // A move against the dead game id is a typed no-op.
        assert_eq!(
            state.apply_move("b", &session.id, Position::new(1, 4), Position::new(3, 4)),
            Err(MoveError::SessionNotFound)
        );

        // The survivor is no longer tracked anywhere.
        assert_eq!(state.handle_disconnect("b"), DisconnectOutcome::Untracked);
    }

    #[test]
    fn apply_move_routes_through_turn_and_rule_checks() {
        let state = AppState::new();
        state.find_game("a", "Alice");
        let session = match state.find_game("b", "Bob") {
            MatchOutcome::Paired(session) => session,
            outcome => panic!("expected pairing, got {:?}", outcome),
        };

        // Black (the requester) may not open.
        assert_eq!(
            state.apply_move("b", &session.id, Position::new(1, 4), Position::new(3, 4)),
            Err(MoveError::NotYourTurn)
        );

        // White opens; turn passes to black.
        let applied = state
            .apply_move("a", &session.id, Position::new(6, 4), Position::new(4, 4))
            .unwrap();
        assert_eq!(applied.current_turn, Color::Black);

        let applied = state
            .apply_move("b", &session.id, Position::new(1, 4), Position::new(3, 4))
            .unwrap();
        assert_eq!(applied.current_turn, Color::White);
    }

    #[test]
    fn apply_move_on_unknown_game_is_session_not_found() {
        let state = AppState::new();
        assert_eq!(
            state.apply_move("a", "no-such-game", Position::new(6, 4), Position::new(4, 4)),
            Err(MoveError::SessionNotFound)
        );
    }

    #[test]
    fn disconnect_of_untracked_connection_is_untracked() {
        let state = AppState::new();
        assert_eq!(state.handle_disconnect("ghost"), DisconnectOutcome::Untracked);
    }
}
