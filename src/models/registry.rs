use std::collections::HashMap;

use uuid::Uuid;

use crate::models::game_session::{GameSession, PlayerSeat};

/// Owns every active game session, keyed by game id. Constructed once at
/// service start; all access goes through these operations.
#[derive(Debug, Default)]
pub struct SessionRegistry {
    sessions: HashMap<String, GameSession>,
}

impl SessionRegistry {
    pub fn new() -> SessionRegistry {
        SessionRegistry {
            sessions: HashMap::new(),
        }
    }

    /// Allocates a fresh session under a random id, white to move, and
    /// registers it. Returns a snapshot for the caller to broadcast.
    pub fn create(&mut self, white: PlayerSeat, black: PlayerSeat) -> GameSession {
        let id = Uuid::new_v4().to_string();
        let session = GameSession::new(id.clone(), white, black);
        self.sessions.insert(id, session.clone());
        session
    }

    pub fn get(&self, game_id: &str) -> Option<&GameSession> {
        self.sessions.get(game_id)
    }

    pub fn get_mut(&mut self, game_id: &str) -> Option<&mut GameSession> {
        self.sessions.get_mut(game_id)
    }

    pub fn remove(&mut self, game_id: &str) -> Option<GameSession> {
        self.sessions.remove(game_id)
    }

    /// Linear scan for the session a connection is seated in. A connection is
    /// only ever in one session, so the first match is the only match.
    pub fn find_by_participant(&self, connection_id: &str) -> Option<&GameSession> {
        self.sessions
            .values()
            .find(|session| session.seat_color(connection_id).is_some())
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}
