pub mod app_state;
pub mod game_session;
pub mod messages;
pub mod registry;

// Re-export important types
pub use app_state::*;
pub use game_session::*;
pub use messages::*;
pub use registry::*;
