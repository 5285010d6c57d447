pub mod manager;
pub mod state;

pub use manager::CookingSessionManager;
pub use state::CookingSession;
