pub mod bootstrap;
pub mod state;

pub use bootstrap::{AppBootstrap, build_chat_usecase};
pub use state::AppState;
