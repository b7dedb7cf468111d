// Core infrastructure module
// Session state machine and configuration

pub mod app;
pub mod app_config;
pub mod events;
pub mod project_config;

pub use app::{CycleOutcome, Session};
pub use app_config::AppConfig;
pub use events::{InputHandler, PromptCommand, SessionEvent, SessionState};
pub use project_config::ProjectConfig;
