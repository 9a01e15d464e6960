mod adapters;
pub mod factory;
pub mod types;

pub use adapters::{Actuation, SharedActuation, DEFAULT_MEDIA_PLAYER, PLAYER_STARTUP_GRACE};
pub use factory::default_actuation;
pub use types::SettingsPanel;
