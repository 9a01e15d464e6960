use std::sync::Arc;
use std::time::Duration;

use crate::error::CoreResult;
use crate::platform::types::SettingsPanel;

/// The media application launched by a bare "play" request.
pub const DEFAULT_MEDIA_PLAYER: &str = "Spotify";

/// How long a freshly launched player needs before it accepts transport
/// commands. Adapters sleep this out inside [`Actuation::launch_media_player`]
/// so the launch is acknowledged before the engine sends the first command.
pub const PLAYER_STARTUP_GRACE: Duration = Duration::from_secs(3);

/// Host actuation surface consumed by the dispatcher.
///
/// Every call is best-effort and single-attempt; the engine reports failures
/// as non-fatal responses and never retries. Implementations must be cheap
/// to call and must not panic.
pub trait Actuation: Send + Sync {
    fn id(&self) -> &str {
        "unsupported"
    }

    /// Returns whether a launch attempt was issued, not whether the
    /// application is confirmed running.
    fn launch_application(&self, name: &str) -> CoreResult<bool>;
    fn close_application(&self, name: &str) -> CoreResult<()>;

    fn open_url(&self, url: &str) -> CoreResult<()>;
    fn open_url_in_application(&self, name: &str, url: &str) -> CoreResult<()>;

    /// Launch [`DEFAULT_MEDIA_PLAYER`] and wait out its startup grace.
    fn launch_media_player(&self) -> CoreResult<bool>;
    fn media_play(&self) -> CoreResult<()>;
    fn media_pause(&self) -> CoreResult<()>;
    fn media_next(&self) -> CoreResult<()>;
    fn media_previous(&self) -> CoreResult<()>;

    fn open_settings_panel(&self, panel: SettingsPanel) -> CoreResult<()>;
    fn close_settings_panel(&self) -> CoreResult<()>;
    fn check_for_updates(&self) -> CoreResult<()>;

    fn clear_display(&self) -> CoreResult<()>;
}

pub type SharedActuation = Arc<dyn Actuation>;

#[cfg(target_os = "macos")]
pub mod macos;
#[cfg(any(not(target_os = "macos"), test))]
pub mod portable;
