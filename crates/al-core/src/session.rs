pub mod watchdog;

use std::sync::atomic::{AtomicU64, Ordering};

use uuid::Uuid;

use crate::command::MediaAction;
use crate::utils::time::{now_millis, now_secs};

/// Unix timestamp in seconds.
pub type Timestamp = u64;

/// A side effect that must be confirmed by the user before it runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SensitiveAction {
    /// Opening the Location Services pane so the user can flip the switch;
    /// neither host platform exposes a programmatic toggle.
    ToggleLocationServices,
    /// A web search deferred because the configuration forbids going online
    /// without asking.
    OnlineSearch {
        app: String,
        url: String,
        query: String,
    },
}

/// A deferred action awaiting the next utterance as an accept/reject signal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingConfirmation {
    pub description: String,
    pub action: SensitiveAction,
    pub requested_at: Timestamp,
}

/// Conversational state for one running session.
///
/// Exactly one instance exists per session. The dispatcher exclusively owns
/// and mutates it; `pending_confirmation` is non-None only between the
/// utterance that requested confirmation and the immediately following
/// dispatcher call, which clears it unconditionally.
#[derive(Debug, Clone)]
pub struct SessionContext {
    pub session_id: String,
    pub last_app: Option<String>,
    pub last_search_url: Option<String>,
    pub last_media_action: Option<MediaAction>,
    pub settings_open: bool,
    pub pending_confirmation: Option<PendingConfirmation>,
    pub started_at: Timestamp,
}

impl SessionContext {
    pub fn new() -> Self {
        Self {
            session_id: Uuid::new_v4().to_string(),
            last_app: None,
            last_search_url: None,
            last_media_action: None,
            settings_open: false,
            pending_confirmation: None,
            started_at: now_secs(),
        }
    }

    /// Arm the confirmation gate with a deferred action.
    pub fn arm_confirmation(&mut self, description: &str, action: SensitiveAction) {
        self.pending_confirmation = Some(PendingConfirmation {
            description: description.to_string(),
            action,
            requested_at: now_secs(),
        });
    }

    /// Take the pending confirmation, clearing the gate.
    pub fn take_confirmation(&mut self) -> Option<PendingConfirmation> {
        self.pending_confirmation.take()
    }
}

impl Default for SessionContext {
    fn default() -> Self {
        Self::new()
    }
}

/// Last-activity timestamp shared between the foreground dispatcher and the
/// idle watchdog task. Writes and reads go through an atomic so the two
/// tasks never race on a plain field.
#[derive(Debug)]
pub struct ActivityClock {
    last: AtomicU64,
}

impl ActivityClock {
    pub fn new() -> Self {
        Self {
            last: AtomicU64::new(now_millis()),
        }
    }

    /// Record activity now. Called only for executed actions; clarifications
    /// and failed matches do not reset the idle clock.
    pub fn touch(&self) {
        self.last.store(now_millis(), Ordering::SeqCst);
    }

    pub fn last(&self) -> u64 {
        self.last.load(Ordering::SeqCst)
    }

    /// Milliseconds elapsed between the given instant and the last activity.
    pub fn idle_for(&self, now_millis: u64) -> u64 {
        now_millis.saturating_sub(self.last())
    }

    #[cfg(test)]
    pub(crate) fn touch_at(&self, millis: u64) {
        self.last.store(millis, Ordering::SeqCst);
    }
}

impl Default for ActivityClock {
    fn default() -> Self {
        Self::new()
    }
}
