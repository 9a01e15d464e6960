use std::sync::Arc;
use std::time::Duration;

use tokio::io::{AsyncBufReadExt, BufReader};
use tokio_util::sync::CancellationToken;

use crate::config::{self, AssistantConfig};
use crate::dispatch::{Dispatcher, Flow, FAREWELL};
use crate::platform::{default_actuation, SharedActuation};
use crate::session::watchdog::IdleWatchdog;
use crate::session::ActivityClock;
use crate::speech::{default_voice, SharedVoice};

/// Primary facade: wires configuration, actuation, voice, the dispatcher and
/// the idle watchdog together, and runs the line-oriented session loop.
pub struct Assistant {
    dispatcher: Dispatcher,
    voice: SharedVoice,
    activity: Arc<ActivityClock>,
    cancel: CancellationToken,
    idle_timeout: Duration,
    username: String,
}

impl Assistant {
    pub fn new(config: AssistantConfig, actuation: SharedActuation, voice: SharedVoice) -> Self {
        let activity = Arc::new(ActivityClock::new());
        let username = username();
        let dispatcher = Dispatcher::new(
            &config,
            actuation,
            voice.clone(),
            activity.clone(),
            &username,
        );
        Self {
            dispatcher,
            voice,
            activity,
            cancel: CancellationToken::new(),
            idle_timeout: Duration::from_secs(config.idle_timeout_secs),
            username,
        }
    }

    /// Build an assistant from the on-disk configuration and the host's
    /// default actuation and speech adapters.
    pub fn from_env() -> Self {
        let config = match config::config_dir() {
            Some(dir) => config::load_or_default(&dir),
            None => AssistantConfig::default_new(),
        };
        let voice = default_voice(&config.language);
        Self::new(config, default_actuation(), voice)
    }

    /// Run the session to completion: greet, watch for idleness, and process
    /// one utterance at a time until an exit word, end of input, or the idle
    /// timeout ends the session. All three endings speak the same farewell.
    pub async fn run(mut self) {
        tracing::info!("session started for {}", self.username);
        self.voice
            .say(&format!("Hello {}. AL is ready.", self.username));

        let watchdog = IdleWatchdog::new(
            self.activity.clone(),
            self.voice.clone(),
            self.cancel.clone(),
            self.idle_timeout,
        )
        .spawn();

        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        loop {
            tokio::select! {
                _ = self.cancel.cancelled() => break,
                line = lines.next_line() => match line {
                    Ok(Some(line)) => {
                        if self.dispatcher.handle_utterance(&line) == Flow::End {
                            break;
                        }
                    }
                    Ok(None) => break,
                    Err(error) => {
                        tracing::warn!("input read failed: {error}");
                        break;
                    }
                },
            }
        }

        // Stops the watchdog too; a pending confirmation dies with the
        // session rather than surviving into a restart.
        self.cancel.cancel();
        self.voice.say(FAREWELL);
        let _ = watchdog.await;
        tracing::info!("session ended");
    }
}

fn username() -> String {
    std::env::var("USER")
        .or_else(|_| std::env::var("USERNAME"))
        .unwrap_or_else(|_| "there".to_string())
}
