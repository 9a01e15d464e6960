use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use crate::session::ActivityClock;
use crate::speech::SharedVoice;
use crate::utils::time::now_millis;

/// How often the watchdog compares now against the last activity.
const POLL_INTERVAL: Duration = Duration::from_secs(5);

/// Background task that ends the session after a period with no executed
/// actions. Runs concurrently with the foreground loop; the shared
/// [`ActivityClock`] and the cancellation token are the only state the two
/// sides touch.
pub struct IdleWatchdog {
    activity: Arc<ActivityClock>,
    voice: SharedVoice,
    cancel: CancellationToken,
    idle_timeout: Duration,
    poll_interval: Duration,
}

impl IdleWatchdog {
    pub fn new(
        activity: Arc<ActivityClock>,
        voice: SharedVoice,
        cancel: CancellationToken,
        idle_timeout: Duration,
    ) -> Self {
        Self {
            activity,
            voice,
            cancel,
            idle_timeout,
            poll_interval: POLL_INTERVAL,
        }
    }

    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }

    pub fn spawn(self) -> tokio::task::JoinHandle<()> {
        tokio::spawn(self.run())
    }

    async fn run(self) {
        let mut ticker = tokio::time::interval(self.poll_interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = self.cancel.cancelled() => break,
                _ = ticker.tick() => {
                    let idle = self.activity.idle_for(now_millis());
                    if idle > self.idle_timeout.as_millis() as u64 {
                        tracing::info!("session idle for {idle}ms, shutting down");
                        self.voice.say("I'm going idle.");
                        self.cancel.cancel();
                        break;
                    }
                }
            }
        }
    }
}
