#[cfg(test)]
mod tests;

use std::collections::HashMap;
use std::sync::Arc;

use crate::command::{classify, normalize, split, CorrectionTable, Intent, MediaAction};
use crate::config::AssistantConfig;
use crate::error::CoreError;
use crate::platform::{SettingsPanel, SharedActuation, DEFAULT_MEDIA_PLAYER};
use crate::resolver::EntityResolver;
use crate::session::{ActivityClock, SensitiveAction, SessionContext};
use crate::speech::SharedVoice;

/// Spoken on every session ending, whatever caused it.
pub const FAREWELL: &str = "Going to sleep. Goodbye.";

/// Inputs accepted as "yes" while the confirmation gate is armed.
const AFFIRMATIVES: [&str; 9] = [
    "yes", "yeah", "yep", "sure", "ok", "okay", "confirm", "do it", "affirmative",
];

const CAPABILITIES: &str = "I can open and close applications, search the web, \
control music, and open system settings. Say things like open chrome, \
search for cats, or pause.";

/// Whether the session continues after an utterance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    End,
}

/// The intent engine: consumes normalized fragments plus the session
/// context, decides what each one means, emits actuation requests, and
/// mutates the context. The only component that touches [`SessionContext`].
pub struct Dispatcher {
    resolver: EntityResolver,
    corrections: CorrectionTable,
    commands: HashMap<String, String>,
    allow_online: bool,
    username: String,
    actuation: SharedActuation,
    voice: SharedVoice,
    activity: Arc<ActivityClock>,
    ctx: SessionContext,
}

impl Dispatcher {
    pub fn new(
        config: &AssistantConfig,
        actuation: SharedActuation,
        voice: SharedVoice,
        activity: Arc<ActivityClock>,
        username: &str,
    ) -> Self {
        let mut resolver = EntityResolver::new();
        for pair in &config.aliases {
            resolver.register(&pair.alias, &pair.canonical);
        }
        Self {
            resolver,
            corrections: config.corrections.clone(),
            commands: config.commands.clone(),
            allow_online: config.allow_online,
            username: username.to_string(),
            actuation,
            voice,
            activity,
            ctx: SessionContext::new(),
        }
    }

    pub fn context(&self) -> &SessionContext {
        &self.ctx
    }

    /// Process one raw utterance: normalize, split into fragments, and
    /// dispatch each fragment in order. Later fragments may read context the
    /// earlier ones set, so the order is strict and sequential.
    pub fn handle_utterance(&mut self, raw: &str) -> Flow {
        let normalized = normalize(raw, &self.corrections);
        for fragment in split(&normalized) {
            if self.handle_fragment(&fragment) == Flow::End {
                return Flow::End;
            }
        }
        Flow::Continue
    }

    fn handle_fragment(&mut self, fragment: &str) -> Flow {
        // An armed confirmation gate consumes the fragment outright; no
        // other classification happens for it.
        if self.ctx.pending_confirmation.is_some() {
            self.resolve_confirmation(fragment);
            return Flow::Continue;
        }

        for intent in classify(fragment) {
            if self.dispatch(intent) == Flow::End {
                return Flow::End;
            }
        }
        Flow::Continue
    }

    fn dispatch(&mut self, intent: Intent) -> Flow {
        match intent {
            Intent::Exit => return Flow::End,
            Intent::Clear => match self.actuation.clear_display() {
                Ok(()) => self.touch(),
                Err(error) => self.report_failure(error),
            },

            Intent::OpenSettings => self.open_panel(SettingsPanel::Main, "Opening settings."),
            Intent::OpenLocationSettings => {
                self.open_panel(SettingsPanel::LocationServices, "Opening location settings.")
            }
            Intent::OpenUpdateSettings => self.open_panel(
                SettingsPanel::SoftwareUpdate,
                "Opening software update settings.",
            ),
            Intent::CheckUpdates => match self.actuation.check_for_updates() {
                Ok(()) => {
                    self.voice.say("Checking for updates.");
                    self.touch();
                }
                Err(error) => self.report_failure(error),
            },
            Intent::ToggleLocationServices => {
                self.ctx.arm_confirmation(
                    "toggle Location Services",
                    SensitiveAction::ToggleLocationServices,
                );
                self.voice.say("That changes a privacy setting. Should I continue?");
            }

            Intent::RepeatSearch { count } => self.repeat_search(count),
            Intent::SearchInApp { query } => self.search(&query),
            Intent::CloseApp { target } => self.close(target),
            Intent::LaunchApp { target } => self.launch(&target),
            Intent::OpenUrlInApp { url } => self.open_url(&url),

            Intent::MediaPlay {
                launch_player: true,
                ..
            } => self.play_with_launch(),
            Intent::MediaPlay {
                launch_player: false,
                count,
            } => self.transport(MediaAction::Play, count),
            Intent::MediaPause { count } => self.transport(MediaAction::Pause, count),
            Intent::MediaNext { count } => self.transport(MediaAction::Next, count),
            Intent::MediaPrevious { count } => self.transport(MediaAction::Previous, count),

            Intent::Unknown { fragment } => {
                if let Some(app) = self.commands.get(&fragment).cloned() {
                    return self.dispatch(Intent::LaunchApp { target: app });
                }
                self.voice.say(CAPABILITIES);
            }
        }
        Flow::Continue
    }

    fn resolve_confirmation(&mut self, fragment: &str) {
        // Cleared unconditionally: exactly one follow-up utterance is
        // consulted, whatever it says.
        let Some(pending) = self.ctx.take_confirmation() else {
            return;
        };
        if AFFIRMATIVES.contains(&fragment) {
            self.execute_sensitive(pending.action);
        } else {
            tracing::info!("confirmation declined: {}", pending.description);
            self.voice.say("Okay, I won't.");
        }
    }

    fn execute_sensitive(&mut self, action: SensitiveAction) {
        match action {
            SensitiveAction::ToggleLocationServices => {
                // Neither host exposes a programmatic switch; open the pane
                // for the user to flip it.
                match self.actuation.open_settings_panel(SettingsPanel::LocationServices) {
                    Ok(()) => {
                        self.ctx.settings_open = true;
                        self.voice.say(
                            "Opening Location Services. The switch itself needs manual confirmation.",
                        );
                        self.touch();
                    }
                    Err(error) => self.report_failure(error),
                }
            }
            SensitiveAction::OnlineSearch { app, url, query } => {
                self.issue_search(&app, &url, &query)
            }
        }
    }

    fn launch(&mut self, target: &str) {
        let name = self.resolver.resolve(target);
        if name.is_empty() {
            self.voice.say("Open what?");
            return;
        }
        match self.actuation.launch_application(&name) {
            Ok(true) => {
                self.ctx.last_app = Some(name.clone());
                self.voice.say(&format!("Opening {name}."));
                self.touch();
            }
            Ok(false) => self.voice.say(&format!("I couldn't open {name}.")),
            Err(error) => self.report_failure(error),
        }
    }

    fn close(&mut self, target: Option<String>) {
        match target {
            Some(target) if target == "settings" => self.close_settings(),
            Some(target) => {
                let name = self.resolver.resolve(&target);
                self.close_named(name);
            }
            None => {
                if self.ctx.settings_open {
                    self.close_settings();
                } else if let Some(app) = self.ctx.last_app.clone() {
                    self.close_named(app);
                } else {
                    self.voice.say("Close what?");
                }
            }
        }
    }

    fn close_named(&mut self, name: String) {
        match self.actuation.close_application(&name) {
            Ok(()) => {
                if self.ctx.last_app.as_deref() == Some(name.as_str()) {
                    self.ctx.last_app = None;
                }
                self.voice.say(&format!("Closing {name}."));
                self.touch();
            }
            Err(error) => self.report_failure(error),
        }
    }

    fn close_settings(&mut self) {
        match self.actuation.close_settings_panel() {
            Ok(()) => {
                self.ctx.settings_open = false;
                self.voice.say("Closing settings.");
                self.touch();
            }
            Err(error) => self.report_failure(error),
        }
    }

    fn open_url(&mut self, url: &str) {
        let result = match self.ctx.last_app.clone() {
            Some(app) => self.actuation.open_url_in_application(&app, url),
            None => self.actuation.open_url(url),
        };
        match result {
            Ok(()) => {
                if url == "mailto:" {
                    self.voice
                        .say(&format!("Opening email for you, {}.", self.username));
                } else {
                    self.ctx.last_search_url = Some(url.to_string());
                    self.voice.say(&format!("Opening {url}."));
                }
                self.touch();
            }
            Err(error) => self.report_failure(error),
        }
    }

    fn search(&mut self, query: &str) {
        let Some(app) = self.ctx.last_app.clone() else {
            self.voice
                .say("Which application should I search in? Try opening one first.");
            return;
        };
        let url = search_url(query);
        if !self.allow_online {
            self.ctx.arm_confirmation(
                &format!("search online for {query}"),
                SensitiveAction::OnlineSearch {
                    app,
                    url,
                    query: query.to_string(),
                },
            );
            self.voice.say("May I go online to search?");
            return;
        }
        self.issue_search(&app, &url, query);
    }

    fn issue_search(&mut self, app: &str, url: &str, query: &str) {
        match self.actuation.open_url_in_application(app, url) {
            Ok(()) => {
                self.ctx.last_search_url = Some(url.to_string());
                self.voice.say(&format!("Searching for {query}."));
                self.touch();
            }
            Err(error) => self.report_failure(error),
        }
    }

    fn repeat_search(&mut self, count: u32) {
        match (self.ctx.last_search_url.clone(), self.ctx.last_app.clone()) {
            (Some(url), Some(app)) => {
                for _ in 0..count {
                    if let Err(error) = self.actuation.open_url_in_application(&app, &url) {
                        self.report_failure(error);
                        return;
                    }
                }
                self.voice.say("Searching again.");
                self.touch();
            }
            _ => self.voice.say("There's no search to repeat yet."),
        }
    }

    fn play_with_launch(&mut self) {
        // The adapter owns the startup grace: the launch call returns only
        // once the player is ready, so play lands after it.
        match self.actuation.launch_media_player() {
            Ok(_) => {
                if let Err(error) = self.actuation.media_play() {
                    self.report_failure(error);
                    return;
                }
                self.ctx.last_media_action = Some(MediaAction::Play);
                self.voice
                    .say(&format!("Playing music on {DEFAULT_MEDIA_PLAYER}."));
                self.touch();
            }
            Err(error) => self.report_failure(error),
        }
    }

    fn transport(&mut self, action: MediaAction, count: u32) {
        for _ in 0..count {
            let result = match action {
                MediaAction::Play => self.actuation.media_play(),
                MediaAction::Pause => self.actuation.media_pause(),
                MediaAction::Next => self.actuation.media_next(),
                MediaAction::Previous => self.actuation.media_previous(),
            };
            if let Err(error) = result {
                self.report_failure(error);
                return;
            }
        }
        self.ctx.last_media_action = Some(action);
        let ack = match action {
            MediaAction::Play => "Resuming.",
            MediaAction::Pause => "Paused.",
            MediaAction::Next => "Skipping ahead.",
            MediaAction::Previous => "Going back.",
        };
        self.voice.say(ack);
        self.touch();
    }

    fn open_panel(&mut self, panel: SettingsPanel, ack: &str) {
        match self.actuation.open_settings_panel(panel) {
            Ok(()) => {
                self.ctx.settings_open = true;
                self.voice.say(ack);
                self.touch();
            }
            Err(error) => self.report_failure(error),
        }
    }

    fn report_failure(&self, error: CoreError) {
        tracing::warn!("actuation failed: {error}");
        self.voice.say("Sorry, I couldn't complete that.");
    }

    fn touch(&self) {
        self.activity.touch();
    }
}

fn search_url(query: &str) -> String {
    format!("https://duckduckgo.com/?q={}", urlencoding::encode(query))
}
