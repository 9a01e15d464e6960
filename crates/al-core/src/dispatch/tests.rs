use std::sync::{Arc, Mutex};

use super::*;
use crate::error::{CoreError, CoreResult};
use crate::platform::Actuation;
use crate::speech::Voice;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Call {
    Launch(String),
    Close(String),
    OpenUrl(String),
    OpenUrlIn(String, String),
    LaunchPlayer,
    Play,
    Pause,
    Next,
    Previous,
    OpenPanel(SettingsPanel),
    CloseSettings,
    CheckUpdates,
    Clear,
}

#[derive(Default)]
struct RecordingActuation {
    calls: Mutex<Vec<Call>>,
    failing: bool,
}

impl RecordingActuation {
    fn new() -> Self {
        Self::default()
    }

    fn failing() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            failing: true,
        }
    }

    fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: Call) -> CoreResult<()> {
        if self.failing {
            return Err(CoreError::Actuation("host rejected the call".to_string()));
        }
        self.calls.lock().unwrap().push(call);
        Ok(())
    }
}

impl Actuation for RecordingActuation {
    fn id(&self) -> &str {
        "recording"
    }

    fn launch_application(&self, name: &str) -> CoreResult<bool> {
        self.record(Call::Launch(name.to_string()))?;
        Ok(true)
    }

    fn close_application(&self, name: &str) -> CoreResult<()> {
        self.record(Call::Close(name.to_string()))
    }

    fn open_url(&self, url: &str) -> CoreResult<()> {
        self.record(Call::OpenUrl(url.to_string()))
    }

    fn open_url_in_application(&self, name: &str, url: &str) -> CoreResult<()> {
        self.record(Call::OpenUrlIn(name.to_string(), url.to_string()))
    }

    fn launch_media_player(&self) -> CoreResult<bool> {
        self.record(Call::LaunchPlayer)?;
        Ok(true)
    }

    fn media_play(&self) -> CoreResult<()> {
        self.record(Call::Play)
    }

    fn media_pause(&self) -> CoreResult<()> {
        self.record(Call::Pause)
    }

    fn media_next(&self) -> CoreResult<()> {
        self.record(Call::Next)
    }

    fn media_previous(&self) -> CoreResult<()> {
        self.record(Call::Previous)
    }

    fn open_settings_panel(&self, panel: SettingsPanel) -> CoreResult<()> {
        self.record(Call::OpenPanel(panel))
    }

    fn close_settings_panel(&self) -> CoreResult<()> {
        self.record(Call::CloseSettings)
    }

    fn check_for_updates(&self) -> CoreResult<()> {
        self.record(Call::CheckUpdates)
    }

    fn clear_display(&self) -> CoreResult<()> {
        self.record(Call::Clear)
    }
}

#[derive(Default)]
struct RecordingVoice {
    lines: Mutex<Vec<String>>,
}

impl RecordingVoice {
    fn lines(&self) -> Vec<String> {
        self.lines.lock().unwrap().clone()
    }

    fn said_containing(&self, needle: &str) -> bool {
        self.lines().iter().any(|line| line.contains(needle))
    }
}

impl Voice for RecordingVoice {
    fn say(&self, text: &str) {
        self.lines.lock().unwrap().push(text.to_string());
    }
}

fn engine() -> (Dispatcher, Arc<RecordingActuation>, Arc<RecordingVoice>) {
    engine_with(AssistantConfig::default_new(), RecordingActuation::new())
}

fn engine_with(
    config: AssistantConfig,
    actuation: RecordingActuation,
) -> (Dispatcher, Arc<RecordingActuation>, Arc<RecordingVoice>) {
    let actuation = Arc::new(actuation);
    let voice = Arc::new(RecordingVoice::default());
    let activity = Arc::new(ActivityClock::new());
    let dispatcher = Dispatcher::new(
        &config,
        actuation.clone() as SharedActuation,
        voice.clone() as SharedVoice,
        activity,
        "tester",
    );
    (dispatcher, actuation, voice)
}

const CATS_URL: &str = "https://duckduckgo.com/?q=cats";

#[test]
fn open_then_search_carries_context() {
    let (mut engine, actuation, _voice) = engine();

    assert_eq!(engine.handle_utterance("open chrome"), Flow::Continue);
    assert_eq!(engine.handle_utterance("search for cats"), Flow::Continue);

    assert_eq!(
        actuation.calls(),
        vec![
            Call::Launch("Google Chrome".to_string()),
            Call::OpenUrlIn("Google Chrome".to_string(), CATS_URL.to_string()),
        ],
    );
    assert_eq!(engine.context().last_app.as_deref(), Some("Google Chrome"));
    assert_eq!(engine.context().last_search_url.as_deref(), Some(CATS_URL));
}

#[test]
fn compound_utterance_runs_fragments_in_order() {
    let (mut engine, actuation, _voice) = engine();

    engine.handle_utterance("open chrome and search for cats");

    assert_eq!(
        actuation.calls(),
        vec![
            Call::Launch("Google Chrome".to_string()),
            Call::OpenUrlIn("Google Chrome".to_string(), CATS_URL.to_string()),
        ],
    );
}

#[test]
fn search_again_reissues_without_reprompting() {
    let (mut engine, actuation, voice) = engine();

    engine.handle_utterance("open chrome and search for cats");
    engine.handle_utterance("search again");

    let calls = actuation.calls();
    assert_eq!(calls.len(), 3);
    assert_eq!(
        calls[2],
        Call::OpenUrlIn("Google Chrome".to_string(), CATS_URL.to_string()),
    );
    assert!(!voice.said_containing("Which application"));
}

#[test]
fn search_without_app_prompts_and_does_nothing() {
    let (mut engine, actuation, voice) = engine();

    engine.handle_utterance("search for cats");

    assert!(actuation.calls().is_empty());
    assert!(voice.said_containing("Which application"));
    assert!(engine.context().last_search_url.is_none());
}

#[test]
fn repeat_search_with_no_history_prompts() {
    let (mut engine, actuation, voice) = engine();

    engine.handle_utterance("search again");

    assert!(actuation.calls().is_empty());
    assert!(voice.said_containing("no search to repeat"));
}

#[test]
fn search_query_is_url_encoded() {
    let (mut engine, actuation, _voice) = engine();

    engine.handle_utterance("open chrome and search for black cats");

    assert_eq!(
        actuation.calls()[1],
        Call::OpenUrlIn(
            "Google Chrome".to_string(),
            "https://duckduckgo.com/?q=black%20cats".to_string(),
        ),
    );
}

#[test]
fn close_without_target_falls_back_to_last_app() {
    let (mut engine, actuation, _voice) = engine();

    engine.handle_utterance("open chrome");
    engine.handle_utterance("close");

    assert_eq!(actuation.calls()[1], Call::Close("Google Chrome".to_string()));
    assert!(engine.context().last_app.is_none());
}

#[test]
fn close_prefers_open_settings_panel() {
    let (mut engine, actuation, _voice) = engine();

    engine.handle_utterance("open chrome");
    engine.handle_utterance("open settings");
    engine.handle_utterance("close");

    assert_eq!(actuation.calls()[2], Call::CloseSettings);
    assert!(!engine.context().settings_open);
    // The app context survives closing the settings panel.
    assert_eq!(engine.context().last_app.as_deref(), Some("Google Chrome"));
}

#[test]
fn close_with_no_context_prompts() {
    let (mut engine, actuation, voice) = engine();

    engine.handle_utterance("close");

    assert!(actuation.calls().is_empty());
    assert!(voice.said_containing("Close what?"));
}

#[test]
fn close_with_explicit_target_resolves_alias() {
    let (mut engine, actuation, _voice) = engine();

    engine.handle_utterance("close spotify");

    assert_eq!(actuation.calls(), vec![Call::Close("Spotify".to_string())]);
}

#[test]
fn confirmation_yes_executes_exactly_once() {
    let (mut engine, actuation, _voice) = engine();

    engine.handle_utterance("turn off location");
    assert!(engine.context().pending_confirmation.is_some());
    assert!(actuation.calls().is_empty());

    engine.handle_utterance("yes");
    assert_eq!(
        actuation.calls(),
        vec![Call::OpenPanel(SettingsPanel::LocationServices)],
    );
    assert!(engine.context().pending_confirmation.is_none());

    // A second "yes" is a fresh command, not a replay.
    engine.handle_utterance("yes");
    assert_eq!(actuation.calls().len(), 1);
}

#[test]
fn confirmation_other_input_cancels() {
    let (mut engine, actuation, voice) = engine();

    engine.handle_utterance("toggle location services");
    engine.handle_utterance("banana");

    assert!(actuation.calls().is_empty());
    assert!(voice.said_containing("I won't"));
    assert!(engine.context().pending_confirmation.is_none());

    // The next utterance is processed as a normal fresh command.
    engine.handle_utterance("open chrome");
    assert_eq!(actuation.calls(), vec![Call::Launch("Google Chrome".to_string())]);
}

#[test]
fn repetition_count_is_clamped() {
    let (mut engine, actuation, _voice) = engine();

    engine.handle_utterance("20 back");

    assert_eq!(actuation.calls(), vec![Call::Previous; 10]);
}

#[test]
fn number_word_repetition() {
    let (mut engine, actuation, _voice) = engine();

    engine.handle_utterance("twice pause");

    assert_eq!(actuation.calls(), vec![Call::Pause; 2]);
    assert_eq!(engine.context().last_media_action, Some(MediaAction::Pause));
}

#[test]
fn media_chain_expands_word_by_word() {
    let (mut engine, actuation, _voice) = engine();

    engine.handle_utterance("next next pause");

    assert_eq!(actuation.calls(), vec![Call::Next, Call::Next, Call::Pause]);
}

#[test]
fn play_launches_player_before_transport() {
    let (mut engine, actuation, _voice) = engine();

    engine.handle_utterance("play some music");

    assert_eq!(actuation.calls(), vec![Call::LaunchPlayer, Call::Play]);
    assert_eq!(engine.context().last_media_action, Some(MediaAction::Play));
}

#[test]
fn open_brave_and_navigate() {
    let (mut engine, actuation, _voice) = engine();

    engine.handle_utterance("open brave and go to example.com");

    assert_eq!(
        actuation.calls(),
        vec![
            Call::Launch("Brave Browser".to_string()),
            Call::OpenUrlIn("Brave Browser".to_string(), "https://example.com".to_string()),
        ],
    );
    assert_eq!(engine.context().last_app.as_deref(), Some("Brave Browser"));
}

#[test]
fn navigate_without_app_uses_plain_open() {
    let (mut engine, actuation, _voice) = engine();

    engine.handle_utterance("go to example.com");

    assert_eq!(
        actuation.calls(),
        vec![Call::OpenUrl("https://example.com".to_string())],
    );
}

#[test]
fn exit_word_ends_the_session_and_stops_processing() {
    let (mut engine, actuation, _voice) = engine();

    assert_eq!(engine.handle_utterance("bye and open chrome"), Flow::End);
    assert!(actuation.calls().is_empty());
}

#[test]
fn typo_corrections_apply_before_dispatch() {
    let (mut engine, actuation, _voice) = engine();

    engine.handle_utterance("opne chorme");

    assert_eq!(actuation.calls(), vec![Call::Launch("Google Chrome".to_string())]);
}

#[test]
fn fuzzy_alias_resolution_applies() {
    let (mut engine, actuation, _voice) = engine();

    engine.handle_utterance("open chrom");

    assert_eq!(actuation.calls(), vec![Call::Launch("Google Chrome".to_string())]);
}

#[test]
fn unknown_input_speaks_capabilities_without_side_effects() {
    let (mut engine, actuation, voice) = engine();

    engine.handle_utterance("make me a sandwich");

    assert!(actuation.calls().is_empty());
    assert!(voice.said_containing("I can open"));
    assert!(engine.context().last_app.is_none());
}

#[test]
fn learned_phrase_launches_taught_application() {
    let mut config = AssistantConfig::default_new();
    config
        .commands
        .insert("morning mode".to_string(), "Spotify".to_string());
    let (mut engine, actuation, _voice) = engine_with(config, RecordingActuation::new());

    engine.handle_utterance("morning mode");

    assert_eq!(actuation.calls(), vec![Call::Launch("Spotify".to_string())]);
}

#[test]
fn actuation_failure_is_nonfatal_and_leaves_context_unset() {
    let (mut engine, _actuation, voice) =
        engine_with(AssistantConfig::default_new(), RecordingActuation::failing());

    assert_eq!(engine.handle_utterance("open chrome"), Flow::Continue);

    assert!(voice.said_containing("couldn't complete"));
    assert!(engine.context().last_app.is_none());
}

#[test]
fn offline_config_gates_search_behind_confirmation() {
    let mut config = AssistantConfig::default_new();
    config.allow_online = false;
    let (mut engine, actuation, voice) = engine_with(config, RecordingActuation::new());

    engine.handle_utterance("open chrome");
    engine.handle_utterance("search for cats");

    assert_eq!(actuation.calls().len(), 1);
    assert!(voice.said_containing("May I go online"));

    engine.handle_utterance("yes");
    assert_eq!(
        actuation.calls()[1],
        Call::OpenUrlIn("Google Chrome".to_string(), CATS_URL.to_string()),
    );
    assert_eq!(engine.context().last_search_url.as_deref(), Some(CATS_URL));
}

#[test]
fn device_requests_map_to_panels() {
    let (mut engine, actuation, _voice) = engine();

    engine.handle_utterance("open settings");
    engine.handle_utterance("open location settings");
    engine.handle_utterance("open update settings");
    engine.handle_utterance("check for updates");

    assert_eq!(
        actuation.calls(),
        vec![
            Call::OpenPanel(SettingsPanel::Main),
            Call::OpenPanel(SettingsPanel::LocationServices),
            Call::OpenPanel(SettingsPanel::SoftwareUpdate),
            Call::CheckUpdates,
        ],
    );
    assert!(engine.context().settings_open);
}

#[test]
fn activity_is_touched_only_by_executed_actions() {
    let (mut engine, _actuation, _voice) = engine();
    engine.activity.touch_at(0);

    // Clarifications and unknown input do not count as activity.
    engine.handle_utterance("search for cats");
    engine.handle_utterance("close");
    engine.handle_utterance("make me a sandwich");
    assert_eq!(engine.activity.last(), 0);

    // An executed action does.
    engine.handle_utterance("open chrome");
    assert!(engine.activity.last() > 0);
}

#[test]
fn open_with_inline_search_does_both_in_one_turn() {
    let (mut engine, actuation, _voice) = engine();

    engine.handle_utterance("open chrome search for cats");

    assert_eq!(
        actuation.calls(),
        vec![
            Call::Launch("Google Chrome".to_string()),
            Call::OpenUrlIn("Google Chrome".to_string(), CATS_URL.to_string()),
        ],
    );
    assert_eq!(engine.context().last_app.as_deref(), Some("Google Chrome"));
    assert_eq!(engine.context().last_search_url.as_deref(), Some(CATS_URL));
}

#[test]
fn open_email_uses_mailto() {
    let (mut engine, actuation, voice) = engine();

    engine.handle_utterance("open email");

    assert_eq!(actuation.calls(), vec![Call::OpenUrl("mailto:".to_string())]);
    assert!(voice.said_containing("tester"));
}
