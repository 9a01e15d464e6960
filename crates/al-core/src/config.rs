use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};

pub const CONFIG_FILENAME: &str = "config.json";
pub const CONFIG_VERSION: &str = "1.0.0";

/// Seconds of inactivity before the session ends itself.
pub const DEFAULT_IDLE_TIMEOUT_SECS: u64 = 120;

/// One alias table entry. A `Vec` rather than a map because resolution order
/// is part of the fuzzy-match tie-breaking contract.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AliasPair {
    pub alias: String,
    pub canonical: String,
}

/// Startup configuration. Loaded once per session; the tables it carries are
/// immutable for the session's duration. Written back only when the user
/// teaches a new phrase mapping.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssistantConfig {
    pub version: String,
    pub language: String,
    pub voice: String,
    pub allow_online: bool,
    pub idle_timeout_secs: u64,
    pub aliases: Vec<AliasPair>,
    pub corrections: HashMap<String, String>,
    /// Learned phrase → application to launch.
    pub commands: HashMap<String, String>,
}

impl AssistantConfig {
    pub fn default_new() -> Self {
        Self {
            version: CONFIG_VERSION.to_string(),
            language: "en-US".to_string(),
            voice: "default".to_string(),
            allow_online: true,
            idle_timeout_secs: DEFAULT_IDLE_TIMEOUT_SECS,
            aliases: default_aliases(),
            corrections: default_corrections(),
            commands: HashMap::new(),
        }
    }

    /// Lowercase all table keys (and correction values) so lookups against
    /// normalized text hit, and so normalization stays idempotent.
    fn sanitized(mut self) -> Self {
        for pair in &mut self.aliases {
            pair.alias = pair.alias.to_lowercase();
        }
        self.corrections = self
            .corrections
            .into_iter()
            .map(|(k, v)| (k.to_lowercase(), v.to_lowercase()))
            .collect();
        self.commands = self
            .commands
            .into_iter()
            .map(|(k, v)| (k.to_lowercase(), v))
            .collect();
        self
    }
}

fn default_aliases() -> Vec<AliasPair> {
    [
        ("chrome", "Google Chrome"),
        ("browser", "Brave Browser"),
        ("brave", "Brave Browser"),
        ("firefox", "Firefox"),
        ("spotify", "Spotify"),
        ("code", "Visual Studio Code"),
        ("terminal", "Terminal"),
        ("files", "Files"),
    ]
    .into_iter()
    .map(|(alias, canonical)| AliasPair {
        alias: alias.to_string(),
        canonical: canonical.to_string(),
    })
    .collect()
}

fn default_corrections() -> HashMap<String, String> {
    [
        ("opne", "open"),
        ("clsoe", "close"),
        ("serach", "search"),
        ("paly", "play"),
        ("pasue", "pause"),
        ("chorme", "chrome"),
        ("brwoser", "browser"),
        ("spotfy", "spotify"),
        ("firefx", "firefox"),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect()
}

/// Directory holding the assistant's configuration document.
pub fn config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("al"))
}

/// Load the configuration, falling back to built-in defaults when the file
/// is absent or malformed. Never blocks startup: a fresh default file is
/// written on a best-effort basis and all failures degrade to defaults.
pub fn load_or_default(dir: &Path) -> AssistantConfig {
    let path = dir.join(CONFIG_FILENAME);

    if !path.exists() {
        let config = AssistantConfig::default_new();
        if let Err(error) = save(dir, &config) {
            tracing::warn!("could not write default config {}: {error}", path.display());
        }
        return config;
    }

    let data = match std::fs::read_to_string(&path) {
        Ok(data) => data,
        Err(error) => {
            tracing::warn!("could not read config {}: {error}", path.display());
            return AssistantConfig::default_new();
        }
    };

    match serde_json::from_str::<AssistantConfig>(&data) {
        Ok(config) => config.sanitized(),
        Err(error) => {
            tracing::warn!("malformed config {}: {error}", path.display());
            AssistantConfig::default_new()
        }
    }
}

pub fn save(dir: &Path, config: &AssistantConfig) -> CoreResult<()> {
    std::fs::create_dir_all(dir).map_err(|error| {
        CoreError::Internal(format!(
            "failed to create config directory {}: {error}",
            dir.display()
        ))
    })?;

    let path = dir.join(CONFIG_FILENAME);
    let data = serde_json::to_string_pretty(config)
        .map_err(|error| CoreError::Internal(format!("failed to serialize config: {error}")))?;
    std::fs::write(&path, data).map_err(|error| {
        CoreError::Internal(format!("failed to write config {}: {error}", path.display()))
    })
}
