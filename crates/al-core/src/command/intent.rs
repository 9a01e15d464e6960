use super::quantifier::extract_count;

/// Media transport operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaAction {
    Play,
    Pause,
    Next,
    Previous,
}

/// What a single fragment asks the assistant to do.
///
/// Constructed fresh per fragment and consumed by the dispatcher; never
/// persisted. Entity names are carried raw here and resolved to canonical
/// application names at dispatch time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    LaunchApp { target: String },
    CloseApp { target: Option<String> },
    OpenUrlInApp { url: String },
    SearchInApp { query: String },
    RepeatSearch { count: u32 },
    MediaPlay { launch_player: bool, count: u32 },
    MediaPause { count: u32 },
    MediaNext { count: u32 },
    MediaPrevious { count: u32 },
    OpenSettings,
    OpenLocationSettings,
    ToggleLocationServices,
    CheckUpdates,
    OpenUpdateSettings,
    Clear,
    Exit,
    Unknown { fragment: String },
}

/// Vocabulary for chained media-only fragments like "next next pause".
const MEDIA_WORDS: [&str; 8] = [
    "next", "back", "pause", "play", "stop", "resume", "continue", "skip",
];

/// Classify one normalized fragment into the intents it carries.
///
/// Usually a single intent; a media-only chain expands word by word, and an
/// "open X search for Y" fragment yields a launch followed by a search.
/// The branch order below is contractual: overlapping prefixes exist
/// ("open settings" vs. "open <app>"), so earlier checks win.
pub fn classify(fragment: &str) -> Vec<Intent> {
    if is_media_chain(fragment) {
        return fragment.split_whitespace().map(media_word_intent).collect();
    }

    let (text, count) = extract_count(fragment);
    classify_counted(&text, count)
}

fn classify_counted(text: &str, count: u32) -> Vec<Intent> {
    // Session control words are exact matches and terminal.
    match text {
        "exit" | "quit" | "bye" | "sleep" => return vec![Intent::Exit],
        "clear" => return vec![Intent::Clear],
        _ => {}
    }

    if let Some(intent) = classify_device(text) {
        return vec![intent];
    }

    if text == "search again" || text == "again" {
        return vec![Intent::RepeatSearch { count }];
    }

    if let Some(query) = text.strip_prefix("search for ") {
        return vec![Intent::SearchInApp {
            query: query.trim().to_string(),
        }];
    }

    if text == "close" {
        return vec![Intent::CloseApp { target: None }];
    }
    if let Some(target) = text.strip_prefix("close ") {
        return vec![Intent::CloseApp {
            target: Some(target.trim().to_string()),
        }];
    }

    if let Some(rest) = open_target(text) {
        return classify_open(rest);
    }

    if text == "play" || text.starts_with("play ") {
        return vec![Intent::MediaPlay {
            launch_player: true,
            count: 1,
        }];
    }

    match text {
        "pause" | "stop" => return vec![Intent::MediaPause { count }],
        "resume" | "continue" => {
            return vec![Intent::MediaPlay {
                launch_player: false,
                count,
            }]
        }
        "next" | "skip" => return vec![Intent::MediaNext { count }],
        "previous" | "back" => return vec![Intent::MediaPrevious { count }],
        _ => {}
    }

    vec![Intent::Unknown {
        fragment: text.to_string(),
    }]
}

fn classify_device(text: &str) -> Option<Intent> {
    match text {
        "open settings" | "open system settings" => Some(Intent::OpenSettings),
        "open location settings" | "show location settings" => {
            Some(Intent::OpenLocationSettings)
        }
        "check for updates" | "check updates" => Some(Intent::CheckUpdates),
        "open update settings" | "open software update" => Some(Intent::OpenUpdateSettings),
        _ if is_location_toggle(text) => Some(Intent::ToggleLocationServices),
        _ => None,
    }
}

fn is_location_toggle(text: &str) -> bool {
    matches!(
        text,
        "toggle location services"
            | "toggle location"
            | "turn off location"
            | "turn on location"
            | "turn off location services"
            | "turn on location services"
            | "disable location services"
            | "enable location services"
            | "disable location"
            | "enable location"
    )
}

fn open_target(text: &str) -> Option<&str> {
    text.strip_prefix("open ").or_else(|| text.strip_prefix("go to "))
}

fn classify_open(rest: &str) -> Vec<Intent> {
    // "open chrome search for cats" opens the app and searches in one turn.
    if let Some((app, query)) = rest.split_once("search for") {
        let app = app.trim();
        let query = query.trim();
        match (app.is_empty(), query.is_empty()) {
            (false, false) => {
                return vec![
                    Intent::LaunchApp {
                        target: app.to_string(),
                    },
                    Intent::SearchInApp {
                        query: query.to_string(),
                    },
                ]
            }
            (true, false) => {
                return vec![Intent::SearchInApp {
                    query: query.to_string(),
                }]
            }
            _ => {}
        }
    }

    if rest == "email" || rest == "mail" {
        return vec![Intent::OpenUrlInApp {
            url: "mailto:".to_string(),
        }];
    }

    if looks_like_url(rest) {
        return vec![Intent::OpenUrlInApp {
            url: ensure_scheme(rest),
        }];
    }

    vec![Intent::LaunchApp {
        target: rest.to_string(),
    }]
}

fn looks_like_url(text: &str) -> bool {
    if text.contains(char::is_whitespace) {
        return false;
    }
    text.starts_with("http://") || text.starts_with("https://") || text.contains('.')
}

fn ensure_scheme(url: &str) -> String {
    if url.starts_with("http://") || url.starts_with("https://") {
        url.to_string()
    } else {
        format!("https://{url}")
    }
}

fn is_media_chain(fragment: &str) -> bool {
    let mut tokens = 0;
    for token in fragment.split_whitespace() {
        if !MEDIA_WORDS.contains(&token) {
            return false;
        }
        tokens += 1;
    }
    tokens >= 2
}

fn media_word_intent(word: &str) -> Intent {
    match word {
        "pause" | "stop" => Intent::MediaPause { count: 1 },
        "resume" | "continue" => Intent::MediaPlay {
            launch_player: false,
            count: 1,
        },
        "play" => Intent::MediaPlay {
            launch_player: true,
            count: 1,
        },
        "next" | "skip" => Intent::MediaNext { count: 1 },
        // "back" is the only remaining vocabulary word.
        _ => Intent::MediaPrevious { count: 1 },
    }
}
