use std::process::{Command, Stdio};
use std::sync::Arc;

/// Spoken-response surface. Fire-and-forget: implementations must never
/// raise into the caller; a failed synthesis degrades to the console echo.
pub trait Voice: Send + Sync {
    fn say(&self, text: &str);
}

pub type SharedVoice = Arc<dyn Voice>;

/// Speaks by spawning the host speech synthesizer, echoing every response to
/// the console so text-mode sessions see it too.
pub struct ProcessVoice {
    program: String,
    args: Vec<String>,
}

impl ProcessVoice {
    pub fn new(program: &str, args: Vec<String>) -> Self {
        Self {
            program: program.to_string(),
            args,
        }
    }
}

impl Voice for ProcessVoice {
    fn say(&self, text: &str) {
        println!("[al] {text}");
        let result = Command::new(&self.program)
            .args(&self.args)
            .arg(text)
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn();
        if let Err(error) = result {
            tracing::debug!("speech synthesis unavailable: {error}");
        }
    }
}

/// Console-only voice for hosts without a synthesizer.
pub struct EchoVoice;

impl Voice for EchoVoice {
    fn say(&self, text: &str) {
        println!("[al] {text}");
    }
}

/// Pick the host speech synthesizer for the configured language.
pub fn default_voice(language: &str) -> SharedVoice {
    #[cfg(target_os = "macos")]
    {
        let _ = language;
        Arc::new(ProcessVoice::new("say", Vec::new()))
    }

    #[cfg(not(target_os = "macos"))]
    {
        Arc::new(ProcessVoice::new(
            "espeak",
            vec!["-v".to_string(), language.to_string()],
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_synthesizer_degrades_to_echo() {
        // The spawn fails; say must not panic or propagate.
        let voice = ProcessVoice::new("definitely-not-a-real-synthesizer", Vec::new());
        voice.say("hello");
    }

    #[test]
    fn echo_voice_never_fails() {
        EchoVoice.say("hello");
    }
}
