use std::process::{Command, Stdio};

use super::{Actuation, DEFAULT_MEDIA_PLAYER, PLAYER_STARTUP_GRACE};
use crate::error::{CoreError, CoreResult};
use crate::platform::types::SettingsPanel;

const LOCATION_SERVICES_PANE: &str =
    "x-apple.systempreferences:com.apple.preference.security?Privacy_LocationServices";
const SOFTWARE_UPDATE_PANE: &str =
    "x-apple.systempreferences:com.apple.preferences.softwareupdate";

/// macOS adapter: `open -a` for launches, `osascript` for quits and media
/// transport, `x-apple.systempreferences:` URLs for settings panes.
#[derive(Debug, Default)]
pub struct MacosActuation;

impl MacosActuation {
    pub fn new() -> Self {
        Self
    }
}

impl Actuation for MacosActuation {
    fn id(&self) -> &str {
        "macos"
    }

    fn launch_application(&self, name: &str) -> CoreResult<bool> {
        spawn_detached("open", &["-a", name])?;
        Ok(true)
    }

    fn close_application(&self, name: &str) -> CoreResult<()> {
        osascript(&format!("quit app \"{name}\""))
    }

    fn open_url(&self, url: &str) -> CoreResult<()> {
        spawn_detached("open", &[url])
    }

    fn open_url_in_application(&self, name: &str, url: &str) -> CoreResult<()> {
        spawn_detached("open", &["-a", name, url])
    }

    fn launch_media_player(&self) -> CoreResult<bool> {
        let issued = self.launch_application(DEFAULT_MEDIA_PLAYER)?;
        // The player needs its startup grace before transport commands land.
        std::thread::sleep(PLAYER_STARTUP_GRACE);
        Ok(issued)
    }

    fn media_play(&self) -> CoreResult<()> {
        player_command("play")
    }

    fn media_pause(&self) -> CoreResult<()> {
        player_command("pause")
    }

    fn media_next(&self) -> CoreResult<()> {
        player_command("next track")
    }

    fn media_previous(&self) -> CoreResult<()> {
        player_command("previous track")
    }

    fn open_settings_panel(&self, panel: SettingsPanel) -> CoreResult<()> {
        match panel {
            SettingsPanel::Main => {
                spawn_detached("open", &["-b", "com.apple.systempreferences"])
            }
            SettingsPanel::LocationServices => spawn_detached("open", &[LOCATION_SERVICES_PANE]),
            SettingsPanel::SoftwareUpdate => spawn_detached("open", &[SOFTWARE_UPDATE_PANE]),
        }
    }

    fn close_settings_panel(&self) -> CoreResult<()> {
        osascript("quit app \"System Settings\"")
    }

    fn check_for_updates(&self) -> CoreResult<()> {
        spawn_detached("softwareupdate", &["-l"])
    }

    fn clear_display(&self) -> CoreResult<()> {
        print!("\x1b[2J\x1b[H");
        Ok(())
    }
}

fn player_command(action: &str) -> CoreResult<()> {
    osascript(&format!("tell application \"{DEFAULT_MEDIA_PLAYER}\" to {action}"))
}

fn osascript(script: &str) -> CoreResult<()> {
    spawn_detached("osascript", &["-e", script])
}

fn spawn_detached(program: &str, args: &[&str]) -> CoreResult<()> {
    Command::new(program)
        .args(args)
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .map(|_| ())
        .map_err(|error| CoreError::Actuation(format!("failed to run {program}: {error}")))
}
