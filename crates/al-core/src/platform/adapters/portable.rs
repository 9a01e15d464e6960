use std::process::{Command, Stdio};

use super::{Actuation, DEFAULT_MEDIA_PLAYER, PLAYER_STARTUP_GRACE};
use crate::error::{CoreError, CoreResult};
use crate::platform::types::SettingsPanel;

/// Linux-oriented adapter: `xdg-open` for launches and URLs, `playerctl`
/// for media transport, `gnome-control-center` for settings panes.
#[derive(Debug, Default)]
pub struct PortableActuation;

impl PortableActuation {
    pub fn new() -> Self {
        Self
    }
}

impl Actuation for PortableActuation {
    fn id(&self) -> &str {
        "portable"
    }

    fn launch_application(&self, name: &str) -> CoreResult<bool> {
        // Try the binary name directly first; fall back to the desktop
        // handler for names that are not on PATH.
        let binary = binary_name(name);
        if spawn_detached(&binary, &[]).is_ok() {
            return Ok(true);
        }
        spawn_detached("xdg-open", &[name])?;
        Ok(true)
    }

    fn close_application(&self, name: &str) -> CoreResult<()> {
        spawn_detached("pkill", &["-f", &binary_name(name)])
    }

    fn open_url(&self, url: &str) -> CoreResult<()> {
        spawn_detached("xdg-open", &[url])
    }

    fn open_url_in_application(&self, name: &str, url: &str) -> CoreResult<()> {
        if spawn_detached(&binary_name(name), &[url]).is_ok() {
            return Ok(());
        }
        spawn_detached("xdg-open", &[url])
    }

    fn launch_media_player(&self) -> CoreResult<bool> {
        let issued = self.launch_application(DEFAULT_MEDIA_PLAYER)?;
        // The player needs its startup grace before transport commands land.
        std::thread::sleep(PLAYER_STARTUP_GRACE);
        Ok(issued)
    }

    fn media_play(&self) -> CoreResult<()> {
        playerctl("play")
    }

    fn media_pause(&self) -> CoreResult<()> {
        playerctl("pause")
    }

    fn media_next(&self) -> CoreResult<()> {
        playerctl("next")
    }

    fn media_previous(&self) -> CoreResult<()> {
        playerctl("previous")
    }

    fn open_settings_panel(&self, panel: SettingsPanel) -> CoreResult<()> {
        match panel {
            SettingsPanel::Main => spawn_detached("gnome-control-center", &[]),
            SettingsPanel::LocationServices => {
                spawn_detached("gnome-control-center", &["privacy"])
            }
            SettingsPanel::SoftwareUpdate => {
                spawn_detached("gnome-control-center", &["updates"])
            }
        }
    }

    fn close_settings_panel(&self) -> CoreResult<()> {
        spawn_detached("pkill", &["-f", "gnome-control-center"])
    }

    fn check_for_updates(&self) -> CoreResult<()> {
        spawn_detached("apt", &["update"])
    }

    fn clear_display(&self) -> CoreResult<()> {
        print!("\x1b[2J\x1b[H");
        Ok(())
    }
}

/// Informal canonical names ("Google Chrome") become the usual binary
/// spelling ("google-chrome").
fn binary_name(name: &str) -> String {
    name.to_lowercase().replace(' ', "-")
}

fn playerctl(action: &str) -> CoreResult<()> {
    spawn_detached("playerctl", &[action])
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
