//! System tray presence
//!
//! The tray owns the blocking run loop of the application. Menu entries
//! mirror the settings window's controls for the common cases: open the
//! settings, show a status popup, reset the popup position, pause/resume
//! dispatch, help, about and quit.

#[cfg(target_os = "linux")]
mod linux;
#[cfg(target_os = "windows")]
mod windows;

use std::sync::Arc;

use anyhow::Result;

use crate::app::AppContext;

pub const MENU_OPTIONS: &str = "Options";
pub const MENU_STATUS: &str = "Show Status";
pub const MENU_RESET_POSITION: &str = "Reset Notification Position";
pub const MENU_HELP: &str = "Help";
pub const MENU_ABOUT: &str = "About";
pub const MENU_QUIT: &str = "Quit";

/// Pause/resume label for the current listening state
pub fn pause_label(listening: bool) -> &'static str {
    if listening { "Pause" } else { "Resume" }
}

/// Run the tray loop on the current thread until quit
pub fn run(app: Arc<AppContext>) -> Result<()> {
    #[cfg(target_os = "windows")]
    return windows::run(app);
    #[cfg(target_os = "linux")]
    return linux::run(app);
    #[cfg(not(any(target_os = "windows", target_os = "linux")))]
    {
        let _ = app;
        anyhow::bail!("The system tray is not supported on this platform")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pause_label_tracks_state() {
        assert_eq!(pause_label(true), "Pause");
        assert_eq!(pause_label(false), "Resume");
    }
}
