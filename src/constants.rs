//! Application-wide constants
//!
//! This module contains the magic numbers and string literals used throughout
//! the application, providing a single source of truth for constant values.

/// Application identity
pub mod app {
    /// Display name, also used as the autostart registry value name
    pub const NAME: &str = "Hotkey Notifier";
}

/// Configuration paths and filenames
pub mod config {
    /// Application directory name under the user config directory
    pub const APP_DIR: &str = "hotkey-notifier";

    /// Configuration filename
    pub const FILENAME: &str = "config.json";

    /// Extension given to an unparsable config file before it is replaced
    pub const CORRUPT_EXTENSION: &str = "json.corrupt";

    /// Environment variable overriding the config directory (used by tests)
    pub const DIR_ENV_OVERRIDE: &str = "HOTKEY_NOTIFIER_CONFIG_DIR";
}

/// Tray and window icon
pub mod icon {
    /// Icon file looked up in the working directory
    pub const FILENAME: &str = "app_icon.ico";

    /// Side length of the generated fallback icon in pixels
    pub const FALLBACK_SIZE: u32 = 64;

    /// Inset of the white rectangle inside the fallback icon
    pub const FALLBACK_INSET: u32 = 16;
}

/// Notification popup geometry and timing
pub mod popup {
    use std::time::Duration;

    /// Popup window width in logical pixels
    pub const WIDTH: f32 = 200.0;

    /// Popup window height in logical pixels
    pub const HEIGHT: f32 = 100.0;

    /// Vertical offset from the top of the screen when no position is saved
    pub const DEFAULT_TOP_OFFSET: f32 = 50.0;

    /// How long a popup stays up before closing itself
    pub const DURATION: Duration = Duration::from_secs(2);

    /// Repaint interval while a popup is alive, keeps the deadline ticking
    pub const TICK: Duration = Duration::from_millis(50);
}

/// Hotkey listener and dispatcher timing
pub mod hotkeys {
    use std::time::Duration;

    /// Delay before reading the clipboard so the triggering shortcut's own
    /// copy/cut has finished writing to it
    pub const CLIPBOARD_SETTLE: Duration = Duration::from_millis(200);

    /// Pause before restarting a crashed OS keyboard listener
    pub const LISTENER_RESTART_DELAY: Duration = Duration::from_millis(500);
}

/// Windows launch-at-login registration
pub mod startup {
    /// Per-user run-at-login registry key
    pub const RUN_KEY: &str = r"Software\Microsoft\Windows\CurrentVersion\Run";
}

/// GUI-specific constants (settings window and dialogs)
pub mod gui {
    /// Settings window dimensions
    pub const SETTINGS_WIDTH: f32 = 340.0;
    pub const SETTINGS_HEIGHT: f32 = 500.0;

    /// Help/about dialog dimensions
    pub const DIALOG_WIDTH: f32 = 420.0;
    pub const DIALOG_HEIGHT: f32 = 440.0;

    /// Layout spacing
    pub const SECTION_SPACING: f32 = 15.0;
    pub const ITEM_SPACING: f32 = 8.0;

    /// Opacity slider range and step
    pub const OPACITY_MIN: f32 = 0.1;
    pub const OPACITY_MAX: f32 = 1.0;
    pub const OPACITY_STEP: f64 = 0.05;

    /// Status colors
    pub const STATUS_LISTENING: egui::Color32 = egui::Color32::from_rgb(100, 200, 100);
    pub const STATUS_PAUSED: egui::Color32 = egui::Color32::from_rgb(255, 200, 0);
}

/// Default configuration values
/// These are used when creating a new config or filling in missing fields
pub mod defaults {
    /// Default popup background color
    pub const BG_COLOR: &str = "#000000";

    /// Default popup text color
    pub const FG_COLOR: &str = "#FFFFFF";

    /// Default popup opacity (0.0 - 1.0)
    pub const OPACITY: f32 = 0.40;
}
