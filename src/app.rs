//! Shared application context
//!
//! One explicit context object passed by `Arc` to the tray, the hotkey
//! dispatcher, the popups and the settings window. It owns the in-memory
//! settings, the pause flag and the settings-window guard. Every settings
//! mutation writes through to disk immediately; save failures are logged and
//! never interrupt the UI.

use std::path::PathBuf;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

use tracing::{error, info, warn};

use crate::config::{Config, NotifPosition};

type ListeningChanged = Box<dyn Fn(bool) + Send + Sync>;

pub struct AppContext {
    config: Mutex<Config>,
    config_path: PathBuf,
    listening: AtomicBool,
    settings_open: AtomicBool,
    listening_changed: Mutex<Option<ListeningChanged>>,
}

impl AppContext {
    pub fn new(config: Config) -> Self {
        Self::with_path(config, Config::path())
    }

    pub fn with_path(config: Config, config_path: PathBuf) -> Self {
        Self {
            config: Mutex::new(config),
            config_path,
            listening: AtomicBool::new(true),
            settings_open: AtomicBool::new(false),
            listening_changed: Mutex::new(None),
        }
    }

    pub fn is_listening(&self) -> bool {
        self.listening.load(Ordering::SeqCst)
    }

    /// Flip the pause state and return the new value. Registered observers
    /// (the tray menu label) are notified afterwards.
    pub fn toggle_listening(&self) -> bool {
        let listening = !self.listening.fetch_xor(true, Ordering::SeqCst);
        info!(listening, "Toggled hotkey listening");
        if let Ok(callback) = self.listening_changed.lock()
            && let Some(callback) = callback.as_ref()
        {
            callback(listening);
        }
        listening
    }

    /// Register the single listening-state observer, replacing any previous
    /// one. The tray uses this to keep its pause label fresh.
    pub fn set_listening_changed(&self, callback: impl Fn(bool) + Send + Sync + 'static) {
        if let Ok(mut slot) = self.listening_changed.lock() {
            *slot = Some(Box::new(callback));
        }
    }

    /// Snapshot of the current settings, taken by each popup at creation
    pub fn config(&self) -> Config {
        self.config
            .lock()
            .map(|config| config.clone())
            .unwrap_or_default()
    }

    /// Apply a mutation and persist the result immediately
    fn update(&self, apply: impl FnOnce(&mut Config)) {
        let Ok(mut config) = self.config.lock() else {
            error!("Settings lock poisoned, dropping update");
            return;
        };
        apply(&mut config);
        if let Err(err) = config.save_to(&self.config_path) {
            error!(error = %err, "Failed to save settings");
        }
    }

    pub fn set_position(&self, x: i32, y: i32) {
        self.update(|config| {
            config.notif_position.x = Some(x);
            config.notif_position.y = Some(y);
        });
    }

    pub fn reset_position(&self) {
        self.update(|config| config.notif_position = NotifPosition::default());
        info!("Notification position reset to default");
    }

    pub fn set_opacity(&self, opacity: f32) {
        self.update(|config| config.opacity = opacity);
    }

    pub fn set_bg_color(&self, color: String) {
        self.update(|config| config.notif_colors.bg = color);
    }

    pub fn set_fg_color(&self, color: String) {
        self.update(|config| config.notif_colors.fg = color);
    }

    pub fn reset_colors(&self) {
        self.update(|config| config.notif_colors = Default::default());
        info!("Notification colors reset to defaults");
    }

    /// Try to claim the single settings-window slot. A second open request
    /// while the window is up is a logged no-op.
    pub fn try_open_settings(&self) -> bool {
        let claimed = self
            .settings_open
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_ok();
        if !claimed {
            warn!("Settings window is already open");
        }
        claimed
    }

    pub fn settings_closed(&self) {
        self.settings_open.store(false, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::AtomicUsize;

    fn test_context() -> (tempfile::TempDir, AppContext) {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("config.json");
        let app = AppContext::with_path(Config::default(), path);
        (temp_dir, app)
    }

    #[test]
    fn test_listening_starts_true_and_toggles() {
        let (_dir, app) = test_context();

        assert!(app.is_listening());
        assert!(!app.toggle_listening());
        assert!(!app.is_listening());
        assert!(app.toggle_listening());
        assert!(app.is_listening());
    }

    #[test]
    fn test_toggle_notifies_observer() {
        let (_dir, app) = test_context();
        let calls = Arc::new(AtomicUsize::new(0));
        let seen = Arc::new(AtomicBool::new(true));

        let calls_clone = calls.clone();
        let seen_clone = seen.clone();
        app.set_listening_changed(move |listening| {
            calls_clone.fetch_add(1, Ordering::SeqCst);
            seen_clone.store(listening, Ordering::SeqCst);
        });

        app.toggle_listening();
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(!seen.load(Ordering::SeqCst));

        app.toggle_listening();
        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert!(seen.load(Ordering::SeqCst));
    }

    #[test]
    fn test_mutations_write_through() {
        let (dir, app) = test_context();
        let path = dir.path().join("config.json");

        app.set_position(310, 42);
        let saved = Config::load_from(&path).unwrap();
        assert_eq!(saved.notif_position.x, Some(310));
        assert_eq!(saved.notif_position.y, Some(42));

        app.set_opacity(0.75);
        app.set_bg_color("#112233".to_string());
        let saved = Config::load_from(&path).unwrap();
        assert_eq!(saved.opacity, 0.75);
        assert_eq!(saved.notif_colors.bg, "#112233");

        app.reset_position();
        app.reset_colors();
        let saved = Config::load_from(&path).unwrap();
        assert_eq!(saved.notif_position, NotifPosition::default());
        assert_eq!(saved.notif_colors, Default::default());
    }

    #[test]
    fn test_settings_window_single_instance() {
        let (_dir, app) = test_context();

        assert!(app.try_open_settings());
        assert!(!app.try_open_settings());

        app.settings_closed();
        assert!(app.try_open_settings());
    }
}
