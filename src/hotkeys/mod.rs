//! Global hotkey table and dispatch
//!
//! The hotkey table is static data: each entry names the action, the
//! combination string shown in the popup title, and whether the clipboard
//! preview is attached. Platform listeners only detect key presses and send
//! the index of the matched entry over a channel; the dispatcher thread owns
//! everything that can block (the clipboard settle delay and the popup
//! spawn), so the OS hook stays responsive.

#[cfg(target_os = "linux")]
pub mod linux;
#[cfg(target_os = "windows")]
pub mod windows;

use std::sync::Arc;
use std::sync::mpsc::{self, Receiver};
use std::thread;

use anyhow::Result;
use tracing::{debug, info};

use crate::app::AppContext;
use crate::clipboard;
use crate::constants::hotkeys::CLIPBOARD_SETTLE;
use crate::ui::popup;

pub struct HotkeyAction {
    /// Combination string, shown verbatim in the popup title
    pub combo: &'static str,
    /// Human-readable action name
    pub name: &'static str,
    /// Attach the clipboard preview to the popup body
    pub show_clipboard: bool,
}

pub const HOTKEY_TABLE: &[HotkeyAction] = &[
    HotkeyAction { combo: "ctrl+c", name: "Copy", show_clipboard: true },
    HotkeyAction { combo: "ctrl+v", name: "Paste", show_clipboard: false },
    HotkeyAction { combo: "ctrl+x", name: "Cut", show_clipboard: true },
    HotkeyAction { combo: "ctrl+z", name: "Undo", show_clipboard: false },
    HotkeyAction { combo: "ctrl+y", name: "Redo", show_clipboard: false },
    HotkeyAction { combo: "ctrl+a", name: "Select All", show_clipboard: false },
    HotkeyAction { combo: "ctrl+s", name: "Save", show_clipboard: false },
    HotkeyAction { combo: "ctrl+p", name: "Print", show_clipboard: false },
    HotkeyAction { combo: "ctrl+n", name: "New Document", show_clipboard: false },
    HotkeyAction { combo: "ctrl+o", name: "Open File", show_clipboard: false },
    HotkeyAction { combo: "ctrl+f", name: "Find", show_clipboard: false },
];

/// One parsed table entry: the main key (by name) plus required modifiers.
/// Platform backends map `key` onto their own key representation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Binding {
    pub key: &'static str,
    pub ctrl: bool,
    pub shift: bool,
    pub alt: bool,
}

impl Binding {
    /// True when every modifier the binding requires is currently held.
    /// Extra held modifiers do not prevent a match.
    pub fn modifiers_satisfied(&self, ctrl: bool, shift: bool, alt: bool) -> bool {
        (!self.ctrl || ctrl) && (!self.shift || shift) && (!self.alt || alt)
    }
}

/// Parse a combination string like "ctrl+c" into a [`Binding`]
pub fn parse_combo(combo: &'static str) -> Option<Binding> {
    let mut ctrl = false;
    let mut shift = false;
    let mut alt = false;
    let mut key: Option<&'static str> = None;

    for part in combo.split('+') {
        let part = part.trim();
        if part.eq_ignore_ascii_case("ctrl") || part.eq_ignore_ascii_case("control") {
            ctrl = true;
        } else if part.eq_ignore_ascii_case("shift") {
            shift = true;
        } else if part.eq_ignore_ascii_case("alt") {
            alt = true;
        } else if !part.is_empty() {
            key = Some(part);
        }
    }

    key.map(|key| Binding { key, ctrl, shift, alt })
}

/// Start the platform listener and the dispatcher thread
pub fn start(app: Arc<AppContext>) -> Result<()> {
    let (sender, receiver) = mpsc::channel();

    #[cfg(target_os = "windows")]
    windows::spawn_listener(sender)?;
    #[cfg(target_os = "linux")]
    linux::spawn_listener(sender)?;
    #[cfg(not(any(target_os = "windows", target_os = "linux")))]
    {
        drop(sender);
        tracing::warn!("Global hotkeys are not supported on this platform");
    }

    spawn_dispatcher(app, receiver);
    Ok(())
}

fn spawn_dispatcher(app: Arc<AppContext>, receiver: Receiver<usize>) -> thread::JoinHandle<()> {
    thread::spawn(move || {
        info!("Hotkey dispatcher started");
        for index in receiver {
            let Some(action) = HOTKEY_TABLE.get(index) else {
                continue;
            };
            let notification = dispatch(&app, action, || {
                // Give the foreground application time to finish the
                // clipboard write the shortcut itself triggered.
                thread::sleep(CLIPBOARD_SETTLE);
                clipboard::preview()
            });
            match notification {
                Some((title, message)) => popup::notify(app.clone(), title, message),
                None => debug!(combo = action.combo, "Hotkey ignored while paused"),
            }
        }
        info!("Hotkey dispatcher stopped");
    })
}

/// Decide what a trigger produces. `None` while paused (silent no-op); the
/// preview closure runs only for entries that show clipboard content.
fn dispatch(
    app: &AppContext,
    action: &HotkeyAction,
    preview: impl FnOnce() -> String,
) -> Option<(String, String)> {
    if !app.is_listening() {
        return None;
    }

    let title = format!("{}\n{}", action.name, action.combo);
    let message = if action.show_clipboard {
        preview()
    } else {
        String::new()
    };
    Some((title, message))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use std::collections::HashSet;

    fn test_app() -> (tempfile::TempDir, AppContext) {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("config.json");
        (temp_dir, AppContext::with_path(Config::default(), path))
    }

    #[test]
    fn test_table_combos_are_unique_and_parse() {
        let mut seen = HashSet::new();
        for action in HOTKEY_TABLE {
            assert!(seen.insert(action.combo), "duplicate combo {}", action.combo);
            let binding = parse_combo(action.combo).expect(action.combo);
            assert!(binding.ctrl);
            assert!(!binding.shift);
            assert!(!binding.alt);
            assert_eq!(binding.key.len(), 1);
        }
        assert_eq!(HOTKEY_TABLE.len(), 11);
    }

    #[test]
    fn test_clipboard_preview_only_for_copy_and_cut() {
        let with_preview: Vec<&str> = HOTKEY_TABLE
            .iter()
            .filter(|action| action.show_clipboard)
            .map(|action| action.combo)
            .collect();
        assert_eq!(with_preview, ["ctrl+c", "ctrl+x"]);
    }

    #[test]
    fn test_parse_combo_modifiers() {
        let binding = parse_combo("ctrl+shift+s").unwrap();
        assert_eq!(
            binding,
            Binding { key: "s", ctrl: true, shift: true, alt: false }
        );

        assert_eq!(parse_combo("ctrl+"), None);
        assert_eq!(parse_combo("alt+f"), Some(Binding { key: "f", ctrl: false, shift: false, alt: true }));
    }

    #[test]
    fn test_modifiers_satisfied_allows_extras() {
        let binding = parse_combo("ctrl+c").unwrap();

        assert!(binding.modifiers_satisfied(true, false, false));
        assert!(binding.modifiers_satisfied(true, true, false));
        assert!(!binding.modifiers_satisfied(false, false, false));
        assert!(!binding.modifiers_satisfied(false, true, true));
    }

    #[test]
    fn test_dispatch_builds_title_and_message() {
        let (_dir, app) = test_app();
        let copy = &HOTKEY_TABLE[0];

        let (title, message) =
            dispatch(&app, copy, || "Hello World".to_string()).unwrap();
        assert_eq!(title, "Copy\nctrl+c");
        assert_eq!(message, "Hello World");
    }

    #[test]
    fn test_dispatch_without_preview_has_empty_message() {
        let (_dir, app) = test_app();
        let paste = &HOTKEY_TABLE[1];

        let (title, message) = dispatch(&app, paste, || {
            panic!("preview must not run for non-clipboard actions")
        })
        .unwrap();
        assert_eq!(title, "Paste\nctrl+v");
        assert!(message.is_empty());
    }

    #[test]
    fn test_dispatch_is_silent_while_paused() {
        let (_dir, app) = test_app();
        app.toggle_listening();

        let result = dispatch(&app, &HOTKEY_TABLE[0], || {
            panic!("preview must not run while paused")
        });
        assert!(result.is_none());

        app.toggle_listening();
        assert!(dispatch(&app, &HOTKEY_TABLE[0], String::new).is_some());
    }
}
