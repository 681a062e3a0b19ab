//! Windows keyboard hook backend
//!
//! `rdev::listen` observes the low-level keyboard stream without suppressing
//! anything, so the shortcuts this application announces still reach the
//! focused application. Matching is edge-triggered per table entry; holding
//! a combination down does not re-fire on auto-repeat.

use std::sync::mpsc::Sender;
use std::thread;

use anyhow::Result;
use rdev::{Event, EventType, Key, listen};
use tracing::{error, info, warn};

use super::{Binding, HOTKEY_TABLE, parse_combo};
use crate::constants::hotkeys::LISTENER_RESTART_DELAY;

#[derive(Clone)]
struct Watch {
    index: usize,
    key: Key,
    binding: Binding,
    triggered: bool,
}

/// Spawn the keyboard listener thread. The thread restarts the OS hook with
/// a short delay if it ever dies.
pub fn spawn_listener(sender: Sender<usize>) -> Result<thread::JoinHandle<()>> {
    let mut watches = Vec::new();
    for (index, action) in HOTKEY_TABLE.iter().enumerate() {
        let Some(binding) = parse_combo(action.combo) else {
            error!(combo = action.combo, "Unparsable hotkey combination, skipping");
            continue;
        };
        let Some(key) = key_from_name(binding.key) else {
            error!(key = binding.key, "Unknown key name, skipping");
            continue;
        };
        watches.push(Watch { index, key, binding, triggered: false });
    }
    anyhow::ensure!(!watches.is_empty(), "No usable entries in the hotkey table");
    info!(hotkeys = watches.len(), "Starting global keyboard listener");

    let handle = thread::spawn(move || {
        loop {
            let sender = sender.clone();
            let mut watches = watches.clone();
            let mut ctrl = false;
            let mut shift = false;
            let mut alt = false;

            let result = listen(move |event: Event| match event.event_type {
                EventType::KeyPress(key) => {
                    match key {
                        Key::ControlLeft | Key::ControlRight => ctrl = true,
                        Key::ShiftLeft | Key::ShiftRight => shift = true,
                        Key::Alt | Key::AltGr => alt = true,
                        _ => {}
                    }
                    for watch in watches.iter_mut().filter(|watch| watch.key == key) {
                        if watch.binding.modifiers_satisfied(ctrl, shift, alt) {
                            if !watch.triggered {
                                watch.triggered = true;
                                let _ = sender.send(watch.index);
                            }
                        } else {
                            watch.triggered = false;
                        }
                    }
                }
                EventType::KeyRelease(key) => {
                    match key {
                        Key::ControlLeft | Key::ControlRight => ctrl = false,
                        Key::ShiftLeft | Key::ShiftRight => shift = false,
                        Key::Alt | Key::AltGr => alt = false,
                        _ => {}
                    }
                    for watch in watches.iter_mut().filter(|watch| watch.key == key) {
                        watch.triggered = false;
                    }
                }
                _ => {}
            });

            match result {
                Ok(()) => warn!("Keyboard listener exited unexpectedly, restarting shortly"),
                Err(err) => warn!(error = ?err, "Keyboard listener failed, retrying shortly"),
            }
            thread::sleep(LISTENER_RESTART_DELAY);
        }
    });

    Ok(handle)
}

fn key_from_name(name: &str) -> Option<Key> {
    let mut chars = name.chars();
    let first = chars.next()?;
    if chars.next().is_some() {
        return None;
    }

    match first.to_ascii_lowercase() {
        'a' => Some(Key::KeyA),
        'b' => Some(Key::KeyB),
        'c' => Some(Key::KeyC),
        'd' => Some(Key::KeyD),
        'e' => Some(Key::KeyE),
        'f' => Some(Key::KeyF),
        'g' => Some(Key::KeyG),
        'h' => Some(Key::KeyH),
        'i' => Some(Key::KeyI),
        'j' => Some(Key::KeyJ),
        'k' => Some(Key::KeyK),
        'l' => Some(Key::KeyL),
        'm' => Some(Key::KeyM),
        'n' => Some(Key::KeyN),
        'o' => Some(Key::KeyO),
        'p' => Some(Key::KeyP),
        'q' => Some(Key::KeyQ),
        'r' => Some(Key::KeyR),
        's' => Some(Key::KeyS),
        't' => Some(Key::KeyT),
        'u' => Some(Key::KeyU),
        'v' => Some(Key::KeyV),
        'w' => Some(Key::KeyW),
        'x' => Some(Key::KeyX),
        'y' => Some(Key::KeyY),
        'z' => Some(Key::KeyZ),
        '0' => Some(Key::Num0),
        '1' => Some(Key::Num1),
        '2' => Some(Key::Num2),
        '3' => Some(Key::Num3),
        '4' => Some(Key::Num4),
        '5' => Some(Key::Num5),
        '6' => Some(Key::Num6),
        '7' => Some(Key::Num7),
        '8' => Some(Key::Num8),
        '9' => Some(Key::Num9),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_table_entry_maps_to_a_key() {
        for action in HOTKEY_TABLE {
            let binding = parse_combo(action.combo).expect(action.combo);
            assert!(
                key_from_name(binding.key).is_some(),
                "no key mapping for {}",
                action.combo
            );
        }
    }

    #[test]
    fn test_key_from_name_rejects_unknown() {
        assert_eq!(key_from_name("space"), None);
        assert_eq!(key_from_name(""), None);
        assert_eq!(key_from_name("!"), None);
    }
}
