//! Linux hotkey backend using evdev for raw keyboard input
//!
//! Monitors keyboard devices directly via /dev/input for low-latency hotkey
//! detection. Requires 'input' group membership to access raw input devices.

use std::path::PathBuf;
use std::sync::mpsc::Sender;
use std::thread;

use anyhow::{Context, Result};
use evdev::{Device, EventType, KeyCode};
use tracing::{debug, error, info};

use super::{Binding, HOTKEY_TABLE, parse_combo};

const DEV_INPUT: &str = "/dev/input";
const INPUT_GROUP: &str = "input";

/// Key press event value (0 = release, 2 = auto-repeat)
const KEY_PRESS: i32 = 1;

/// Key code for Tab - used to identify keyboard devices
const KEY_TAB: u16 = 15;

const KEY_LEFTCTRL: u16 = 29;
const KEY_RIGHTCTRL: u16 = 97;
const KEY_LEFTSHIFT: u16 = 42;
const KEY_RIGHTSHIFT: u16 = 54;
const KEY_LEFTALT: u16 = 56;
const KEY_RIGHTALT: u16 = 100;

#[derive(Clone)]
struct Watch {
    index: usize,
    code: u16,
    binding: Binding,
}

/// Find all keyboard devices (devices that have a Tab key)
fn find_all_keyboard_devices() -> Result<Vec<(Device, PathBuf)>> {
    info!(path = %DEV_INPUT, "Scanning for keyboard devices...");

    let mut devices = Vec::new();

    for entry in std::fs::read_dir(DEV_INPUT).context(format!(
        "Failed to read {DEV_INPUT} - are you in the '{INPUT_GROUP}' group?"
    ))? {
        let entry = entry?;
        let path = entry.path();

        if let Ok(device) = Device::open(&path)
            && let Some(keys) = device.supported_keys()
            && keys.contains(KeyCode(KEY_TAB))
        {
            info!(device_path = %path.display(), name = ?device.name(), "Found keyboard device");
            devices.push((device, path));
        }
    }

    if devices.is_empty() {
        anyhow::bail!(
            "No keyboard device found. Ensure you're in the '{}' group, then log out and back in.",
            INPUT_GROUP
        )
    }

    info!(count = devices.len(), "Listening on keyboard device(s)");

    Ok(devices)
}

/// Spawn one listener thread per keyboard device
pub fn spawn_listener(sender: Sender<usize>) -> Result<Vec<thread::JoinHandle<()>>> {
    let mut watches = Vec::new();
    for (index, action) in HOTKEY_TABLE.iter().enumerate() {
        let Some(binding) = parse_combo(action.combo) else {
            error!(combo = action.combo, "Unparsable hotkey combination, skipping");
            continue;
        };
        let Some(code) = keycode_from_name(binding.key) else {
            error!(key = binding.key, "Unknown key name, skipping");
            continue;
        };
        watches.push(Watch { index, code, binding });
    }
    anyhow::ensure!(!watches.is_empty(), "No usable entries in the hotkey table");

    let devices = find_all_keyboard_devices()?;

    let mut handles = Vec::new();
    for (device, device_path) in devices {
        let sender = sender.clone();
        let watches = watches.clone();

        let handle = thread::spawn(move || {
            info!(device = ?device.name(), path = %device_path.display(), "Hotkey listener started");
            if let Err(e) = listen_for_hotkeys(device, sender, watches) {
                error!(error = %e, "Hotkey listener error");
            }
        });
        handles.push(handle);
    }

    Ok(handles)
}

/// Listen for table entries on a single device
fn listen_for_hotkeys(
    mut device: Device,
    sender: Sender<usize>,
    watches: Vec<Watch>,
) -> Result<()> {
    loop {
        // Fetch events (blocks until available)
        let events = device.fetch_events().context("Failed to fetch events")?;

        // Collect key presses first; the events iterator borrows the device
        // and we need it again to query modifier state.
        let mut presses = Vec::new();
        for event in events {
            if event.event_type() != EventType::KEY {
                continue;
            }
            if event.value() == KEY_PRESS {
                presses.push(event.code());
            }
        }

        for code in presses {
            // Check real-time state of modifier keys. This avoids race
            // conditions from batched events.
            let key_state = device
                .get_key_state()
                .context("Failed to get keyboard state")?;

            let ctrl = key_state.contains(KeyCode(KEY_LEFTCTRL))
                || key_state.contains(KeyCode(KEY_RIGHTCTRL));
            let shift = key_state.contains(KeyCode(KEY_LEFTSHIFT))
                || key_state.contains(KeyCode(KEY_RIGHTSHIFT));
            let alt = key_state.contains(KeyCode(KEY_LEFTALT))
                || key_state.contains(KeyCode(KEY_RIGHTALT));

            for watch in watches.iter().filter(|watch| watch.code == code) {
                if watch.binding.modifiers_satisfied(ctrl, shift, alt) {
                    debug!(
                        combo = HOTKEY_TABLE[watch.index].combo,
                        "Hotkey pressed, dispatching"
                    );
                    sender
                        .send(watch.index)
                        .context("Failed to send hotkey index")?;
                }
            }
        }
    }
}

fn keycode_from_name(name: &str) -> Option<u16> {
    let mut chars = name.chars();
    let first = chars.next()?;
    if chars.next().is_some() {
        return None;
    }

    // Codes from linux/input-event-codes.h
    match first.to_ascii_lowercase() {
        'a' => Some(30),
        'b' => Some(48),
        'c' => Some(46),
        'd' => Some(32),
        'e' => Some(18),
        'f' => Some(33),
        'g' => Some(34),
        'h' => Some(35),
        'i' => Some(23),
        'j' => Some(36),
        'k' => Some(37),
        'l' => Some(38),
        'm' => Some(50),
        'n' => Some(49),
        'o' => Some(24),
        'p' => Some(25),
        'q' => Some(16),
        'r' => Some(19),
        's' => Some(31),
        't' => Some(20),
        'u' => Some(22),
        'v' => Some(47),
        'w' => Some(17),
        'x' => Some(45),
        'y' => Some(21),
        'z' => Some(44),
        '1' => Some(2),
        '2' => Some(3),
        '3' => Some(4),
        '4' => Some(5),
        '5' => Some(6),
        '6' => Some(7),
        '7' => Some(8),
        '8' => Some(9),
        '9' => Some(10),
        '0' => Some(11),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_table_entry_maps_to_a_keycode() {
        for action in HOTKEY_TABLE {
            let binding = parse_combo(action.combo).expect(action.combo);
            assert!(
                keycode_from_name(binding.key).is_some(),
                "no keycode mapping for {}",
                action.combo
            );
        }
    }

    #[test]
    fn test_keycode_from_name_letters() {
        assert_eq!(keycode_from_name("c"), Some(46));
        assert_eq!(keycode_from_name("v"), Some(47));
        assert_eq!(keycode_from_name("space"), None);
    }
}
