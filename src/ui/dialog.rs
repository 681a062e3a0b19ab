//! Informational dialog windows (Help and About)
//!
//! Plain decorated windows with scrollable text and a close button, spawned
//! on their own threads so they can be opened from the tray menu without
//! blocking it.

use std::thread;

use eframe::egui;
use tracing::error;

use crate::constants::gui::{DIALOG_HEIGHT, DIALOG_WIDTH};

const HELP_TITLE: &str = "Hotkey Notifier Help";
const HELP_TEXT: &str = "\
Hotkey Notifier shows a small popup whenever one of the keyboard shortcuts \
below is pressed, no matter which application has focus.

Default hotkeys:
    ctrl+c    Copy          (shows the copied text)
    ctrl+x    Cut           (shows the cut text)
    ctrl+v    Paste
    ctrl+z    Undo
    ctrl+y    Redo
    ctrl+a    Select All
    ctrl+s    Save
    ctrl+p    Print
    ctrl+n    New Document
    ctrl+o    Open File
    ctrl+f    Find

Customization:
  - Drag the notification popup to reposition it anywhere on screen.
  - Use 'Reset Notification Position' to restore the default placement.
  - Adjust popup transparency with the opacity slider.
  - Pick your favorite background and text colors.
  - Enable or disable launching at Windows startup.
  All settings are saved automatically and persist across restarts.

System tray:
  Right-click the tray icon for Options, Show Status, Reset Notification \
Position, Pause/Resume, Help, About and Quit. The app runs quietly in the \
background; the settings window does not need to stay open.";

const ABOUT_TITLE: &str = "About";
const ABOUT_TEXT: &str = concat!(
    "Hotkey Notifier v",
    env!("CARGO_PKG_VERSION"),
    "\n\nA small tray utility that displays popup notifications for common \
keyboard shortcuts.\n\nPopup position, colors and opacity are customizable \
from the settings window and stored in a plain JSON config file."
);

pub fn show_help() {
    spawn_info(HELP_TITLE, HELP_TEXT);
}

pub fn show_about() {
    spawn_info(ABOUT_TITLE, ABOUT_TEXT);
}

fn spawn_info(title: &'static str, body: &'static str) {
    thread::spawn(move || {
        let viewport = egui::ViewportBuilder::default()
            .with_inner_size([DIALOG_WIDTH, DIALOG_HEIGHT])
            .with_title(title)
            .with_always_on_top()
            .with_resizable(false);
        let options = super::secondary_window_options(viewport);

        let result = eframe::run_native(
            title,
            options,
            Box::new(move |_cc| Ok(Box::new(InfoDialog { body }))),
        );
        if let Err(err) = result {
            error!(error = %err, dialog = title, "Failed to open dialog window");
        }
    });
}

struct InfoDialog {
    body: &'static str,
}

impl eframe::App for InfoDialog {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        egui::TopBottomPanel::bottom("dialog_buttons").show(ctx, |ui| {
            ui.vertical_centered(|ui| {
                if ui.button("Close").clicked() {
                    ctx.send_viewport_cmd(egui::ViewportCommand::Close);
                }
            });
        });
        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical().show(ui, |ui| {
                ui.label(self.body);
            });
        });
    }
}
