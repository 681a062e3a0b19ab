//! Settings window
//!
//! A single-instance window where every control is a live editor: each
//! change writes through to the config file immediately, there is no
//! apply/cancel step. The next popup picks up whatever is current.

use std::sync::Arc;
use std::thread;
use std::time::Duration;

use eframe::egui;
use tracing::{error, info};

use crate::app::AppContext;
use crate::color;
use crate::constants::app::NAME;
use crate::constants::gui::{
    ITEM_SPACING, OPACITY_MAX, OPACITY_MIN, OPACITY_STEP, SECTION_SPACING, SETTINGS_HEIGHT,
    SETTINGS_WIDTH, STATUS_LISTENING, STATUS_PAUSED,
};
use crate::icon;
use crate::startup;
use crate::ui::{dialog, popup};

/// Open the settings window on its own thread. A no-op (beyond a log line)
/// if it is already open.
pub fn open(app: Arc<AppContext>) {
    if !app.try_open_settings() {
        return;
    }

    thread::spawn(move || {
        let viewport = egui::ViewportBuilder::default()
            .with_inner_size([SETTINGS_WIDTH, SETTINGS_HEIGHT])
            .with_title(NAME)
            .with_always_on_top()
            .with_resizable(false)
            .with_icon(icon::load().to_egui());
        let options = super::secondary_window_options(viewport);

        let result = eframe::run_native(
            "hotkey-notifier-settings",
            options,
            Box::new({
                let app = app.clone();
                move |_cc| Ok(Box::new(SettingsWindow::new(app)))
            }),
        );
        app.settings_closed();
        if let Err(err) = result {
            error!(error = %err, "Settings window failed");
        }
    });
}

struct SettingsWindow {
    app: Arc<AppContext>,
    opacity: f32,
    bg: egui::Color32,
    fg: egui::Color32,
    start_on_login: bool,
}

impl SettingsWindow {
    fn new(app: Arc<AppContext>) -> Self {
        let config = app.config();
        Self {
            opacity: config.opacity,
            bg: color::color_or(&config.notif_colors.bg, egui::Color32::BLACK),
            fg: color::color_or(&config.notif_colors.fg, egui::Color32::WHITE),
            start_on_login: startup::is_enabled(),
            app,
        }
    }

    fn reload_colors(&mut self) {
        let config = self.app.config();
        self.bg = color::color_or(&config.notif_colors.bg, egui::Color32::BLACK);
        self.fg = color::color_or(&config.notif_colors.fg, egui::Color32::WHITE);
    }
}

impl eframe::App for SettingsWindow {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        egui::CentralPanel::default().show(ctx, |ui| {
            ui.vertical_centered(|ui| {
                ui.heading(NAME);
            });
            ui.add_space(SECTION_SPACING);

            let listening = self.app.is_listening();
            ui.vertical_centered(|ui| {
                let (status, status_color) = if listening {
                    ("Listening", STATUS_LISTENING)
                } else {
                    ("Paused", STATUS_PAUSED)
                };
                ui.label(egui::RichText::new(status).color(status_color).strong());
                ui.add_space(ITEM_SPACING);

                if ui
                    .button(if listening { "Pause" } else { "Resume" })
                    .clicked()
                {
                    self.app.toggle_listening();
                }
                if ui.button("Reset Notification Position").clicked() {
                    popup::reset_position(&self.app);
                }
            });

            ui.add_space(SECTION_SPACING);
            ui.separator();
            ui.add_space(ITEM_SPACING);

            ui.label(egui::RichText::new("Notification Opacity").strong());
            if ui
                .add(
                    egui::Slider::new(&mut self.opacity, OPACITY_MIN..=OPACITY_MAX)
                        .step_by(OPACITY_STEP),
                )
                .changed()
            {
                self.app.set_opacity(self.opacity);
            }

            ui.add_space(ITEM_SPACING);
            ui.label(egui::RichText::new("Notification Colors").strong());
            ui.horizontal(|ui| {
                ui.label("Background:");
                if ui.color_edit_button_srgba(&mut self.bg).changed() {
                    self.app.set_bg_color(color::format_hex_color(self.bg));
                }
                ui.label("Text:");
                if ui.color_edit_button_srgba(&mut self.fg).changed() {
                    self.app.set_fg_color(color::format_hex_color(self.fg));
                }
            });
            if ui.button("Reset Colors").clicked() {
                self.app.reset_colors();
                self.reload_colors();
            }

            ui.add_space(SECTION_SPACING);
            ui.add_enabled_ui(cfg!(target_os = "windows"), |ui| {
                if ui
                    .checkbox(&mut self.start_on_login, "Start on Windows startup")
                    .changed()
                {
                    let result = if self.start_on_login {
                        startup::enable()
                    } else {
                        startup::disable()
                    };
                    if let Err(err) = result {
                        error!(error = %err, "Failed to update launch-at-login registration");
                        self.start_on_login = startup::is_enabled();
                    }
                }
            });

            ui.add_space(SECTION_SPACING);
            ui.separator();
            ui.add_space(ITEM_SPACING);

            ui.vertical_centered(|ui| {
                ui.horizontal(|ui| {
                    if ui.button("Help").clicked() {
                        dialog::show_help();
                    }
                    if ui.button("About").clicked() {
                        dialog::show_about();
                    }
                    let quit = egui::Button::new(
                        egui::RichText::new("Quit").color(egui::Color32::WHITE),
                    )
                    .fill(egui::Color32::from_rgb(0xE7, 0x4C, 0x3C));
                    if ui.add(quit).clicked() {
                        // Unlike the tray's Quit, this tears down the whole
                        // process, tray loop included.
                        info!("Quit requested from settings window");
                        std::process::exit(0);
                    }
                });
            });
        });

        // The tray menu can flip the listening flag while we are open
        ctx.request_repaint_after(Duration::from_millis(500));
    }
}
