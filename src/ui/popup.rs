//! Notification popup windows
//!
//! Each popup is a short-lived borderless always-on-top window on its own
//! thread. It closes itself after a fixed duration unless the user grabs it:
//! pointer-down cancels the pending close, dragging moves the window and
//! persists every new position, and pointer-up re-arms the close timer.

use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use eframe::egui;
use tracing::error;

use crate::app::AppContext;
use crate::color;
use crate::config::Config;
use crate::constants::app::NAME;
use crate::constants::popup::{DEFAULT_TOP_OFFSET, DURATION, HEIGHT, TICK, WIDTH};

/// Spawn a popup with the default auto-close duration
pub fn notify(app: Arc<AppContext>, title: String, message: String) {
    spawn(app, title, message, DURATION);
}

/// Spawn-and-forget: the popup owns its thread, window and timer
pub fn spawn(app: Arc<AppContext>, title: String, message: String, duration: Duration) {
    thread::spawn(move || {
        if let Err(err) = run_popup(app, title, message, duration) {
            error!(error = %err, "Failed to show notification popup");
        }
    });
}

/// Show the one-off status popup
pub fn show_status(app: &Arc<AppContext>) {
    notify(
        app.clone(),
        NAME.to_string(),
        "Running in background...".to_string(),
    );
}

/// Reset the saved popup position and confirm with a popup
pub fn reset_position(app: &Arc<AppContext>) {
    app.reset_position();
    notify(
        app.clone(),
        "Position Reset".to_string(),
        "Notification position reset to default.".to_string(),
    );
}

fn run_popup(
    app: Arc<AppContext>,
    title: String,
    message: String,
    duration: Duration,
) -> anyhow::Result<()> {
    // Appearance and placement are read once, at creation; later settings
    // changes apply to the next popup.
    let config = app.config();
    let saved = saved_position(&config);

    let mut viewport = egui::ViewportBuilder::default()
        .with_inner_size([WIDTH, HEIGHT])
        .with_decorations(false)
        .with_transparent(true)
        .with_always_on_top()
        .with_resizable(false)
        .with_taskbar(false);
    if let Some(position) = saved {
        viewport = viewport.with_position(position);
    }
    let options = super::secondary_window_options(viewport);

    let popup = PopupWindow::new(app, &config, title, message, duration, saved.is_none());
    eframe::run_native(
        "hotkey-notifier-popup",
        options,
        Box::new(move |_cc| Ok(Box::new(popup))),
    )
    .map_err(|err| anyhow::anyhow!("Popup event loop failed: {err}"))
}

fn saved_position(config: &Config) -> Option<egui::Pos2> {
    match (config.notif_position.x, config.notif_position.y) {
        (Some(x), Some(y)) => Some(egui::pos2(x as f32, y as f32)),
        _ => None,
    }
}

/// Default placement: horizontally centered, fixed offset from the top
fn centered_position(monitor_width: f32) -> egui::Pos2 {
    egui::pos2(((monitor_width - WIDTH) / 2.0).max(0.0), DEFAULT_TOP_OFFSET)
}

/// Cancellable auto-close deadline owned by a single popup
#[derive(Debug)]
struct AutoClose {
    duration: Duration,
    deadline: Option<Instant>,
}

impl AutoClose {
    fn new(duration: Duration, now: Instant) -> Self {
        Self {
            duration,
            deadline: Some(now + duration),
        }
    }

    fn cancel(&mut self) {
        self.deadline = None;
    }

    fn rearm(&mut self, now: Instant) {
        self.deadline = Some(now + self.duration);
    }

    fn expired(&self, now: Instant) -> bool {
        self.deadline.is_some_and(|deadline| now >= deadline)
    }
}

/// Pointer offset recorded on press. The window follows the pointer so the
/// grab point stays under the cursor.
#[derive(Debug, Clone, Copy)]
struct DragState {
    grab: egui::Pos2,
}

impl DragState {
    fn target(&self, outer_min: egui::Pos2, pointer: egui::Pos2) -> egui::Pos2 {
        outer_min + (pointer - self.grab)
    }
}

struct PopupWindow {
    app: Arc<AppContext>,
    title: String,
    message: String,
    bg: egui::Color32,
    fg: egui::Color32,
    timer: AutoClose,
    drag: Option<DragState>,
    needs_centering: bool,
}

impl PopupWindow {
    fn new(
        app: Arc<AppContext>,
        config: &Config,
        title: String,
        message: String,
        duration: Duration,
        needs_centering: bool,
    ) -> Self {
        let opacity = config.opacity.clamp(0.05, 1.0);
        let bg = color::color_or(&config.notif_colors.bg, egui::Color32::BLACK)
            .gamma_multiply(opacity);
        let fg = color::color_or(&config.notif_colors.fg, egui::Color32::WHITE)
            .gamma_multiply(opacity);

        Self {
            app,
            title,
            message,
            bg,
            fg,
            timer: AutoClose::new(duration, Instant::now()),
            drag: None,
            needs_centering,
        }
    }
}

impl eframe::App for PopupWindow {
    fn clear_color(&self, _visuals: &egui::Visuals) -> [f32; 4] {
        egui::Rgba::TRANSPARENT.to_array()
    }

    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let now = Instant::now();
        let outer = ctx.input(|i| i.viewport().outer_rect);

        // Monitor info can lag the first frame; keep trying until it shows up
        if self.needs_centering
            && let Some(monitor) = ctx.input(|i| i.viewport().monitor_size)
        {
            self.needs_centering = false;
            ctx.send_viewport_cmd(egui::ViewportCommand::OuterPosition(centered_position(
                monitor.x,
            )));
        }

        let (pressed, down, pointer) = ctx.input(|i| {
            (
                i.pointer.primary_pressed(),
                i.pointer.primary_down(),
                i.pointer.latest_pos(),
            )
        });

        if pressed && let Some(position) = pointer {
            // Grabbing the popup cancels the pending close until release
            self.timer.cancel();
            self.drag = Some(DragState { grab: position });
        }

        if let Some(drag) = self.drag {
            if down {
                if let (Some(position), Some(outer)) = (pointer, outer) {
                    let target = drag.target(outer.min, position);
                    if target != outer.min {
                        ctx.send_viewport_cmd(egui::ViewportCommand::OuterPosition(target));
                        self.app
                            .set_position(target.x.round() as i32, target.y.round() as i32);
                    }
                }
            } else {
                self.drag = None;
                self.timer.rearm(now);
            }
        }

        if self.timer.expired(now) {
            ctx.send_viewport_cmd(egui::ViewportCommand::Close);
        }

        let frame = egui::Frame::new()
            .fill(self.bg)
            .inner_margin(egui::Margin::same(8));
        egui::CentralPanel::default().frame(frame).show(ctx, |ui| {
            ui.vertical_centered(|ui| {
                ui.label(
                    egui::RichText::new(&self.title)
                        .color(self.fg)
                        .strong()
                        .size(13.0),
                );
            });
            if !self.message.is_empty() {
                ui.add(
                    egui::Label::new(
                        egui::RichText::new(&self.message).color(self.fg).size(10.0),
                    )
                    .wrap(),
                );
            }
        });

        ctx.request_repaint_after(TICK);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::NotifPosition;

    #[test]
    fn test_saved_position_requires_both_coordinates() {
        let mut config = Config::default();
        assert_eq!(saved_position(&config), None);

        config.notif_position = NotifPosition { x: Some(10), y: None };
        assert_eq!(saved_position(&config), None);

        config.notif_position = NotifPosition { x: Some(10), y: Some(20) };
        assert_eq!(saved_position(&config), Some(egui::pos2(10.0, 20.0)));
    }

    #[test]
    fn test_centered_position() {
        let position = centered_position(1920.0);
        assert_eq!(position, egui::pos2((1920.0 - WIDTH) / 2.0, DEFAULT_TOP_OFFSET));

        // Narrow screens clamp to the left edge instead of going negative
        let position = centered_position(100.0);
        assert_eq!(position.x, 0.0);
    }

    #[test]
    fn test_drag_moves_window_by_pointer_delta() {
        let drag = DragState { grab: egui::pos2(10.0, 20.0) };
        let outer_min = egui::pos2(100.0, 200.0);

        // Pointer moved by (5, 7) from the grab point
        let target = drag.target(outer_min, egui::pos2(15.0, 27.0));
        assert_eq!(target, egui::pos2(105.0, 207.0));

        // No movement, no reposition
        assert_eq!(drag.target(outer_min, drag.grab), outer_min);
    }

    #[test]
    fn test_dragged_position_is_used_by_the_next_popup() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("config.json");
        let app = AppContext::with_path(Config::default(), path.clone());

        // A drag from (100, 200) by (5, 7) lands on (105, 207)
        let drag = DragState { grab: egui::pos2(10.0, 20.0) };
        let target = drag.target(egui::pos2(100.0, 200.0), egui::pos2(15.0, 27.0));
        app.set_position(target.x.round() as i32, target.y.round() as i32);

        let reloaded = Config::load_from(&path).unwrap();
        assert_eq!(saved_position(&reloaded), Some(egui::pos2(105.0, 207.0)));
    }

    #[test]
    fn test_auto_close_deadline() {
        let start = Instant::now();
        let timer = AutoClose::new(Duration::from_secs(2), start);

        assert!(!timer.expired(start));
        assert!(!timer.expired(start + Duration::from_millis(1999)));
        assert!(timer.expired(start + Duration::from_secs(2)));
    }

    #[test]
    fn test_cancel_and_rearm() {
        let start = Instant::now();
        let mut timer = AutoClose::new(Duration::from_secs(2), start);

        // While grabbed, the deadline never fires
        timer.cancel();
        assert!(!timer.expired(start + Duration::from_secs(60)));

        // Release re-arms for a full duration from now
        let release = start + Duration::from_secs(60);
        timer.rearm(release);
        assert!(!timer.expired(release + Duration::from_millis(1999)));
        assert!(timer.expired(release + Duration::from_secs(2)));
    }
}
