//! UI windows: notification popups, the settings window and info dialogs
//!
//! Every window here runs its own eframe event loop on a dedicated thread,
//! so popups can overlap each other and none of them blocks hotkey dispatch
//! or the tray loop.

pub mod dialog;
pub mod popup;
pub mod settings;

/// Native options for a window whose event loop runs off the main thread
pub(crate) fn secondary_window_options(viewport: egui::ViewportBuilder) -> eframe::NativeOptions {
    eframe::NativeOptions {
        viewport,
        event_loop_builder: Some(Box::new(any_thread_hook)),
        ..Default::default()
    }
}

fn any_thread_hook(builder: &mut eframe::EventLoopBuilder<eframe::UserEvent>) {
    #[cfg(target_os = "windows")]
    {
        use winit::platform::windows::EventLoopBuilderExtWindows;
        builder.with_any_thread(true);
    }
    #[cfg(target_os = "linux")]
    {
        use winit::platform::x11::EventLoopBuilderExtX11;
        builder.with_any_thread(true);
    }
}
