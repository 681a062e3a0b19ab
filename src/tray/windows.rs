//! Windows tray backend
//!
//! A `tray-icon` menu pumped by a winit event loop on the main thread. Menu
//! clicks arrive through the event-loop proxy from the `MenuEvent` receiver
//! thread. The pause/resume label is pushed fresh whenever the listening
//! flag changes anywhere in the application, so the menu always reflects the
//! current state when it opens.

use std::sync::{Arc, Mutex};
use std::thread;

use anyhow::{Context, Result};
use tracing::{info, warn};
use tray_icon::menu::{Menu, MenuEvent, MenuId, MenuItem};
use tray_icon::{TrayIcon, TrayIconBuilder};
use winit::application::ApplicationHandler;
use winit::event::{StartCause, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};

use super::{
    MENU_ABOUT, MENU_HELP, MENU_OPTIONS, MENU_QUIT, MENU_RESET_POSITION, MENU_STATUS, pause_label,
};
use crate::app::AppContext;
use crate::constants::app::NAME;
use crate::icon;
use crate::ui::{dialog, popup, settings};

#[derive(Debug)]
enum TrayEvent {
    Menu(MenuEvent),
    ListeningChanged(bool),
}

struct TrayMenu {
    menu: Menu,
    options: MenuId,
    status: MenuId,
    reset_position: MenuId,
    pause: MenuItem,
    help: MenuId,
    about: MenuId,
    quit: MenuId,
}

fn build_menu(listening: bool) -> Result<TrayMenu> {
    let menu = Menu::new();

    let options = MenuItem::new(MENU_OPTIONS, true, None);
    let status = MenuItem::new(MENU_STATUS, true, None);
    let reset_position = MenuItem::new(MENU_RESET_POSITION, true, None);
    let pause = MenuItem::new(pause_label(listening), true, None);
    let help = MenuItem::new(MENU_HELP, true, None);
    let about = MenuItem::new(MENU_ABOUT, true, None);
    let quit = MenuItem::new(MENU_QUIT, true, None);

    for item in [&options, &status, &reset_position, &pause, &help, &about, &quit] {
        menu.append(item).context("Failed to build tray menu")?;
    }

    Ok(TrayMenu {
        menu,
        options: options.id().clone(),
        status: status.id().clone(),
        reset_position: reset_position.id().clone(),
        pause,
        help: help.id().clone(),
        about: about.id().clone(),
        quit: quit.id().clone(),
    })
}

struct TrayApp {
    app: Arc<AppContext>,
    menu: TrayMenu,
    tray: Option<TrayIcon>,
}

impl TrayApp {
    fn build_tray(&mut self) -> Result<()> {
        let tray = TrayIconBuilder::new()
            .with_menu(Box::new(self.menu.menu.clone()))
            .with_tooltip(NAME)
            .with_icon(icon::load().to_tray()?)
            .build()
            .context("Failed to create tray icon")?;
        self.tray = Some(tray);
        info!("Tray icon created");
        Ok(())
    }

    fn handle_menu(&mut self, event_loop: &ActiveEventLoop, event: MenuEvent) {
        let id = event.id();
        if *id == self.menu.options {
            settings::open(self.app.clone());
        } else if *id == self.menu.status {
            popup::show_status(&self.app);
        } else if *id == self.menu.reset_position {
            popup::reset_position(&self.app);
        } else if *id == *self.menu.pause.id() {
            // The label refresh comes back through ListeningChanged
            self.app.toggle_listening();
        } else if *id == self.menu.help {
            dialog::show_help();
        } else if *id == self.menu.about {
            dialog::show_about();
        } else if *id == self.menu.quit {
            // Stops only the tray loop; the settings window's Quit is the
            // path that tears the whole process down.
            info!("Quit requested from tray menu");
            event_loop.exit();
        }
    }
}

impl ApplicationHandler<TrayEvent> for TrayApp {
    fn new_events(&mut self, _event_loop: &ActiveEventLoop, cause: StartCause) {
        if cause == StartCause::Init
            && let Err(err) = self.build_tray()
        {
            warn!(error = %err, "Failed to create tray icon, continuing without one");
        }
    }

    fn resumed(&mut self, _event_loop: &ActiveEventLoop) {}

    fn window_event(
        &mut self,
        _event_loop: &ActiveEventLoop,
        _window_id: winit::window::WindowId,
        _event: WindowEvent,
    ) {
    }

    fn user_event(&mut self, event_loop: &ActiveEventLoop, event: TrayEvent) {
        match event {
            TrayEvent::Menu(event) => self.handle_menu(event_loop, event),
            TrayEvent::ListeningChanged(listening) => {
                self.menu.pause.set_text(pause_label(listening));
            }
        }
    }
}

pub fn run(app: Arc<AppContext>) -> Result<()> {
    let event_loop = EventLoop::<TrayEvent>::with_user_event()
        .build()
        .context("Failed to create tray event loop")?;
    event_loop.set_control_flow(ControlFlow::Wait);

    // Forward menu clicks from the tray receiver thread into the loop
    let menu_proxy = event_loop.create_proxy();
    thread::spawn(move || {
        let receiver = MenuEvent::receiver();
        while let Ok(event) = receiver.recv() {
            if menu_proxy.send_event(TrayEvent::Menu(event)).is_err() {
                break;
            }
        }
    });

    // Keep the pause label in sync with toggles from the settings window
    let label_proxy = Mutex::new(event_loop.create_proxy());
    app.set_listening_changed(move |listening| {
        if let Ok(proxy) = label_proxy.lock() {
            let _ = proxy.send_event(TrayEvent::ListeningChanged(listening));
        }
    });

    let menu = build_menu(app.is_listening())?;
    let mut tray_app = TrayApp { app, menu, tray: None };

    event_loop
        .run_app(&mut tray_app)
        .context("Tray event loop failed")?;
    info!("Tray loop stopped");
    Ok(())
}
