//! Linux tray backend (StatusNotifierItem via ksni)
//!
//! The tray service runs its D-Bus loop on the calling thread. `menu()` is
//! rebuilt whenever the host opens it or the state changes, so the
//! pause/resume label is always current; toggles coming from the settings
//! window poke the service handle to trigger a refresh.

use std::sync::{Arc, Mutex};

use anyhow::{Context, Result};
use ksni::menu::StandardItem;
use ksni::{MenuItem, ToolTip, Tray, TrayService};
use tracing::info;

use super::{
    MENU_ABOUT, MENU_HELP, MENU_OPTIONS, MENU_QUIT, MENU_RESET_POSITION, MENU_STATUS, pause_label,
};
use crate::app::AppContext;
use crate::constants::app::NAME;
use crate::icon::{self, AppIcon};
use crate::ui::{dialog, popup, settings};

pub struct NotifierTray {
    app: Arc<AppContext>,
    icon: AppIcon,
}

impl Tray for NotifierTray {
    fn id(&self) -> String {
        env!("CARGO_PKG_NAME").into()
    }

    fn title(&self) -> String {
        NAME.into()
    }

    fn icon_pixmap(&self) -> Vec<ksni::Icon> {
        vec![self.icon.to_ksni()]
    }

    fn tool_tip(&self) -> ToolTip {
        ToolTip {
            title: NAME.into(),
            description: String::new(),
            icon_name: String::new(),
            icon_pixmap: Vec::new(),
        }
    }

    fn menu(&self) -> Vec<MenuItem<Self>> {
        vec![
            StandardItem {
                label: MENU_OPTIONS.into(),
                activate: Box::new(|this: &mut Self| settings::open(this.app.clone())),
                ..Default::default()
            }
            .into(),
            StandardItem {
                label: MENU_STATUS.into(),
                activate: Box::new(|this: &mut Self| popup::show_status(&this.app)),
                ..Default::default()
            }
            .into(),
            StandardItem {
                label: MENU_RESET_POSITION.into(),
                activate: Box::new(|this: &mut Self| popup::reset_position(&this.app)),
                ..Default::default()
            }
            .into(),
            StandardItem {
                label: pause_label(self.app.is_listening()).into(),
                activate: Box::new(|this: &mut Self| {
                    this.app.toggle_listening();
                }),
                ..Default::default()
            }
            .into(),
            StandardItem {
                label: MENU_HELP.into(),
                activate: Box::new(|_this: &mut Self| dialog::show_help()),
                ..Default::default()
            }
            .into(),
            StandardItem {
                label: MENU_ABOUT.into(),
                activate: Box::new(|_this: &mut Self| dialog::show_about()),
                ..Default::default()
            }
            .into(),
            MenuItem::Separator,
            StandardItem {
                label: MENU_QUIT.into(),
                icon_name: "application-exit".into(),
                activate: Box::new(|_this: &mut Self| {
                    // The sync tray service has no stop handle reachable from
                    // here, so quitting the tray quits the process.
                    info!("Quit requested from tray menu");
                    std::process::exit(0);
                }),
                ..Default::default()
            }
            .into(),
        ]
    }
}

pub fn run(app: Arc<AppContext>) -> Result<()> {
    let tray = NotifierTray {
        icon: icon::load(),
        app: app.clone(),
    };
    let service = TrayService::new(tray);

    // Menu refresh when the settings window flips the listening flag
    let handle = Mutex::new(service.handle());
    app.set_listening_changed(move |_listening| {
        if let Ok(handle) = handle.lock() {
            handle.update(|_tray: &mut NotifierTray| {});
        }
    });

    info!("Tray service starting");
    service.run().context("Tray service failed")?;
    Ok(())
}
