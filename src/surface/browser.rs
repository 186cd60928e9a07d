use crate::event::AppEvent;
use crate::surface::{ensure_web_scheme, DisplaySurface, SurfaceError};
use eframe::egui::{self, RichText};
use std::sync::mpsc::Sender;
use url::Url;

/// Opens tool pages in the user's default browser. The page lives outside the
/// shell after hand-off, so navigation counts as finished immediately.
pub struct SystemBrowserSurface {
    key: String,
    ctx: egui::Context,
    events: Sender<AppEvent>,
    last_opened: Option<Url>,
    visible: bool,
}

impl SystemBrowserSurface {
    pub fn new(key: String, ctx: egui::Context, events: Sender<AppEvent>) -> Self {
        Self {
            key,
            ctx,
            events,
            last_opened: None,
            visible: false,
        }
    }

    fn emit(&self, event: AppEvent) {
        if self.events.send(event).is_err() {
            log::debug!("event channel closed; dropping event for {}", self.key);
        }
    }
}

impl DisplaySurface for SystemBrowserSurface {
    fn navigate(&mut self, url: &Url) -> Result<(), SurfaceError> {
        ensure_web_scheme(url)?;
        self.emit(AppEvent::NavigationStarted {
            key: self.key.clone(),
            url: url.to_string(),
        });
        self.ctx.open_url(egui::OpenUrl::new_tab(url.as_str()));
        self.last_opened = Some(url.clone());
        self.emit(AppEvent::NavigationFinished {
            key: self.key.clone(),
            url: url.to_string(),
        });
        Ok(())
    }

    fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    fn render(&mut self, ui: &mut egui::Ui) {
        if !self.visible {
            return;
        }
        ui.add_space(24.0);
        ui.vertical_centered(|ui| match &self.last_opened {
            Some(url) => {
                ui.label(RichText::new("Opened in your browser").size(16.0));
                ui.hyperlink(url.as_str());
            }
            None => {
                ui.label(RichText::new("Not opened yet").weak());
            }
        });
    }
}
