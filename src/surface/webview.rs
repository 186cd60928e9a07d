use crate::event::AppEvent;
use crate::surface::{ensure_web_scheme, DisplaySurface, SurfaceError};
use eframe::egui;
use raw_window_handle::{HandleError, HasWindowHandle, RawWindowHandle, WindowHandle};
use std::sync::mpsc::Sender;
use url::Url;
use wry::dpi::{LogicalPosition, LogicalSize};
use wry::{PageLoadEvent, Rect, WebView, WebViewBuilder};

/// GTK must be initialised on the UI thread before the first webview is built.
#[cfg(target_os = "linux")]
pub fn init_platform() -> Result<(), gtk::glib::BoolError> {
    gtk::init()
}

/// Runs pending GTK work so Linux webviews load and repaint while egui owns the
/// event loop. Keeps egui ticking for as long as webviews exist.
#[cfg(target_os = "linux")]
pub fn pump_platform_events(ctx: &egui::Context) {
    while gtk::events_pending() {
        gtk::main_iteration_do(false);
    }
    ctx.request_repaint_after(std::time::Duration::from_millis(16));
}

/// Handle of the eframe window that tool webviews are parented to.
#[derive(Debug, Clone, Copy)]
pub struct ParentWindow(RawWindowHandle);

impl ParentWindow {
    pub fn from_window(window: &impl HasWindowHandle) -> Result<Self, HandleError> {
        Ok(Self(window.window_handle()?.as_raw()))
    }
}

impl HasWindowHandle for ParentWindow {
    fn window_handle(&self) -> Result<WindowHandle<'_>, HandleError> {
        // SAFETY: the eframe window lives until the app (and every surface it
        // owns) has been dropped.
        Ok(unsafe { WindowHandle::borrow_raw(self.0) })
    }
}

/// A `wry` child webview placed over the tool panel's content area. The
/// webview is created on first navigation so tools that are never opened cost
/// nothing.
pub struct WebviewSurface {
    key: String,
    parent: ParentWindow,
    ctx: egui::Context,
    events: Sender<AppEvent>,
    webview: Option<WebView>,
    bounds: Option<egui::Rect>,
    visible: bool,
}

impl WebviewSurface {
    pub fn new(
        key: String,
        parent: ParentWindow,
        ctx: egui::Context,
        events: Sender<AppEvent>,
    ) -> Self {
        Self {
            key,
            parent,
            ctx,
            events,
            webview: None,
            bounds: None,
            visible: false,
        }
    }

    fn wry_rect(rect: egui::Rect) -> Rect {
        Rect {
            position: LogicalPosition::new(f64::from(rect.min.x), f64::from(rect.min.y)).into(),
            size: LogicalSize::new(f64::from(rect.width()), f64::from(rect.height())).into(),
        }
    }

    fn build(&self, url: &Url) -> Result<WebView, SurfaceError> {
        let key = self.key.clone();
        let events = self.events.clone();
        let ctx = self.ctx.clone();
        let bounds = self
            .bounds
            .unwrap_or_else(|| egui::Rect::from_min_size(egui::Pos2::ZERO, egui::vec2(1.0, 1.0)));

        WebViewBuilder::new()
            .with_url(url.as_str())
            .with_bounds(Self::wry_rect(bounds))
            .with_visible(self.visible)
            .with_devtools(cfg!(debug_assertions))
            .with_on_page_load_handler(move |event, url| {
                let event = match event {
                    PageLoadEvent::Started => AppEvent::NavigationStarted {
                        key: key.clone(),
                        url,
                    },
                    PageLoadEvent::Finished => AppEvent::NavigationFinished {
                        key: key.clone(),
                        url,
                    },
                };
                if events.send(event).is_err() {
                    log::debug!("event channel closed; dropping page event for {key}");
                }
                ctx.request_repaint();
            })
            .build_as_child(&self.parent)
            .map_err(|err| SurfaceError::Refused {
                url: url.to_string(),
                reason: err.to_string(),
            })
    }
}

impl DisplaySurface for WebviewSurface {
    fn navigate(&mut self, url: &Url) -> Result<(), SurfaceError> {
        ensure_web_scheme(url)?;
        match &self.webview {
            Some(webview) => webview
                .load_url(url.as_str())
                .map_err(|err| SurfaceError::Refused {
                    url: url.to_string(),
                    reason: err.to_string(),
                }),
            None => {
                self.webview = Some(self.build(url)?);
                Ok(())
            }
        }
    }

    fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
        if let Some(webview) = &self.webview {
            if let Err(err) = webview.set_visible(visible) {
                log::warn!("failed to toggle webview for {}: {err}", self.key);
            }
        }
    }

    fn set_bounds(&mut self, rect: egui::Rect) {
        if self.bounds == Some(rect) {
            return;
        }
        self.bounds = Some(rect);
        if let Some(webview) = &self.webview {
            if let Err(err) = webview.set_bounds(Self::wry_rect(rect)) {
                log::warn!("failed to resize webview for {}: {err}", self.key);
            }
        }
    }
}
