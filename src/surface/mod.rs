//! Display surfaces render a tool's web content. The registry only talks to
//! them through [`DisplaySurface`]; which concrete surface backs a tool is
//! decided by the [`SurfaceFactory`] handed to the shell at startup.

use crate::config::ToolEntry;
use crate::event::AppEvent;
use eframe::egui;
use std::sync::mpsc::Sender;
use url::Url;

#[cfg(any(test, not(feature = "embedded-webview")))]
pub mod browser;
#[cfg(test)]
pub mod testing;
#[cfg(feature = "embedded-webview")]
pub mod webview;

#[cfg(any(test, not(feature = "embedded-webview")))]
pub use browser::SystemBrowserSurface;

#[derive(Debug, thiserror::Error)]
pub enum SurfaceError {
    #[error("unsupported scheme `{scheme}` in {url}")]
    UnsupportedScheme { scheme: String, url: String },
    #[error("display surface refused {url}: {reason}")]
    Refused { url: String, reason: String },
}

pub trait DisplaySurface {
    /// Hands `url` to the surface. Loading continues asynchronously; only a
    /// refusal to accept the address is reported here.
    fn navigate(&mut self, url: &Url) -> Result<(), SurfaceError>;

    fn set_visible(&mut self, visible: bool);

    /// Area of the tool panel the surface may occupy, in egui points.
    fn set_bounds(&mut self, _rect: egui::Rect) {}

    fn render(&mut self, _ui: &mut egui::Ui) {}
}

pub trait SurfaceFactory {
    fn create(&mut self, entry: &ToolEntry) -> Box<dyn DisplaySurface>;
}

impl<F> SurfaceFactory for F
where
    F: FnMut(&ToolEntry) -> Box<dyn DisplaySurface>,
{
    fn create(&mut self, entry: &ToolEntry) -> Box<dyn DisplaySurface> {
        self(entry)
    }
}

pub(crate) fn ensure_web_scheme(url: &Url) -> Result<(), SurfaceError> {
    match url.scheme() {
        "http" | "https" => Ok(()),
        scheme => Err(SurfaceError::UnsupportedScheme {
            scheme: scheme.to_string(),
            url: url.to_string(),
        }),
    }
}

pub type FactoryResult = Result<Box<dyn SurfaceFactory>, Box<dyn std::error::Error + Send + Sync>>;

#[cfg(not(feature = "embedded-webview"))]
pub fn factory_for(cc: &eframe::CreationContext<'_>, events: Sender<AppEvent>) -> FactoryResult {
    let ctx = cc.egui_ctx.clone();
    log::info!("tool pages open in the system browser");
    Ok(Box::new(move |entry: &ToolEntry| -> Box<dyn DisplaySurface> {
        Box::new(SystemBrowserSurface::new(
            entry.key.clone(),
            ctx.clone(),
            events.clone(),
        ))
    }))
}

#[cfg(feature = "embedded-webview")]
pub fn factory_for(cc: &eframe::CreationContext<'_>, events: Sender<AppEvent>) -> FactoryResult {
    let parent = webview::ParentWindow::from_window(cc)?;
    let ctx = cc.egui_ctx.clone();
    log::info!("tool pages render in embedded webviews");
    Ok(Box::new(move |entry: &ToolEntry| -> Box<dyn DisplaySurface> {
        Box::new(webview::WebviewSurface::new(
            entry.key.clone(),
            parent,
            ctx.clone(),
            events.clone(),
        ))
    }))
}
