use crate::config::{Configuration, ToolEntry};
use crate::surface::{DisplaySurface, SurfaceError, SurfaceFactory};
use indexmap::IndexMap;
use url::Url;

pub const DEFAULT_SCHEME: &str = "http";

#[derive(Debug, thiserror::Error)]
pub enum NavigationError {
    #[error("no view is registered for tool `{0}`")]
    UnknownTool(String),
    #[error("tool `{key}` has no URL configured")]
    EmptyUrl { key: String },
    #[error("cannot open `{url}` for tool `{key}`: {source}")]
    InvalidUrl {
        key: String,
        url: String,
        #[source]
        source: url::ParseError,
    },
    #[error("cannot open tool `{key}`: {source}")]
    Rejected {
        key: String,
        #[source]
        source: SurfaceError,
    },
}

impl NavigationError {
    #[cfg(test)]
    pub fn key(&self) -> &str {
        match self {
            Self::UnknownTool(key)
            | Self::EmptyUrl { key }
            | Self::InvalidUrl { key, .. }
            | Self::Rejected { key, .. } => key,
        }
    }
}

/// Turns a stored tool address into a navigable URL, adding `http://` when
/// the value carries no scheme (`127.0.0.1:7860`, `localhost:8080`).
pub fn resolve_url(key: &str, raw: &str) -> Result<Url, NavigationError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(NavigationError::EmptyUrl {
            key: key.to_string(),
        });
    }

    let candidate = if trimmed.contains("://") {
        trimmed.to_string()
    } else {
        format!("{DEFAULT_SCHEME}://{trimmed}")
    };
    Url::parse(&candidate).map_err(|source| NavigationError::InvalidUrl {
        key: key.to_string(),
        url: candidate,
        source,
    })
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolViewState {
    pub key: String,
    pub loaded: bool,
}

pub struct ToolView {
    pub entry: ToolEntry,
    pub state: ToolViewState,
    /// Address bar contents; `force_reload` navigates to whatever is here.
    pub address: String,
    pub loading: bool,
    visible: bool,
    surface: Box<dyn DisplaySurface>,
}

impl ToolView {
    pub fn surface_mut(&mut self) -> &mut dyn DisplaySurface {
        self.surface.as_mut()
    }

    fn set_visible(&mut self, visible: bool) {
        if self.visible != visible {
            self.visible = visible;
            self.surface.set_visible(visible);
        }
    }

    fn load(&mut self, url: Url) -> Result<(), NavigationError> {
        self.surface
            .navigate(&url)
            .map_err(|source| NavigationError::Rejected {
                key: self.state.key.clone(),
                source,
            })?;
        log::info!("{} -> {url}", self.state.key);
        self.address = url.to_string();
        self.state.loaded = true;
        Ok(())
    }
}

pub struct ToolViewRegistry {
    factory: Box<dyn SurfaceFactory>,
    views: IndexMap<String, ToolView>,
}

impl ToolViewRegistry {
    pub fn new(factory: Box<dyn SurfaceFactory>) -> Self {
        Self {
            factory,
            views: IndexMap::new(),
        }
    }

    pub fn rebuild(&mut self, config: &Configuration) {
        // Old surfaces go before new ones exist so two webviews never share a key.
        self.views.clear();
        for entry in config.entries() {
            let mut surface = self.factory.create(entry);
            surface.set_visible(false);
            self.views.insert(
                entry.key.clone(),
                ToolView {
                    entry: entry.clone(),
                    state: ToolViewState {
                        key: entry.key.clone(),
                        loaded: false,
                    },
                    address: entry.url.clone(),
                    loading: false,
                    visible: false,
                    surface,
                },
            );
        }
        log::debug!("tool views rebuilt: {:?}", self.keys().collect::<Vec<_>>());
    }

    pub fn navigate(&mut self, key: &str) -> Result<(), NavigationError> {
        let view = self.lookup(key)?;
        if view.state.loaded {
            log::debug!("{key} already loaded; keeping page state");
            return Ok(());
        }
        let url = resolve_url(key, &view.entry.url)?;
        view.load(url)
    }

    pub fn force_reload(&mut self, key: &str) -> Result<(), NavigationError> {
        let view = self.lookup(key)?;
        let url = resolve_url(key, &view.address)?;
        view.load(url)
    }

    pub fn show(&mut self, key: &str) -> Result<(), NavigationError> {
        self.lookup(key)?.set_visible(true);
        Ok(())
    }

    pub fn hide(&mut self, key: &str) {
        if let Some(view) = self.views.get_mut(key) {
            view.set_visible(false);
        }
    }

    pub fn hide_all(&mut self) {
        for view in self.views.values_mut() {
            view.set_visible(false);
        }
    }

    pub fn set_loading(&mut self, key: &str, loading: bool) {
        match self.views.get_mut(key) {
            Some(view) => view.loading = loading,
            None => log::debug!("ignoring load state for unknown tool {key}"),
        }
    }

    pub fn contains(&self, key: &str) -> bool {
        self.views.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.views.keys().map(String::as_str)
    }

    #[cfg(test)]
    pub fn state(&self, key: &str) -> Option<&ToolViewState> {
        self.views.get(key).map(|view| &view.state)
    }

    #[cfg(test)]
    pub fn view(&self, key: &str) -> Option<&ToolView> {
        self.views.get(key)
    }

    pub fn view_mut(&mut self, key: &str) -> Option<&mut ToolView> {
        self.views.get_mut(key)
    }

    fn lookup(&mut self, key: &str) -> Result<&mut ToolView, NavigationError> {
        self.views
            .get_mut(key)
            .ok_or_else(|| NavigationError::UnknownTool(key.to_string()))
    }
}
