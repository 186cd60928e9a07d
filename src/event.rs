/// Notifications sent by display surfaces, drained once per frame on the UI
/// thread.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    NavigationStarted { key: String, url: String },
    NavigationFinished { key: String, url: String },
}

impl AppEvent {
    pub fn to_log_line(&self) -> String {
        match self {
            Self::NavigationStarted { key, url } => {
                format!("navigation_started key={key} url={url}")
            }
            Self::NavigationFinished { key, url } => {
                format!("navigation_finished key={key} url={url}")
            }
        }
    }
}
