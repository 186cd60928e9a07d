use crate::config::{ConfigStore, Configuration, DEFAULT_TOOL_KEY};
use crate::event::AppEvent;
use crate::registry::{NavigationError, ToolViewRegistry};
use crate::settings::{SettingsError, SettingsEditor};
use crate::surface::SurfaceFactory;
use std::collections::VecDeque;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    None,
    Settings,
    Tool(String),
}

#[derive(Debug, thiserror::Error)]
pub enum ShellError {
    #[error("tool `{0}` was not found")]
    Lookup(String),
    #[error(transparent)]
    Navigation(#[from] NavigationError),
    #[error(transparent)]
    Settings(#[from] SettingsError),
}

impl ShellError {
    fn title(&self) -> &'static str {
        match self {
            Self::Lookup(_) => "Tool not found",
            Self::Navigation(_) => "Cannot open URL",
            Self::Settings(SettingsError::Save(_)) => "Saving settings failed",
            Self::Settings(_) => "Invalid settings",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub title: String,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuButton {
    pub key: String,
    pub label: String,
}

/// User intents produced by the UI layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellCommand {
    SelectTool(String),
    ToggleSettings,
    SaveSettings,
    CancelSettings,
    ReloadCurrent,
    DismissNotice,
}

pub struct ShellController {
    store: ConfigStore,
    config: Configuration,
    registry: ToolViewRegistry,
    editor: SettingsEditor,
    menu: Vec<MenuButton>,
    selection: Selection,
    last_tool: Option<String>,
    notices: VecDeque<Notice>,
}

impl ShellController {
    pub fn new(
        store: ConfigStore,
        config: Configuration,
        factory: Box<dyn SurfaceFactory>,
    ) -> Self {
        let mut shell = Self {
            store,
            config: Configuration::empty(Default::default()),
            registry: ToolViewRegistry::new(factory),
            editor: SettingsEditor::new(),
            menu: Vec::new(),
            selection: Selection::None,
            last_tool: None,
            notices: VecDeque::new(),
        };
        shell.install(config);
        if let Some(first) = shell.config.first_key().map(str::to_string) {
            let result = shell.switch_to(&first);
            shell.report(result);
        }
        shell.sync_surface_visibility();
        shell
    }

    pub fn config(&self) -> &Configuration {
        &self.config
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn menu(&self) -> &[MenuButton] {
        &self.menu
    }

    #[cfg(test)]
    pub fn registry(&self) -> &ToolViewRegistry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut ToolViewRegistry {
        &mut self.registry
    }

    #[cfg(test)]
    pub fn editor(&self) -> &SettingsEditor {
        &self.editor
    }

    pub fn editor_mut(&mut self) -> &mut SettingsEditor {
        &mut self.editor
    }

    pub fn notices(&self) -> &VecDeque<Notice> {
        &self.notices
    }

    pub fn dispatch(&mut self, command: ShellCommand) {
        log::debug!("dispatch {command:?}");
        let result = match command {
            ShellCommand::SelectTool(key) => self.select_tool(&key),
            ShellCommand::ToggleSettings => {
                self.toggle_settings();
                Ok(())
            }
            ShellCommand::SaveSettings => self.save_settings(),
            ShellCommand::CancelSettings => self.on_settings_cancelled(),
            ShellCommand::ReloadCurrent => self.reload_current(),
            ShellCommand::DismissNotice => {
                self.notices.pop_front();
                Ok(())
            }
        };
        self.report(result);
        self.sync_surface_visibility();
    }

    pub fn select_tool(&mut self, key: &str) -> Result<(), ShellError> {
        if !self.registry.contains(key) {
            return Err(ShellError::Lookup(key.to_string()));
        }
        if self.selection == Selection::Settings {
            self.editor.cancel();
            self.editor.close();
        }
        self.switch_to(key)
    }

    pub fn open_settings(&mut self) {
        self.registry.hide_all();
        self.editor.begin(&self.config);
        self.selection = Selection::Settings;
    }

    pub fn toggle_settings(&mut self) {
        if self.selection == Selection::Settings {
            let result = self.on_settings_cancelled();
            self.report(result);
        } else {
            self.open_settings();
        }
    }

    pub fn save_settings(&mut self) -> Result<(), ShellError> {
        let config = self.editor.save(&self.store)?;
        self.on_settings_saved(config)
    }

    /// The configuration has already been persisted by the settings editor.
    pub fn on_settings_saved(&mut self, config: Configuration) -> Result<(), ShellError> {
        self.editor.close();
        self.install(config);
        let preferred = if self.config.get(DEFAULT_TOOL_KEY).is_some() {
            Some(DEFAULT_TOOL_KEY.to_string())
        } else {
            self.config.first_key().map(str::to_string)
        };
        match preferred {
            Some(key) => self.switch_to(&key),
            None => Ok(()),
        }
    }

    pub fn on_settings_cancelled(&mut self) -> Result<(), ShellError> {
        self.editor.cancel();
        self.editor.close();
        let target = self
            .last_tool
            .clone()
            .filter(|key| self.registry.contains(key))
            .or_else(|| self.config.first_key().map(str::to_string));
        match target {
            Some(key) => self.switch_to(&key),
            None => {
                self.selection = Selection::None;
                Ok(())
            }
        }
    }

    pub fn reload_current(&mut self) -> Result<(), ShellError> {
        match &self.selection {
            Selection::Tool(key) => Ok(self.registry.force_reload(key)?),
            Selection::Settings | Selection::None => Ok(()),
        }
    }

    pub fn handle_event(&mut self, event: AppEvent) {
        log::debug!("{}", event.to_log_line());
        match event {
            AppEvent::NavigationStarted { key, .. } => self.registry.set_loading(&key, true),
            AppEvent::NavigationFinished { key, .. } => self.registry.set_loading(&key, false),
        }
    }

    pub fn report(&mut self, result: Result<(), ShellError>) {
        if let Err(err) = result {
            log::warn!("{err}");
            self.notices.push_back(Notice {
                title: err.title().to_string(),
                message: err.to_string(),
            });
        }
    }

    // Native webviews paint above egui, so the selected page stays hidden
    // while a notice window is up.
    fn sync_surface_visibility(&mut self) {
        match &self.selection {
            Selection::Tool(key) if self.notices.is_empty() => {
                if let Err(err) = self.registry.show(key) {
                    log::debug!("{err}");
                }
            }
            _ => self.registry.hide_all(),
        }
    }

    fn install(&mut self, config: Configuration) {
        self.config = config;
        self.registry.rebuild(&self.config);
        self.menu = self
            .config
            .entries()
            .map(|entry| MenuButton {
                key: entry.key.clone(),
                label: entry.name.clone(),
            })
            .collect();
        self.selection = Selection::None;
        self.last_tool = None;
    }

    // A failed navigation still switches panels so the address can be fixed
    // and reloaded from the tool's own address bar.
    fn switch_to(&mut self, key: &str) -> Result<(), ShellError> {
        if !self.registry.contains(key) {
            return Err(ShellError::Lookup(key.to_string()));
        }
        if let Selection::Tool(previous) = &self.selection {
            if previous != key {
                self.registry.hide(previous);
            }
        }
        let navigation = self.registry.navigate(key);
        self.registry.show(key)?;
        self.selection = Selection::Tool(key.to_string());
        self.last_tool = Some(key.to_string());
        navigation.map_err(ShellError::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::store::CONFIG_FILE_NAME;
    use crate::config::{ToolEntry, WebviewTheme};
    use crate::settings::EditorState;
    use crate::surface::testing::{recording_factory, SurfaceLog};
    use tempfile::TempDir;

    struct Harness {
        _dir: TempDir,
        shell: ShellController,
        log: SurfaceLog,
    }

    fn config(entries: &[(&str, &str, &str)]) -> Configuration {
        let mut config = Configuration::empty(WebviewTheme::Light);
        for (key, name, url) in entries {
            config.insert(ToolEntry::new(*key, *name, *url));
        }
        config
    }

    fn harness(entries: &[(&str, &str, &str)]) -> Harness {
        let dir = tempfile::tempdir().expect("tempdir should be created");
        let store = ConfigStore::new(dir.path().join(CONFIG_FILE_NAME));
        let log = SurfaceLog::default();
        let shell = ShellController::new(store, config(entries), recording_factory(log.clone()));
        Harness {
            _dir: dir,
            shell,
            log,
        }
    }

    fn two_tools() -> Harness {
        harness(&[
            ("iopaint", "IOPaint", "127.0.0.1:8080"),
            ("stable_diffusion", "Stable Diffusion", "127.0.0.1:7860"),
        ])
    }

    fn set_rows(shell: &mut ShellController, rows: &[(&str, &str, &str)]) {
        let editor = shell.editor_mut();
        for id in editor.rows().iter().map(|row| row.id).collect::<Vec<_>>() {
            editor.remove_row(id);
        }
        for (key, name, url) in rows {
            let id = editor.add_row();
            let row = editor
                .rows_mut()
                .iter_mut()
                .find(|row| row.id == id)
                .expect("added row should exist");
            row.key = key.to_string();
            row.name = name.to_string();
            row.url = url.to_string();
        }
    }

    #[test]
    fn starts_on_first_tool() {
        let h = two_tools();
        assert_eq!(h.shell.selection(), &Selection::Tool("iopaint".to_string()));
        assert_eq!(h.log.visible_keys(), vec!["iopaint".to_string()]);
        assert_eq!(h.log.navigations("iopaint"), vec!["http://127.0.0.1:8080/".to_string()]);
        let labels: Vec<_> = h.shell.menu().iter().map(|b| b.label.as_str()).collect();
        assert_eq!(labels, vec!["IOPaint", "Stable Diffusion"]);
    }

    #[test]
    fn select_tool_switches_exactly_one_visible_view() {
        let mut h = two_tools();
        h.shell.select_tool("stable_diffusion").expect("known tool");

        assert_eq!(
            h.shell.selection(),
            &Selection::Tool("stable_diffusion".to_string())
        );
        assert_eq!(h.log.visible_keys(), vec!["stable_diffusion".to_string()]);

        h.shell.select_tool("iopaint").expect("back to first");
        assert_eq!(h.log.visible_keys(), vec!["iopaint".to_string()]);
        assert_eq!(h.log.navigations("iopaint").len(), 1, "no re-navigation");
    }

    #[test]
    fn unknown_tool_leaves_selection_unchanged() {
        let mut h = two_tools();
        let error = h.shell.select_tool("missing").expect_err("unknown key");
        assert!(matches!(error, ShellError::Lookup(ref key) if key == "missing"));
        assert_eq!(h.shell.selection(), &Selection::Tool("iopaint".to_string()));

        h.shell.dispatch(ShellCommand::SelectTool("missing".to_string()));
        assert_eq!(h.shell.notices().len(), 1);
        assert_eq!(h.shell.notices()[0].title, "Tool not found");
    }

    #[test]
    fn cancel_restores_previous_tool_without_navigation() {
        let mut h = two_tools();
        let before = h.log.navigation_count();

        h.shell.open_settings();
        assert_eq!(h.shell.selection(), &Selection::Settings);
        assert!(h.log.visible_keys().is_empty());
        assert_eq!(h.shell.editor().state(), EditorState::Editing);

        h.shell.on_settings_cancelled().expect("cancel restores");
        assert_eq!(h.shell.selection(), &Selection::Tool("iopaint".to_string()));
        assert_eq!(h.log.navigation_count(), before);
        assert!(h
            .shell
            .registry()
            .state("iopaint")
            .is_some_and(|state| state.loaded));
        assert_eq!(h.shell.editor().state(), EditorState::Hidden);
    }

    #[test]
    fn selecting_a_tool_from_settings_cancels_the_edit() {
        let mut h = two_tools();
        h.shell.open_settings();
        h.shell.editor_mut().add_row();

        h.shell.select_tool("stable_diffusion").expect("switch from settings");
        assert_eq!(h.shell.editor().state(), EditorState::Hidden);
        assert!(h.shell.editor().rows().is_empty());
        assert_eq!(
            h.shell.selection(),
            &Selection::Tool("stable_diffusion".to_string())
        );
    }

    #[test]
    fn toggle_settings_opens_and_closes() {
        let mut h = two_tools();
        h.shell.dispatch(ShellCommand::ToggleSettings);
        assert_eq!(h.shell.selection(), &Selection::Settings);
        h.shell.dispatch(ShellCommand::ToggleSettings);
        assert_eq!(h.shell.selection(), &Selection::Tool("iopaint".to_string()));
    }

    #[test]
    fn save_rebuilds_views_and_prefers_stable_diffusion() {
        let mut h = two_tools();
        h.shell.open_settings();
        set_rows(
            &mut h.shell,
            &[
                ("comfy", "ComfyUI", "127.0.0.1:8188"),
                ("stable_diffusion", "SD", "127.0.0.1:7860"),
            ],
        );

        h.shell.save_settings().expect("save should succeed");

        assert_eq!(
            h.shell.selection(),
            &Selection::Tool("stable_diffusion".to_string())
        );
        let keys: Vec<_> = h.shell.menu().iter().map(|b| b.key.as_str()).collect();
        assert_eq!(keys, vec!["comfy", "stable_diffusion"]);
        assert!(!h.shell.registry().contains("iopaint"));
        assert_eq!(
            h.log.navigations("stable_diffusion").len(),
            1,
            "rebuilt view navigates again"
        );
        assert_eq!(h.shell.editor().state(), EditorState::Hidden);
        assert_eq!(h.shell.config().len(), 2);
    }

    #[test]
    fn save_without_stable_diffusion_selects_first_key() {
        let mut h = two_tools();
        h.shell.open_settings();
        set_rows(
            &mut h.shell,
            &[("b", "B", "127.0.0.1:2"), ("a", "A", "127.0.0.1:1")],
        );

        h.shell.dispatch(ShellCommand::SaveSettings);
        assert_eq!(h.shell.selection(), &Selection::Tool("b".to_string()));
        assert!(h.shell.notices().is_empty());
    }

    #[test]
    fn rejected_save_keeps_editor_open_and_queues_notice() {
        let mut h = two_tools();
        h.shell.open_settings();
        set_rows(&mut h.shell, &[("", "nameless", "127.0.0.1:1")]);

        h.shell.dispatch(ShellCommand::SaveSettings);
        assert_eq!(h.shell.selection(), &Selection::Settings);
        assert_eq!(h.shell.editor().state(), EditorState::Editing);
        assert_eq!(h.shell.notices().len(), 1);
        assert_eq!(h.shell.notices()[0].title, "Invalid settings");
        assert_eq!(h.shell.config().len(), 2, "config untouched");

        h.shell.dispatch(ShellCommand::DismissNotice);
        assert!(h.shell.notices().is_empty());
    }

    #[test]
    fn navigation_failure_is_reported_but_panel_switches() {
        let mut h = harness(&[
            ("sd", "Stable Diffusion", "127.0.0.1:7860"),
            ("broken", "Broken", "bad host name"),
        ]);

        h.shell.dispatch(ShellCommand::SelectTool("broken".to_string()));
        assert_eq!(h.shell.selection(), &Selection::Tool("broken".to_string()));
        assert_eq!(h.shell.notices().len(), 1);
        assert_eq!(h.shell.notices()[0].title, "Cannot open URL");
        assert!(h
            .shell
            .registry()
            .state("sd")
            .is_some_and(|state| state.loaded));
    }

    #[test]
    fn pending_notice_hides_the_selected_page_until_dismissed() {
        let mut h = two_tools();
        assert_eq!(h.log.visible_keys(), vec!["iopaint".to_string()]);

        if let Some(view) = h.shell.registry_mut().view_mut("iopaint") {
            view.address = "bad host name".to_string();
        }
        h.shell.dispatch(ShellCommand::ReloadCurrent);
        assert_eq!(h.shell.notices().len(), 1);
        assert_eq!(h.shell.notices()[0].title, "Cannot open URL");
        assert!(h.log.visible_keys().is_empty());

        h.shell.dispatch(ShellCommand::DismissNotice);
        assert!(h.shell.notices().is_empty());
        assert_eq!(h.log.visible_keys(), vec!["iopaint".to_string()]);
    }

    #[test]
    fn failed_startup_navigation_keeps_page_hidden_behind_notice() {
        let h = harness(&[("broken", "Broken", "bad host name")]);
        assert_eq!(h.shell.selection(), &Selection::Tool("broken".to_string()));
        assert_eq!(h.shell.notices().len(), 1);
        assert!(h.log.visible_keys().is_empty());
    }

    #[test]
    fn reload_current_forces_navigation() {
        let mut h = two_tools();
        h.shell.dispatch(ShellCommand::ReloadCurrent);
        h.shell.dispatch(ShellCommand::ReloadCurrent);
        assert_eq!(h.log.navigations("iopaint").len(), 3);

        h.shell.open_settings();
        h.shell.dispatch(ShellCommand::ReloadCurrent);
        assert_eq!(h.log.navigation_count(), 3, "no reload while in settings");
    }

    #[test]
    fn page_events_toggle_loading_state() {
        let mut h = two_tools();
        h.shell.handle_event(AppEvent::NavigationStarted {
            key: "iopaint".to_string(),
            url: "http://127.0.0.1:8080/".to_string(),
        });
        assert!(h.shell.registry().view("iopaint").is_some_and(|v| v.loading));
        h.shell.handle_event(AppEvent::NavigationFinished {
            key: "iopaint".to_string(),
            url: "http://127.0.0.1:8080/".to_string(),
        });
        assert!(h.shell.registry().view("iopaint").is_some_and(|v| !v.loading));
    }
}
