use crate::config::{ConfigError, ConfigStore, Configuration, ToolEntry, WebviewTheme};
use crate::theme::Theme;
use eframe::egui::{self, RichText, ScrollArea};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EditorState {
    #[default]
    Hidden,
    Editing,
    Saved,
    Cancelled,
}

#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("no tools are configured; fill in key, name and URL for at least one row")]
    NoTools,
    #[error("failed to save settings: {0}")]
    Save(#[from] ConfigError),
    #[error("the settings editor is not open")]
    NotEditing,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SettingsRow {
    pub id: u64,
    pub key: String,
    pub name: String,
    pub url: String,
}

impl SettingsRow {
    /// `None` unless key, name and url are all non-blank.
    fn to_entry(&self) -> Option<ToolEntry> {
        let key = self.key.trim();
        let name = self.name.trim();
        let url = self.url.trim();
        if key.is_empty() || name.is_empty() || url.is_empty() {
            return None;
        }
        Some(ToolEntry::new(key, name, url))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingsAction {
    Save,
    Cancel,
}

#[derive(Debug, Default)]
pub struct SettingsEditor {
    state: EditorState,
    rows: Vec<SettingsRow>,
    theme: WebviewTheme,
    next_row_id: u64,
}

impl SettingsEditor {
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    pub fn state(&self) -> EditorState {
        self.state
    }

    pub fn is_editing(&self) -> bool {
        self.state == EditorState::Editing
    }

    #[cfg(test)]
    pub fn rows(&self) -> &[SettingsRow] {
        &self.rows
    }

    #[cfg(test)]
    pub fn rows_mut(&mut self) -> &mut [SettingsRow] {
        &mut self.rows
    }

    #[cfg(test)]
    pub fn theme(&self) -> WebviewTheme {
        self.theme
    }

    #[cfg(test)]
    pub fn set_theme(&mut self, theme: WebviewTheme) {
        self.theme = theme;
    }

    pub fn begin(&mut self, config: &Configuration) {
        self.rows.clear();
        self.theme = config.theme;
        for entry in config.entries() {
            self.push_row(&entry.key, &entry.name, &entry.url);
        }
        self.state = EditorState::Editing;
    }

    pub fn add_row(&mut self) -> u64 {
        self.push_row("", "", "")
    }

    pub fn remove_row(&mut self, id: u64) -> bool {
        let before = self.rows.len();
        self.rows.retain(|row| row.id != id);
        self.rows.len() != before
    }

    /// Rows with any blank field are dropped; a repeated key keeps the last
    /// row's values.
    pub fn build_configuration(&self) -> Result<Configuration, SettingsError> {
        let mut config = Configuration::empty(self.theme);
        for entry in self.rows.iter().filter_map(SettingsRow::to_entry) {
            config.insert(entry);
        }
        if config.is_empty() {
            return Err(SettingsError::NoTools);
        }
        Ok(config)
    }

    pub fn save(&mut self, store: &ConfigStore) -> Result<Configuration, SettingsError> {
        if !self.is_editing() {
            return Err(SettingsError::NotEditing);
        }
        let config = self.build_configuration()?;
        store.save(&config)?;
        self.state = EditorState::Saved;
        Ok(config)
    }

    pub fn cancel(&mut self) {
        self.rows.clear();
        self.state = EditorState::Cancelled;
    }

    /// Returns to `Hidden` once the shell has reacted to a save or cancel.
    pub fn close(&mut self) {
        self.rows.clear();
        self.state = EditorState::Hidden;
    }

    fn push_row(&mut self, key: &str, name: &str, url: &str) -> u64 {
        let id = self.next_row_id;
        self.next_row_id += 1;
        self.rows.push(SettingsRow {
            id,
            key: key.to_string(),
            name: name.to_string(),
            url: url.to_string(),
        });
        id
    }

    pub fn render(&mut self, ui: &mut egui::Ui, theme: &Theme) -> Option<SettingsAction> {
        let mut action = None;

        egui::TopBottomPanel::bottom("settings_actions")
            .show_separator_line(true)
            .show_inside(ui, |ui| {
                ui.add_space(theme.spacing_4);
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if ui.button("Cancel").clicked() {
                        action = Some(SettingsAction::Cancel);
                    }
                    if ui
                        .button(RichText::new("Save").color(theme.accent_primary))
                        .clicked()
                    {
                        action = Some(SettingsAction::Save);
                    }
                });
            });

        egui::CentralPanel::default().show_inside(ui, |ui| {
            ui.heading("Settings");
            ui.add_space(theme.spacing_8);

            ui.horizontal(|ui| {
                ui.label("Theme:");
                ui.radio_value(&mut self.theme, WebviewTheme::Light, "Light");
                ui.radio_value(&mut self.theme, WebviewTheme::Dark, "Dark");
            });
            ui.add_space(theme.spacing_8);

            let mut removed = None;
            ScrollArea::vertical()
                .id_salt("settings_rows")
                .auto_shrink([false, true])
                .show(ui, |ui| {
                    for row in &mut self.rows {
                        theme.card_frame().show(ui, |ui| {
                            ui.horizontal(|ui| {
                                ui.label("Key:");
                                ui.add(
                                    egui::TextEdit::singleline(&mut row.key)
                                        .id_salt(("key", row.id))
                                        .desired_width(120.0),
                                );
                                ui.label("Name:");
                                ui.add(
                                    egui::TextEdit::singleline(&mut row.name)
                                        .id_salt(("name", row.id))
                                        .desired_width(160.0),
                                );
                                ui.label("URL:");
                                ui.add(
                                    egui::TextEdit::singleline(&mut row.url)
                                        .id_salt(("url", row.id))
                                        .desired_width((ui.available_width() - 90.0).max(120.0)),
                                );
                                if ui.button("Remove").clicked() {
                                    removed = Some(row.id);
                                }
                            });
                        });
                        ui.add_space(theme.spacing_4);
                    }
                });

            if let Some(id) = removed {
                self.remove_row(id);
            }

            ui.add_space(theme.spacing_8);
            if ui.button("Add").clicked() {
                self.add_row();
            }
            ui.label(
                RichText::new("Rows with an empty key, name or URL are not saved.")
                    .color(theme.text_muted)
                    .small(),
            );
        });

        action
    }
}
