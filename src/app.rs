use crate::config::WebviewTheme;
use crate::event::AppEvent;
use crate::settings::SettingsAction;
use crate::shell::{Selection, ShellCommand, ShellController};
use crate::theme::Theme;
use eframe::egui::{self, RichText};
use std::sync::mpsc::{Receiver, TryRecvError};

pub struct ShellApp {
    rx: Receiver<AppEvent>,
    shell: ShellController,
    theme: Theme,
    applied_theme: Option<WebviewTheme>,
}

impl ShellApp {
    pub fn new(rx: Receiver<AppEvent>, shell: ShellController) -> Self {
        let theme = Theme::for_mode(shell.config().theme);
        Self {
            rx,
            shell,
            theme,
            applied_theme: None,
        }
    }

    fn drain_events(&mut self) {
        loop {
            match self.rx.try_recv() {
                Ok(event) => self.shell.handle_event(event),
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    log::debug!("surface event channel disconnected");
                    break;
                }
            }
        }
    }

    fn sync_theme(&mut self, ctx: &egui::Context) {
        let mode = self.shell.config().theme;
        if self.applied_theme == Some(mode) {
            return;
        }
        self.theme = Theme::for_mode(mode);
        self.theme.apply_visuals(ctx);
        self.applied_theme = Some(mode);
        log::info!("applied {} theme", mode.as_str());
    }

    fn render_left_panel(&mut self, ctx: &egui::Context) -> Option<ShellCommand> {
        let mut command = None;
        let in_settings = self.shell.selection() == &Selection::Settings;
        let button_size = egui::vec2(self.theme.menu_width - 20.0, self.theme.button_height);

        egui::SidePanel::left("tool_menu")
            .resizable(true)
            .default_width(self.theme.menu_width)
            .min_width(self.theme.menu_width)
            .frame(self.theme.menu_frame())
            .show(ctx, |ui| {
                for button in self.shell.menu() {
                    let selected = matches!(
                        self.shell.selection(),
                        Selection::Tool(key) if *key == button.key
                    );
                    let tool_button = egui::Button::new(button.label.as_str()).selected(selected);
                    let response = ui
                        .add_sized(button_size, tool_button)
                        .on_hover_text(button.key.as_str());
                    if response.clicked() {
                        command = Some(ShellCommand::SelectTool(button.key.clone()));
                    }
                }

                ui.with_layout(egui::Layout::bottom_up(egui::Align::Center), |ui| {
                    let settings = egui::Button::new("Settings").selected(in_settings);
                    if ui.add_sized(button_size, settings).clicked() {
                        command = Some(ShellCommand::ToggleSettings);
                    }
                });
            });

        command
    }

    fn render_center_panel(&mut self, ctx: &egui::Context) -> Option<ShellCommand> {
        let mut command = None;
        let theme = &self.theme;
        let shell = &mut self.shell;

        egui::CentralPanel::default().show(ctx, |ui| match shell.selection().clone() {
            Selection::Settings => {
                command = match shell.editor_mut().render(ui, theme) {
                    Some(SettingsAction::Save) => Some(ShellCommand::SaveSettings),
                    Some(SettingsAction::Cancel) => Some(ShellCommand::CancelSettings),
                    None => None,
                };
            }
            Selection::Tool(key) => {
                let Some(view) = shell.registry_mut().view_mut(&key) else {
                    return;
                };

                let mut reload = false;
                ui.horizontal(|ui| {
                    ui.strong(view.entry.name.as_str());
                    ui.separator();
                    if ui.button("Reload").clicked() {
                        reload = true;
                    }
                    if view.loading {
                        ui.spinner();
                    }
                    let response = ui.add(
                        egui::TextEdit::singleline(&mut view.address)
                            .id_salt(("address", key.as_str()))
                            .desired_width(f32::INFINITY),
                    );
                    if response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter)) {
                        reload = true;
                    }
                });
                ui.separator();

                view.surface_mut().set_bounds(ui.available_rect_before_wrap());
                view.surface_mut().render(ui);

                if reload {
                    command = Some(ShellCommand::ReloadCurrent);
                }
            }
            Selection::None => {
                ui.centered_and_justified(|ui| {
                    ui.label(RichText::new("No tools configured").color(theme.text_muted));
                });
            }
        });

        command
    }

    fn render_notice(&mut self, ctx: &egui::Context) -> Option<ShellCommand> {
        let notice = self.shell.notices().front()?.clone();
        let mut command = None;

        egui::Window::new(RichText::new(notice.title.as_str()).color(self.theme.danger))
            .id(egui::Id::new("notice_window"))
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, egui::Vec2::ZERO)
            .show(ctx, |ui| {
                ui.label(notice.message.as_str());
                ui.add_space(self.theme.spacing_8);
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if ui.button("OK").clicked() {
                        command = Some(ShellCommand::DismissNotice);
                    }
                });
            });

        command
    }
}

impl eframe::App for ShellApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        #[cfg(all(target_os = "linux", feature = "embedded-webview"))]
        crate::surface::webview::pump_platform_events(ctx);

        self.drain_events();
        self.sync_theme(ctx);

        let commands = [
            self.render_notice(ctx),
            self.render_left_panel(ctx),
            self.render_center_panel(ctx),
        ];
        for command in commands.into_iter().flatten() {
            self.shell.dispatch(command);
        }
    }
}
