mod app;
mod config;
mod event;
mod registry;
mod settings;
mod shell;
mod surface;
mod theme;

use app::ShellApp;
use clap::Parser;
use config::store::default_config_path;
use config::ConfigStore;
use eframe::egui;
use shell::ShellController;
use std::path::PathBuf;
use std::sync::mpsc;

/// Desktop shell for locally hosted AI tool web interfaces.
#[derive(Debug, Parser)]
#[command(name = "ai-tools-ide", version, about)]
struct Args {
    /// Configuration file (default: config.json next to the executable)
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let store = ConfigStore::new(args.config.unwrap_or_else(default_config_path));
    let config = store.load();
    let (tx, rx) = mpsc::channel();

    #[cfg(all(target_os = "linux", feature = "embedded-webview"))]
    surface::webview::init_platform()?;

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("AIToolsIDE")
            .with_inner_size([1200.0, 800.0])
            .with_min_inner_size([800.0, 500.0]),
        ..Default::default()
    };

    eframe::run_native(
        "AIToolsIDE",
        native_options,
        Box::new(move |creation_context| {
            let factory = surface::factory_for(creation_context, tx)?;
            let shell = ShellController::new(store, config, factory);
            Ok(Box::new(ShellApp::new(rx, shell)))
        }),
    )?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::Args;
    use clap::{CommandFactory, Parser};
    use std::path::PathBuf;

    #[test]
    fn cli_definition_is_consistent() {
        Args::command().debug_assert();
    }

    #[test]
    fn config_flag_overrides_default_path() {
        let args = Args::try_parse_from(["ai-tools-ide", "--config", "/tmp/tools.json"])
            .expect("flag should parse");
        assert_eq!(args.config, Some(PathBuf::from("/tmp/tools.json")));

        let args = Args::try_parse_from(["ai-tools-ide"]).expect("no flags should parse");
        assert!(args.config.is_none());
    }
}
