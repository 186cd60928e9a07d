use crate::config::Configuration;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

pub const CONFIG_FILE_NAME: &str = "config.json";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to access {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("{} configures no tools", path.display())]
    NoTools { path: PathBuf },
    #[error("failed to serialize configuration: {0}")]
    Serialize(#[source] serde_json::Error),
}

impl ConfigError {
    fn io(path: &Path, source: io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Io { source, .. } if source.kind() == io::ErrorKind::NotFound)
    }
}

/// `config.json` beside the running executable, or in the working directory
/// when the executable location cannot be resolved.
pub fn default_config_path() -> PathBuf {
    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(Path::to_path_buf))
        .unwrap_or_else(|| PathBuf::from("."))
        .join(CONFIG_FILE_NAME)
}

#[derive(Debug, Clone)]
pub struct ConfigStore {
    path: PathBuf,
}

impl ConfigStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[cfg(test)]
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn try_load(&self) -> Result<Configuration, ConfigError> {
        let data = fs::read(&self.path).map_err(|err| ConfigError::io(&self.path, err))?;
        let config: Configuration =
            serde_json::from_slice(&data).map_err(|source| ConfigError::Parse {
                path: self.path.clone(),
                source,
            })?;
        if config.is_empty() {
            return Err(ConfigError::NoTools {
                path: self.path.clone(),
            });
        }
        Ok(config)
    }

    /// Never fails: any read or parse problem yields the built-in default.
    pub fn load(&self) -> Configuration {
        match self.try_load() {
            Ok(config) => {
                log::info!(
                    "loaded {} tool(s) from {}",
                    config.len(),
                    self.path.display()
                );
                config
            }
            Err(err) if err.is_not_found() => {
                log::info!("no config at {}, using defaults", self.path.display());
                Configuration::default()
            }
            Err(err) => {
                log::warn!("{err}; using defaults");
                Configuration::default()
            }
        }
    }

    pub fn save(&self, config: &Configuration) -> Result<(), ConfigError> {
        if let Some(dir) = self.path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
            fs::create_dir_all(dir).map_err(|err| ConfigError::io(dir, err))?;
        }

        let bytes = serde_json::to_vec_pretty(config).map_err(ConfigError::Serialize)?;
        let tmp_path = self.path.with_extension("json.tmp");
        fs::write(&tmp_path, bytes).map_err(|err| ConfigError::io(&tmp_path, err))?;

        if let Err(rename_err) = fs::rename(&tmp_path, &self.path) {
            if !self.path.exists() {
                return Err(ConfigError::io(&self.path, rename_err));
            }
            fs::remove_file(&self.path).map_err(|err| ConfigError::io(&self.path, err))?;
            fs::rename(&tmp_path, &self.path).map_err(|err| ConfigError::io(&self.path, err))?;
        }

        log::info!("saved {} tool(s) to {}", config.len(), self.path.display());
        Ok(())
    }
}
