mod account;
mod folder_settings;

use std::{env, path::PathBuf};

use thiserror::Error;

pub use account::AccountConfig;
pub use folder_settings::Config;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file {path} is not readable: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("config file {path} is not parseable: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("neither XDG_CONFIG_HOME nor HOME is set")]
    NoHome,
}

fn home() -> Result<PathBuf, ConfigError> {
    env::var_os("HOME")
        .map(PathBuf::from)
        .ok_or(ConfigError::NoHome)
}

fn xdg_dir(variable: &str, fallback: &str) -> Result<PathBuf, ConfigError> {
    let mut dir = if let Some(dir) = env::var_os(variable) {
        PathBuf::from(dir)
    } else {
        let mut home = home()?;
        home.push(fallback);
        home
    };
    dir.push(env!("CARGO_PKG_NAME"));

    Ok(dir)
}

fn default_config_file() -> Result<PathBuf, ConfigError> {
    Ok(xdg_dir("XDG_CONFIG_HOME", ".config")?.join("config.toml"))
}

fn default_data_dir() -> Result<PathBuf, ConfigError> {
    xdg_dir("XDG_DATA_HOME", ".local/share")
}
