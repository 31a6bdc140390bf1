use std::{
    collections::HashMap,
    fs::read_to_string,
    path::{Path, PathBuf},
};

use log::{debug, trace};
use serde::Deserialize;

use crate::{
    account::{Account, AccountId, AccountStore},
    config::{AccountConfig, ConfigError, default_config_file, default_data_dir},
};

#[derive(Debug, Deserialize)]
struct ConfigFile {
    data_dir: Option<PathBuf>,
    #[serde(default)]
    accounts: HashMap<String, AccountConfig>,
}

#[derive(Debug)]
pub struct Config {
    data_dir: PathBuf,
    accounts: HashMap<String, AccountConfig>,
}

impl Config {
    pub fn load_from_file(file: Option<&Path>) -> Result<Self, ConfigError> {
        let path = match file {
            Some(file) => file.to_path_buf(),
            None => default_config_file()?,
        };
        debug!("loading config from {}", path.display());
        let contents = read_to_string(&path).map_err(|source| ConfigError::Io {
            path: path.clone(),
            source,
        })?;

        let file: ConfigFile =
            toml::from_str(&contents).map_err(|source| ConfigError::Parse { path, source })?;

        Self::from_file(file)
    }

    fn from_file(file: ConfigFile) -> Result<Self, ConfigError> {
        let data_dir = match file.data_dir {
            Some(data_dir) => data_dir,
            None => default_data_dir()?,
        };

        Ok(Self {
            data_dir,
            accounts: file.accounts,
        })
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }
}

impl AccountStore for Config {
    fn account(&self, id: &AccountId) -> Option<Account> {
        trace!("looking up account {id}");
        self.accounts
            .get(id.as_str())
            .map(|config| config.to_account(id.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use assertables::*;
    use rstest::*;
    use tempfile::{TempDir, tempdir};

    use super::*;

    const CONFIG: &str = r#"
        data_dir = "/var/lib/folder-settings"

        [accounts.acct-1]
        name = "Work"

        [accounts.acct-1.special_folders]
        sent = "Sent Items"

        [accounts.acct-2]
        name = "Home"
    "#;

    #[fixture]
    fn temp_dir() -> TempDir {
        assert_ok!(tempdir())
    }

    #[fixture]
    fn config() -> Config {
        assert_ok!(Config::from_file(assert_ok!(toml::from_str(CONFIG))))
    }

    #[rstest]
    fn test_config_reads_data_dir(config: Config) {
        assert_eq!(Path::new("/var/lib/folder-settings"), config.data_dir());
    }

    #[rstest]
    fn test_config_resolves_known_account(config: Config) {
        let account = assert_some!(config.account(&AccountId::from("acct-1")));
        assert_eq!("Work", account.name());
        assert_eq!(&AccountId::from("acct-1"), account.id());
    }

    #[rstest]
    fn test_config_does_not_resolve_unknown_account(config: Config) {
        assert_none!(config.account(&AccountId::from("missing")));
    }

    #[rstest]
    fn test_load_from_file_reads_given_file(temp_dir: TempDir) {
        let file = temp_dir.path().join("config.toml");
        assert_ok!(fs::write(&file, CONFIG));
        let config = assert_ok!(Config::load_from_file(Some(&file)));
        assert_some!(config.account(&AccountId::from("acct-2")));
    }

    #[rstest]
    fn test_load_from_file_reports_missing_file(temp_dir: TempDir) {
        let file = temp_dir.path().join("absent.toml");
        let err = assert_err!(Config::load_from_file(Some(&file)));
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[rstest]
    fn test_load_from_file_reports_broken_toml(temp_dir: TempDir) {
        let file = temp_dir.path().join("config.toml");
        assert_ok!(fs::write(&file, "accounts = 3"));
        let err = assert_err!(Config::load_from_file(Some(&file)));
        assert!(matches!(err, ConfigError::Parse { .. }));
    }
}
