use std::{
    str::FromStr,
    sync::{Arc, Mutex, MutexGuard},
};

use log::debug;
use thiserror::Error;

use crate::{
    folder::{FolderClass, FolderDetails, FolderId, FolderSettings, UnknownFolderClass},
    repository::{FolderRepository, RepositoryError},
};

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("unknown setting {0:?}")]
    UnknownKey(String),
    #[error(transparent)]
    InvalidValue(#[from] UnknownFolderClass),
    #[error("storing setting failed: {0}")]
    Repository(#[from] RepositoryError),
    #[error("settings lock was poisoned")]
    Poisoned,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum BoolSetting {
    InTopGroup,
    Integrate,
}

impl BoolSetting {
    pub const IN_TOP_GROUP: &'static str = "folder_settings_in_top_group";
    pub const INTEGRATE: &'static str = "folder_settings_include_in_integrated_inbox";
}

impl FromStr for BoolSetting {
    type Err = SettingsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            Self::IN_TOP_GROUP => Ok(Self::InTopGroup),
            Self::INTEGRATE => Ok(Self::Integrate),
            other => Err(SettingsError::UnknownKey(other.to_string())),
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ClassSetting {
    Display,
    Sync,
    Notify,
    Push,
}

impl ClassSetting {
    pub const DISPLAY: &'static str = "folder_settings_folder_display_mode";
    pub const SYNC: &'static str = "folder_settings_folder_sync_mode";
    pub const NOTIFY: &'static str = "folder_settings_folder_notify_mode";
    pub const PUSH: &'static str = "folder_settings_folder_push_mode";
}

impl FromStr for ClassSetting {
    type Err = SettingsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            Self::DISPLAY => Ok(Self::Display),
            Self::SYNC => Ok(Self::Sync),
            Self::NOTIFY => Ok(Self::Notify),
            Self::PUSH => Ok(Self::Push),
            other => Err(SettingsError::UnknownKey(other.to_string())),
        }
    }
}

/// Editing handle for the settings of one loaded folder.
///
/// Reads are served from the copy loaded together with the folder. Every
/// write updates that copy and is persisted through the folder repository
/// before returning, so callers should not invoke the setters from async
/// code without moving them onto the blocking pool.
#[derive(Debug)]
pub struct FolderSettingsDataStore {
    repository: Arc<dyn FolderRepository>,
    folder_id: FolderId,
    settings: Mutex<FolderSettings>,
}

impl FolderSettingsDataStore {
    pub fn new(repository: Arc<dyn FolderRepository>, details: &FolderDetails) -> Self {
        Self {
            repository,
            folder_id: details.folder().id(),
            settings: Mutex::new(details.settings()),
        }
    }

    pub fn folder_id(&self) -> FolderId {
        self.folder_id
    }

    fn lock(&self) -> Result<MutexGuard<'_, FolderSettings>, SettingsError> {
        self.settings.lock().map_err(|_| SettingsError::Poisoned)
    }

    pub fn settings(&self) -> Result<FolderSettings, SettingsError> {
        Ok(*self.lock()?)
    }

    fn update(&self, change: impl FnOnce(&mut FolderSettings)) -> Result<(), SettingsError> {
        let mut settings = self.lock()?;
        let mut updated = *settings;
        change(&mut updated);
        if updated == *settings {
            return Ok(());
        }
        debug!("storing settings of folder {}", self.folder_id);
        self.repository.update_settings(self.folder_id, updated)?;
        *settings = updated;

        Ok(())
    }

    pub fn bool_setting(&self, setting: BoolSetting) -> Result<bool, SettingsError> {
        let settings = self.lock()?;
        Ok(match setting {
            BoolSetting::InTopGroup => settings.in_top_group(),
            BoolSetting::Integrate => settings.integrate(),
        })
    }

    pub fn set_bool_setting(&self, setting: BoolSetting, value: bool) -> Result<(), SettingsError> {
        self.update(|settings| match setting {
            BoolSetting::InTopGroup => settings.set_in_top_group(value),
            BoolSetting::Integrate => settings.set_integrate(value),
        })
    }

    pub fn class_setting(&self, setting: ClassSetting) -> Result<FolderClass, SettingsError> {
        let settings = self.lock()?;
        Ok(match setting {
            ClassSetting::Display => settings.display_class(),
            ClassSetting::Sync => settings.sync_class(),
            ClassSetting::Notify => settings.notify_class(),
            ClassSetting::Push => settings.push_class(),
        })
    }

    pub fn set_class_setting(
        &self,
        setting: ClassSetting,
        class: FolderClass,
    ) -> Result<(), SettingsError> {
        self.update(|settings| match setting {
            ClassSetting::Display => settings.set_display_class(class),
            ClassSetting::Sync => settings.set_sync_class(class),
            ClassSetting::Notify => settings.set_notify_class(class),
            ClassSetting::Push => settings.set_push_class(class),
        })
    }

    pub fn get_bool(&self, key: &str) -> Result<bool, SettingsError> {
        self.bool_setting(key.parse()?)
    }

    pub fn put_bool(&self, key: &str, value: bool) -> Result<(), SettingsError> {
        self.set_bool_setting(key.parse()?, value)
    }

    pub fn get_string(&self, key: &str) -> Result<String, SettingsError> {
        Ok(self.class_setting(key.parse()?)?.to_string())
    }

    pub fn put_string(&self, key: &str, value: &str) -> Result<(), SettingsError> {
        self.set_class_setting(key.parse()?, value.parse()?)
    }
}

#[cfg(test)]
mod tests {
    use assertables::*;
    use rstest::*;

    use super::*;
    use crate::{
        folder::{FolderMetadata, FolderSettingsBuilder},
        repository::SqliteFolderRepository,
    };

    struct TestStore {
        repository: Arc<SqliteFolderRepository>,
        store: FolderSettingsDataStore,
    }

    #[fixture]
    fn details() -> FolderDetails {
        let settings = assert_ok!(
            FolderSettingsBuilder::default()
                .in_top_group(true)
                .notify_class(FolderClass::FirstClass)
                .build()
        );
        FolderDetails::new(
            FolderMetadata::new(FolderId::new(3), "Lists".to_string(), "Lists".to_string()),
            false,
            settings,
        )
    }

    #[fixture]
    fn store(details: FolderDetails) -> TestStore {
        let repository = Arc::new(assert_ok!(SqliteFolderRepository::open_in_memory()));
        assert_ok!(repository.insert_folder(&details));
        TestStore {
            store: FolderSettingsDataStore::new(repository.clone(), &details),
            repository,
        }
    }

    fn stored_settings(store: &TestStore) -> FolderSettings {
        assert_some!(assert_ok!(store.repository.folder_details(FolderId::new(3)))).settings()
    }

    #[rstest]
    fn test_get_bool_reads_loaded_settings(store: TestStore) {
        assert!(assert_ok!(store.store.get_bool(BoolSetting::IN_TOP_GROUP)));
        assert!(!assert_ok!(store.store.get_bool(BoolSetting::INTEGRATE)));
    }

    #[rstest]
    fn test_get_string_reads_loaded_settings(store: TestStore) {
        assert_eq!(
            "FIRST_CLASS",
            assert_ok!(store.store.get_string(ClassSetting::NOTIFY))
        );
        assert_eq!(
            "SECOND_CLASS",
            assert_ok!(store.store.get_string(ClassSetting::PUSH))
        );
    }

    #[rstest]
    fn test_put_bool_persists(store: TestStore) {
        assert_ok!(store.store.put_bool(BoolSetting::INTEGRATE, true));
        assert!(assert_ok!(store.store.get_bool(BoolSetting::INTEGRATE)));
        assert!(stored_settings(&store).integrate());
    }

    #[rstest]
    fn test_put_string_persists(store: TestStore) {
        assert_ok!(store.store.put_string(ClassSetting::SYNC, "NO_CLASS"));
        assert_eq!(
            FolderClass::NoClass,
            assert_ok!(store.store.class_setting(ClassSetting::Sync))
        );
        assert_eq!(FolderClass::NoClass, stored_settings(&store).sync_class());
    }

    #[rstest]
    fn test_unknown_key_is_rejected(store: TestStore) {
        let err = assert_err!(store.store.put_bool("folder_settings_unknown", true));
        assert!(matches!(err, SettingsError::UnknownKey(key) if key == "folder_settings_unknown"));
        assert_err!(store.store.get_string(BoolSetting::IN_TOP_GROUP));
    }

    #[rstest]
    fn test_invalid_class_is_rejected_and_not_stored(store: TestStore) {
        let err = assert_err!(store.store.put_string(ClassSetting::DISPLAY, "TOP"));
        assert!(matches!(err, SettingsError::InvalidValue(_)));
        assert_eq!(FolderClass::NoClass, stored_settings(&store).display_class());
    }

    #[rstest]
    fn test_write_to_vanished_folder_keeps_copy_unchanged(details: FolderDetails) {
        let repository = Arc::new(assert_ok!(SqliteFolderRepository::open_in_memory()));
        let store = FolderSettingsDataStore::new(repository, &details);

        let err = assert_err!(store.set_bool_setting(BoolSetting::Integrate, true));
        assert!(matches!(
            err,
            SettingsError::Repository(RepositoryError::MissingFolder(_))
        ));
        assert!(!assert_ok!(store.bool_setting(BoolSetting::Integrate)));
    }
}
