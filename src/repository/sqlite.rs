use std::{
    collections::HashMap,
    fs::create_dir_all,
    path::{Path, PathBuf},
    sync::{Arc, LazyLock, Mutex, MutexGuard},
};

use include_dir::{Dir, include_dir};
use log::{debug, trace};
use rusqlite::{Connection, OptionalExtension, Row, types::Type};
use rusqlite_migration::Migrations;

use crate::{
    account::{Account, AccountId},
    folder::{
        FolderClass, FolderDetails, FolderId, FolderMetadata, FolderSettings,
        FolderSettingsBuilder,
    },
    repository::{FolderRepository, FolderRepositoryProvider, MessageFilter, RepositoryError},
};

static MIGRATIONS_DIR: Dir = include_dir!("$CARGO_MANIFEST_DIR/migrations");

static MIGRATIONS: LazyLock<Migrations<'static>> = LazyLock::new(|| {
    Migrations::from_directory(&MIGRATIONS_DIR).expect("embedded migrations should be well formed")
});

#[derive(Debug)]
pub struct SqliteFolderRepository {
    db: Mutex<Connection>,
}

impl SqliteFolderRepository {
    pub fn open(db_file: &Path) -> Result<Self, RepositoryError> {
        if let Some(parent) = db_file.parent() {
            create_dir_all(parent)?;
        }
        debug!("opening folder database {}", db_file.display());
        Self::migrate(Connection::open(db_file)?)
    }

    pub fn open_in_memory() -> Result<Self, RepositoryError> {
        Self::migrate(Connection::open_in_memory()?)
    }

    fn migrate(mut db: Connection) -> Result<Self, RepositoryError> {
        db.pragma_update(None, "foreign_keys", true)?;
        MIGRATIONS.to_latest(&mut db)?;

        Ok(Self { db: Mutex::new(db) })
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>, RepositoryError> {
        self.db.lock().map_err(|_| RepositoryError::Poisoned)
    }

    #[cfg(test)]
    pub(crate) fn insert_folder(&self, details: &FolderDetails) -> Result<(), RepositoryError> {
        let folder = details.folder();
        let settings = details.settings();
        self.lock()?.execute(
            "insert into folders (id,server_id,name,local_only,top_group,integrate,display_class,sync_class,notify_class,push_class)
             values (?1,?2,?3,?4,?5,?6,?7,?8,?9,?10)",
            (
                i64::from(folder.id()),
                folder.server_id(),
                folder.name(),
                details.local_only(),
                settings.in_top_group(),
                settings.integrate(),
                settings.display_class().as_str(),
                settings.sync_class().as_str(),
                settings.notify_class().as_str(),
                settings.push_class().as_str(),
            ),
        )?;
        Ok(())
    }

    #[cfg(test)]
    pub(crate) fn insert_message(
        &self,
        folder_id: FolderId,
        seen: bool,
        flagged: bool,
    ) -> Result<(), RepositoryError> {
        self.lock()?.execute(
            "insert into messages (folder_id,seen,flagged) values (?1,?2,?3)",
            (i64::from(folder_id), seen, flagged),
        )?;
        Ok(())
    }

    #[cfg(test)]
    pub(crate) fn message_count(&self, folder_id: FolderId) -> Result<usize, RepositoryError> {
        let count: i64 = self.lock()?.query_row(
            "select count(*) from messages where folder_id = ?1",
            [i64::from(folder_id)],
            |row| row.get(0),
        )?;
        Ok(usize::try_from(count).expect("message count should not be negative"))
    }
}

fn folder_class(row: &Row, index: usize) -> rusqlite::Result<FolderClass> {
    let value: String = row.get(index)?;
    value
        .parse()
        .map_err(|err| rusqlite::Error::FromSqlConversionFailure(index, Type::Text, Box::new(err)))
}

impl TryFrom<&Row<'_>> for FolderDetails {
    type Error = rusqlite::Error;

    fn try_from(row: &Row) -> Result<Self, Self::Error> {
        let id: i64 = row.get(0)?;
        let folder = FolderMetadata::new(id.into(), row.get(1)?, row.get(2)?);
        let settings = FolderSettingsBuilder::default()
            .in_top_group(row.get(4)?)
            .integrate(row.get(5)?)
            .display_class(folder_class(row, 6)?)
            .sync_class(folder_class(row, 7)?)
            .notify_class(folder_class(row, 8)?)
            .push_class(folder_class(row, 9)?)
            .build()
            .map_err(|err| {
                rusqlite::Error::FromSqlConversionFailure(4, Type::Integer, Box::new(err))
            })?;

        Ok(FolderDetails::new(folder, row.get(3)?, settings))
    }
}

impl FolderRepository for SqliteFolderRepository {
    fn folder_details(&self, id: FolderId) -> Result<Option<FolderDetails>, RepositoryError> {
        trace!("selecting details of folder {id}");
        let db = self.lock()?;
        let mut stmt = db.prepare_cached(
            "select id,server_id,name,local_only,top_group,integrate,display_class,sync_class,notify_class,push_class
             from folders where id = ?1",
        )?;
        let details = stmt
            .query_row([i64::from(id)], |row| FolderDetails::try_from(row))
            .optional()?;

        Ok(details)
    }

    fn update_settings(
        &self,
        id: FolderId,
        settings: FolderSettings,
    ) -> Result<(), RepositoryError> {
        trace!("updating settings of folder {id} to {settings:?}");
        let db = self.lock()?;
        let mut stmt = db.prepare_cached(
            "update folders set top_group=?2,integrate=?3,display_class=?4,sync_class=?5,notify_class=?6,push_class=?7
             where id=?1",
        )?;
        let updated = stmt.execute((
            i64::from(id),
            settings.in_top_group(),
            settings.integrate(),
            settings.display_class().as_str(),
            settings.sync_class().as_str(),
            settings.notify_class().as_str(),
            settings.push_class().as_str(),
        ))?;

        if updated == 0 {
            Err(RepositoryError::MissingFolder(id))
        } else {
            Ok(())
        }
    }

    fn clear_messages(
        &self,
        server_id: &str,
        filter: Option<MessageFilter>,
    ) -> Result<usize, RepositoryError> {
        trace!("deleting messages of {server_id} matching {filter:?}");
        let mut sql = String::from(
            "delete from messages where folder_id = (select id from folders where server_id = ?1)",
        );
        if let Some(filter) = filter {
            sql.push_str(" and ");
            sql.push_str(filter.sql_condition());
        }
        let db = self.lock()?;
        let deleted = db.prepare_cached(&sql)?.execute([server_id])?;

        Ok(deleted)
    }
}

/// Opens one database per account below `data_dir` and keeps it open.
pub struct SqliteRepositoryProvider {
    data_dir: PathBuf,
    repositories: Mutex<HashMap<AccountId, Arc<SqliteFolderRepository>>>,
}

impl SqliteRepositoryProvider {
    pub fn new(data_dir: &Path) -> Self {
        Self {
            data_dir: data_dir.to_path_buf(),
            repositories: Mutex::new(HashMap::new()),
        }
    }

    pub fn db_file(&self, account: &AccountId) -> PathBuf {
        self.data_dir.join(format!("{account}.db"))
    }
}

impl FolderRepositoryProvider for SqliteRepositoryProvider {
    fn repository(&self, account: &Account) -> Result<Arc<dyn FolderRepository>, RepositoryError> {
        let mut repositories = self
            .repositories
            .lock()
            .map_err(|_| RepositoryError::Poisoned)?;
        if let Some(repository) = repositories.get(account.id()) {
            return Ok(repository.clone());
        }

        let repository = Arc::new(SqliteFolderRepository::open(&self.db_file(account.id()))?);
        repositories.insert(account.id().clone(), repository.clone());

        Ok(repository)
    }
}
