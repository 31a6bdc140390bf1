mod message_filter;
mod sqlite;

use std::{fmt::Debug, sync::Arc};

use thiserror::Error;

use crate::{
    account::Account,
    folder::{FolderDetails, FolderId, FolderSettings},
};

pub use message_filter::MessageFilter;
pub use sqlite::SqliteFolderRepository;
pub use sqlite::SqliteRepositoryProvider;

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),
    #[error("database migration failed: {0}")]
    Migration(#[from] rusqlite_migration::Error),
    #[error("database directory is not usable: {0}")]
    Io(#[from] std::io::Error),
    #[error("folder {0} does not exist")]
    MissingFolder(FolderId),
    #[error("database lock was poisoned")]
    Poisoned,
}

/// Folder storage of a single account.
///
/// All methods block on storage and must not run on the async executor.
pub trait FolderRepository: Debug + Send + Sync {
    /// Returns `None` if no folder with `id` exists.
    fn folder_details(&self, id: FolderId) -> Result<Option<FolderDetails>, RepositoryError>;

    fn update_settings(
        &self,
        id: FolderId,
        settings: FolderSettings,
    ) -> Result<(), RepositoryError>;

    /// Deletes messages of the folder with `server_id`, all of them if `filter` is `None`.
    fn clear_messages(
        &self,
        server_id: &str,
        filter: Option<MessageFilter>,
    ) -> Result<usize, RepositoryError>;
}

pub trait FolderRepositoryProvider: Send + Sync {
    fn repository(&self, account: &Account) -> Result<Arc<dyn FolderRepository>, RepositoryError>;
}
