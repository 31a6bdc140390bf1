use std::sync::Arc;

use log::{debug, error, info, warn};
use tokio::{
    sync::mpsc,
    task::{JoinHandle, spawn_blocking},
};

use crate::{
    account::Account,
    repository::{FolderRepositoryProvider, MessageFilter, RepositoryError},
};

/// Executes mailbox commands on behalf of the UI.
pub trait MessagingController: Send + Sync {
    /// Queues deletion of the messages in `server_id`; `None` clears all of them.
    ///
    /// Returns without waiting for the deletion.
    fn clear_folder(&self, account: &Account, server_id: &str, filter: Option<MessageFilter>);
}

#[derive(Debug)]
pub enum Command {
    ClearFolder {
        account: Account,
        server_id: String,
        filter: Option<MessageFilter>,
    },
    Shutdown(),
}

/// Runs queued commands against the local folder repositories, one at a time.
#[derive(Clone)]
pub struct LocalMessagingController {
    command_tx: mpsc::UnboundedSender<Command>,
}

impl LocalMessagingController {
    /// Spawns the worker on the current tokio runtime.
    pub fn start(repositories: Arc<dyn FolderRepositoryProvider>) -> (Self, JoinHandle<()>) {
        let (command_tx, command_rx) = mpsc::unbounded_channel();
        let worker = tokio::spawn(Self::run(repositories, command_rx));

        (Self { command_tx }, worker)
    }

    /// Lets the worker finish already queued commands and stop.
    pub fn shutdown(&self) {
        if self.command_tx.send(Command::Shutdown()).is_err() {
            debug!("messaging worker already stopped");
        }
    }

    async fn run(
        repositories: Arc<dyn FolderRepositoryProvider>,
        mut command_rx: mpsc::UnboundedReceiver<Command>,
    ) {
        while let Some(command) = command_rx.recv().await {
            match command {
                Command::ClearFolder {
                    account,
                    server_id,
                    filter,
                } => {
                    let repositories = repositories.clone();
                    let result = spawn_blocking(move || {
                        let deleted = repositories
                            .repository(&account)?
                            .clear_messages(&server_id, filter)?;
                        Ok::<_, RepositoryError>((account, server_id, deleted))
                    })
                    .await;
                    match result {
                        Ok(Ok((account, server_id, deleted))) => {
                            info!(
                                "cleared {deleted} messages from {server_id} of account {}",
                                account.id()
                            );
                        }
                        Ok(Err(err)) => warn!("clearing folder failed: {err}"),
                        Err(err) => error!("clearing folder panicked: {err}"),
                    }
                }
                Command::Shutdown() => {
                    debug!("messaging worker shutting down");
                    break;
                }
            }
        }
    }
}

impl MessagingController for LocalMessagingController {
    fn clear_folder(&self, account: &Account, server_id: &str, filter: Option<MessageFilter>) {
        debug!("queueing clear of {server_id} for account {}", account.id());
        let command = Command::ClearFolder {
            account: account.clone(),
            server_id: server_id.to_string(),
            filter,
        };
        if self.command_tx.send(command).is_err() {
            warn!("messaging worker stopped, dropping clear of {server_id}");
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use assertables::*;
    use rstest::*;

    use super::*;
    use crate::{
        account::{AccountId, SpecialFolders},
        folder::{FolderDetails, FolderId, FolderMetadata, FolderSettings},
        repository::{FolderRepository, SqliteFolderRepository},
    };

    struct SingleRepository(Arc<SqliteFolderRepository>);

    impl FolderRepositoryProvider for SingleRepository {
        fn repository(
            &self,
            _account: &Account,
        ) -> Result<Arc<dyn FolderRepository>, RepositoryError> {
            Ok(self.0.clone())
        }
    }

    struct FailingProvider(Mutex<usize>);

    impl FolderRepositoryProvider for FailingProvider {
        fn repository(
            &self,
            _account: &Account,
        ) -> Result<Arc<dyn FolderRepository>, RepositoryError> {
            *self.0.lock().expect("lock should not be poisoned") += 1;
            Err(RepositoryError::Poisoned)
        }
    }

    #[fixture]
    fn account() -> Account {
        Account::new(
            AccountId::from("acct-1"),
            "Work".to_string(),
            None,
            SpecialFolders::default(),
        )
    }

    #[fixture]
    fn repository() -> Arc<SqliteFolderRepository> {
        let repository = Arc::new(assert_ok!(SqliteFolderRepository::open_in_memory()));
        let details = FolderDetails::new(
            FolderMetadata::new(FolderId::new(42), "INBOX".to_string(), "Inbox".to_string()),
            false,
            FolderSettings::default(),
        );
        assert_ok!(repository.insert_folder(&details));
        assert_ok!(repository.insert_message(FolderId::new(42), true, false));
        assert_ok!(repository.insert_message(FolderId::new(42), false, false));
        repository
    }

    #[rstest]
    #[tokio::test]
    async fn test_clear_folder_deletes_all_messages(
        account: Account,
        repository: Arc<SqliteFolderRepository>,
    ) {
        let (controller, worker) =
            LocalMessagingController::start(Arc::new(SingleRepository(repository.clone())));

        controller.clear_folder(&account, "INBOX", None);
        controller.shutdown();
        assert_ok!(worker.await);

        assert_eq!(0, assert_ok!(repository.message_count(FolderId::new(42))));
    }

    #[rstest]
    #[tokio::test]
    async fn test_clear_folder_applies_filter(
        account: Account,
        repository: Arc<SqliteFolderRepository>,
    ) {
        let (controller, worker) =
            LocalMessagingController::start(Arc::new(SingleRepository(repository.clone())));

        controller.clear_folder(&account, "INBOX", Some(MessageFilter::Seen));
        controller.shutdown();
        assert_ok!(worker.await);

        assert_eq!(1, assert_ok!(repository.message_count(FolderId::new(42))));
    }

    #[rstest]
    #[tokio::test]
    async fn test_failing_command_does_not_stop_worker(account: Account) {
        let provider = Arc::new(FailingProvider(Mutex::new(0)));
        let (controller, worker) = LocalMessagingController::start(provider.clone());

        controller.clear_folder(&account, "INBOX", None);
        controller.clear_folder(&account, "Sent", None);
        controller.shutdown();
        assert_ok!(worker.await);

        assert_eq!(2, *assert_ok!(provider.0.lock()));
    }

    #[rstest]
    #[tokio::test]
    async fn test_commands_after_shutdown_are_dropped(
        account: Account,
        repository: Arc<SqliteFolderRepository>,
    ) {
        let (controller, worker) =
            LocalMessagingController::start(Arc::new(SingleRepository(repository.clone())));
        controller.shutdown();
        assert_ok!(worker.await);

        controller.clear_folder(&account, "INBOX", None);

        assert_eq!(2, assert_ok!(repository.message_count(FolderId::new(42))));
    }
}
