use std::sync::{Arc, OnceLock};

use log::{debug, error, warn};
use thiserror::Error;
use tokio::{
    sync::{broadcast, watch},
    task::{JoinError, JoinHandle, spawn_blocking},
};

use crate::{
    account::{Account, AccountId, AccountStore},
    controller::MessagingController,
    folder::{DisplayFolder, FolderId, FolderTypeClassifier},
    repository::{FolderRepositoryProvider, RepositoryError},
    settings::FolderSettingsDataStore,
};

const ACTION_CAPACITY: usize = 16;

#[derive(Clone, Debug)]
pub enum FolderSettingsResult {
    NotFound,
    Loaded {
        folder: DisplayFolder,
        editing_handle: Arc<FolderSettingsDataStore>,
    },
}

/// One-shot commands for the presentation layer.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Action {
    RequestClearFolderConfirmation,
}

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("missing account: {0}")]
    MissingAccount(AccountId),
    #[error("loading folder failed: {0}")]
    Repository(#[from] RepositoryError),
    #[error("load worker failed: {0}")]
    Worker(#[from] JoinError),
    #[error("load was cancelled")]
    Cancelled,
}

#[derive(Debug, Error, Eq, PartialEq)]
pub enum CoordinatorError {
    #[error("folder settings have not been loaded")]
    NotLoaded,
}

#[derive(Clone, Debug)]
pub enum LoadState {
    Loading,
    Ready(FolderSettingsResult),
    Failed(Arc<LoadError>),
}

impl LoadState {
    pub fn is_settled(&self) -> bool {
        !matches!(self, LoadState::Loading)
    }
}

/// Waits until the load behind `state` has settled.
pub async fn settle(state: &mut watch::Receiver<LoadState>) -> LoadState {
    match state.wait_for(LoadState::is_settled).await {
        Ok(settled) => (*settled).clone(),
        Err(_) => LoadState::Failed(Arc::new(LoadError::Cancelled)),
    }
}

#[derive(Debug)]
struct Session {
    account: Account,
    server_id: String,
}

pub struct FolderSettingsCoordinator {
    accounts: Arc<dyn AccountStore>,
    repositories: Arc<dyn FolderRepositoryProvider>,
    classifier: Arc<dyn FolderTypeClassifier>,
    messaging: Arc<dyn MessagingController>,
    action_tx: broadcast::Sender<Action>,
    state_rx: Option<watch::Receiver<LoadState>>,
    load: Option<JoinHandle<()>>,
    session: Arc<OnceLock<Session>>,
}

impl FolderSettingsCoordinator {
    pub fn new(
        accounts: Arc<dyn AccountStore>,
        repositories: Arc<dyn FolderRepositoryProvider>,
        classifier: Arc<dyn FolderTypeClassifier>,
        messaging: Arc<dyn MessagingController>,
    ) -> Self {
        let (action_tx, _) = broadcast::channel(ACTION_CAPACITY);
        Self {
            accounts,
            repositories,
            classifier,
            messaging,
            action_tx,
            state_rx: None,
            load: None,
            session: Arc::new(OnceLock::new()),
        }
    }

    /// Returns the folder settings stream, starting the load on the first call.
    ///
    /// Later calls return the same stream and ignore their arguments. Must be
    /// called from within a tokio runtime.
    pub fn get_state(
        &mut self,
        account_id: &AccountId,
        folder_id: FolderId,
    ) -> watch::Receiver<LoadState> {
        if let Some(state_rx) = &self.state_rx {
            return state_rx.clone();
        }

        debug!("loading settings of folder {folder_id} in account {account_id}");
        let (state_tx, state_rx) = watch::channel(LoadState::Loading);
        let loader = Loader {
            accounts: self.accounts.clone(),
            repositories: self.repositories.clone(),
            classifier: self.classifier.clone(),
            session: self.session.clone(),
        };
        let account_id = account_id.clone();
        self.load = Some(tokio::spawn(async move {
            let state = match loader.load(account_id, folder_id).await {
                Ok(result) => LoadState::Ready(result),
                Err(err) => {
                    error!("{err}");
                    LoadState::Failed(Arc::new(err))
                }
            };
            state_tx.send_replace(state);
        }));
        self.state_rx = Some(state_rx.clone());

        state_rx
    }

    pub fn actions(&self) -> broadcast::Receiver<Action> {
        self.action_tx.subscribe()
    }

    pub fn request_clear_folder_confirmation(&self) {
        self.send_action(Action::RequestClearFolderConfirmation);
    }

    /// Forwards clearing the loaded folder to the messaging controller.
    pub fn confirm_clear_folder(&self) -> Result<(), CoordinatorError> {
        let session = self.session.get().ok_or(CoordinatorError::NotLoaded)?;
        self.messaging
            .clear_folder(&session.account, &session.server_id, None);

        Ok(())
    }

    fn send_action(&self, action: Action) {
        if self.action_tx.send(action).is_err() {
            debug!("no observer for {action:?}");
        }
    }
}

impl Drop for FolderSettingsCoordinator {
    fn drop(&mut self) {
        if let Some(load) = self.load.take() {
            load.abort();
        }
    }
}

struct Loader {
    accounts: Arc<dyn AccountStore>,
    repositories: Arc<dyn FolderRepositoryProvider>,
    classifier: Arc<dyn FolderTypeClassifier>,
    session: Arc<OnceLock<Session>>,
}

impl Loader {
    async fn load(
        self,
        account_id: AccountId,
        folder_id: FolderId,
    ) -> Result<FolderSettingsResult, LoadError> {
        let accounts = self.accounts;
        let account = spawn_blocking(move || {
            accounts
                .account(&account_id)
                .ok_or(LoadError::MissingAccount(account_id))
        })
        .await??;

        let repositories = self.repositories;
        let lookup_account = account.clone();
        let (repository, details) = spawn_blocking(move || {
            let repository = repositories.repository(&lookup_account)?;
            let details = repository.folder_details(folder_id)?;
            Ok::<_, RepositoryError>((repository, details))
        })
        .await??;

        let Some(details) = details else {
            warn!("folder with id {folder_id} not found");
            return Ok(FolderSettingsResult::NotFound);
        };

        let metadata = details.folder();
        let folder_type = self.classifier.classify(&account, metadata.server_id());
        let folder = DisplayFolder::new(metadata, folder_type);
        let editing_handle = Arc::new(FolderSettingsDataStore::new(repository, &details));
        let session = Session {
            server_id: metadata.server_id().clone(),
            account,
        };
        if self.session.set(session).is_err() {
            warn!("session of folder {folder_id} was already recorded");
        }
        debug!("loaded folder {} as {folder_type}", folder.server_id());

        Ok(FolderSettingsResult::Loaded {
            folder,
            editing_handle,
        })
    }
}
