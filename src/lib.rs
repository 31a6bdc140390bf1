//! Settings screen state for a single mail folder.
//!
//! [`FolderSettingsCoordinator`] loads an account and one of its folders in
//! the background, publishes the outcome as a [`LoadState`] stream and relays
//! the "clear folder" commands of the screen to a [`MessagingController`].
pub mod account;
pub mod config;
pub mod controller;
pub mod coordinator;
pub mod folder;
pub mod logging;
pub mod repository;
pub mod settings;

pub use account::{Account, AccountId, AccountStore};
pub use controller::{LocalMessagingController, MessagingController};
pub use coordinator::{
    Action, CoordinatorError, FolderSettingsCoordinator, FolderSettingsResult, LoadError,
    LoadState, settle,
};
pub use folder::{DisplayFolder, FolderId, FolderType, FolderTypeClassifier};
pub use settings::FolderSettingsDataStore;
