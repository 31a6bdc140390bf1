use std::fmt::Display;

use derive_getters::Getters;
use serde::Deserialize;

use crate::folder::FolderType;

#[derive(Clone, Debug, Hash, Eq, PartialEq, PartialOrd, Ord)]
#[repr(transparent)]
pub struct AccountId(String);

impl AccountId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for AccountId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

impl From<&str> for AccountId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for AccountId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Server identifiers of the folders an account assigns a special role to.
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
pub struct SpecialFolders {
    #[serde(default = "default_inbox")]
    inbox: String,
    outbox: Option<String>,
    sent: Option<String>,
    trash: Option<String>,
    drafts: Option<String>,
    archive: Option<String>,
    spam: Option<String>,
}

fn default_inbox() -> String {
    "INBOX".to_string()
}

impl Default for SpecialFolders {
    fn default() -> Self {
        Self {
            inbox: default_inbox(),
            outbox: None,
            sent: None,
            trash: None,
            drafts: None,
            archive: None,
            spam: None,
        }
    }
}

impl SpecialFolders {
    pub fn server_id(&self, folder_type: FolderType) -> Option<&str> {
        match folder_type {
            FolderType::Inbox => Some(&self.inbox),
            FolderType::Outbox => self.outbox.as_deref(),
            FolderType::Sent => self.sent.as_deref(),
            FolderType::Trash => self.trash.as_deref(),
            FolderType::Drafts => self.drafts.as_deref(),
            FolderType::Archive => self.archive.as_deref(),
            FolderType::Spam => self.spam.as_deref(),
            FolderType::Regular => None,
        }
    }

    #[must_use]
    pub fn with(mut self, folder_type: FolderType, server_id: &str) -> Self {
        let server_id = server_id.to_string();
        match folder_type {
            FolderType::Inbox => self.inbox = server_id,
            FolderType::Outbox => self.outbox = Some(server_id),
            FolderType::Sent => self.sent = Some(server_id),
            FolderType::Trash => self.trash = Some(server_id),
            FolderType::Drafts => self.drafts = Some(server_id),
            FolderType::Archive => self.archive = Some(server_id),
            FolderType::Spam => self.spam = Some(server_id),
            FolderType::Regular => {}
        }
        self
    }
}

/// A resolved mail account.
#[derive(Clone, Debug, Getters, PartialEq, Eq)]
pub struct Account {
    id: AccountId,
    name: String,
    #[getter(skip)]
    email: Option<String>,
    special_folders: SpecialFolders,
}

impl Account {
    pub fn new(
        id: AccountId,
        name: String,
        email: Option<String>,
        special_folders: SpecialFolders,
    ) -> Self {
        Self {
            id,
            name,
            email,
            special_folders,
        }
    }

    pub fn email(&self) -> Option<&str> {
        self.email.as_deref()
    }
}

/// Lookup of persisted account configuration.
///
/// Implementations may block; callers run them off the async executor.
pub trait AccountStore: Send + Sync {
    fn account(&self, id: &AccountId) -> Option<Account>;
}
