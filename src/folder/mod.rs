mod classifier;
mod folder_class;

use std::fmt::Display;

use derive_builder::Builder;
use derive_getters::Getters;

pub use classifier::FolderTypeClassifier;
pub use classifier::SpecialFolderClassifier;
pub use folder_class::FolderClass;
pub use folder_class::UnknownFolderClass;

/// Local numeric key of a folder, unique within its account.
#[derive(Clone, Copy, Debug, Hash, Eq, PartialEq, PartialOrd, Ord)]
#[repr(transparent)]
pub struct FolderId(i64);

impl FolderId {
    pub fn new(id: i64) -> Self {
        Self(id)
    }
}

impl Display for FolderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

impl From<i64> for FolderId {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

impl From<FolderId> for i64 {
    fn from(value: FolderId) -> Self {
        value.0
    }
}

#[derive(Clone, Copy, Debug, Hash, Eq, PartialEq)]
pub enum FolderType {
    Regular,
    Inbox,
    Outbox,
    Sent,
    Trash,
    Drafts,
    Archive,
    Spam,
}

impl Display for FolderType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            FolderType::Regular => "regular",
            FolderType::Inbox => "inbox",
            FolderType::Outbox => "outbox",
            FolderType::Sent => "sent",
            FolderType::Trash => "trash",
            FolderType::Drafts => "drafts",
            FolderType::Archive => "archive",
            FolderType::Spam => "spam",
        };
        f.write_str(name)
    }
}

/// A folder row as stored locally.
#[derive(Clone, Debug, Getters, Eq, PartialEq)]
pub struct FolderMetadata {
    #[getter(skip)]
    id: FolderId,
    server_id: String,
    name: String,
}

impl FolderMetadata {
    pub fn new(id: FolderId, server_id: String, name: String) -> Self {
        Self {
            id,
            server_id,
            name,
        }
    }

    pub fn id(&self) -> FolderId {
        self.id
    }
}

/// The folder as presented on the settings screen.
#[derive(Clone, Debug, Getters, Eq, PartialEq)]
pub struct DisplayFolder {
    #[getter(skip)]
    id: FolderId,
    server_id: String,
    name: String,
    #[getter(skip)]
    folder_type: FolderType,
}

impl DisplayFolder {
    pub fn new(metadata: &FolderMetadata, folder_type: FolderType) -> Self {
        Self {
            id: metadata.id,
            server_id: metadata.server_id.clone(),
            name: metadata.name.clone(),
            folder_type,
        }
    }

    pub fn id(&self) -> FolderId {
        self.id
    }

    pub fn folder_type(&self) -> FolderType {
        self.folder_type
    }
}

/// User editable per-folder settings.
#[derive(Builder, Clone, Copy, Debug, Eq, PartialEq)]
#[builder(default)]
pub struct FolderSettings {
    in_top_group: bool,
    integrate: bool,
    display_class: FolderClass,
    sync_class: FolderClass,
    notify_class: FolderClass,
    push_class: FolderClass,
}

impl Default for FolderSettings {
    fn default() -> Self {
        Self {
            in_top_group: false,
            integrate: false,
            display_class: FolderClass::NoClass,
            sync_class: FolderClass::Inherited,
            notify_class: FolderClass::Inherited,
            push_class: FolderClass::SecondClass,
        }
    }
}

impl FolderSettings {
    pub fn in_top_group(&self) -> bool {
        self.in_top_group
    }

    pub fn integrate(&self) -> bool {
        self.integrate
    }

    pub fn display_class(&self) -> FolderClass {
        self.display_class
    }

    pub fn sync_class(&self) -> FolderClass {
        self.sync_class
    }

    pub fn notify_class(&self) -> FolderClass {
        self.notify_class
    }

    pub fn push_class(&self) -> FolderClass {
        self.push_class
    }

    pub fn set_in_top_group(&mut self, in_top_group: bool) {
        self.in_top_group = in_top_group;
    }

    pub fn set_integrate(&mut self, integrate: bool) {
        self.integrate = integrate;
    }

    pub fn set_display_class(&mut self, class: FolderClass) {
        self.display_class = class;
    }

    pub fn set_sync_class(&mut self, class: FolderClass) {
        self.sync_class = class;
    }

    pub fn set_notify_class(&mut self, class: FolderClass) {
        self.notify_class = class;
    }

    pub fn set_push_class(&mut self, class: FolderClass) {
        self.push_class = class;
    }
}

#[derive(Clone, Debug, Getters, Eq, PartialEq)]
pub struct FolderDetails {
    folder: FolderMetadata,
    #[getter(skip)]
    local_only: bool,
    #[getter(skip)]
    settings: FolderSettings,
}

impl FolderDetails {
    pub fn new(folder: FolderMetadata, local_only: bool, settings: FolderSettings) -> Self {
        Self {
            folder,
            local_only,
            settings,
        }
    }

    pub fn local_only(&self) -> bool {
        self.local_only
    }

    pub fn settings(&self) -> FolderSettings {
        self.settings
    }
}
