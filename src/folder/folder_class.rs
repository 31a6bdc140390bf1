use std::{fmt::Display, str::FromStr};

use thiserror::Error;

/// Priority class used for display, sync, notification and push decisions.
#[derive(Clone, Copy, Debug, Hash, Eq, PartialEq)]
pub enum FolderClass {
    NoClass,
    FirstClass,
    SecondClass,
    Inherited,
}

#[derive(Debug, Error, Eq, PartialEq)]
#[error("unknown folder class {0:?}")]
pub struct UnknownFolderClass(pub String);

impl FolderClass {
    pub fn as_str(self) -> &'static str {
        match self {
            FolderClass::NoClass => "NO_CLASS",
            FolderClass::FirstClass => "FIRST_CLASS",
            FolderClass::SecondClass => "SECOND_CLASS",
            FolderClass::Inherited => "INHERITED",
        }
    }
}

impl Display for FolderClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FolderClass {
    type Err = UnknownFolderClass;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "NO_CLASS" => Ok(FolderClass::NoClass),
            "FIRST_CLASS" => Ok(FolderClass::FirstClass),
            "SECOND_CLASS" => Ok(FolderClass::SecondClass),
            "INHERITED" => Ok(FolderClass::Inherited),
            other => Err(UnknownFolderClass(other.to_string())),
        }
    }
}
