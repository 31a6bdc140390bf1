use serde::Deserialize;

use crate::account::{Account, AccountId, SpecialFolders};

#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
pub struct AccountConfig {
    name: String,
    email: Option<String>,
    #[serde(default)]
    special_folders: SpecialFolders,
}

impl AccountConfig {
    pub fn to_account(&self, id: &str) -> Account {
        Account::new(
            AccountId::new(id),
            self.name.clone(),
            self.email.clone(),
            self.special_folders.clone(),
        )
    }
}

#[cfg(test)]
mod tests {
    use assertables::*;
    use rstest::*;

    use super::*;
    use crate::folder::FolderType;

    #[rstest]
    fn test_account_config_defaults_special_folders() {
        let config: AccountConfig = assert_ok!(toml::from_str(r#"name = "Work""#));
        let account = config.to_account("acct-1");
        assert_eq!(&AccountId::from("acct-1"), account.id());
        assert_eq!("Work", account.name());
        assert_none!(account.email());
        assert_eq!(&SpecialFolders::default(), account.special_folders());
    }

    #[rstest]
    fn test_account_config_reads_special_folders() {
        let config: AccountConfig = assert_ok!(toml::from_str(
            r#"
            name = "Home"
            email = "me@example.org"

            [special_folders]
            inbox = "Posteingang"
            trash = "Papierkorb"
            "#
        ));
        let account = config.to_account("home");
        assert_eq!(Some("me@example.org"), account.email());
        let special_folders = account.special_folders();
        assert_eq!(
            Some("Posteingang"),
            special_folders.server_id(FolderType::Inbox)
        );
        assert_eq!(
            Some("Papierkorb"),
            special_folders.server_id(FolderType::Trash)
        );
        assert_none!(special_folders.server_id(FolderType::Sent));
    }
}
