use crate::{account::Account, folder::FolderType};

/// Derives the semantic role of a folder from its account and server id.
pub trait FolderTypeClassifier: Send + Sync {
    fn classify(&self, account: &Account, server_id: &str) -> FolderType;
}

impl<F> FolderTypeClassifier for F
where
    F: Fn(&Account, &str) -> FolderType + Send + Sync,
{
    fn classify(&self, account: &Account, server_id: &str) -> FolderType {
        self(account, server_id)
    }
}

/// Matches the server id against the special folders configured on the account.
#[derive(Clone, Copy, Debug, Default)]
pub struct SpecialFolderClassifier;

const SPECIAL_TYPES: [FolderType; 7] = [
    FolderType::Inbox,
    FolderType::Outbox,
    FolderType::Archive,
    FolderType::Drafts,
    FolderType::Sent,
    FolderType::Spam,
    FolderType::Trash,
];

impl FolderTypeClassifier for SpecialFolderClassifier {
    fn classify(&self, account: &Account, server_id: &str) -> FolderType {
        SPECIAL_TYPES
            .into_iter()
            .find(|folder_type| account.special_folders().server_id(*folder_type) == Some(server_id))
            .unwrap_or(FolderType::Regular)
    }
}

#[cfg(test)]
mod tests {
    use rstest::*;

    use super::*;
    use crate::account::{AccountId, SpecialFolders};

    #[fixture]
    fn account() -> Account {
        let special_folders = SpecialFolders::default()
            .with(FolderType::Outbox, "OUTBOX")
            .with(FolderType::Sent, "Sent")
            .with(FolderType::Trash, "Trash")
            .with(FolderType::Drafts, "Drafts")
            .with(FolderType::Archive, "Archive")
            .with(FolderType::Spam, "Junk");
        Account::new(
            AccountId::from("acct-1"),
            "Work".to_string(),
            None,
            special_folders,
        )
    }

    #[rstest]
    #[case("INBOX", FolderType::Inbox)]
    #[case("OUTBOX", FolderType::Outbox)]
    #[case("Sent", FolderType::Sent)]
    #[case("Trash", FolderType::Trash)]
    #[case("Drafts", FolderType::Drafts)]
    #[case("Archive", FolderType::Archive)]
    #[case("Junk", FolderType::Spam)]
    #[case("Projects", FolderType::Regular)]
    #[case("inbox", FolderType::Regular)]
    fn test_special_folder_classifier_matches_configured_roles(
        account: Account,
        #[case] server_id: &str,
        #[case] expected: FolderType,
    ) {
        assert_eq!(expected, SpecialFolderClassifier.classify(&account, server_id));
    }

    #[rstest]
    fn test_closures_classify(account: Account) {
        let classifier = |_: &Account, _: &str| FolderType::Archive;
        assert_eq!(FolderType::Archive, classifier.classify(&account, "INBOX"));
    }
}
