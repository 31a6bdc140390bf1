use std::fmt::Display;

/// Restricts a bulk message operation to a subset of a folder.
#[derive(Clone, Copy, Debug, Hash, Eq, PartialEq)]
pub enum MessageFilter {
    Seen,
    Unseen,
    Flagged,
}

impl MessageFilter {
    pub(crate) fn sql_condition(self) -> &'static str {
        match self {
            MessageFilter::Seen => "seen = 1",
            MessageFilter::Unseen => "seen = 0",
            MessageFilter::Flagged => "flagged = 1",
        }
    }
}

impl Display for MessageFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            MessageFilter::Seen => "seen",
            MessageFilter::Unseen => "unseen",
            MessageFilter::Flagged => "flagged",
        };
        f.write_str(name)
    }
}
