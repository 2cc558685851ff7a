use inflections::case::to_title_case;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Number of body characters kept in a preview.
pub const PREVIEW_CHARS: usize = 50;

/// A real location a message lives in. Every message is in exactly one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Folder {
    Inbox,
    Sent,
    Drafts,
    Archive,
    Trash,
}

impl Folder {
    pub fn as_str(self) -> &'static str {
        match self {
            Folder::Inbox => "inbox",
            Folder::Sent => "sent",
            Folder::Drafts => "drafts",
            Folder::Archive => "archive",
            Folder::Trash => "trash",
        }
    }
}

/// An entry of the sidebar: a real folder or the cross-folder starred filter.
///
/// Messages can only ever be moved to a [`Folder`]; `Starred` is a view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mailbox {
    Folder(Folder),
    Starred,
}

impl Mailbox {
    /// Sidebar order.
    pub const ALL: [Mailbox; 6] = [
        Mailbox::Folder(Folder::Inbox),
        Mailbox::Starred,
        Mailbox::Folder(Folder::Sent),
        Mailbox::Folder(Folder::Drafts),
        Mailbox::Folder(Folder::Archive),
        Mailbox::Folder(Folder::Trash),
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Mailbox::Folder(folder) => folder.as_str(),
            Mailbox::Starred => "starred",
        }
    }

    pub fn display_name(self) -> String {
        to_title_case(self.as_str())
    }

    pub fn contains(self, message: &Message) -> bool {
        match self {
            Mailbox::Folder(folder) => message.folder == folder,
            Mailbox::Starred => message.starred,
        }
    }

    /// Position in [`Mailbox::ALL`].
    pub fn index(self) -> usize {
        Mailbox::ALL
            .iter()
            .position(|m| *m == self)
            .unwrap_or_default()
    }
}

impl Default for Mailbox {
    fn default() -> Self {
        Mailbox::Folder(Folder::Inbox)
    }
}

impl From<Folder> for Mailbox {
    fn from(folder: Folder) -> Self {
        Mailbox::Folder(folder)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MessageId(pub u32);

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub id: MessageId,
    pub from: String,
    pub subject: String,
    #[serde(default)]
    pub preview: String,
    pub body: String,
    pub timestamp: String, // display only, e.g. "10:30 AM" or "Yesterday"
    pub read: bool,
    pub starred: bool,
    pub folder: Folder,
}

impl Message {
    pub fn matches_query(&self, needle: &str) -> bool {
        let needle = needle.to_lowercase();
        self.subject.to_lowercase().contains(&needle)
            || self.from.to_lowercase().contains(&needle)
            || self.body.to_lowercase().contains(&needle)
    }
}

/// First [`PREVIEW_CHARS`] characters of `body` followed by an ellipsis.
pub fn make_preview(body: &str) -> String {
    let mut preview: String = body.chars().take(PREVIEW_CHARS).collect();
    preview.push_str("...");
    preview
}
