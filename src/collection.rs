use crate::models::{Folder, Mailbox, Message, MessageId};
use indexmap::IndexMap;

/// Badge shown next to a sidebar entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FolderCount {
    pub mailbox: Mailbox,
    pub count: usize,
}

/// All known messages, newest first.
///
/// Order is insertion order; sent messages are prepended.
#[derive(Debug, Clone, Default)]
pub struct EmailCollection {
    messages: IndexMap<MessageId, Message>,
}

impl EmailCollection {
    pub fn new(messages: Vec<Message>) -> Self {
        Self {
            messages: messages.into_iter().map(|m| (m.id, m)).collect(),
        }
    }

    pub fn get(&self, id: MessageId) -> Option<&Message> {
        self.messages.get(&id)
    }

    pub fn get_mut(&mut self, id: MessageId) -> Option<&mut Message> {
        self.messages.get_mut(&id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Message> {
        self.messages.values()
    }

    pub fn next_id(&self) -> MessageId {
        let max = self.messages.keys().map(|id| id.0).max().unwrap_or(0);
        MessageId(max + 1)
    }

    pub fn prepend(&mut self, message: Message) {
        self.messages.shift_insert(0, message.id, message);
    }

    /// Badge count for a single sidebar entry.
    pub fn count_for(&self, mailbox: Mailbox) -> usize {
        match mailbox {
            Mailbox::Folder(Folder::Inbox) => self
                .iter()
                .filter(|m| m.folder == Folder::Inbox && !m.read)
                .count(),
            Mailbox::Starred => self.iter().filter(|m| m.starred).count(),
            Mailbox::Folder(folder @ (Folder::Archive | Folder::Trash)) => {
                self.iter().filter(|m| m.folder == folder).count()
            }
            Mailbox::Folder(Folder::Sent | Folder::Drafts) => 0,
        }
    }

    /// Badge counts for every sidebar entry, in sidebar order.
    pub fn folder_counts(&self) -> Vec<FolderCount> {
        Mailbox::ALL
            .iter()
            .map(|&mailbox| FolderCount {
                mailbox,
                count: self.count_for(mailbox),
            })
            .collect()
    }

    /// Messages in `mailbox` matching `query`, in collection order.
    pub fn filter(&self, mailbox: Mailbox, query: &str) -> Vec<&Message> {
        self.iter()
            .filter(|m| mailbox.contains(m) && m.matches_query(query))
            .collect()
    }
}
