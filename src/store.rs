use crate::collection::{EmailCollection, FolderCount};
use crate::models::{Folder, Mailbox, Message, MessageId, make_preview};
use crate::view::{ComposeDraft, ViewState};
use thiserror::Error;
use tracing::debug;

pub const SENT_TIMESTAMP: &str = "Just now";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum MailboxError {
    #[error("no message with id {0}")]
    UnknownMessage(MessageId),
    #[error("draft has no recipient")]
    MissingRecipient,
    #[error("draft has no subject")]
    MissingSubject,
}

/// Owns every message plus the current view, and applies user actions to both.
pub struct MailboxStore {
    emails: EmailCollection,
    view: ViewState,
    identity: String,
}

impl MailboxStore {
    /// `identity` is the sender address stamped on sent messages.
    pub fn new(messages: Vec<Message>, identity: impl Into<String>) -> Self {
        Self {
            emails: EmailCollection::new(messages),
            view: ViewState::default(),
            identity: identity.into(),
        }
    }

    pub fn emails(&self) -> &EmailCollection {
        &self.emails
    }

    pub fn view(&self) -> &ViewState {
        &self.view
    }

    pub fn folder_counts(&self) -> Vec<FolderCount> {
        self.emails.folder_counts()
    }

    /// Messages visible under the current mailbox and search query.
    pub fn visible(&self) -> Vec<&Message> {
        self.emails.filter(self.view.mailbox, &self.view.search_query)
    }

    pub fn selected(&self) -> Option<&Message> {
        self.view.selected.and_then(|id| self.emails.get(id))
    }

    pub fn select_mailbox(&mut self, mailbox: Mailbox) {
        debug!("Switching to {}", mailbox.as_str());
        self.view.mailbox = mailbox;
    }

    pub fn set_search_query(&mut self, query: impl Into<String>) {
        self.view.search_query = query.into();
    }

    pub fn toggle_sidebar(&mut self) {
        self.view.sidebar_open = !self.view.sidebar_open;
    }

    /// Selects a message and marks it read. Read never reverts here.
    pub fn open(&mut self, id: MessageId) -> Result<(), MailboxError> {
        let message = self
            .emails
            .get_mut(id)
            .ok_or(MailboxError::UnknownMessage(id))?;
        message.read = true;
        self.view.selected = Some(id);
        debug!("Opened message {}", id);
        Ok(())
    }

    pub fn close(&mut self) {
        self.view.selected = None;
    }

    /// Flips the starred flag and returns the new value. Selection is untouched.
    pub fn toggle_star(&mut self, id: MessageId) -> Result<bool, MailboxError> {
        let message = self
            .emails
            .get_mut(id)
            .ok_or(MailboxError::UnknownMessage(id))?;
        message.starred = !message.starred;
        debug!("Message {} starred={}", id, message.starred);
        Ok(message.starred)
    }

    pub fn move_to(&mut self, id: MessageId, folder: Folder) -> Result<(), MailboxError> {
        let message = self
            .emails
            .get_mut(id)
            .ok_or(MailboxError::UnknownMessage(id))?;
        message.folder = folder;
        if self.view.selected == Some(id) {
            self.view.selected = None;
        }
        debug!("Moved message {} to {}", id, folder.as_str());
        Ok(())
    }

    pub fn open_compose(&mut self) {
        self.view.compose_open = true;
    }

    /// Opens compose addressed back to the sender of `id`.
    pub fn reply(&mut self, id: MessageId) -> Result<(), MailboxError> {
        let message = self
            .emails
            .get(id)
            .ok_or(MailboxError::UnknownMessage(id))?;
        let subject = if message.subject.to_lowercase().starts_with("re:") {
            message.subject.clone()
        } else {
            format!("Re: {}", message.subject)
        };
        self.view.draft = ComposeDraft {
            to: message.from.clone(),
            subject,
            body: String::new(),
        };
        self.view.compose_open = true;
        Ok(())
    }

    pub fn draft_mut(&mut self) -> &mut ComposeDraft {
        &mut self.view.draft
    }

    /// Sends the draft into the sent folder. On a validation error nothing changes.
    pub fn send(&mut self) -> Result<MessageId, MailboxError> {
        let draft = &self.view.draft;
        if draft.to.is_empty() {
            return Err(MailboxError::MissingRecipient);
        }
        if draft.subject.is_empty() {
            return Err(MailboxError::MissingSubject);
        }

        let draft = std::mem::take(&mut self.view.draft);
        let id = self.emails.next_id();
        self.emails.prepend(Message {
            id,
            from: self.identity.clone(),
            subject: draft.subject,
            preview: make_preview(&draft.body),
            body: draft.body,
            timestamp: SENT_TIMESTAMP.to_string(),
            read: true,
            starred: false,
            folder: Folder::Sent,
        });
        self.view.compose_open = false;
        debug!("Sent message {} to {}", id, draft.to);
        Ok(id)
    }

    pub fn cancel_compose(&mut self) {
        self.view.draft = ComposeDraft::default();
        self.view.compose_open = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seed;

    const IDENTITY: &str = "me@example.com";

    fn store() -> MailboxStore {
        MailboxStore::new(seed::messages().unwrap(), IDENTITY)
    }

    fn compose(store: &mut MailboxStore, to: &str, subject: &str, body: &str) {
        store.open_compose();
        let draft = store.draft_mut();
        draft.to = to.to_string();
        draft.subject = subject.to_string();
        draft.body = body.to_string();
    }

    #[test]
    fn test_open_marks_read_and_selects() {
        let mut store = store();
        store.open(MessageId(1)).unwrap();
        assert_eq!(store.view().selected, Some(MessageId(1)));
        assert!(store.selected().unwrap().read);

        // Already read stays read.
        store.open(MessageId(2)).unwrap();
        assert!(store.emails().get(MessageId(2)).unwrap().read);
    }

    #[test]
    fn test_close_keeps_read_state() {
        let mut store = store();
        store.open(MessageId(1)).unwrap();
        store.close();
        assert_eq!(store.view().selected, None);
        assert!(store.emails().get(MessageId(1)).unwrap().read);
    }

    #[test]
    fn test_open_unknown_message_changes_nothing() {
        let mut store = store();
        assert_eq!(
            store.open(MessageId(99)),
            Err(MailboxError::UnknownMessage(MessageId(99)))
        );
        assert_eq!(store.view().selected, None);
    }

    #[test]
    fn test_opening_unread_inbox_message_clears_badge() {
        let mut store = store();
        assert_eq!(store.emails().count_for(Mailbox::default()), 1);
        store.open(MessageId(1)).unwrap();
        assert_eq!(store.emails().count_for(Mailbox::default()), 0);
    }

    #[test]
    fn test_toggle_star_only_flips_starred() {
        let mut store = store();
        store.open(MessageId(2)).unwrap();
        let before = store.emails().get(MessageId(1)).unwrap().clone();

        assert!(store.toggle_star(MessageId(1)).unwrap());

        let after = store.emails().get(MessageId(1)).unwrap();
        assert!(after.starred);
        assert_eq!(
            Message {
                starred: before.starred,
                ..after.clone()
            },
            before
        );
        assert_eq!(store.view().selected, Some(MessageId(2)));

        assert!(!store.toggle_star(MessageId(1)).unwrap());
        assert_eq!(store.emails().get(MessageId(1)).unwrap(), &before);
    }

    #[test]
    fn test_move_selected_to_trash_clears_selection() {
        let mut store = store();
        store.open(MessageId(3)).unwrap();
        store.move_to(MessageId(3), Folder::Trash).unwrap();

        assert_eq!(store.view().selected, None);
        assert_eq!(store.emails().get(MessageId(3)).unwrap().folder, Folder::Trash);

        let inbox: Vec<MessageId> = store.visible().iter().map(|m| m.id).collect();
        assert!(!inbox.contains(&MessageId(3)));

        store.select_mailbox(Folder::Trash.into());
        let trash: Vec<MessageId> = store.visible().iter().map(|m| m.id).collect();
        assert_eq!(trash, vec![MessageId(3)]);
        assert_eq!(store.emails().count_for(Folder::Trash.into()), 1);
    }

    #[test]
    fn test_move_other_message_keeps_selection() {
        let mut store = store();
        store.open(MessageId(1)).unwrap();
        store.move_to(MessageId(2), Folder::Archive).unwrap();
        assert_eq!(store.view().selected, Some(MessageId(1)));
    }

    #[test]
    fn test_starred_survives_archive() {
        let mut store = store();
        store.move_to(MessageId(2), Folder::Archive).unwrap();
        store.select_mailbox(Mailbox::Starred);
        let starred: Vec<MessageId> = store.visible().iter().map(|m| m.id).collect();
        assert_eq!(starred, vec![MessageId(2)]);
    }

    #[test]
    fn test_send_without_recipient_is_rejected() {
        let mut store = store();
        compose(&mut store, "", "Hi", "Hello");
        assert_eq!(store.send(), Err(MailboxError::MissingRecipient));
        assert_eq!(store.emails().iter().count(), 3);
        assert!(store.view().compose_open);
        assert_eq!(store.view().draft.subject, "Hi");
    }

    #[test]
    fn test_send_without_subject_is_rejected() {
        let mut store = store();
        compose(&mut store, "a@b.com", "", "Hello");
        assert_eq!(store.send(), Err(MailboxError::MissingSubject));
        assert_eq!(store.emails().iter().count(), 3);
        assert!(store.view().compose_open);
    }

    #[test]
    fn test_send_valid_draft() {
        let mut store = store();
        compose(&mut store, "a@b.com", "Hi", "Hello world");
        let id = store.send().unwrap();

        assert_eq!(id, MessageId(4));
        assert_eq!(store.emails().iter().count(), 4);
        let sent = store.emails().iter().next().unwrap();
        assert_eq!(sent.id, id);
        assert_eq!(sent.folder, Folder::Sent);
        assert_eq!(sent.from, IDENTITY);
        assert_eq!(sent.timestamp, SENT_TIMESTAMP);
        assert!(sent.read);
        assert!(!sent.starred);
        assert!(sent.preview.starts_with("Hello world"));

        assert_eq!(store.view().draft, ComposeDraft::default());
        assert!(!store.view().compose_open);

        store.select_mailbox(Folder::Sent.into());
        assert_eq!(store.visible().len(), 1);
        assert_eq!(store.emails().count_for(Folder::Sent.into()), 0);
    }

    #[test]
    fn test_sent_ids_keep_increasing() {
        let mut store = store();
        compose(&mut store, "a@b.com", "One", "");
        let first = store.send().unwrap();
        compose(&mut store, "a@b.com", "Two", "");
        let second = store.send().unwrap();
        assert!(second > first);
    }

    #[test]
    fn test_cancel_discards_draft_without_validation() {
        let mut store = store();
        compose(&mut store, "", "half written", "");
        store.cancel_compose();
        assert_eq!(store.view().draft, ComposeDraft::default());
        assert!(!store.view().compose_open);
        assert_eq!(store.emails().iter().count(), 3);
    }

    #[test]
    fn test_reply_prefills_draft() {
        let mut store = store();
        store.reply(MessageId(3)).unwrap();
        assert!(store.view().compose_open);
        assert_eq!(store.view().draft.to, "notifications@github.com");
        assert_eq!(store.view().draft.subject, "Re: Pull Request Merged");

        compose(&mut store, "a@b.com", "re: thread", "");
        store.send().unwrap();
        let sent_id = store.emails().iter().next().unwrap().id;
        store.reply(sent_id).unwrap();
        assert_eq!(store.view().draft.subject, "re: thread");
    }

    #[test]
    fn test_search_and_mailbox_switch_keep_selection() {
        let mut store = store();
        store.open(MessageId(1)).unwrap();
        store.set_search_query("GitHub");
        assert_eq!(store.visible().len(), 1);
        store.select_mailbox(Folder::Archive.into());
        assert!(store.visible().is_empty());
        assert_eq!(store.view().selected, Some(MessageId(1)));
    }

    #[test]
    fn test_toggle_sidebar() {
        let mut store = store();
        assert!(store.view().sidebar_open);
        store.toggle_sidebar();
        assert!(!store.view().sidebar_open);
    }
}
