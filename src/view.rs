use crate::models::{Mailbox, MessageId};

/// Unsent compose input. Not related to the drafts folder.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ComposeDraft {
    pub to: String,
    pub subject: String,
    pub body: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewState {
    pub mailbox: Mailbox,
    pub selected: Option<MessageId>,
    pub search_query: String,
    pub draft: ComposeDraft,
    pub compose_open: bool,
    pub sidebar_open: bool,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            mailbox: Mailbox::default(),
            selected: None,
            search_query: String::new(),
            draft: ComposeDraft::default(),
            compose_open: false,
            sidebar_open: true,
        }
    }
}
