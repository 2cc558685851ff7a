use crate::config::{Config, matches_key};
use crate::models::{Folder, Mailbox, MessageId};
use crate::store::MailboxStore;
use crate::ui::{self, ComposeField, ComposeState, FocusedPanel, UIMode, UIState};
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::Frame;
use tracing::debug;

pub struct App<'a> {
    pub store: MailboxStore,
    pub ui: UIState<'a>,
    config: Config,
}

impl<'a> App<'a> {
    pub fn new(store: MailboxStore, config: Config) -> Self {
        Self {
            store,
            ui: UIState::default(),
            config,
        }
    }

    pub fn draw(&mut self, f: &mut Frame) {
        ui::render(f, &self.store, &mut self.ui);
    }

    /// Applies one key press. Returns `true` when the user asked to quit.
    pub fn handle_key(&mut self, key: KeyEvent) -> bool {
        match self.ui.mode {
            UIMode::Browsing => return self.handle_browsing(key),
            UIMode::Searching => self.handle_searching(key),
            UIMode::Composing => self.handle_composing(key),
        }
        false
    }

    /// Message under the list cursor.
    fn cursor_message(&self) -> Option<MessageId> {
        self.store
            .visible()
            .get(self.ui.selected_message_index)
            .map(|m| m.id)
    }

    fn start_compose(&mut self) {
        self.ui.compose_state = Some(ComposeState::new(&self.store.view().draft));
        self.ui.mode = UIMode::Composing;
    }

    fn finish_compose(&mut self) {
        self.ui.compose_state = None;
        self.ui.mode = UIMode::Browsing;
    }

    fn switch_mailbox(&mut self, mailbox: Mailbox) {
        self.store.select_mailbox(mailbox);
        self.ui.selected_message_index = 0;
    }

    fn move_selected(&mut self, folder: Folder) {
        if let Some(id) = self.store.view().selected {
            if let Err(e) = self.store.move_to(id, folder) {
                debug!("Move ignored: {}", e);
            }
            self.ui.detail_scroll = 0;
        }
    }

    fn handle_browsing(&mut self, key: KeyEvent) -> bool {
        let kb = &self.config.keybindings;

        if matches_key(key, &kb.quit) {
            return true;
        }

        let sidebar_open = self.store.view().sidebar_open;

        // Panel switching
        if matches_key(key, &kb.prev_panel) {
            self.ui.focused_panel = match self.ui.focused_panel {
                FocusedPanel::Details => FocusedPanel::Messages,
                FocusedPanel::Messages if sidebar_open => FocusedPanel::Folders,
                other => other,
            };
        } else if matches_key(key, &kb.next_panel) {
            self.ui.focused_panel = match self.ui.focused_panel {
                FocusedPanel::Folders => FocusedPanel::Messages,
                FocusedPanel::Messages => FocusedPanel::Details,
                FocusedPanel::Details => FocusedPanel::Details,
            };
        }
        // Navigation within panels
        else if matches_key(key, &kb.move_down) {
            match self.ui.focused_panel {
                FocusedPanel::Folders => {
                    let index = self.store.view().mailbox.index();
                    if let Some(&next) = Mailbox::ALL.get(index + 1) {
                        self.switch_mailbox(next);
                    }
                }
                FocusedPanel::Messages => {
                    let len = self.store.visible().len();
                    if self.ui.selected_message_index < len.saturating_sub(1) {
                        self.ui.selected_message_index += 1;
                    }
                }
                FocusedPanel::Details => {
                    self.ui.detail_scroll = self.ui.detail_scroll.saturating_add(1);
                }
            }
        } else if matches_key(key, &kb.move_up) {
            match self.ui.focused_panel {
                FocusedPanel::Folders => {
                    let index = self.store.view().mailbox.index();
                    if index > 0 {
                        self.switch_mailbox(Mailbox::ALL[index - 1]);
                    }
                }
                FocusedPanel::Messages => {
                    self.ui.selected_message_index =
                        self.ui.selected_message_index.saturating_sub(1);
                }
                FocusedPanel::Details => {
                    self.ui.detail_scroll = self.ui.detail_scroll.saturating_sub(1);
                }
            }
        }
        // Email actions
        else if matches_key(key, &kb.open) {
            match self.ui.focused_panel {
                FocusedPanel::Folders => self.ui.focused_panel = FocusedPanel::Messages,
                FocusedPanel::Messages => {
                    if let Some(id) = self.cursor_message() {
                        if let Err(e) = self.store.open(id) {
                            debug!("Open ignored: {}", e);
                        }
                        self.ui.detail_scroll = 0;
                    }
                }
                FocusedPanel::Details => {}
            }
        } else if matches_key(key, &kb.close) {
            self.store.close();
            self.ui.detail_scroll = 0;
        } else if matches_key(key, &kb.toggle_star) {
            // Starring from the list must not open the message
            let target = match self.ui.focused_panel {
                FocusedPanel::Messages => self.cursor_message(),
                FocusedPanel::Details => self.store.view().selected,
                FocusedPanel::Folders => None,
            };
            if let Some(id) = target {
                if let Err(e) = self.store.toggle_star(id) {
                    debug!("Star ignored: {}", e);
                }
            }
        } else if matches_key(key, &kb.archive) {
            self.move_selected(Folder::Archive);
        } else if matches_key(key, &kb.trash) {
            self.move_selected(Folder::Trash);
        } else if matches_key(key, &kb.compose) {
            self.store.open_compose();
            self.start_compose();
        } else if matches_key(key, &kb.reply) {
            if let Some(id) = self.store.view().selected {
                match self.store.reply(id) {
                    Ok(()) => self.start_compose(),
                    Err(e) => debug!("Reply ignored: {}", e),
                }
            }
        } else if matches_key(key, &kb.search) {
            self.ui.mode = UIMode::Searching;
        } else if matches_key(key, &kb.toggle_sidebar) {
            self.store.toggle_sidebar();
            if !self.store.view().sidebar_open && self.ui.focused_panel == FocusedPanel::Folders {
                self.ui.focused_panel = FocusedPanel::Messages;
            }
        }

        false
    }

    fn handle_searching(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Enter => self.ui.mode = UIMode::Browsing,
            KeyCode::Esc => {
                self.ui.search = ui::search_input();
                self.store.set_search_query("");
                self.ui.selected_message_index = 0;
                self.ui.mode = UIMode::Browsing;
            }
            _ => {
                // Re-filter on every keystroke
                if self.ui.search.input(key) {
                    let query = self.ui.search.lines().join("");
                    self.store.set_search_query(query);
                    self.ui.selected_message_index = 0;
                }
            }
        }
    }

    fn handle_composing(&mut self, key: KeyEvent) {
        if key.code == KeyCode::Esc {
            self.store.cancel_compose();
            self.finish_compose();
            return;
        }

        if matches_key(key, &self.config.keybindings.send_message) {
            // Validation failures keep the popup open without a message
            match self.store.send() {
                Ok(id) => {
                    debug!("Compose sent as {}", id);
                    self.finish_compose();
                }
                Err(e) => debug!("Send ignored: {}", e),
            }
            return;
        }

        let Some(cs) = &mut self.ui.compose_state else {
            return;
        };

        match key.code {
            KeyCode::Tab => cs.focused_field = cs.focused_field.next(),
            KeyCode::BackTab => cs.focused_field = cs.focused_field.prev(),
            KeyCode::Enter if cs.focused_field != ComposeField::Body => {
                cs.focused_field = cs.focused_field.next();
            }
            _ => {
                if cs.focused_textarea().input(key) {
                    *self.store.draft_mut() = cs.draft();
                }
            }
        }
    }
}
