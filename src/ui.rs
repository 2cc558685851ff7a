use crate::models::{Mailbox, Message};
use crate::store::MailboxStore;
use crate::view::ComposeDraft;
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap},
};
use tui_textarea::TextArea;

#[derive(Debug, PartialEq, Eq, Clone, Copy, Default)]
pub enum FocusedPanel {
    Folders,
    #[default]
    Messages,
    Details,
}

#[derive(Debug, PartialEq, Eq, Clone, Copy, Default)]
pub enum UIMode {
    #[default]
    Browsing,
    Searching,
    Composing,
}

#[derive(Debug, PartialEq, Eq, Clone, Copy, Default)]
pub enum ComposeField {
    #[default]
    To,
    Subject,
    Body,
}

impl ComposeField {
    pub fn next(self) -> Self {
        match self {
            ComposeField::To => ComposeField::Subject,
            ComposeField::Subject => ComposeField::Body,
            ComposeField::Body => ComposeField::To,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            ComposeField::To => ComposeField::Body,
            ComposeField::Subject => ComposeField::To,
            ComposeField::Body => ComposeField::Subject,
        }
    }
}

pub struct ComposeState<'a> {
    pub to: TextArea<'a>,
    pub subject: TextArea<'a>,
    pub body: TextArea<'a>,
    pub focused_field: ComposeField,
}

impl<'a> ComposeState<'a> {
    pub fn new(draft: &ComposeDraft) -> Self {
        let mut to = text_input(&draft.to, "recipient@example.com");
        let subject = text_input(&draft.subject, "Email subject");
        let body = text_input(&draft.body, "Write your message...");

        // Replies already know who they go to
        let focused_field = if draft.to.is_empty() {
            ComposeField::To
        } else {
            to.move_cursor(tui_textarea::CursorMove::End);
            ComposeField::Body
        };

        Self {
            to,
            subject,
            body,
            focused_field,
        }
    }

    /// The draft as currently typed.
    pub fn draft(&self) -> ComposeDraft {
        ComposeDraft {
            to: self.to.lines().join("\n"),
            subject: self.subject.lines().join("\n"),
            body: self.body.lines().join("\n"),
        }
    }

    pub fn focused_textarea(&mut self) -> &mut TextArea<'a> {
        match self.focused_field {
            ComposeField::To => &mut self.to,
            ComposeField::Subject => &mut self.subject,
            ComposeField::Body => &mut self.body,
        }
    }
}

pub fn text_input<'a>(text: &str, placeholder: &str) -> TextArea<'a> {
    let mut textarea = TextArea::from(text.lines());
    textarea.set_cursor_line_style(Style::default());
    textarea.set_placeholder_text(placeholder.to_string());
    textarea
}

pub fn search_input<'a>() -> TextArea<'a> {
    text_input("", "Search emails...")
}

pub struct UIState<'a> {
    pub focused_panel: FocusedPanel,
    pub mode: UIMode,
    pub selected_message_index: usize,
    pub messages_list_state: ListState,
    pub detail_scroll: u16,
    pub search: TextArea<'a>,
    pub compose_state: Option<ComposeState<'a>>,
}

impl<'a> Default for UIState<'a> {
    fn default() -> Self {
        Self {
            focused_panel: FocusedPanel::default(),
            mode: UIMode::default(),
            selected_message_index: 0,
            messages_list_state: ListState::default(),
            detail_scroll: 0,
            search: search_input(),
            compose_state: None,
        }
    }
}

fn border_style(focused: bool) -> Style {
    if focused {
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::Gray)
    }
}

fn field_style(focused: bool) -> Style {
    if focused {
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::Gray)
    }
}

pub fn render(f: &mut Frame, store: &MailboxStore, state: &mut UIState<'_>) {
    let view = store.view();

    let columns = if view.sidebar_open {
        Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(24), Constraint::Min(0)])
            .split(f.area())
    } else {
        Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(0), Constraint::Min(0)])
            .split(f.area())
    };

    if view.sidebar_open {
        render_sidebar(f, store, state, columns[0]);
    }

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(0)])
        .split(columns[1]);

    render_search(f, state, rows[0]);

    let panes = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
        .split(rows[1]);

    render_message_list(f, store, state, panes[0]);
    render_details(f, store, state, panes[1]);

    if view.compose_open {
        if let Some(cs) = &mut state.compose_state {
            render_compose(f, cs);
        }
    }
}

fn render_sidebar(f: &mut Frame, store: &MailboxStore, state: &UIState<'_>, area: Rect) {
    let current = store.view().mailbox;
    let inner_width = area.width.saturating_sub(2) as usize;

    let items: Vec<ListItem> = store
        .folder_counts()
        .into_iter()
        .map(|fc| {
            let style = if fc.mailbox == current {
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };
            let name = format!(" {}", fc.mailbox.display_name());
            // Zero counts get no badge
            let badge = if fc.count > 0 {
                format!("{} ", fc.count)
            } else {
                String::new()
            };
            let gap = inner_width.saturating_sub(name.chars().count() + badge.chars().count());
            ListItem::new(format!("{}{}{}", name, " ".repeat(gap), badge)).style(style)
        })
        .collect();

    let block = Block::default()
        .borders(Borders::ALL)
        .title(" MailBox ")
        .title_bottom(" c: Compose ")
        .border_style(border_style(state.focused_panel == FocusedPanel::Folders));

    f.render_widget(List::new(items).block(block), area);
}

fn render_search(f: &mut Frame, state: &mut UIState<'_>, area: Rect) {
    let searching = state.mode == UIMode::Searching;
    let title = if searching {
        " Search [Enter to Apply, Esc to Clear] "
    } else {
        " Search [/] "
    };
    state.search.set_block(
        Block::default()
            .borders(Borders::ALL)
            .title(title)
            .border_style(field_style(searching)),
    );
    f.render_widget(&state.search, area);
}

fn star(message: &Message) -> &'static str {
    if message.starred { "★" } else { "☆" }
}

fn render_message_list(f: &mut Frame, store: &MailboxStore, state: &mut UIState<'_>, area: Rect) {
    let visible = store.visible();
    let view = store.view();
    let title = format!(
        " {} - {} emails ",
        view.mailbox.display_name(),
        visible.len()
    );
    let block = Block::default()
        .borders(Borders::ALL)
        .title(title)
        .border_style(border_style(state.focused_panel == FocusedPanel::Messages));

    if visible.is_empty() {
        let empty = Paragraph::new("No emails found")
            .block(block)
            .style(Style::default().fg(Color::DarkGray))
            .wrap(Wrap { trim: true });
        f.render_widget(empty, area);
        return;
    }

    if state.selected_message_index >= visible.len() {
        state.selected_message_index = visible.len() - 1;
    }

    let inner_len = area.width.saturating_sub(4) as usize;
    let fit = |s: String| {
        if s.chars().count() > inner_len {
            let truncated: String = s.chars().take(inner_len.saturating_sub(3)).collect();
            format!("{}...", truncated)
        } else {
            s
        }
    };

    let items: Vec<ListItem> = visible
        .iter()
        .enumerate()
        .map(|(i, m)| {
            let is_cursor = i == state.selected_message_index;
            let is_open = view.selected == Some(m.id);
            let indicator = if is_cursor { "█" } else { " " };

            let mut style = Style::default();
            if is_open {
                style = style.bg(Color::DarkGray);
            }
            if is_cursor {
                style = style.fg(Color::Yellow);
            }
            let header_style = if m.read {
                style
            } else {
                style.add_modifier(Modifier::BOLD)
            };

            let header = fit(format!("{} {}  {}", star(m), m.from, m.timestamp));
            ListItem::new(vec![
                Line::from(vec![Span::raw(indicator), Span::styled(header, header_style)]),
                Line::from(vec![
                    Span::raw(indicator),
                    Span::styled(fit(format!("  {}", m.subject)), header_style),
                ]),
                Line::from(vec![
                    Span::raw(indicator),
                    Span::styled(
                        fit(format!("  {}", m.preview)),
                        style.fg(if is_cursor { Color::Yellow } else { Color::Gray }),
                    ),
                ]),
            ])
        })
        .collect();

    state
        .messages_list_state
        .select(Some(state.selected_message_index));
    f.render_stateful_widget(List::new(items).block(block), area, &mut state.messages_list_state);
}

fn render_details(f: &mut Frame, store: &MailboxStore, state: &UIState<'_>, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Message ")
        .border_style(border_style(state.focused_panel == FocusedPanel::Details));

    let Some(message) = store.selected() else {
        let placeholder = Paragraph::new("Select an email to read")
            .block(block)
            .style(Style::default().fg(Color::DarkGray));
        f.render_widget(placeholder, area);
        return;
    };

    let mut lines = vec![
        Line::styled(
            message.subject.clone(),
            Style::default().add_modifier(Modifier::BOLD),
        ),
        Line::raw(""),
        Line::raw(format!("From: {}", message.from)),
        Line::raw(format!("Time: {}", message.timestamp)),
        Line::raw(format!(
            "In:   {}{}",
            Mailbox::from(message.folder).display_name(),
            if message.starred { "  ★ Starred" } else { "" }
        )),
        Line::raw(""),
    ];
    lines.extend(message.body.lines().map(|l| Line::raw(l.to_string())));
    lines.push(Line::raw(""));
    lines.push(Line::styled(
        "[s] Star  [a] Archive  [d] Trash  [r] Reply  [x] Close",
        Style::default().fg(Color::DarkGray),
    ));

    let detail = Paragraph::new(lines)
        .block(block)
        .wrap(Wrap { trim: false })
        .scroll((state.detail_scroll, 0));
    f.render_widget(detail, area);
}

fn render_compose(f: &mut Frame, cs: &mut ComposeState<'_>) {
    let area = centered_rect(80, 80, f.area());
    f.render_widget(Clear, area);

    let outer = Block::default()
        .borders(Borders::ALL)
        .title(" New Message ")
        .title_bottom(" Esc: Cancel  Ctrl-S: Send  Attach: unavailable ")
        .border_style(Style::default().fg(Color::Cyan));
    let inner = outer.inner(area);
    f.render_widget(outer, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // To
            Constraint::Length(3), // Subject
            Constraint::Min(5),    // Message
        ])
        .split(inner);

    let focused = cs.focused_field;
    for (textarea, field, title, chunk) in [
        (&mut cs.to, ComposeField::To, " To ", chunks[0]),
        (&mut cs.subject, ComposeField::Subject, " Subject ", chunks[1]),
        (&mut cs.body, ComposeField::Body, " Message ", chunks[2]),
    ] {
        textarea.set_block(
            Block::default()
                .borders(Borders::ALL)
                .title(title)
                .border_style(field_style(focused == field)),
        );
        f.render_widget(&*textarea, chunk);

        if focused == field {
            let (row, col) = textarea.cursor();
            f.set_cursor_position((chunk.x + 1 + col as u16, chunk.y + 1 + row as u16));
        }
    }
}

fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Folder, MessageId};
    use crate::seed;
    use ratatui::{Terminal, backend::TestBackend};

    fn store() -> MailboxStore {
        MailboxStore::new(seed::messages().unwrap(), "me@example.com")
    }

    fn draw(store: &MailboxStore, state: &mut UIState<'_>) -> String {
        let mut terminal = Terminal::new(TestBackend::new(140, 40)).unwrap();
        terminal.draw(|f| render(f, store, state)).unwrap();
        let buffer = terminal.backend().buffer();
        let mut text = String::new();
        for y in 0..buffer.area.height {
            for x in 0..buffer.area.width {
                text.push_str(buffer[(x, y)].symbol());
            }
            text.push('\n');
        }
        text
    }

    #[test]
    fn test_sidebar_lists_folders_with_badges() {
        let store = store();
        let text = draw(&store, &mut UIState::default());
        assert!(text.contains("MailBox"));
        for name in ["Inbox", "Starred", "Sent", "Drafts", "Archive", "Trash"] {
            assert!(text.contains(name), "missing {}", name);
        }
        let inbox_line = text.lines().find(|l| l.contains(" Inbox ")).unwrap();
        assert!(inbox_line.contains(" 1 "));
    }

    #[test]
    fn test_list_header_and_detail_placeholder() {
        let store = store();
        let text = draw(&store, &mut UIState::default());
        assert!(text.contains("Inbox - 3 emails"));
        assert!(text.contains("Project Update"));
        assert!(text.contains("Select an email to read"));
    }

    #[test]
    fn test_empty_folder_placeholder() {
        let mut store = store();
        store.select_mailbox(Folder::Archive.into());
        let text = draw(&store, &mut UIState::default());
        assert!(text.contains("Archive - 0 emails"));
        assert!(text.contains("No emails found"));
    }

    #[test]
    fn test_detail_shows_opened_message() {
        let mut store = store();
        store.open(MessageId(3)).unwrap();
        let text = draw(&store, &mut UIState::default());
        assert!(text.contains("From: notifications@github.com"));
        assert!(!text.contains("Select an email to read"));
    }

    #[test]
    fn test_closed_sidebar_is_not_drawn() {
        let mut store = store();
        store.toggle_sidebar();
        let text = draw(&store, &mut UIState::default());
        assert!(!text.contains("MailBox"));
        assert!(text.contains("Inbox - 3 emails"));
    }

    #[test]
    fn test_compose_popup() {
        let mut store = store();
        store.open_compose();
        let mut state = UIState {
            mode: UIMode::Composing,
            compose_state: Some(ComposeState::new(&ComposeDraft::default())),
            ..UIState::default()
        };
        let text = draw(&store, &mut state);
        assert!(text.contains("New Message"));
        assert!(text.contains("Subject"));
    }

    #[test]
    fn test_cursor_is_clamped_to_visible_list() {
        let store = store();
        let mut state = UIState {
            selected_message_index: 10,
            ..UIState::default()
        };
        draw(&store, &mut state);
        assert_eq!(state.selected_message_index, 2);
    }

    #[test]
    fn test_compose_state_round_trips_draft() {
        let draft = ComposeDraft {
            to: "a@b.com".to_string(),
            subject: "Re: Hi".to_string(),
            body: "line one\nline two".to_string(),
        };
        let cs = ComposeState::new(&draft);
        assert_eq!(cs.draft(), draft);
        assert_eq!(cs.focused_field, ComposeField::Body);
        assert_eq!(ComposeState::new(&ComposeDraft::default()).focused_field, ComposeField::To);
    }
}
