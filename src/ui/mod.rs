// UI module for rendering the TUI.
// Lays out the toolbar, note list, status bar, form modal, and help overlay.

mod list;
mod modal;
mod pagination;
mod search;

use ratatui::{prelude::*, widgets::*};

use crate::app::App;
use crate::notehub::NotesApi;
use crate::query::QueryView;
use crate::state::ToastLevel;

/// Main draw function that renders the entire UI.
pub fn draw<A: NotesApi>(frame: &mut Frame, app: &mut App<A>) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Toolbar
            Constraint::Min(1),    // Note list
            Constraint::Length(1), // Status bar
        ])
        .split(frame.area());

    draw_toolbar(frame, app, chunks[0]);
    draw_content(frame, app, chunks[1]);
    draw_status_bar(frame, app, chunks[2]);

    if let Some(form) = &app.form {
        modal::draw_note_form(frame, form, app.create.is_pending());
    }

    // Help overlay (rendered last, on top of everything)
    if app.show_help {
        draw_help_overlay(frame);
    }
}

/// Search box, pagination, and the create hint.
fn draw_toolbar<A: NotesApi>(frame: &mut Frame, app: &App<A>, area: Rect) {
    let total_pages = app.queries.total_pages();
    let show_pagination = total_pages > 1;

    let mut constraints = vec![Constraint::Percentage(40)];
    if show_pagination {
        constraints.push(Constraint::Min(20));
    } else {
        constraints.push(Constraint::Min(0));
    }
    constraints.push(Constraint::Length(20));

    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(constraints)
        .split(area);

    search::draw_search_box(frame, &app.search, chunks[0]);

    if show_pagination {
        pagination::draw_pagination(frame, app.queries.params().page, total_pages, chunks[1]);
    }

    let sort = app.queries.params().sort_by.as_str();
    let create = Paragraph::new(vec![
        Line::from(Span::styled(
            "n Create note +",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            format!("s sort: {}", sort),
            Style::default().fg(Color::DarkGray),
        )),
    ])
    .alignment(Alignment::Right)
    .block(
        Block::default()
            .borders(Borders::BOTTOM)
            .border_style(Style::default().fg(Color::DarkGray)),
    );
    frame.render_widget(create, chunks[2]);
}

/// Loader, error, empty state, or the list itself.
fn draw_content<A: NotesApi>(frame: &mut Frame, app: &mut App<A>, area: Rect) {
    match app.queries.view() {
        QueryView::Loading => list::render_loading(frame, area, "Loading notes, please wait..."),
        QueryView::Error(_) => {
            list::render_error(frame, area, "There was an error, please try again...")
        }
        QueryView::Empty { searching } => {
            let message = if searching {
                "No notes found for your search."
            } else {
                "No notes yet. Press n to create one."
            };
            list::render_empty(frame, area, message);
        }
        QueryView::Ready {
            notes,
            total_pages,
            placeholder,
            fetching,
        } => {
            let page = app.queries.params().page;
            let marker = if placeholder || fetching { "⟳ " } else { "" };
            let title = format!(" Notes (page {} of {}) {}", page, total_pages.max(1), marker);
            list::render_notes_list(
                frame,
                notes,
                &mut app.list.list_state,
                app.deleting_id.as_deref(),
                app.delete.is_pending(),
                &title,
                area,
            );
        }
    }
}

/// Draw the status bar with keybinding hints and the latest toast.
fn draw_status_bar<A: NotesApi>(frame: &mut Frame, app: &App<A>, area: Rect) {
    let mut spans = if app.form.is_some() {
        vec![
            Span::raw(" Tab "),
            Span::styled("Next field", Style::default().fg(Color::DarkGray)),
            Span::raw("  ←→ "),
            Span::styled("Tag", Style::default().fg(Color::DarkGray)),
            Span::raw("  ^S "),
            Span::styled("Create", Style::default().fg(Color::DarkGray)),
            Span::raw("  Esc "),
            Span::styled("Cancel", Style::default().fg(Color::DarkGray)),
        ]
    } else if app.search.focused {
        vec![
            Span::raw(" ↵ "),
            Span::styled("Search now", Style::default().fg(Color::DarkGray)),
            Span::raw("  ^U "),
            Span::styled("Clear", Style::default().fg(Color::DarkGray)),
            Span::raw("  Esc "),
            Span::styled("Done", Style::default().fg(Color::DarkGray)),
        ]
    } else {
        vec![
            Span::raw(" ↑↓ "),
            Span::styled("Navigate", Style::default().fg(Color::DarkGray)),
            Span::raw("  ←→ "),
            Span::styled("Page", Style::default().fg(Color::DarkGray)),
            Span::raw("  / "),
            Span::styled("Search", Style::default().fg(Color::DarkGray)),
            Span::raw("  n "),
            Span::styled("New", Style::default().fg(Color::DarkGray)),
            Span::raw("  d "),
            Span::styled("Delete", Style::default().fg(Color::DarkGray)),
            Span::raw("  ? "),
            Span::styled("Help", Style::default().fg(Color::DarkGray)),
            Span::raw("  q "),
            Span::styled("Quit", Style::default().fg(Color::DarkGray)),
        ]
    };

    if let Some(toast) = &app.toast {
        let (icon, color) = match toast.level {
            ToastLevel::Info => ("✔", Color::Green),
            ToastLevel::Error => ("❌", Color::Red),
        };
        spans.push(Span::styled(
            format!("   {} {}", icon, toast.message),
            Style::default().fg(color),
        ));
    }

    let status = Paragraph::new(Line::from(spans));
    frame.render_widget(status, area);
}

/// Draw the help overlay.
fn draw_help_overlay(frame: &mut Frame) {
    let area = frame.area();

    let popup_area = centered_rect(area, 50, 18);

    // Clear the area behind the popup
    frame.render_widget(Clear, popup_area);

    let key = |k: &'static str, what: &'static str| {
        Line::from(vec![
            Span::styled(format!("  {:<14}", k), Style::default().fg(Color::Cyan)),
            Span::raw(what),
        ])
    };

    let help_text = vec![
        Line::from(vec![Span::styled(
            "Keyboard Shortcuts",
            Style::default().add_modifier(Modifier::BOLD),
        )]),
        Line::from(""),
        key("↑/↓ or j/k", "Select note"),
        key("←/→ PgUp/PgDn", "Previous/next page"),
        key("Home/End", "First/last page"),
        key("/", "Search notes"),
        key("s", "Toggle sort (created/updated)"),
        key("n", "Create note"),
        key("d Del", "Delete selected note"),
        key("r", "Refresh"),
        key("?", "Show/hide this help"),
        key("q ^C", "Quit"),
        Line::from(""),
        Line::from(vec![
            Span::styled("Press ", Style::default().fg(Color::DarkGray)),
            Span::styled("Esc", Style::default().fg(Color::Yellow)),
            Span::styled(" or ", Style::default().fg(Color::DarkGray)),
            Span::styled("?", Style::default().fg(Color::Yellow)),
            Span::styled(" to close", Style::default().fg(Color::DarkGray)),
        ]),
    ];

    let help_paragraph = Paragraph::new(help_text)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan))
                .title(" Help ")
                .title_style(
                    Style::default()
                        .fg(Color::Cyan)
                        .add_modifier(Modifier::BOLD),
                ),
        )
        .alignment(Alignment::Left);

    frame.render_widget(help_paragraph, popup_area);
}

/// A rectangle of at most `width` x `height`, centered in `area`.
fn centered_rect(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    let x = area.x + (area.width - width) / 2;
    let y = area.y + (area.height - height) / 2;
    Rect::new(x, y, width, height)
}
