// Note list rendering.
// Styled note rows plus the loading, error, and empty states.

use chrono::{DateTime, Utc};
use ratatui::{prelude::*, widgets::*};

use crate::notehub::{Note, NoteTag};

/// Longest content preview shown per note.
const PREVIEW_CHARS: usize = 120;

/// Format a timestamp as relative time (e.g., "2h ago").
pub fn format_relative_time(dt: &DateTime<Utc>) -> String {
    let now = Utc::now();
    let duration = now.signed_duration_since(*dt);

    if duration.num_days() > 0 {
        format!("{}d ago", duration.num_days())
    } else if duration.num_hours() > 0 {
        format!("{}h ago", duration.num_hours())
    } else if duration.num_minutes() > 0 {
        format!("{}m ago", duration.num_minutes())
    } else {
        "just now".to_string()
    }
}

/// Get color for a note tag.
fn tag_color(tag: NoteTag) -> Color {
    match tag {
        NoteTag::Todo => Color::Yellow,
        NoteTag::Work => Color::Blue,
        NoteTag::Personal => Color::Magenta,
        NoteTag::Meeting => Color::Cyan,
        NoteTag::Shopping => Color::Green,
    }
}

/// First line of the content, cut to a preview length.
fn preview(content: &str) -> String {
    let first_line = content.lines().next().unwrap_or("");
    if first_line.chars().count() > PREVIEW_CHARS {
        let cut: String = first_line.chars().take(PREVIEW_CHARS).collect();
        format!("{}…", cut)
    } else {
        first_line.to_string()
    }
}

/// Render a loading indicator.
pub fn render_loading(frame: &mut Frame, area: Rect, message: &str) {
    let text = Paragraph::new(format!("⏳ {}", message))
        .alignment(Alignment::Center)
        .style(Style::default().fg(Color::Yellow))
        .block(Block::default().borders(Borders::ALL).title(" Notes "));
    frame.render_widget(text, area);
}

/// Render an error message.
pub fn render_error(frame: &mut Frame, area: Rect, error: &str) {
    let text = Paragraph::new(format!("❌ {}", error))
        .alignment(Alignment::Center)
        .style(Style::default().fg(Color::Red))
        .block(Block::default().borders(Borders::ALL).title(" Notes "));
    frame.render_widget(text, area);
}

/// Render an empty state message.
pub fn render_empty(frame: &mut Frame, area: Rect, message: &str) {
    let text = Paragraph::new(message)
        .alignment(Alignment::Center)
        .style(Style::default().fg(Color::DarkGray))
        .block(Block::default().borders(Borders::ALL).title(" Notes "));
    frame.render_widget(text, area);
}

/// Render the notes of the current page.
pub fn render_notes_list(
    frame: &mut Frame,
    notes: &[Note],
    list_state: &mut ListState,
    deleting_id: Option<&str>,
    delete_pending: bool,
    title: &str,
    area: Rect,
) {
    let items: Vec<ListItem> = notes
        .iter()
        .map(|note| {
            let deleting = deleting_id == Some(note.id.as_str());
            let title_style = if deleting {
                Style::default()
                    .fg(Color::DarkGray)
                    .add_modifier(Modifier::CROSSED_OUT)
            } else {
                Style::default().add_modifier(Modifier::BOLD)
            };

            let delete_hint = if deleting {
                Span::styled("deleting…", Style::default().fg(Color::Red))
            } else if delete_pending {
                Span::styled("d Delete", Style::default().fg(Color::DarkGray))
            } else {
                Span::styled("d Delete", Style::default().fg(Color::Red))
            };

            ListItem::new(vec![
                Line::from(Span::styled(note.title.clone(), title_style)),
                Line::from(Span::styled(
                    preview(&note.content),
                    Style::default().fg(Color::Gray),
                )),
                Line::from(vec![
                    Span::styled(
                        format!("[{}]", note.tag),
                        Style::default().fg(tag_color(note.tag)),
                    ),
                    Span::raw("  "),
                    Span::styled(
                        format!("updated {}", format_relative_time(&note.updated_at)),
                        Style::default().fg(Color::DarkGray),
                    ),
                    Span::raw("  "),
                    delete_hint,
                ]),
                Line::from(""),
            ])
        })
        .collect();

    let list_widget = List::new(items)
        .block(Block::default().borders(Borders::ALL).title(title.to_string()))
        .highlight_style(Style::default().bg(Color::DarkGray))
        .highlight_symbol("> ");

    frame.render_stateful_widget(list_widget, area, list_state);
}
