// Modal UI components.
// The create-note form drawn on top of the list.

use ratatui::{prelude::*, widgets::*};

use crate::notehub::NoteTag;
use crate::state::{FormFocus, NoteFormState};
use crate::validation::{CONTENT_MAX, Field, TITLE_MAX};

fn border_style(focused: bool) -> Style {
    if focused {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default().fg(Color::DarkGray)
    }
}

fn error_line(message: Option<&str>) -> Paragraph<'_> {
    Paragraph::new(message.unwrap_or("")).style(Style::default().fg(Color::Red))
}

/// Draw the create-note modal with inline field errors.
pub fn draw_note_form(frame: &mut Frame, form: &NoteFormState, pending: bool) {
    let area = frame.area();

    // Create centered modal
    let modal_width = 64.min(area.width);
    let modal_height = 24.min(area.height);
    let modal_x = (area.width.saturating_sub(modal_width)) / 2;
    let modal_y = (area.height.saturating_sub(modal_height)) / 2;

    let modal_area = Rect::new(modal_x, modal_y, modal_width, modal_height);

    // Clear the area behind the modal
    frame.render_widget(Clear, modal_area);

    let outer = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(" New note ");
    let inner = outer.inner(modal_area);
    frame.render_widget(outer, modal_area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Title input
            Constraint::Length(1), // Title error
            Constraint::Min(4),    // Content input
            Constraint::Length(1), // Content error
            Constraint::Length(3), // Tag selector
            Constraint::Length(1), // Tag error
            Constraint::Length(1), // Buttons
        ])
        .split(inner);

    // Title
    let title_focused = form.focus == FormFocus::Title;
    let mut title_spans = vec![Span::raw(form.values.title.as_str())];
    if title_focused {
        title_spans.push(Span::styled("█", Style::default().fg(Color::Yellow)));
    }
    let title = Paragraph::new(Line::from(title_spans)).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(border_style(title_focused))
            .title(format!(
                " Title {}/{} ",
                form.values.title.trim().chars().count(),
                TITLE_MAX
            )),
    );
    frame.render_widget(title, chunks[0]);
    frame.render_widget(error_line(form.error(Field::Title)), chunks[1]);

    // Content
    let content_focused = form.focus == FormFocus::Content;
    let mut content_text = form.values.content.clone();
    if content_focused {
        content_text.push('█');
    }
    let content = Paragraph::new(content_text)
        .wrap(Wrap { trim: false })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(border_style(content_focused))
                .title(format!(
                    " Content {}/{} ",
                    form.values.content.trim().chars().count(),
                    CONTENT_MAX
                )),
        );
    frame.render_widget(content, chunks[2]);
    frame.render_widget(error_line(form.error(Field::Content)), chunks[3]);

    // Tag
    let tag_focused = form.focus == FormFocus::Tag;
    let tag_spans: Vec<Span> = NoteTag::ALL
        .iter()
        .flat_map(|tag| {
            let style = if *tag == form.tag {
                Style::default()
                    .fg(Color::Black)
                    .bg(Color::Yellow)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::White)
            };
            [Span::styled(format!(" {} ", tag), style), Span::raw(" ")]
        })
        .collect();
    let tags = Paragraph::new(Line::from(tag_spans)).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(border_style(tag_focused))
            .title(" Tag ←→ "),
    );
    frame.render_widget(tags, chunks[4]);
    frame.render_widget(error_line(form.error(Field::Tag)), chunks[5]);

    // Buttons
    let button = |label: &'static str, focused: bool| {
        let style = if focused {
            Style::default()
                .fg(Color::Black)
                .bg(Color::Cyan)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::Cyan)
        };
        Span::styled(format!("[ {} ]", label), style)
    };
    let submit_label = if pending { "Creating…" } else { "Create note" };
    let buttons = Line::from(vec![
        button("Cancel", form.focus == FormFocus::Cancel),
        Span::raw("  "),
        button(submit_label, form.focus == FormFocus::Submit),
    ]);
    frame.render_widget(
        Paragraph::new(buttons).alignment(Alignment::Right),
        chunks[6],
    );
}
