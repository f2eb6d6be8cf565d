// Search box rendering.

use ratatui::{prelude::*, widgets::*};

use crate::state::SearchState;

/// Draw the search input. The cursor only shows while it has focus.
pub fn draw_search_box(frame: &mut Frame, search: &SearchState, area: Rect) {
    let border_color = if search.focused {
        Color::Yellow
    } else {
        Color::DarkGray
    };

    let mut spans = vec![Span::styled("/", Style::default().fg(Color::Yellow))];
    if search.input.is_empty() && !search.focused {
        spans.push(Span::styled(
            " Search notes",
            Style::default().fg(Color::DarkGray),
        ));
    } else {
        spans.push(Span::raw(search.input.as_str()));
    }
    if search.focused {
        spans.push(Span::styled("█", Style::default().fg(Color::Yellow)));
    }

    let widget = Paragraph::new(Line::from(spans)).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(border_color)),
    );
    frame.render_widget(widget, area);
}
