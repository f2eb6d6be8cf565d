// Pagination bar rendering.
// Shows a window of page numbers around the current page.

use ratatui::{prelude::*, widgets::*};

/// Up to this many pages, every page number is shown.
const SHOW_ALL_UP_TO: u32 = 7;
/// Pages shown on each side of the current one.
const SIDE: u32 = 2;

/// One slot in the pagination bar.
#[derive(Debug, Clone, PartialEq, Eq)]
enum PageLabel {
    Page(u32),
    Gap,
}

/// Page numbers to display: always the first and last page, a window around
/// `current`, and gaps where pages are skipped.
fn page_labels(current: u32, total: u32) -> Vec<PageLabel> {
    if total <= SHOW_ALL_UP_TO {
        return (1..=total).map(PageLabel::Page).collect();
    }

    let start = current.saturating_sub(SIDE).max(2).min(total - 2 * SIDE - 1);
    let end = (start + 2 * SIDE).min(total - 1);

    let mut labels = vec![PageLabel::Page(1)];
    if start > 2 {
        labels.push(PageLabel::Gap);
    }
    labels.extend((start..=end).map(PageLabel::Page));
    if end < total - 1 {
        labels.push(PageLabel::Gap);
    }
    labels.push(PageLabel::Page(total));
    labels
}

/// Draw the page bar. Callers only render it when there is more than one page.
pub fn draw_pagination(frame: &mut Frame, current: u32, total: u32, area: Rect) {
    let labels = page_labels(current, total);

    let titles: Vec<Line> = labels
        .iter()
        .map(|label| match label {
            PageLabel::Page(page) if *page == current => Line::from(Span::styled(
                page.to_string(),
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            )),
            PageLabel::Page(page) => Line::from(page.to_string()),
            PageLabel::Gap => Line::from(Span::styled("…", Style::default().fg(Color::DarkGray))),
        })
        .collect();

    let selected = labels
        .iter()
        .position(|l| *l == PageLabel::Page(current))
        .unwrap_or(0);

    let tabs_widget = Tabs::new(titles)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::DarkGray))
                .title(" ← Page → "),
        )
        .select(selected)
        .highlight_style(Style::default().fg(Color::Yellow))
        .divider(Span::raw(" "));

    frame.render_widget(tabs_widget, area);
}
