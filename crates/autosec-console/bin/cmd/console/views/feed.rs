use autosec_console::view::Feed;
use autosec_console::Insertion;
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style, Stylize},
    symbols::border,
    text::{Line, Span},
    widgets::{Block, Paragraph},
    Frame,
};

use crate::cmd::console::widgets::formatters::{line_style, truncate_message};

/// Renders a bounded feed. Newest-last feeds keep their tail in view.
pub(crate) fn render_feed(frame: &mut Frame, area: Rect, title: &str, feed: Option<&Feed>) {
    let block = Block::bordered()
        .title(format!(" {} ", title))
        .border_set(border::PLAIN);

    let Some(feed) = feed else {
        let paragraph = Paragraph::new(Line::from("(not mounted)").dark_gray()).block(block);
        frame.render_widget(paragraph, area);
        return;
    };

    let inner_area = block.inner(area);
    frame.render_widget(block, area);

    if let Some(placeholder) = feed.placeholder() {
        let line = Line::from(Span::styled(
            placeholder.to_string(),
            Style::default()
                .fg(Color::DarkGray)
                .add_modifier(Modifier::ITALIC),
        ));
        frame.render_widget(Paragraph::new(line), inner_area);
        return;
    }

    let visible = inner_area.height as usize;
    let skip = match feed.insertion() {
        Insertion::NewestLast => feed.len().saturating_sub(visible),
        Insertion::NewestFirst => 0,
    };
    let max_width = inner_area.width as usize;

    let lines: Vec<Line> = feed
        .iter()
        .skip(skip)
        .take(visible)
        .map(|entry| {
            let mut spans = Vec::with_capacity(2);
            let mut budget = max_width;
            if let Some(stamp) = &entry.stamp {
                spans.push(Span::styled(
                    format!("{} ", stamp),
                    Style::default().fg(Color::DarkGray),
                ));
                budget = budget.saturating_sub(stamp.chars().count() + 1);
            }
            spans.push(Span::styled(
                truncate_message(&entry.text, budget),
                line_style(&entry.text, entry.severity),
            ));
            Line::from(spans)
        })
        .collect();

    frame.render_widget(Paragraph::new(lines), inner_area);
}
