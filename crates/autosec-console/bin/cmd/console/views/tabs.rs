use autosec_console::Section;
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style, Stylize},
    symbols::border,
    text::Line,
    widgets::{Block, Tabs},
    Frame,
};

use crate::cmd::console::state::Link;

/// Renders the section selector with the link state in the corner
pub(crate) fn render_tabs(
    frame: &mut Frame,
    area: Rect,
    active: Section,
    link: Link,
    server: &str,
) {
    let titles: Vec<Line> = Section::ALL
        .iter()
        .enumerate()
        .map(|(i, section)| Line::from(format!(" {} {} ", i + 1, section.title())))
        .collect();

    let link_line = match link {
        Link::Connected => Line::from(format!(" {} {} ", server, link.label())).green(),
        Link::Connecting => Line::from(format!(" {} {} ", server, link.label())).yellow(),
        Link::Disconnected => Line::from(format!(" {} {} ", server, link.label())).red(),
    };

    let tabs = Tabs::new(titles)
        .block(
            Block::bordered()
                .title(Line::from(" AutoSec Console ".bold()).centered())
                .title(link_line.right_aligned())
                .border_set(border::THICK),
        )
        .style(Style::default().fg(Color::White))
        .highlight_style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )
        .select(active.index());

    frame.render_widget(tabs, area);
}
