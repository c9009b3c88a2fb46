use autosec_console::Section;
use ratatui::{
    layout::Rect,
    style::Stylize,
    symbols::border,
    text::{Line, Span},
    widgets::{Block, Paragraph},
    Frame,
};

use crate::cmd::console::state::Focus;

/// Renders the bottom controls bar showing context-aware keybindings
pub(crate) fn render_bottom_bar(frame: &mut Frame, area: Rect, section: Section, focus: Focus) {
    let mut spans: Vec<Span> = vec![
        " Quit ".into(),
        "<q> ".blue().bold(),
        " | Section ".into(),
        "<←→/1-6> ".blue().bold(),
    ];

    let extra: &[(&str, &str)] = match (focus, section) {
        (Focus::NodeDetails, _) => &[(" | Node ", "<↑↓> "), (" | Close ", "<enter/esc> ")],
        (Focus::Sections, Section::IdsPanel) => &[
            (" | Monitor ", "<m/x> "),
            (" | Block ", "<b> "),
            (" | Reset ", "<z> "),
            (" | Real-time ", "<r/t> "),
            (" | Clear ", "<C> "),
            (" | Node ", "<↑↓ enter> "),
        ],
        (Focus::Sections, Section::Pentest) => &[(" | Run ", "<p> "), (" | Stop ", "<P> ")],
        (Focus::Sections, Section::Scanner) => &[(" | Scan ", "<s> ")],
        (Focus::Sections, Section::CanBus) => &[(" | CAN ", "<c> ")],
        (Focus::Sections, Section::ThreatFeed) => &[(" | IDS ", "<i> ")],
        (Focus::Sections, Section::Dashboard) => &[
            (" | CAN ", "<c> "),
            (" | Scan ", "<s> "),
            (" | Pentest ", "<p> "),
            (" | IDS ", "<i> "),
        ],
    };

    for (label, key) in extra {
        spans.push((*label).into());
        spans.push((*key).blue().bold());
    }

    let block = Block::bordered()
        .title(" Controls ")
        .border_set(border::PLAIN);

    let paragraph = Paragraph::new(Line::from(spans))
        .block(block)
        .left_aligned();

    frame.render_widget(paragraph, area);
}
