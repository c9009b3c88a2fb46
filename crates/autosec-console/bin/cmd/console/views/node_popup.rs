use ratatui::{
    layout::Rect,
    symbols::border,
    text::Line,
    widgets::{Block, Clear, Paragraph, Wrap},
    Frame,
};

/// Renders a centered popup with a node's details
pub(crate) fn render_node_popup(details: &str, area: Rect, frame: &mut Frame) {
    let popup_width = (area.width / 2).max(40).min(area.width);
    let popup_height = 8.min(area.height);
    let x = (area.width.saturating_sub(popup_width)) / 2;
    let y = (area.height.saturating_sub(popup_height)) / 2;

    let popup_area = Rect {
        x: area.x + x,
        y: area.y + y,
        width: popup_width,
        height: popup_height,
    };

    frame.render_widget(Clear, popup_area);

    let block = Block::bordered()
        .title(" Node Details ")
        .border_set(border::DOUBLE);

    let lines: Vec<Line> = details.lines().map(Line::from).collect();
    let paragraph = Paragraph::new(lines)
        .block(block)
        .wrap(Wrap { trim: false });

    frame.render_widget(paragraph, popup_area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::{backend::TestBackend, Terminal};

    #[test]
    fn test_popup_shows_details() {
        let mut terminal = Terminal::new(TestBackend::new(80, 20)).unwrap();
        let details = "Network Node: OBD-II Port\nNode ID: obd\nStatus: Active";

        terminal
            .draw(|frame| render_node_popup(details, frame.area(), frame))
            .unwrap();

        let text: String = terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect();
        assert!(text.contains("Node Details"));
        assert!(text.contains("Network Node: OBD-II Port"));
        assert!(text.contains("Status: Active"));
    }
}
