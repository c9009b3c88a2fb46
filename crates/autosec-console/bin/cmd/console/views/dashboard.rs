use autosec_console::{Element, Section, View};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style, Stylize},
    symbols::border,
    text::{Line, Span},
    widgets::{Block, Gauge, Paragraph},
    Frame,
};

use super::feed::render_feed;
use crate::cmd::console::widgets::formatters::status_color;

/// Renders one of the dashboard sections (everything but the IDS panel)
pub(crate) fn render_dashboard_section(frame: &mut Frame, area: Rect, view: &View) {
    match view.active_section() {
        Section::Dashboard => render_overview(frame, area, view),
        Section::CanBus => render_can_bus(frame, area, view),
        Section::Scanner => render_scanner(frame, area, view),
        Section::Pentest => render_pentest(frame, area, view),
        Section::ThreatFeed => render_threat_feed(frame, area, view),
        Section::IdsPanel => {}
    }
}

fn render_overview(frame: &mut Frame, area: Rect, view: &View) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(7), Constraint::Min(5)])
        .split(area);

    let cards = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Ratio(1, 4); 4])
        .split(rows[0]);

    render_card(
        frame,
        cards[0],
        "CAN Bus",
        vec![
            status_line("Status", view, Element::CanStatus, Element::CanBusIndicator),
            value_line("Messages", view.text(Element::CanMessageCount)),
            button_line(view, Element::ToggleCan, 'c'),
        ],
    );
    render_card(
        frame,
        cards[1],
        "Vuln Scanner",
        vec![
            value_line("Status", view.text(Element::ScanStatus)),
            value_line("Vulns", view.text(Element::VulnCount)),
            button_line(view, Element::RunScan, 's'),
        ],
    );
    render_card(
        frame,
        cards[2],
        "Pentest",
        vec![
            value_line("Status", view.text(Element::PentestStatus)),
            progress_line(view.progress(Element::PentestProgress)),
            button_line(view, Element::RunPentest, 'p'),
        ],
    );
    render_card(
        frame,
        cards[3],
        "IDS",
        vec![
            status_line("Status", view, Element::IdsStatus, Element::IdsIndicator),
            value_line("Alerts", view.text(Element::IdsAlertCount)),
            button_line(view, Element::ToggleIds, 'i'),
        ],
    );

    let bottom = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(rows[1]);

    render_feed(
        frame,
        bottom[0],
        "Security Events",
        view.feed(Element::EventsList),
    );
    render_feed(
        frame,
        bottom[1],
        "Live Threats",
        view.feed(Element::RealtimeEvents),
    );
}

fn render_can_bus(frame: &mut Frame, area: Rect, view: &View) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(6), Constraint::Min(5)])
        .split(area);

    render_card(
        frame,
        rows[0],
        "CAN Bus Monitor",
        vec![
            status_line("Status", view, Element::CanStatus, Element::CanBusIndicator),
            value_line("Messages", view.text(Element::CanMessageCount)),
            button_line(view, Element::ToggleCan, 'c'),
        ],
    );
    render_feed(
        frame,
        rows[1],
        "Security Events",
        view.feed(Element::EventsList),
    );
}

fn render_scanner(frame: &mut Frame, area: Rect, view: &View) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(6),
            Constraint::Min(5),
        ])
        .split(area);

    render_gauge(
        frame,
        rows[0],
        "Scan Progress",
        view.progress(Element::ScanProgress),
    );
    render_card(
        frame,
        rows[1],
        "Vulnerability Scanner",
        vec![
            value_line("Status", view.text(Element::ScanStatus)),
            value_line("Last scan", view.text(Element::LastScan)),
            value_line("Vulnerabilities", view.text(Element::VulnCount)),
            button_line(view, Element::RunScan, 's'),
        ],
    );
    render_feed(
        frame,
        rows[2],
        "Security Events",
        view.feed(Element::EventsList),
    );
}

fn render_pentest(frame: &mut Frame, area: Rect, view: &View) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(4),
            Constraint::Min(5),
        ])
        .split(area);

    render_gauge(
        frame,
        rows[0],
        "Pentest Progress",
        view.progress(Element::PentestProgress),
    );
    render_card(
        frame,
        rows[1],
        "Penetration Test",
        vec![
            value_line("Status", view.text(Element::PentestStatus)),
            button_line(view, Element::RunPentest, 'p'),
        ],
    );
    render_feed(
        frame,
        rows[2],
        "Pentest Output",
        view.feed(Element::PentestOutput),
    );
}

fn render_threat_feed(frame: &mut Frame, area: Rect, view: &View) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(5)])
        .split(area);

    let stats = Line::from(vec![
        " Threats: ".into(),
        text_or_dash(view.text(Element::ThreatTotal)).red().bold(),
        "  Rate: ".into(),
        text_or_dash(view.text(Element::ThreatRate)).yellow().bold(),
        "  Safety: ".into(),
        text_or_dash(view.text(Element::SafetyScore)).green().bold(),
    ]);
    frame.render_widget(
        Paragraph::new(stats).block(
            Block::bordered()
                .title(" Threat Stats ")
                .border_set(border::PLAIN),
        ),
        rows[0],
    );

    render_feed(
        frame,
        rows[1],
        "Live Threat Feed",
        view.feed(Element::RealtimeEvents),
    );
}

pub(crate) fn render_card(frame: &mut Frame, area: Rect, title: &str, lines: Vec<Line>) {
    let block = Block::bordered()
        .title(format!(" {} ", title))
        .border_set(border::PLAIN);
    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_gauge(frame: &mut Frame, area: Rect, title: &str, percent: Option<u8>) {
    let gauge = Gauge::default()
        .block(
            Block::bordered()
                .title(format!(" {} ", title))
                .border_set(border::PLAIN),
        )
        .gauge_style(Style::default().fg(Color::Cyan))
        .percent(u16::from(percent.unwrap_or(0)));
    frame.render_widget(gauge, area);
}

fn text_or_dash(text: Option<&str>) -> String {
    text.unwrap_or("-").to_string()
}

pub(crate) fn value_line(label: &str, value: Option<&str>) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!(" {}: ", label), Style::default().fg(Color::Gray)),
        Span::styled(
            text_or_dash(value),
            Style::default().add_modifier(Modifier::BOLD),
        ),
    ])
}

fn status_line(label: &str, view: &View, text: Element, indicator: Element) -> Line<'static> {
    let status = text_or_dash(view.text(text));
    let dot = match view.indicator(indicator) {
        Some(true) => Span::styled("● ", Style::default().fg(Color::Green)),
        Some(false) => Span::styled("○ ", Style::default().fg(Color::DarkGray)),
        None => Span::raw(""),
    };
    Line::from(vec![
        Span::styled(format!(" {}: ", label), Style::default().fg(Color::Gray)),
        dot,
        Span::styled(status.clone(), Style::default().fg(status_color(&status))),
    ])
}

fn progress_line(percent: Option<u8>) -> Line<'static> {
    match percent {
        Some(p) if p > 0 => value_line("Progress", Some(&format!("{}%", p))),
        _ => value_line("Progress", Some("-")),
    }
}

/// A button rendered as `[key] Label`, dimmed while disabled.
pub(crate) fn button_line(view: &View, element: Element, key: char) -> Line<'static> {
    match view.button(element) {
        Some(button) => {
            let style = if button.enabled {
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::DarkGray)
            };
            Line::from(vec![
                Span::raw(" "),
                Span::styled(format!("[{}] {}", key, button.label), style),
            ])
        }
        None => Line::from(""),
    }
}
