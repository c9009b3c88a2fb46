use std::time::Instant;

use autosec_console::ids::TopologyMap;
use autosec_console::{Element, View};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    text::{Line, Span},
    Frame,
};

use super::dashboard::{button_line, render_card, value_line};
use super::feed::render_feed;
use super::network_map::render_network_map;
use crate::cmd::console::widgets::formatters::status_color;

/// Renders the simulated monitor on the left and the real-time IDS on the right
pub(crate) fn render_ids_panel(
    frame: &mut Frame,
    area: Rect,
    view: &View,
    map: &TopologyMap,
    selected_node: usize,
    now: Instant,
) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(area);

    let left = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(6),
            Constraint::Min(12),
            Constraint::Min(6),
            Constraint::Length(8),
        ])
        .split(columns[0]);

    let counters = Line::from(vec![
        Span::styled(" Packets: ", Style::default().fg(Color::Gray)),
        Span::raw(view.text(Element::PacketCount).unwrap_or("-").to_string()),
        Span::styled("  Sources: ", Style::default().fg(Color::Gray)),
        Span::raw(view.text(Element::SourceCount).unwrap_or("-").to_string()),
        Span::styled("  Threats: ", Style::default().fg(Color::Gray)),
        Span::styled(
            view.text(Element::ThreatCount).unwrap_or("-").to_string(),
            Style::default().fg(Color::Red),
        ),
    ]);
    render_card(
        frame,
        left[0],
        "Simulated Monitoring",
        vec![
            counters,
            button_line(view, Element::StartMonitoring, 'm'),
            button_line(view, Element::StopMonitoring, 'x'),
            button_line(view, Element::BlockAll, 'b'),
        ],
    );

    if view.is_mounted(Element::NetworkMap) {
        render_network_map(frame, left[1], map, selected_node, now);
    }
    render_feed(frame, left[2], "Traffic Log", view.feed(Element::TrafficLog));
    render_feed(
        frame,
        left[3],
        "Recent Alerts",
        view.feed(Element::RecentAlerts),
    );

    let right = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(8),
            Constraint::Min(8),
            Constraint::Length(12),
        ])
        .split(columns[1]);

    let status = view.text(Element::RealtimeStatus).unwrap_or("-").to_string();
    render_card(
        frame,
        right[0],
        "Real-Time IDS",
        vec![
            Line::from(vec![
                Span::styled(" Status: ", Style::default().fg(Color::Gray)),
                Span::styled(status.clone(), Style::default().fg(status_color(&status))),
            ]),
            value_line("Events", view.text(Element::RealtimeEventCount)),
            value_line("Threats", view.text(Element::RealtimeThreatCount)),
            button_line(view, Element::StartRealtime, 'r'),
            button_line(view, Element::StopRealtime, 't'),
            button_line(view, Element::ClearRealtimeAlerts, 'C'),
        ],
    );
    render_feed(
        frame,
        right[1],
        "Real-Time Traffic",
        view.feed(Element::RealtimeTrafficLog),
    );
    render_feed(
        frame,
        right[2],
        "Live Alerts",
        view.feed(Element::RealtimeAlerts),
    );
}
