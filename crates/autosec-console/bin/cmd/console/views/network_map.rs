use std::time::Instant;

use autosec_console::ids::topology::{NodeStatus, Rgb};
use autosec_console::ids::TopologyMap;
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    symbols::{border, Marker},
    text::Span,
    widgets::{
        canvas::{Canvas, Line as CanvasLine},
        Block,
    },
    Frame,
};

fn to_color(rgb: Rgb) -> Color {
    Color::Rgb(rgb.0, rgb.1, rgb.2)
}

fn glyph(status: NodeStatus) -> &'static str {
    match status {
        NodeStatus::Normal => "●",
        NodeStatus::Active => "◉",
        NodeStatus::Threat => "⚠",
    }
}

/// Centers a label under its node, kept inside `[0, width]`. Falls back to
/// the node id when the name does not fit, and to nothing when neither does.
fn place_label<'a>(
    name: &'a str,
    id: &'a str,
    center_x: f64,
    width: f64,
) -> Option<(&'a str, f64)> {
    let text = [name, id]
        .into_iter()
        .find(|t| t.chars().count() as f64 <= width)?;
    let len = text.chars().count() as f64;
    let x = (center_x - len / 2.0).clamp(0.0, width - len);
    Some((text, x))
}

/// Renders the vehicle network as a hub-and-spoke diagram.
///
/// Geometry comes from the current area on every call.
pub(crate) fn render_network_map(
    frame: &mut Frame,
    area: Rect,
    map: &TopologyMap,
    selected: usize,
    now: Instant,
) {
    let block = Block::bordered()
        .title(" Network Map ")
        .border_set(border::PLAIN);
    let inner_area = block.inner(area);

    let width = f64::from(inner_area.width.max(1));
    let height = f64::from(inner_area.height.max(1));
    let layout = map.layout(width, height);

    let nodes: Vec<(&'static str, &'static str, Color, NodeStatus, bool)> = map
        .nodes()
        .iter()
        .enumerate()
        .map(|(i, node)| {
            (
                node.spec.name,
                node.spec.id,
                to_color(node.color(now)),
                node.status(now),
                i == selected,
            )
        })
        .collect();

    let canvas = Canvas::default()
        .block(block)
        .marker(Marker::Braille)
        .x_bounds([0.0, width])
        .y_bounds([0.0, height])
        .paint(move |ctx| {
            // canvas y grows upwards
            for connector in &layout.connectors {
                let hot = nodes[connector.edge.to].3 == NodeStatus::Threat;
                ctx.draw(&CanvasLine {
                    x1: connector.start.x,
                    y1: height - connector.start.y,
                    x2: connector.end.x,
                    y2: height - connector.end.y,
                    color: if hot { Color::Red } else { Color::DarkGray },
                });
            }
            ctx.layer();

            // labels first so no label can cover a glyph
            for (center, (name, id, color, _, is_selected)) in layout.centers.iter().zip(&nodes) {
                let Some((text, x)) = place_label(name, id, center.x, width) else {
                    continue;
                };
                let below = height - center.y - 1.0;
                let y = if below >= 0.0 { below } else { height - center.y + 1.0 };
                let mut style = Style::default().fg(*color);
                if *is_selected {
                    style = style.add_modifier(Modifier::BOLD | Modifier::REVERSED);
                }
                ctx.print(x, y, Span::styled(text.to_string(), style));
            }

            for (center, (_, _, color, status, is_selected)) in layout.centers.iter().zip(&nodes) {
                let mut style = Style::default().fg(*color);
                if *is_selected {
                    style = style.add_modifier(Modifier::BOLD);
                }
                ctx.print(center.x, height - center.y, Span::styled(glyph(*status), style));
            }
        });

    frame.render_widget(canvas, area);
}
