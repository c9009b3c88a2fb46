//! Vehicle network map: eight subsystems wired to a central gateway.

use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

pub const HUB_BLUE: Rgb = Rgb(0x00, 0xb8, 0xff);
pub const ECU_GREEN: Rgb = Rgb(0x00, 0xff, 0x88);
pub const SECURITY_RED: Rgb = Rgb(0xff, 0x00, 0x55);
pub const INFOTAINMENT_AMBER: Rgb = Rgb(0xff, 0xaa, 0x00);
pub const OBD_VIOLET: Rgb = Rgb(0xbd, 0x00, 0xff);

/// Static description of one node. `x` and `y` are percentages of the map.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NodeSpec {
    pub id: &'static str,
    pub name: &'static str,
    pub x: f64,
    pub y: f64,
    pub color: Rgb,
    pub size: u16,
}

pub const HUB: &str = "gateway";

pub const VEHICLE_NODES: [NodeSpec; 8] = [
    NodeSpec {
        id: "gateway",
        name: "Vehicle Gateway",
        x: 50.0,
        y: 50.0,
        color: HUB_BLUE,
        size: 28,
    },
    NodeSpec {
        id: "engine",
        name: "Engine ECU",
        x: 25.0,
        y: 25.0,
        color: ECU_GREEN,
        size: 24,
    },
    NodeSpec {
        id: "brake",
        name: "Brake Controller",
        x: 75.0,
        y: 25.0,
        color: ECU_GREEN,
        size: 24,
    },
    NodeSpec {
        id: "transmission",
        name: "Transmission",
        x: 25.0,
        y: 75.0,
        color: ECU_GREEN,
        size: 24,
    },
    NodeSpec {
        id: "body",
        name: "Body Control",
        x: 75.0,
        y: 75.0,
        color: ECU_GREEN,
        size: 24,
    },
    NodeSpec {
        id: "security",
        name: "Security Module",
        x: 90.0,
        y: 50.0,
        color: SECURITY_RED,
        size: 26,
    },
    NodeSpec {
        id: "infotainment",
        name: "Infotainment",
        x: 50.0,
        y: 15.0,
        color: INFOTAINMENT_AMBER,
        size: 22,
    },
    NodeSpec {
        id: "obd",
        name: "OBD-II Port",
        x: 15.0,
        y: 50.0,
        color: OBD_VIOLET,
        size: 20,
    },
];

/// Hub-to-leaf wiring.
pub const CONNECTIONS: [(&str, &str); 7] = [
    (HUB, "engine"),
    (HUB, "brake"),
    (HUB, "transmission"),
    (HUB, "body"),
    (HUB, "security"),
    (HUB, "infotainment"),
    (HUB, "obd"),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeStatus {
    Normal,
    Active,
    Threat,
}

impl NodeStatus {
    pub fn label(&self) -> &'static str {
        match self {
            NodeStatus::Normal => "Active",
            NodeStatus::Active => "Active (traffic)",
            NodeStatus::Threat => "Threat detected",
        }
    }
}

#[derive(Debug, Clone)]
pub struct MapNode {
    pub spec: NodeSpec,
    pulse_until: Option<Instant>,
    flash_until: Option<Instant>,
}

impl MapNode {
    fn new(spec: NodeSpec) -> Self {
        Self {
            spec,
            pulse_until: None,
            flash_until: None,
        }
    }

    /// A threat flash outranks an activity pulse.
    pub fn status(&self, now: Instant) -> NodeStatus {
        if self.flash_until.is_some_and(|until| now < until) {
            NodeStatus::Threat
        } else if self.pulse_until.is_some_and(|until| now < until) {
            NodeStatus::Active
        } else {
            NodeStatus::Normal
        }
    }

    pub fn color(&self, now: Instant) -> Rgb {
        match self.status(now) {
            NodeStatus::Threat => SECURITY_RED,
            _ => self.spec.color,
        }
    }

    pub fn is_high_security(&self) -> bool {
        self.spec.color == SECURITY_RED
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Edge {
    pub from: usize,
    pub to: usize,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

/// Geometry of one connector line, as measured at layout time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Connector {
    pub edge: Edge,
    pub start: Point,
    pub end: Point,
    pub length: f64,
    /// Clockwise from the positive x axis, y pointing down.
    pub angle_deg: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MapLayout {
    pub width: f64,
    pub height: f64,
    pub centers: Vec<Point>,
    pub connectors: Vec<Connector>,
}

#[derive(Debug, Clone)]
pub struct TopologyMap {
    nodes: Vec<MapNode>,
    edges: Vec<Edge>,
}

impl Default for TopologyMap {
    fn default() -> Self {
        Self::vehicle()
    }
}

impl TopologyMap {
    pub fn vehicle() -> Self {
        Self::from_specs(&VEHICLE_NODES, &CONNECTIONS)
    }

    /// Builds a map; connections naming an unknown node are skipped.
    pub fn from_specs(specs: &[NodeSpec], connections: &[(&str, &str)]) -> Self {
        let nodes: Vec<MapNode> = specs.iter().copied().map(MapNode::new).collect();
        let index_of = |id: &str| nodes.iter().position(|n| n.spec.id == id);

        let edges = connections
            .iter()
            .filter_map(|(from, to)| {
                Some(Edge {
                    from: index_of(from)?,
                    to: index_of(to)?,
                })
            })
            .collect();

        Self { nodes, edges }
    }

    pub fn nodes(&self) -> &[MapNode] {
        &self.nodes
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn node(&self, id: &str) -> Option<&MapNode> {
        self.nodes.iter().find(|n| n.spec.id == id)
    }

    pub(crate) fn pulse(&mut self, index: usize, now: Instant, duration: Duration) {
        if let Some(node) = self.nodes.get_mut(index) {
            node.pulse_until = Some(now + duration);
        }
    }

    pub(crate) fn flash(&mut self, index: usize, now: Instant, duration: Duration) {
        if let Some(node) = self.nodes.get_mut(index) {
            node.flash_until = Some(now + duration);
        }
    }

    /// Returns every node to its idle look.
    pub fn reset_effects(&mut self) {
        for node in &mut self.nodes {
            node.pulse_until = None;
            node.flash_until = None;
        }
    }

    /// Node centers and connector geometry for a map area of the given size.
    ///
    /// Called on every draw, so the geometry always matches the current
    /// area.
    pub fn layout(&self, width: f64, height: f64) -> MapLayout {
        let centers: Vec<Point> = self
            .nodes
            .iter()
            .map(|n| Point {
                x: n.spec.x / 100.0 * width,
                y: n.spec.y / 100.0 * height,
            })
            .collect();

        let connectors = self
            .edges
            .iter()
            .map(|&edge| {
                let start = centers[edge.from];
                let end = centers[edge.to];
                let dx = end.x - start.x;
                let dy = end.y - start.y;
                Connector {
                    edge,
                    start,
                    end,
                    length: (dx * dx + dy * dy).sqrt(),
                    angle_deg: dy.atan2(dx).to_degrees(),
                }
            })
            .collect();

        MapLayout {
            width,
            height,
            centers,
            connectors,
        }
    }

    pub fn details(&self, id: &str, now: Instant) -> Option<String> {
        let node = self.node(id)?;
        let level = if node.is_high_security() {
            "High Security"
        } else {
            "Standard"
        };
        Some(format!(
            "Network Node: {}\nNode ID: {}\nStatus: {}\nSecurity Level: {}",
            node.spec.name,
            node.spec.id,
            node.status(now).label(),
            level
        ))
    }
}
