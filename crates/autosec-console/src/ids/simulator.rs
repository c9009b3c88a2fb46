use std::collections::BTreeSet;
use std::time::{Duration, Instant};

use crate::ids::topology::TopologyMap;
use crate::protocol::Severity;
use crate::random::RandomSource;
use crate::schedule::Ticker;
use crate::view::{Element, FeedEntry, View, NO_ALERTS};

pub const THREAT_TYPES: [&str; 10] = [
    "Port Scan",
    "SQL Injection Attempt",
    "XSS Attack",
    "Brute Force Attempt",
    "Malware Beacon",
    "Data Exfiltration",
    "DDoS Attack",
    "Credential Stuffing",
    "Command Injection",
    "File Upload Exploit",
];

pub const SOURCE_IPS: [&str; 8] = [
    "192.168.1.100",
    "10.0.0.15",
    "45.33.12.89",
    "172.16.0.23",
    "104.17.32.10",
    "203.0.113.42",
    "198.51.100.67",
    "185.199.108.153",
];

pub const TRAFFIC_PERIOD: Duration = Duration::from_millis(1200);
pub const MAP_PERIOD: Duration = Duration::from_millis(2000);
pub const PULSE_DURATION: Duration = Duration::from_millis(1000);
pub const FLASH_DURATION: Duration = Duration::from_millis(2000);
pub const BLOCK_DELAY: Duration = Duration::from_millis(1500);

/// Rolls at or above this value are threats.
pub const THREAT_THRESHOLD: f64 = 0.7;
pub const PULSE_CHANCE: f64 = 0.3;
pub const FLASH_CHANCE: f64 = 0.1;

pub const INTRO_LINES: [&str; 4] = [
    "> Starting network monitoring...",
    "> IDS sensors activated",
    "> Real-time analysis enabled",
    "> Initializing network map...",
];

pub const ALL_NEUTRALIZED: &str = "All threats neutralized";

/// Outcome of one simulated packet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrafficEvent {
    Info {
        source: &'static str,
    },
    Threat {
        source: &'static str,
        kind: &'static str,
    },
}

impl TrafficEvent {
    pub fn source(&self) -> &'static str {
        match self {
            TrafficEvent::Info { source } | TrafficEvent::Threat { source, .. } => source,
        }
    }

    pub fn is_threat(&self) -> bool {
        matches!(self, TrafficEvent::Threat { .. })
    }

    pub fn log_line(&self) -> String {
        match self {
            TrafficEvent::Info { source } => format!("[INFO] Packet from {}", source),
            TrafficEvent::Threat { source, kind } => format!("[THREAT] {} from {}", kind, source),
        }
    }
}

/// Locally generated traffic for the IDS panel. Nothing here touches the
/// event channel.
#[derive(Debug)]
pub struct SimulatedMonitor<R: RandomSource> {
    rng: R,
    active: bool,
    traffic: Option<Ticker>,
    map_ticker: Option<Ticker>,
    pending_block: Option<Instant>,
    packets: u64,
    threats: u64,
    sources: BTreeSet<&'static str>,
    map: TopologyMap,
}

impl<R: RandomSource> SimulatedMonitor<R> {
    pub fn new(rng: R) -> Self {
        Self {
            rng,
            active: false,
            traffic: None,
            map_ticker: None,
            pending_block: None,
            packets: 0,
            threats: 0,
            sources: BTreeSet::new(),
            map: TopologyMap::vehicle(),
        }
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn packets(&self) -> u64 {
        self.packets
    }

    pub fn threats(&self) -> u64 {
        self.threats
    }

    pub fn distinct_sources(&self) -> usize {
        self.sources.len()
    }

    pub fn map(&self) -> &TopologyMap {
        &self.map
    }

    /// Starts monitoring. Returns `false` if it was already running.
    pub fn start(&mut self, view: &mut View, now: Instant) -> bool {
        if self.active {
            log::debug!("simulated monitoring already active");
            return false;
        }
        self.active = true;

        if let Some(log) = view.feed_mut(Element::TrafficLog) {
            log.clear();
            for line in INTRO_LINES {
                log.push(FeedEntry::new(Severity::Info, line));
            }
        }
        self.map = TopologyMap::vehicle();
        self.traffic = Some(Ticker::new(TRAFFIC_PERIOD, now));
        self.map_ticker = Some(Ticker::new(MAP_PERIOD, now));

        view.set_enabled(Element::StartMonitoring, false);
        view.set_enabled(Element::StopMonitoring, true);
        log::info!("simulated monitoring started");
        true
    }

    pub fn stop(&mut self, view: &mut View) {
        self.active = false;
        self.traffic = None;
        self.map_ticker = None;

        view.push_entry(
            Element::TrafficLog,
            FeedEntry::new(Severity::Warning, "[SYSTEM] Monitoring stopped"),
        );
        view.set_enabled(Element::StartMonitoring, true);
        view.set_enabled(Element::StopMonitoring, false);
        log::info!("simulated monitoring stopped");
    }

    /// Zeroes the counters and the seen-source set.
    pub fn reset(&mut self, view: &mut View) {
        self.packets = 0;
        self.threats = 0;
        self.sources.clear();
        self.pending_block = None;
        self.map.reset_effects();

        if let Some(alerts) = view.feed_mut(Element::RecentAlerts) {
            alerts.show_placeholder(NO_ALERTS);
        }
        self.publish_counters(view);
    }

    /// Runs every cadence that is due. Returns `true` if anything changed.
    pub fn poll(&mut self, view: &mut View, now: Instant) -> bool {
        let mut changed = false;

        if self.traffic.as_mut().is_some_and(|t| t.fire(now)) {
            self.tick_traffic(view);
            changed = true;
        }
        if self.map_ticker.as_mut().is_some_and(|t| t.fire(now)) {
            self.tick_map(now);
            changed = true;
        }
        if self.pending_block.is_some_and(|due| now >= due) {
            self.pending_block = None;
            self.complete_block(view);
            changed = true;
        }
        changed
    }

    /// One simulated packet.
    pub fn tick_traffic(&mut self, view: &mut View) -> TrafficEvent {
        self.packets += 1;

        let source = *self.rng.pick(&SOURCE_IPS);
        self.sources.insert(source);

        let event = if self.rng.next_f64() >= THREAT_THRESHOLD {
            let kind = *self.rng.pick(&THREAT_TYPES);
            TrafficEvent::Threat { source, kind }
        } else {
            TrafficEvent::Info { source }
        };

        match event {
            TrafficEvent::Info { .. } => {
                view.push_entry(
                    Element::TrafficLog,
                    FeedEntry::new(Severity::Info, event.log_line()),
                );
            }
            TrafficEvent::Threat { source, kind } => {
                self.threats += 1;
                view.push_entry(
                    Element::TrafficLog,
                    FeedEntry::new(Severity::Critical, event.log_line()),
                );
                view.push_entry(
                    Element::RecentAlerts,
                    FeedEntry::new(Severity::Critical, format!("ALERT: {} from {}", kind, source)),
                );
                log::debug!("simulated threat: {} from {}", kind, source);
            }
        }

        self.publish_counters(view);
        event
    }

    /// Random pulses and threat flashes across the map.
    pub fn tick_map(&mut self, now: Instant) {
        for index in 0..self.map.nodes().len() {
            if self.rng.next_f64() < PULSE_CHANCE {
                self.map.pulse(index, now, PULSE_DURATION);
            }
            // always drawn, even with no threats
            let roll = self.rng.next_f64();
            if roll < FLASH_CHANCE && self.threats > 0 {
                self.map.flash(index, now, FLASH_DURATION);
            }
        }
    }

    /// Starts blocking; the reset lands on the first poll after the delay.
    pub fn block_all(&mut self, view: &mut View, now: Instant) {
        view.push_entry(
            Element::TrafficLog,
            FeedEntry::new(Severity::Error, "[ACTION] Blocking all threat sources..."),
        );
        self.pending_block = Some(now + BLOCK_DELAY);
        log::info!("blocking all threat sources");
    }

    fn complete_block(&mut self, view: &mut View) {
        self.threats = 0;
        view.push_entry(
            Element::TrafficLog,
            FeedEntry::new(Severity::Success, "[SUCCESS] All threats blocked successfully"),
        );
        if let Some(alerts) = view.feed_mut(Element::RecentAlerts) {
            alerts.clear();
            alerts.show_placeholder(ALL_NEUTRALIZED);
        }
        self.map.reset_effects();
        self.publish_counters(view);
    }

    pub fn node_details(&self, id: &str, now: Instant) -> Option<String> {
        self.map.details(id, now)
    }

    fn publish_counters(&self, view: &mut View) {
        view.set_text(Element::PacketCount, self.packets.to_string());
        view.set_text(Element::SourceCount, self.sources.len().to_string());
        view.set_text(Element::ThreatCount, self.threats.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids::topology::NodeStatus;
    use crate::random::ScriptedRandom;

    fn log_lines(view: &View, element: Element) -> Vec<String> {
        view.feed(element)
            .map(|f| f.iter().map(|e| e.text.clone()).collect())
            .unwrap_or_default()
    }

    #[test]
    fn start_is_guarded() {
        let mut view = View::new();
        let mut monitor = SimulatedMonitor::new(ScriptedRandom::default());
        let now = Instant::now();

        assert!(monitor.start(&mut view, now));
        assert!(!monitor.start(&mut view, now));
        assert_eq!(log_lines(&view, Element::TrafficLog), INTRO_LINES.to_vec());

        // one traffic tick per period, even after two start calls
        assert!(monitor.poll(&mut view, now + TRAFFIC_PERIOD));
        assert_eq!(monitor.packets(), 1);
    }

    #[test]
    fn threat_roll_increments_by_one() {
        let mut view = View::new();
        // source index 0, roll 0.9, threat type index 1
        let mut monitor = SimulatedMonitor::new(ScriptedRandom::new([0.0, 0.9, 0.15]));

        let event = monitor.tick_traffic(&mut view);
        assert_eq!(
            event,
            TrafficEvent::Threat {
                source: "192.168.1.100",
                kind: "SQL Injection Attempt"
            }
        );
        assert_eq!(monitor.threats(), 1);
        assert_eq!(view.text(Element::ThreatCount), Some("1"));
        assert_eq!(
            log_lines(&view, Element::RecentAlerts),
            vec!["ALERT: SQL Injection Attempt from 192.168.1.100"]
        );
    }

    #[test]
    fn info_roll_logs_packet() {
        let mut view = View::new();
        let mut monitor = SimulatedMonitor::new(ScriptedRandom::new([0.99, 0.2]));

        let event = monitor.tick_traffic(&mut view);
        assert!(!event.is_threat());
        assert_eq!(monitor.threats(), 0);
        assert_eq!(
            view.feed(Element::TrafficLog).unwrap().newest().unwrap().text,
            "[INFO] Packet from 185.199.108.153"
        );
        assert_eq!(view.text(Element::PacketCount), Some("1"));
        assert_eq!(view.feed(Element::RecentAlerts).unwrap().placeholder(), Some(NO_ALERTS));
    }

    #[test]
    fn distinct_sources_counted_once() {
        let mut view = View::new();
        let mut monitor = SimulatedMonitor::new(ScriptedRandom::new([0.0, 0.1]));
        for _ in 0..5 {
            monitor.tick_traffic(&mut view);
        }
        assert_eq!(monitor.packets(), 5);
        assert_eq!(monitor.distinct_sources(), 1);
        assert_eq!(view.text(Element::SourceCount), Some("1"));
    }

    #[test]
    fn stop_keeps_counters() {
        let mut view = View::new();
        let mut monitor = SimulatedMonitor::new(ScriptedRandom::new([0.0, 0.9, 0.0]));
        let now = Instant::now();
        monitor.start(&mut view, now);
        monitor.tick_traffic(&mut view);
        monitor.stop(&mut view);

        assert!(!monitor.is_active());
        assert_eq!(monitor.threats(), 1);
        assert_eq!(
            log_lines(&view, Element::TrafficLog).last().map(String::as_str),
            Some("[SYSTEM] Monitoring stopped")
        );
        assert!(!monitor.poll(&mut view, now + Duration::from_secs(10)));

        monitor.reset(&mut view);
        assert_eq!(monitor.threats(), 0);
        assert_eq!(monitor.distinct_sources(), 0);
        assert_eq!(view.text(Element::PacketCount), Some("0"));
    }

    #[test]
    fn block_all_completes_after_delay() {
        let mut view = View::new();
        let mut monitor = SimulatedMonitor::new(ScriptedRandom::new([0.0, 0.9, 0.0]));
        let now = Instant::now();
        monitor.tick_traffic(&mut view);
        monitor.tick_traffic(&mut view);
        assert_eq!(monitor.threats(), 2);

        monitor.block_all(&mut view, now);
        assert!(!monitor.poll(&mut view, now + Duration::from_millis(1000)));
        assert_eq!(monitor.threats(), 2);

        assert!(monitor.poll(&mut view, now + BLOCK_DELAY));
        assert_eq!(monitor.threats(), 0);
        assert_eq!(view.text(Element::ThreatCount), Some("0"));
        let alerts = view.feed(Element::RecentAlerts).unwrap();
        assert!(alerts.is_empty());
        assert_eq!(alerts.placeholder(), Some(ALL_NEUTRALIZED));
        assert_eq!(
            log_lines(&view, Element::TrafficLog).last().map(String::as_str),
            Some("[SUCCESS] All threats blocked successfully")
        );
    }

    #[test]
    fn map_flashes_only_with_threats() {
        let mut monitor = SimulatedMonitor::new(ScriptedRandom::new([0.05]));
        let now = Instant::now();

        monitor.tick_map(now);
        assert!(monitor
            .map()
            .nodes()
            .iter()
            .all(|n| n.status(now) == NodeStatus::Active));

        let mut view = View::new();
        monitor.threats = 1;
        monitor.tick_map(now);
        assert!(monitor
            .map()
            .nodes()
            .iter()
            .all(|n| n.status(now) == NodeStatus::Threat));

        monitor.block_all(&mut view, now);
        monitor.poll(&mut view, now + BLOCK_DELAY);
        assert!(monitor
            .map()
            .nodes()
            .iter()
            .all(|n| n.status(now) == NodeStatus::Normal));
    }

    #[test]
    fn traffic_log_capped() {
        let mut view = View::new();
        let mut monitor = SimulatedMonitor::new(ScriptedRandom::new([0.0, 0.1]));
        for _ in 0..150 {
            monitor.tick_traffic(&mut view);
        }
        assert_eq!(view.feed(Element::TrafficLog).unwrap().len(), 100);
    }

    #[test]
    fn recent_alerts_keep_ten_newest() {
        let mut view = View::new();
        // tick i: source i % 8, threat roll, threat type i % 10
        let script = (0..15).flat_map(|i| {
            [
                (i % 8) as f64 / 8.0 + 0.01,
                0.9,
                (i % 10) as f64 / 10.0 + 0.01,
            ]
        });
        let mut monitor = SimulatedMonitor::new(ScriptedRandom::new(script));
        for _ in 0..15 {
            monitor.tick_traffic(&mut view);
        }

        let expected: Vec<String> = (5..15)
            .rev()
            .map(|i| format!("ALERT: {} from {}", THREAT_TYPES[i % 10], SOURCE_IPS[i % 8]))
            .collect();
        assert_eq!(monitor.threats(), 15);
        assert_eq!(log_lines(&view, Element::RecentAlerts), expected);
    }
}
