use crate::channel::EventChannel;
use crate::clock::Clock;
use crate::protocol::{ChannelEvent, IdsAlert, Inbound, Outbound, Severity};
use crate::view::{Element, FeedEntry, View};

pub const INTRO_LINES: [&str; 3] = [
    "> Starting real-time IDS monitoring...",
    "> Connecting to Suricata...",
    "> Activating threat detection...",
];

pub const ALERTS_CLEARED: &str = "All alerts cleared";

/// Server-driven IDS view. Alerts arrive as `ids_alert` events whether or
/// not this view was started.
#[derive(Debug)]
pub struct RealtimeMonitor<C: Clock> {
    clock: C,
    active: bool,
    events: u64,
    threats: u64,
}

impl<C: Clock> RealtimeMonitor<C> {
    pub fn new(clock: C) -> Self {
        Self {
            clock,
            active: false,
            events: 0,
            threats: 0,
        }
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn events(&self) -> u64 {
        self.events
    }

    pub fn threats(&self) -> u64 {
        self.threats
    }

    /// Returns `false` (and emits nothing) when already started.
    pub fn start(&mut self, view: &mut View, channel: &dyn EventChannel) -> bool {
        if self.active {
            log::debug!("real-time IDS already active");
            return false;
        }
        self.active = true;

        if let Some(log) = view.feed_mut(Element::RealtimeTrafficLog) {
            log.clear();
            for line in INTRO_LINES {
                log.push(FeedEntry::new(Severity::Info, line));
            }
        }
        view.set_text(Element::RealtimeStatus, "Active");
        view.set_enabled(Element::StartRealtime, false);
        view.set_enabled(Element::StopRealtime, true);
        channel.emit(Outbound::StartIds);
        true
    }

    pub fn stop(&mut self, view: &mut View, channel: &dyn EventChannel) {
        self.active = false;
        view.push_entry(
            Element::RealtimeTrafficLog,
            FeedEntry::new(Severity::Warning, "[SYSTEM] Real-time IDS stopped"),
        );
        view.set_text(Element::RealtimeStatus, "Inactive");
        view.set_enabled(Element::StartRealtime, true);
        view.set_enabled(Element::StopRealtime, false);
        channel.emit(Outbound::StopIds);
    }

    pub fn clear_alerts(&mut self, view: &mut View) {
        if let Some(alerts) = view.feed_mut(Element::RealtimeAlerts) {
            alerts.clear();
            alerts.show_placeholder(ALERTS_CLEARED);
        }
        self.events = 0;
        self.threats = 0;
        self.publish_counters(view);
    }

    pub fn handle(&mut self, view: &mut View, event: &ChannelEvent) {
        match event {
            ChannelEvent::Message(Inbound::IdsAlert(alert)) => self.on_alert(view, alert),
            ChannelEvent::Message(_) | ChannelEvent::Rejected { .. } => {}
            ChannelEvent::Connected => {
                self.system_line(
                    view,
                    Severity::Info,
                    "[SYSTEM] ✅ Connected to real-time IDS server",
                );
                self.system_line(
                    view,
                    Severity::Success,
                    "[SYSTEM] 🛡️ Background threat monitoring active",
                );
                view.set_text(Element::RealtimeStatus, "Connected");
            }
            ChannelEvent::Disconnected => {
                self.system_line(
                    view,
                    Severity::Critical,
                    "[SYSTEM] ❌ Disconnected from IDS server",
                );
                view.set_text(Element::RealtimeStatus, "Disconnected");
            }
            ChannelEvent::ConnectError(_) => {
                self.system_line(
                    view,
                    Severity::Critical,
                    "[ERROR] Connection failed - check server",
                );
            }
            ChannelEvent::Reconnected { attempts } => {
                log::info!("reconnected after {} attempts", attempts);
                self.system_line(
                    view,
                    Severity::Success,
                    "[SYSTEM] 🔄 Reconnected to IDS server",
                );
            }
        }
    }

    fn on_alert(&mut self, view: &mut View, alert: &IdsAlert) {
        let kind = alert.kind.to_uppercase();
        let stamp = alert
            .timestamp
            .clone()
            .unwrap_or_else(|| self.clock.time_of_day());

        view.push_entry(
            Element::RealtimeTrafficLog,
            FeedEntry::new(
                alert.level,
                format!("[{}] [{}] {}", stamp, kind, alert.message),
            ),
        );
        view.push_entry(
            Element::RealtimeAlerts,
            FeedEntry::new(alert.level, format!("[{}] {}", kind, alert.message)),
        );

        self.events += 1;
        if alert.level.is_threat() {
            self.threats += 1;
        }
        self.publish_counters(view);
    }

    fn system_line(&self, view: &mut View, severity: Severity, text: &str) {
        view.push_entry(Element::RealtimeTrafficLog, FeedEntry::new(severity, text));
    }

    fn publish_counters(&self, view: &mut View) {
        view.set_text(Element::RealtimeEventCount, self.events.to_string());
        view.set_text(Element::RealtimeThreatCount, self.threats.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::channel::RecordingChannel;
    use crate::clock::FixedClock;

    fn alert(level: Severity, timestamp: Option<&str>) -> ChannelEvent {
        ChannelEvent::Message(Inbound::IdsAlert(IdsAlert {
            message: "Suspicious frame".to_string(),
            severity: None,
            level,
            kind: "can".to_string(),
            timestamp: timestamp.map(str::to_string),
        }))
    }

    fn lines(view: &View, element: Element) -> Vec<String> {
        view.feed(element)
            .map(|f| f.iter().map(|e| e.text.clone()).collect())
            .unwrap_or_default()
    }

    #[test]
    fn start_emits_once() {
        let mut view = View::new();
        let channel = RecordingChannel::new();
        let mut monitor = RealtimeMonitor::new(FixedClock::new("08:00:00"));

        assert!(monitor.start(&mut view, &channel));
        assert!(!monitor.start(&mut view, &channel));
        assert_eq!(channel.sent(), vec![Outbound::StartIds]);
        assert_eq!(view.text(Element::RealtimeStatus), Some("Active"));
        assert_eq!(lines(&view, Element::RealtimeTrafficLog), INTRO_LINES.to_vec());

        monitor.stop(&mut view, &channel);
        assert_eq!(channel.sent(), vec![Outbound::StartIds, Outbound::StopIds]);
        assert_eq!(view.text(Element::RealtimeStatus), Some("Inactive"));
        assert!(monitor.start(&mut view, &channel));
    }

    #[test]
    fn alerts_count_events_and_threats() {
        let mut view = View::new();
        let mut monitor = RealtimeMonitor::new(FixedClock::new("08:00:00"));

        monitor.handle(&mut view, &alert(Severity::Critical, Some("07:59:59")));
        monitor.handle(&mut view, &alert(Severity::Medium, None));
        monitor.handle(&mut view, &alert(Severity::High, None));

        assert_eq!(monitor.events(), 3);
        assert_eq!(monitor.threats(), 2);
        assert_eq!(view.text(Element::RealtimeEventCount), Some("3"));
        assert_eq!(view.text(Element::RealtimeThreatCount), Some("2"));

        let log = lines(&view, Element::RealtimeTrafficLog);
        assert_eq!(log[0], "[07:59:59] [CAN] Suspicious frame");
        assert_eq!(log[1], "[08:00:00] [CAN] Suspicious frame");

        let alerts = view.feed(Element::RealtimeAlerts).unwrap();
        assert_eq!(alerts.len(), 3);
        assert_eq!(alerts.newest().unwrap().severity, Severity::High);
    }

    #[test]
    fn alert_list_keeps_ten() {
        let mut view = View::new();
        let mut monitor = RealtimeMonitor::new(FixedClock::new("08:00:00"));
        for _ in 0..15 {
            monitor.handle(&mut view, &alert(Severity::Low, None));
        }
        assert_eq!(view.feed(Element::RealtimeAlerts).unwrap().len(), 10);
        assert_eq!(monitor.events(), 15);
    }

    #[test]
    fn clear_resets_counters_and_shows_placeholder() {
        let mut view = View::new();
        let mut monitor = RealtimeMonitor::new(FixedClock::new("08:00:00"));
        monitor.handle(&mut view, &alert(Severity::Critical, None));
        monitor.clear_alerts(&mut view);

        assert_eq!(monitor.events(), 0);
        assert_eq!(view.text(Element::RealtimeThreatCount), Some("0"));
        let alerts = view.feed(Element::RealtimeAlerts).unwrap();
        assert!(alerts.is_empty());
        assert_eq!(alerts.placeholder(), Some(ALERTS_CLEARED));

        monitor.handle(&mut view, &alert(Severity::Low, None));
        assert_eq!(view.feed(Element::RealtimeAlerts).unwrap().placeholder(), None);
    }

    #[test]
    fn lifecycle_lines_and_status() {
        let mut view = View::new();
        let mut monitor = RealtimeMonitor::new(FixedClock::new("08:00:00"));

        monitor.handle(&mut view, &ChannelEvent::Connected);
        assert_eq!(view.text(Element::RealtimeStatus), Some("Connected"));
        monitor.handle(&mut view, &ChannelEvent::Disconnected);
        assert_eq!(view.text(Element::RealtimeStatus), Some("Disconnected"));
        monitor.handle(&mut view, &ChannelEvent::ConnectError("refused".into()));
        monitor.handle(&mut view, &ChannelEvent::Reconnected { attempts: 2 });

        let log = lines(&view, Element::RealtimeTrafficLog);
        assert_eq!(log.len(), 5);
        assert_eq!(log[3], "[ERROR] Connection failed - check server");
        assert!(log[4].contains("Reconnected to IDS server"));
    }

    #[test]
    fn works_without_log_element() {
        let mut view = View::without([Element::RealtimeTrafficLog]);
        let mut monitor = RealtimeMonitor::new(FixedClock::new("08:00:00"));
        monitor.handle(&mut view, &alert(Severity::High, None));
        assert_eq!(monitor.threats(), 1);
        assert_eq!(view.feed(Element::RealtimeAlerts).unwrap().len(), 1);
    }

    #[test]
    fn realtime_log_keeps_last_hundred() {
        let mut view = View::new();
        let mut monitor = RealtimeMonitor::new(FixedClock::new("08:00:00"));
        for i in 0..120 {
            let event = ChannelEvent::Message(Inbound::IdsAlert(IdsAlert {
                message: format!("frame {}", i),
                severity: None,
                level: Severity::Low,
                kind: "can".to_string(),
                timestamp: None,
            }));
            monitor.handle(&mut view, &event);
        }

        let log = lines(&view, Element::RealtimeTrafficLog);
        assert_eq!(log.len(), 100);
        assert_eq!(log[0], "[08:00:00] [CAN] frame 20");
        assert_eq!(log[99], "[08:00:00] [CAN] frame 119");
        assert_eq!(monitor.events(), 120);
    }
}
