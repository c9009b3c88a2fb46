//! Main dashboard: navigation, command buttons and the server event handlers.

use crate::channel::EventChannel;
use crate::clock::Clock;
use crate::protocol::{
    ChannelEvent, IdsAlert, Inbound, Outbound, OutputLine, PentestStarted, ProgressUpdate,
    RealtimeThreat, ScanComplete, Severity, StatusUpdate,
};
use crate::view::{Element, FeedEntry, Section, View, THREAT_FEED_CONNECTING};

pub const THREAT_FEED_CONNECTED: &str = "✓ Connected - Live monitoring active";
pub const THREAT_FEED_DISCONNECTED: &str = "✗ Disconnected - Attempting to reconnect...";

/// Buttons that emit a command and stay disabled until the server answers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    ToggleCan,
    RunScan,
    RunPentest,
    ToggleIds,
}

impl Command {
    pub fn element(&self) -> Element {
        match self {
            Command::ToggleCan => Element::ToggleCan,
            Command::RunScan => Element::RunScan,
            Command::RunPentest => Element::RunPentest,
            Command::ToggleIds => Element::ToggleIds,
        }
    }
}

#[derive(Debug, Clone)]
pub struct DashboardSettings {
    pub scan_type: String,
    pub pentest_profile: String,
}

impl Default for DashboardSettings {
    fn default() -> Self {
        Self {
            scan_type: "quick".to_string(),
            pentest_profile: "basic".to_string(),
        }
    }
}

/// Formats one line of the shared security event log.
pub fn security_event(message: &str, severity: Severity, time: String) -> FeedEntry {
    FeedEntry::new(severity, format!("[{}] {}", severity.label(), message)).stamped(time)
}

pub struct Dashboard<C: Clock> {
    settings: DashboardSettings,
    clock: C,
    can_messages: u64,
    ids_alerts: u64,
    scan_findings: u64,
}

impl<C: Clock> Dashboard<C> {
    pub fn new(settings: DashboardSettings, clock: C) -> Self {
        Self {
            settings,
            clock,
            can_messages: 0,
            ids_alerts: 0,
            scan_findings: 0,
        }
    }

    pub fn can_messages(&self) -> u64 {
        self.can_messages
    }

    pub fn ids_alerts(&self) -> u64 {
        self.ids_alerts
    }

    pub fn scan_findings(&self) -> u64 {
        self.scan_findings
    }

    pub fn select_section(&self, view: &mut View, section: Section) {
        log::debug!("section -> {}", section.title());
        view.activate(section);
    }

    /// Emits the command bound to `command` and disables its button.
    ///
    /// Returns `false` and emits nothing when the button is disabled or not
    /// mounted.
    pub fn click(&self, view: &mut View, channel: &dyn EventChannel, command: Command) -> bool {
        let element = command.element();
        match view.is_enabled(element) {
            Some(true) => {}
            Some(false) => {
                log::debug!("`{}` is disabled, click ignored", element.id());
                return false;
            }
            None => {
                log::debug!("`{}` is not mounted, click ignored", element.id());
                return false;
            }
        }
        view.set_enabled(element, false);

        let message = match command {
            Command::ToggleCan => Outbound::ToggleCanMonitoring,
            Command::RunScan => Outbound::StartScan {
                scan_type: self.settings.scan_type.clone(),
            },
            Command::RunPentest => Outbound::StartPentest {
                profile: self.settings.pentest_profile.clone(),
            },
            Command::ToggleIds => Outbound::ToggleIds,
        };
        channel.emit(message);
        true
    }

    /// Asks the server to abort a running pentest. The pentest button stays
    /// disabled until `pentest_complete`.
    pub fn stop_pentest(&self, channel: &dyn EventChannel) {
        channel.emit(Outbound::StopPentest);
    }

    /// Appends to the shared security event log (newest first, ten entries).
    pub fn add_security_event(&self, view: &mut View, message: &str, severity: Severity) {
        let entry = security_event(message, severity, self.clock.time_of_day());
        view.push_entry(Element::EventsList, entry);
    }

    pub fn handle(&mut self, view: &mut View, event: &ChannelEvent) {
        match event {
            ChannelEvent::Message(inbound) => self.handle_inbound(view, inbound),
            ChannelEvent::Connected => {
                self.add_security_event(view, "Connected to server", Severity::Info);
                if let Some(feed) = view.feed_mut(Element::RealtimeEvents) {
                    if feed
                        .placeholder()
                        .is_some_and(|p| p == THREAT_FEED_CONNECTING)
                    {
                        feed.show_placeholder(THREAT_FEED_CONNECTED);
                    }
                }
            }
            ChannelEvent::Disconnected => {
                self.add_security_event(view, "Disconnected from server", Severity::Warning);
                if let Some(feed) = view.feed_mut(Element::RealtimeEvents) {
                    feed.show_placeholder(THREAT_FEED_DISCONNECTED);
                }
            }
            ChannelEvent::ConnectError(reason) => {
                log::error!("connection error: {}", reason);
                self.add_security_event(view, "Connection error", Severity::Critical);
            }
            ChannelEvent::Reconnected { .. } | ChannelEvent::Rejected { .. } => {}
        }
    }

    pub fn handle_inbound(&mut self, view: &mut View, inbound: &Inbound) {
        match inbound {
            Inbound::CanStatus(status) => self.on_can_status(view, status),
            Inbound::CanMessage => {
                self.can_messages += 1;
                view.set_text(Element::CanMessageCount, self.can_messages.to_string());
            }
            Inbound::ScanUpdate(update) => self.on_progress(view, update, Stage::Scan),
            Inbound::ScanComplete(done) => self.on_scan_complete(view, done),
            Inbound::PentestUpdate(update) => self.on_progress(view, update, Stage::Pentest),
            Inbound::PentestComplete => {
                view.set_progress(Element::PentestProgress, 0);
                view.set_text(Element::PentestStatus, "Ready");
                view.set_enabled(Element::RunPentest, true);
                self.add_security_event(view, "Penetration test completed", Severity::Info);
            }
            Inbound::PentestStarted(started) => self.on_pentest_started(view, started),
            Inbound::PentestOutput(line) => self.on_pentest_output(view, line),
            Inbound::IdsStatus(status) => self.on_ids_status(view, status),
            Inbound::IdsAlert(alert) => self.on_ids_alert(view, alert),
            Inbound::RealtimeThreat(threat) => self.on_realtime_threat(view, threat),
        }
    }

    fn on_can_status(&self, view: &mut View, status: &StatusUpdate) {
        let active = status.is_active();
        let text = if active { "Active" } else { "Inactive" };
        view.set_text(Element::CanStatus, text);
        view.set_label(
            Element::ToggleCan,
            if active {
                "Stop Monitoring"
            } else {
                "Start Monitoring"
            },
        );
        view.set_enabled(Element::ToggleCan, true);
        view.set_indicator(Element::CanBusIndicator, active);
        self.add_security_event(view, &format!("CAN Monitoring {}", text), Severity::Info);
    }

    fn on_ids_status(&self, view: &mut View, status: &StatusUpdate) {
        let active = status.is_active();
        let text = if active { "Active" } else { "Inactive" };
        view.set_text(Element::IdsStatus, text);
        view.set_label(
            Element::ToggleIds,
            if active { "Stop IDS" } else { "Start IDS" },
        );
        view.set_enabled(Element::ToggleIds, true);
        view.set_indicator(Element::IdsIndicator, active);
        self.add_security_event(view, &format!("IDS {}", text), Severity::Info);
    }

    fn on_progress(&self, view: &mut View, update: &ProgressUpdate, stage: Stage) {
        if let Some(percent) = update.percent() {
            view.set_progress(stage.progress(), percent);
            view.set_text(stage.status(), format!("{} ({}%)", stage.verb(), percent));
        }
        if let Some(finding) = update.finding.as_deref() {
            self.add_security_event(
                view,
                &format!("{}: {}", stage.prefix(), finding),
                update.severity.unwrap_or_default(),
            );
        }
    }

    fn on_scan_complete(&mut self, view: &mut View, done: &ScanComplete) {
        self.scan_findings = done.findings;
        view.set_progress(Element::ScanProgress, 0);
        view.set_text(Element::LastScan, done.last_scan.clone());
        view.set_text(Element::VulnCount, done.findings.to_string());
        view.set_enabled(Element::RunScan, true);
        self.add_security_event(view, "Vulnerability scan completed", Severity::Info);
    }

    fn on_pentest_started(&self, view: &mut View, started: &PentestStarted) {
        if let Some(feed) = view.feed_mut(Element::PentestOutput) {
            feed.clear();
            feed.push(FeedEntry::new(
                Severity::Success,
                format!(
                    "🚀 Pentest started against {} ({})",
                    started.target, started.scan_type
                ),
            ));
        }
        self.add_security_event(
            view,
            &format!(
                "Real-time pentest started: {} ({})",
                started.target, started.scan_type
            ),
            Severity::Info,
        );
    }

    fn on_pentest_output(&self, view: &mut View, line: &OutputLine) {
        let stamp = line
            .timestamp
            .clone()
            .unwrap_or_else(|| self.clock.time_of_day());
        view.push_entry(
            Element::PentestOutput,
            FeedEntry::new(line.level, format!("[{}] {}", stamp, line.message)),
        );
    }

    fn on_ids_alert(&mut self, view: &mut View, alert: &IdsAlert) {
        self.ids_alerts += 1;
        view.set_text(Element::IdsAlertCount, self.ids_alerts.to_string());
        self.add_security_event(
            view,
            &format!("IDS Alert: {}", alert.message),
            alert.effective_severity(),
        );
    }

    fn on_realtime_threat(&self, view: &mut View, threat: &RealtimeThreat) {
        let stamp = threat
            .timestamp
            .clone()
            .unwrap_or_else(|| self.clock.time_of_day());
        view.push_entry(
            Element::RealtimeEvents,
            FeedEntry::new(
                threat.level,
                format!("[{}] [{}] {}", stamp, threat.level.label(), threat.message),
            ),
        );

        if let Some(stats) = threat.stats {
            view.set_text(Element::ThreatTotal, stats.threats.to_string());
            view.set_text(Element::ThreatRate, format!("{}/min", stats.rate));
            view.set_text(Element::SafetyScore, format!("{}%", stats.safety));
        }
    }
}

#[derive(Clone, Copy)]
enum Stage {
    Scan,
    Pentest,
}

impl Stage {
    fn progress(self) -> Element {
        match self {
            Stage::Scan => Element::ScanProgress,
            Stage::Pentest => Element::PentestProgress,
        }
    }

    fn status(self) -> Element {
        match self {
            Stage::Scan => Element::ScanStatus,
            Stage::Pentest => Element::PentestStatus,
        }
    }

    fn verb(self) -> &'static str {
        match self {
            Stage::Scan => "Scanning",
            Stage::Pentest => "Testing",
        }
    }

    fn prefix(self) -> &'static str {
        match self {
            Stage::Scan => "Scan",
            Stage::Pentest => "Pentest",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::channel::RecordingChannel;
    use crate::clock::FixedClock;
    use crate::protocol::ThreatStats;

    fn dashboard() -> Dashboard<FixedClock> {
        Dashboard::new(DashboardSettings::default(), FixedClock::new("09:30:00"))
    }

    fn events(view: &View) -> Vec<String> {
        view.feed(Element::EventsList)
            .map(|f| f.iter().map(|e| e.text.clone()).collect())
            .unwrap_or_default()
    }

    #[test]
    fn security_event_line_is_tagged_and_stamped() {
        let entry = security_event("Connection error", Severity::Critical, "10:00:00".into());
        assert_eq!(entry.text, "[CRITICAL] Connection error");
        assert_eq!(entry.stamp.as_deref(), Some("10:00:00"));
        assert_eq!(entry.severity, Severity::Critical);
    }

    #[test]
    fn scan_button_disabled_until_scan_complete() {
        let mut dash = dashboard();
        let mut view = View::new();
        let channel = RecordingChannel::new();

        assert!(dash.click(&mut view, &channel, Command::RunScan));
        assert_eq!(view.is_enabled(Element::RunScan), Some(false));
        assert_eq!(
            channel.sent(),
            vec![Outbound::StartScan {
                scan_type: "quick".into()
            }]
        );

        // Unrelated traffic does not re-enable it
        dash.handle_inbound(&mut view, &Inbound::CanMessage);
        dash.handle_inbound(&mut view, &Inbound::PentestComplete);
        dash.handle_inbound(
            &mut view,
            &Inbound::ScanUpdate(ProgressUpdate {
                progress: Some(40.0),
                finding: Some("Open telnet port".into()),
                severity: Some(Severity::High),
            }),
        );
        assert_eq!(view.is_enabled(Element::RunScan), Some(false));
        assert!(!dash.click(&mut view, &channel, Command::RunScan));
        assert_eq!(channel.sent().len(), 1);

        dash.handle_inbound(
            &mut view,
            &Inbound::ScanComplete(ScanComplete {
                last_scan: "12:00:00".into(),
                findings: 5,
            }),
        );
        assert_eq!(view.is_enabled(Element::RunScan), Some(true));
        assert_eq!(view.text(Element::VulnCount), Some("5"));
        assert_eq!(view.text(Element::LastScan), Some("12:00:00"));
        assert_eq!(view.progress(Element::ScanProgress), Some(0));
    }

    #[test]
    fn toggles_reenable_on_status() {
        let mut dash = dashboard();
        let mut view = View::new();
        let channel = RecordingChannel::new();

        dash.click(&mut view, &channel, Command::ToggleCan);
        dash.click(&mut view, &channel, Command::ToggleIds);
        assert_eq!(view.is_enabled(Element::ToggleCan), Some(false));
        assert_eq!(view.is_enabled(Element::ToggleIds), Some(false));

        dash.handle_inbound(
            &mut view,
            &Inbound::CanStatus(StatusUpdate {
                status: "active".into(),
            }),
        );
        assert_eq!(view.is_enabled(Element::ToggleCan), Some(true));
        assert_eq!(view.is_enabled(Element::ToggleIds), Some(false));
        assert_eq!(view.text(Element::CanStatus), Some("Active"));
        assert_eq!(
            view.button(Element::ToggleCan).map(|b| b.label.as_str()),
            Some("Stop Monitoring")
        );
        assert_eq!(view.indicator(Element::CanBusIndicator), Some(true));
        assert_eq!(events(&view)[0], "[INFO] CAN Monitoring Active");
    }

    #[test]
    fn progress_updates_status_and_logs_findings() {
        let mut dash = dashboard();
        let mut view = View::new();

        dash.handle_inbound(
            &mut view,
            &Inbound::PentestUpdate(ProgressUpdate {
                progress: Some(35.0),
                finding: Some("Weak SSH cipher".into()),
                severity: Some(Severity::Medium),
            }),
        );

        assert_eq!(view.progress(Element::PentestProgress), Some(35));
        assert_eq!(view.text(Element::PentestStatus), Some("Testing (35%)"));
        assert_eq!(events(&view)[0], "[MEDIUM] Pentest: Weak SSH cipher");
    }

    #[test]
    fn pentest_output_appends_and_started_replaces() {
        let mut dash = dashboard();
        let mut view = View::new();

        dash.handle_inbound(
            &mut view,
            &Inbound::PentestOutput(OutputLine {
                message: "Nmap scan report".into(),
                level: Severity::Info,
                timestamp: Some("10:00:01".into()),
            }),
        );
        let feed = view.feed(Element::PentestOutput).unwrap();
        assert_eq!(feed.placeholder(), None);
        assert_eq!(feed.newest().unwrap().text, "[10:00:01] Nmap scan report");

        dash.handle_inbound(
            &mut view,
            &Inbound::PentestStarted(PentestStarted {
                target: "127.0.0.1".into(),
                scan_type: "network".into(),
                timestamp: None,
            }),
        );
        let feed = view.feed(Element::PentestOutput).unwrap();
        assert_eq!(feed.len(), 1);
        assert!(feed.newest().unwrap().text.contains("127.0.0.1 (network)"));
    }

    #[test]
    fn pentest_output_keeps_last_hundred() {
        let mut dash = dashboard();
        let mut view = View::new();
        for i in 0..130 {
            dash.handle_inbound(
                &mut view,
                &Inbound::PentestOutput(OutputLine {
                    message: format!("line {}", i),
                    level: Severity::Info,
                    timestamp: Some("10:00:00".into()),
                }),
            );
        }
        let feed = view.feed(Element::PentestOutput).unwrap();
        assert_eq!(feed.len(), 100);
        assert_eq!(feed.iter().next().unwrap().text, "[10:00:00] line 30");
        assert_eq!(feed.newest().unwrap().text, "[10:00:00] line 129");
    }

    #[test]
    fn realtime_threats_newest_first_capped_at_fifty() {
        let mut dash = dashboard();
        let mut view = View::new();
        for i in 0..60 {
            dash.handle_inbound(
                &mut view,
                &Inbound::RealtimeThreat(RealtimeThreat {
                    message: format!("threat {}", i),
                    level: Severity::Critical,
                    timestamp: Some("11:11:11".into()),
                    stats: Some(ThreatStats {
                        threats: 250,
                        rate: 12,
                        safety: 91,
                    }),
                }),
            );
        }
        let feed = view.feed(Element::RealtimeEvents).unwrap();
        assert_eq!(feed.len(), 50);
        assert_eq!(
            feed.iter().next().unwrap().text,
            "[11:11:11] [CRITICAL] threat 59"
        );
        assert_eq!(feed.iter().last().unwrap().text, "[11:11:11] [CRITICAL] threat 10");
        assert_eq!(view.text(Element::SafetyScore), Some("91%"));
    }

    #[test]
    fn ids_alert_counts_and_uses_level_fallback() {
        let mut dash = dashboard();
        let mut view = View::new();
        let alert = IdsAlert {
            message: "Malware beacon".into(),
            severity: None,
            level: Severity::High,
            kind: "malware".into(),
            timestamp: None,
        };
        dash.handle_inbound(&mut view, &Inbound::IdsAlert(alert.clone()));
        dash.handle_inbound(&mut view, &Inbound::IdsAlert(alert));

        assert_eq!(view.text(Element::IdsAlertCount), Some("2"));
        assert_eq!(events(&view)[0], "[HIGH] IDS Alert: Malware beacon");
    }

    #[test]
    fn lifecycle_updates_threat_feed_placeholder() {
        let mut dash = dashboard();
        let mut view = View::new();

        dash.handle(&mut view, &ChannelEvent::Connected);
        assert_eq!(
            view.feed(Element::RealtimeEvents).unwrap().placeholder(),
            Some(THREAT_FEED_CONNECTED)
        );

        dash.handle(&mut view, &ChannelEvent::Disconnected);
        assert_eq!(
            view.feed(Element::RealtimeEvents).unwrap().placeholder(),
            Some(THREAT_FEED_DISCONNECTED)
        );

        dash.handle(&mut view, &ChannelEvent::ConnectError("refused".into()));
        assert_eq!(
            events(&view),
            vec![
                "[CRITICAL] Connection error",
                "[WARNING] Disconnected from server",
                "[INFO] Connected to server",
            ]
        );
    }

    #[test]
    fn missing_elements_are_skipped() {
        let mut dash = dashboard();
        let mut view = View::with_elements([Element::EventsList]);
        let channel = RecordingChannel::new();

        dash.handle_inbound(
            &mut view,
            &Inbound::ScanComplete(ScanComplete {
                last_scan: "12:00:00".into(),
                findings: 3,
            }),
        );
        dash.handle_inbound(&mut view, &Inbound::CanMessage);
        assert!(!dash.click(&mut view, &channel, Command::RunPentest));

        assert_eq!(view.text(Element::VulnCount), None);
        assert_eq!(dash.can_messages(), 1);
        assert_eq!(events(&view), vec!["[INFO] Vulnerability scan completed"]);
        assert!(channel.sent().is_empty());
    }

    #[test]
    fn unmounted_button_emits_nothing() {
        let dash = dashboard();
        let mut view = View::without([Element::RunScan]);
        let channel = RecordingChannel::new();

        assert!(!dash.click(&mut view, &channel, Command::RunScan));
        assert!(dash.click(&mut view, &channel, Command::ToggleIds));
        assert_eq!(channel.sent(), vec![Outbound::ToggleIds]);
        assert_eq!(view.is_enabled(Element::RunScan), None);
    }

    #[test]
    fn security_log_keeps_ten_newest() {
        let dash = dashboard();
        let mut view = View::new();
        for i in 0..15 {
            dash.add_security_event(&mut view, &format!("event {}", i), Severity::Info);
        }
        let lines = events(&view);
        assert_eq!(lines.len(), 10);
        assert_eq!(lines[0], "[INFO] event 14");
        assert_eq!(lines[9], "[INFO] event 5");
    }
}
