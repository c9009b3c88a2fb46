//! Typed view binding.
//!
//! Controllers never touch widgets. They write to named [`Element`]s of a
//! [`View`]; the terminal UI reads the same elements back when drawing.
//! A view can be built with only a subset of elements mounted, in which case
//! writes to the missing ones are skipped.

use std::collections::{HashMap, HashSet};

use crate::bounded::{BoundedList, Insertion};
use crate::protocol::Severity;

/// What kind of render target an element is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementKind {
    Button,
    Text,
    Progress,
    Indicator,
    Feed,
    Map,
}

macro_rules! elements {
    ($($variant:ident => ($id:literal, $kind:ident)),+ $(,)?) => {
        /// Every named render target of the console.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub enum Element {
            $($variant),+
        }

        impl Element {
            pub const ALL: &'static [Element] = &[$(Element::$variant),+];

            /// Stable identifier, as used in layout configuration.
            pub fn id(&self) -> &'static str {
                match self {
                    $(Element::$variant => $id),+
                }
            }

            pub fn kind(&self) -> ElementKind {
                match self {
                    $(Element::$variant => ElementKind::$kind),+
                }
            }

            pub fn from_id(id: &str) -> Option<Element> {
                match id {
                    $($id => Some(Element::$variant),)+
                    _ => None,
                }
            }
        }
    };
}

elements! {
    ToggleCan => ("toggle-can", Button),
    RunScan => ("run-scan", Button),
    RunPentest => ("run-pentest", Button),
    ToggleIds => ("toggle-ids", Button),
    CanStatus => ("can-status", Text),
    CanBusIndicator => ("can-bus-status", Indicator),
    CanMessageCount => ("can-message-count", Text),
    ScanProgress => ("scan-progress", Progress),
    ScanStatus => ("scan-status", Text),
    LastScan => ("last-scan", Text),
    VulnCount => ("vuln-count", Text),
    PentestProgress => ("pentest-progress", Progress),
    PentestStatus => ("pentest-status", Text),
    PentestOutput => ("realtime-pentest-output", Feed),
    IdsStatus => ("ids-status", Text),
    IdsIndicator => ("ids-status-indicator", Indicator),
    IdsAlertCount => ("ids-alerts", Text),
    EventsList => ("events-list", Feed),
    RealtimeEvents => ("realtime-events", Feed),
    ThreatTotal => ("threat-total", Text),
    ThreatRate => ("threat-rate", Text),
    SafetyScore => ("safety-score", Text),
    StartMonitoring => ("startMonitoring", Button),
    StopMonitoring => ("stopMonitoring", Button),
    BlockAll => ("blockAll", Button),
    StartRealtime => ("startRealtimeIDS", Button),
    StopRealtime => ("stopRealtimeIDS", Button),
    ClearRealtimeAlerts => ("clearRealtimeAlerts", Button),
    NetworkMap => ("networkMap", Map),
    TrafficLog => ("trafficLog", Feed),
    PacketCount => ("packetCount", Text),
    SourceCount => ("sourceCount", Text),
    ThreatCount => ("threatCount", Text),
    RecentAlerts => ("recentAlerts", Feed),
    RealtimeTrafficLog => ("realtimeTrafficLog", Feed),
    RealtimeStatus => ("realtimeStatus", Text),
    RealtimeAlerts => ("realtimeAlerts", Feed),
    RealtimeThreatCount => ("realtimeThreatCount", Text),
    RealtimeEventCount => ("realtimeEventCount", Text),
}

/// Page sections; exactly one is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Section {
    #[default]
    Dashboard,
    CanBus,
    Scanner,
    Pentest,
    ThreatFeed,
    IdsPanel,
}

impl Section {
    pub const ALL: [Section; 6] = [
        Section::Dashboard,
        Section::CanBus,
        Section::Scanner,
        Section::Pentest,
        Section::ThreatFeed,
        Section::IdsPanel,
    ];

    pub fn title(&self) -> &'static str {
        match self {
            Section::Dashboard => "Dashboard",
            Section::CanBus => "CAN Bus",
            Section::Scanner => "Vuln Scanner",
            Section::Pentest => "Pentest",
            Section::ThreatFeed => "Threat Feed",
            Section::IdsPanel => "IDS",
        }
    }

    pub fn index(&self) -> usize {
        Section::ALL.iter().position(|s| s == self).unwrap_or(0)
    }

    pub fn next(&self) -> Section {
        Section::ALL[(self.index() + 1) % Section::ALL.len()]
    }

    pub fn previous(&self) -> Section {
        let len = Section::ALL.len();
        Section::ALL[(self.index() + len - 1) % len]
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Button {
    pub label: String,
    pub enabled: bool,
}

/// One rendered row of a feed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedEntry {
    pub severity: Severity,
    pub text: String,
    pub stamp: Option<String>,
}

impl FeedEntry {
    pub fn new(severity: Severity, text: impl Into<String>) -> Self {
        Self {
            severity,
            text: text.into(),
            stamp: None,
        }
    }

    pub fn stamped(mut self, stamp: impl Into<String>) -> Self {
        self.stamp = Some(stamp.into());
        self
    }
}

pub type Feed = BoundedList<FeedEntry>;

/// Render-target state for every mounted element.
#[derive(Debug, Clone)]
pub struct View {
    mounted: HashSet<Element>,
    active: Section,
    texts: HashMap<Element, String>,
    buttons: HashMap<Element, Button>,
    progress: HashMap<Element, u8>,
    indicators: HashMap<Element, bool>,
    feeds: HashMap<Element, Feed>,
}

impl Default for View {
    fn default() -> Self {
        Self::new()
    }
}

impl View {
    /// A view with every element mounted.
    pub fn new() -> Self {
        Self::with_elements(Element::ALL.iter().copied())
    }

    pub fn with_elements(elements: impl IntoIterator<Item = Element>) -> Self {
        let mounted: HashSet<Element> = elements.into_iter().collect();
        let mut view = Self {
            mounted,
            active: Section::default(),
            texts: HashMap::new(),
            buttons: HashMap::new(),
            progress: HashMap::new(),
            indicators: HashMap::new(),
            feeds: HashMap::new(),
        };
        view.populate_defaults();
        view
    }

    /// A full view minus `hidden`.
    pub fn without(hidden: impl IntoIterator<Item = Element>) -> Self {
        let hidden: HashSet<Element> = hidden.into_iter().collect();
        Self::with_elements(
            Element::ALL
                .iter()
                .copied()
                .filter(|e| !hidden.contains(e)),
        )
    }

    fn populate_defaults(&mut self) {
        let mounted: Vec<Element> = self.mounted.iter().copied().collect();
        for element in mounted {
            match element.kind() {
                ElementKind::Button => {
                    self.buttons.insert(
                        element,
                        Button {
                            label: default_button_label(element).to_string(),
                            enabled: true,
                        },
                    );
                }
                ElementKind::Text => {
                    self.texts
                        .insert(element, default_text(element).to_string());
                }
                ElementKind::Progress => {
                    self.progress.insert(element, 0);
                }
                ElementKind::Indicator => {
                    self.indicators.insert(element, false);
                }
                ElementKind::Feed => {
                    self.feeds.insert(element, default_feed(element));
                }
                ElementKind::Map => {}
            }
        }
    }

    pub fn is_mounted(&self, element: Element) -> bool {
        self.mounted.contains(&element)
    }

    pub fn activate(&mut self, section: Section) {
        self.active = section;
    }

    pub fn active_section(&self) -> Section {
        self.active
    }

    pub fn set_text(&mut self, element: Element, text: impl Into<String>) {
        match self.texts.get_mut(&element) {
            Some(slot) => *slot = text.into(),
            None => skipped(element),
        }
    }

    pub fn text(&self, element: Element) -> Option<&str> {
        self.texts.get(&element).map(String::as_str)
    }

    pub fn button(&self, element: Element) -> Option<&Button> {
        self.buttons.get(&element)
    }

    pub fn set_enabled(&mut self, element: Element, enabled: bool) {
        match self.buttons.get_mut(&element) {
            Some(button) => button.enabled = enabled,
            None => skipped(element),
        }
    }

    pub fn is_enabled(&self, element: Element) -> Option<bool> {
        self.buttons.get(&element).map(|b| b.enabled)
    }

    pub fn set_label(&mut self, element: Element, label: impl Into<String>) {
        match self.buttons.get_mut(&element) {
            Some(button) => button.label = label.into(),
            None => skipped(element),
        }
    }

    pub fn set_progress(&mut self, element: Element, percent: u8) {
        match self.progress.get_mut(&element) {
            Some(slot) => *slot = percent.min(100),
            None => skipped(element),
        }
    }

    pub fn progress(&self, element: Element) -> Option<u8> {
        self.progress.get(&element).copied()
    }

    pub fn set_indicator(&mut self, element: Element, lit: bool) {
        match self.indicators.get_mut(&element) {
            Some(slot) => *slot = lit,
            None => skipped(element),
        }
    }

    pub fn indicator(&self, element: Element) -> Option<bool> {
        self.indicators.get(&element).copied()
    }

    pub fn feed(&self, element: Element) -> Option<&Feed> {
        self.feeds.get(&element)
    }

    /// Mutable access to a mounted feed; `None` when it is not mounted.
    pub fn feed_mut(&mut self, element: Element) -> Option<&mut Feed> {
        let feed = self.feeds.get_mut(&element);
        if feed.is_none() {
            skipped(element);
        }
        feed
    }

    pub fn push_entry(&mut self, element: Element, entry: FeedEntry) {
        if let Some(feed) = self.feed_mut(element) {
            feed.push(entry);
        }
    }
}

fn skipped(element: Element) {
    log::trace!("element `{}` not mounted, update skipped", element.id());
}

fn default_button_label(element: Element) -> &'static str {
    match element {
        Element::ToggleCan => "Start Monitoring",
        Element::RunScan => "Run Scan",
        Element::RunPentest => "Run Pentest",
        Element::ToggleIds => "Start IDS",
        Element::StartMonitoring => "Start Monitoring",
        Element::StopMonitoring => "Stop Monitoring",
        Element::BlockAll => "Block All Threats",
        Element::StartRealtime => "Start Real-Time IDS",
        Element::StopRealtime => "Stop Real-Time IDS",
        Element::ClearRealtimeAlerts => "Clear Alerts",
        _ => "",
    }
}

fn default_text(element: Element) -> &'static str {
    match element {
        Element::CanStatus | Element::IdsStatus | Element::RealtimeStatus => "Inactive",
        Element::ScanStatus | Element::PentestStatus => "Ready",
        Element::LastScan => "Never",
        Element::ThreatTotal | Element::ThreatRate | Element::SafetyScore => "-",
        _ => "0",
    }
}

pub const EVENTS_CAPACITY: usize = 10;
pub const THREAT_FEED_CAPACITY: usize = 50;
pub const LOG_CAPACITY: usize = 100;
pub const ALERTS_CAPACITY: usize = 10;

pub const THREAT_FEED_CONNECTING: &str = "Connecting to live threat feed...";
pub const PENTEST_CONNECTING: &str = "Connecting to pentest stream...";
pub const NO_ALERTS: &str = "No alerts yet";
pub const NO_LIVE_ALERTS: &str = "No live alerts yet";

fn default_feed(element: Element) -> Feed {
    match element {
        Element::EventsList => Feed::new(EVENTS_CAPACITY, Insertion::NewestFirst),
        Element::RealtimeEvents => Feed::new(THREAT_FEED_CAPACITY, Insertion::NewestFirst)
            .with_placeholder(THREAT_FEED_CONNECTING),
        Element::PentestOutput => {
            Feed::new(LOG_CAPACITY, Insertion::NewestLast).with_placeholder(PENTEST_CONNECTING)
        }
        Element::TrafficLog => Feed::new(LOG_CAPACITY, Insertion::NewestLast)
            .with_placeholder("> Monitoring idle"),
        Element::RealtimeTrafficLog => Feed::new(LOG_CAPACITY, Insertion::NewestLast)
            .with_placeholder("> Real-time IDS idle"),
        Element::RecentAlerts => {
            Feed::new(ALERTS_CAPACITY, Insertion::NewestFirst).with_placeholder(NO_ALERTS)
        }
        Element::RealtimeAlerts => {
            Feed::new(ALERTS_CAPACITY, Insertion::NewestFirst).with_placeholder(NO_LIVE_ALERTS)
        }
        _ => Feed::new(LOG_CAPACITY, Insertion::NewestLast),
    }
}
