use std::str::FromStr;
use std::time::Duration;

use prettytable::{Cell, Row, Table};
use serde::Serialize;

use crate::clock::Clock;
use crate::dashboard::Dashboard;
use crate::ids::IdsPanel;
use crate::random::RandomSource;

/// Format of the session summary printed when the console exits.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Format {
    #[default]
    Table,
    Json,
    JsonPretty,
}

impl FromStr for Format {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "table" => Ok(Format::Table),
            "json" => Ok(Format::Json),
            "json-pretty" | "json_pretty" => Ok(Format::JsonPretty),
            other => Err(format!("unknown summary format `{}`", other)),
        }
    }
}

/// Counters collected over one console session.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SessionSummary {
    pub runtime_secs: f64,
    pub server: String,
    pub can_messages: u64,
    pub ids_alerts: u64,
    pub scan_findings: u64,
    pub packets: u64,
    pub distinct_sources: usize,
    pub simulated_threats: u64,
    pub realtime_events: u64,
    pub realtime_threats: u64,
    pub rejected_messages: u64,
}

impl SessionSummary {
    pub fn collect<C, R, K>(
        server: &str,
        elapsed: Duration,
        dashboard: &Dashboard<C>,
        ids: &IdsPanel<R, K>,
        rejected_messages: u64,
    ) -> Self
    where
        C: Clock,
        R: RandomSource,
        K: Clock,
    {
        Self {
            runtime_secs: elapsed.as_secs_f64(),
            server: server.to_string(),
            can_messages: dashboard.can_messages(),
            ids_alerts: dashboard.ids_alerts(),
            scan_findings: dashboard.scan_findings(),
            packets: ids.simulated.packets(),
            distinct_sources: ids.simulated.distinct_sources(),
            simulated_threats: ids.simulated.threats(),
            realtime_events: ids.realtime.events(),
            realtime_threats: ids.realtime.threats(),
            rejected_messages,
        }
    }

    fn rows(&self) -> Vec<(&'static str, String)> {
        vec![
            ("Server", self.server.clone()),
            ("CAN messages", self.can_messages.to_string()),
            ("IDS alerts", self.ids_alerts.to_string()),
            ("Scan findings", self.scan_findings.to_string()),
            ("Simulated packets", self.packets.to_string()),
            ("Distinct sources", self.distinct_sources.to_string()),
            ("Simulated threats", self.simulated_threats.to_string()),
            ("Real-time events", self.realtime_events.to_string()),
            ("Real-time threats", self.realtime_threats.to_string()),
            ("Rejected messages", self.rejected_messages.to_string()),
        ]
    }

    pub fn render(&self, format: Format) -> Result<String, serde_json::Error> {
        match format {
            Format::Table => {
                let mut table = Table::new();
                table.add_row(Row::new(vec![Cell::new("Metric"), Cell::new("Value")]));
                for (name, value) in self.rows() {
                    table.add_row(Row::new(vec![Cell::new(name), Cell::new(&value)]));
                }
                Ok(format!(
                    "\n=== Session (runtime: {:.2}s) ===\n{}",
                    self.runtime_secs, table
                ))
            }
            Format::Json => serde_json::to_string(self),
            Format::JsonPretty => serde_json::to_string_pretty(self),
        }
    }

    pub fn print(&self, format: Format) {
        match self.render(format) {
            Ok(text) => println!("{}", text),
            Err(e) => eprintln!("Failed to serialize session summary: {}", e),
        }
    }
}
