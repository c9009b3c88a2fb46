//! Wire protocol of the event channel.
//!
//! Every message is one JSON object per line:
//!
//! ```json
//! {"event": "scan_complete", "data": {"findings": 5, "last_scan": "12:00:00"}}
//! ```
//!
//! Inbound lines are decoded into [`Inbound`] at the boundary; anything with
//! an unknown event name or a malformed payload is rejected before it can
//! reach a controller.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// Severity attached to events, alerts and log lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, PartialOrd, Ord)]
pub enum Severity {
    #[default]
    Info,
    Success,
    Low,
    Medium,
    Warning,
    High,
    Error,
    Critical,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Info => "info",
            Severity::Success => "success",
            Severity::Low => "low",
            Severity::Medium => "medium",
            Severity::Warning => "warning",
            Severity::High => "high",
            Severity::Error => "error",
            Severity::Critical => "critical",
        }
    }

    /// Upper-case tag used in rendered lines, e.g. `CRITICAL`.
    pub fn label(&self) -> String {
        self.as_str().to_uppercase()
    }

    /// High and critical alerts count as threats.
    pub fn is_threat(&self) -> bool {
        matches!(self, Severity::High | Severity::Critical)
    }

    /// Unknown strings fall back to `Info`.
    pub fn parse_lenient(s: &str) -> Self {
        match s.to_ascii_lowercase().as_str() {
            "success" => Severity::Success,
            "low" => Severity::Low,
            "medium" => Severity::Medium,
            "warning" | "warn" => Severity::Warning,
            "high" => Severity::High,
            "error" => Severity::Error,
            "critical" => Severity::Critical,
            _ => Severity::Info,
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl Serialize for Severity {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Severity {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Ok(Severity::parse_lenient(&s))
    }
}

/// Raw envelope as it travels over the wire.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Envelope {
    pub event: String,
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub data: Value,
}

#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    #[error("malformed envelope: {0}")]
    Envelope(#[source] serde_json::Error),
    #[error("unknown event `{0}`")]
    UnknownEvent(String),
    #[error("invalid `{event}` payload: {source}")]
    Payload {
        event: String,
        #[source]
        source: serde_json::Error,
    },
}

/// `status` payload of `can_status` and `ids_status`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusUpdate {
    pub status: String,
}

impl StatusUpdate {
    pub fn is_active(&self) -> bool {
        self.status == "active"
    }
}

/// Progress payload shared by `scan_update` and `pentest_update`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProgressUpdate {
    #[serde(default)]
    pub progress: Option<f64>,
    #[serde(default)]
    pub finding: Option<String>,
    #[serde(default)]
    pub severity: Option<Severity>,
}

impl ProgressUpdate {
    /// Progress as a whole percentage; zero or absent progress yields `None`.
    pub fn percent(&self) -> Option<u8> {
        self.progress
            .filter(|p| p.is_finite() && *p > 0.0)
            .map(|p| p.round().clamp(0.0, 100.0) as u8)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScanComplete {
    #[serde(default)]
    pub last_scan: String,
    #[serde(default)]
    pub findings: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PentestStarted {
    pub target: String,
    pub scan_type: String,
    #[serde(default)]
    pub timestamp: Option<String>,
}

/// One line of streamed pentest output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputLine {
    pub message: String,
    #[serde(default)]
    pub level: Severity,
    #[serde(default)]
    pub timestamp: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IdsAlert {
    pub message: String,
    #[serde(default)]
    pub severity: Option<Severity>,
    #[serde(default)]
    pub level: Severity,
    #[serde(rename = "type", default = "default_alert_type")]
    pub kind: String,
    #[serde(default)]
    pub timestamp: Option<String>,
}

fn default_alert_type() -> String {
    "general".to_string()
}

impl IdsAlert {
    /// `severity` when the server sends it, otherwise `level`.
    pub fn effective_severity(&self) -> Severity {
        self.severity.unwrap_or(self.level)
    }
}

/// Aggregate numbers the threat generator attaches to `realtime_threat`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ThreatStats {
    pub threats: u64,
    pub rate: u64,
    pub safety: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RealtimeThreat {
    pub message: String,
    #[serde(default)]
    pub level: Severity,
    #[serde(default)]
    pub timestamp: Option<String>,
    #[serde(default)]
    pub stats: Option<ThreatStats>,
}

/// Named events pushed by the server.
#[derive(Debug, Clone, PartialEq)]
pub enum Inbound {
    CanStatus(StatusUpdate),
    CanMessage,
    ScanUpdate(ProgressUpdate),
    ScanComplete(ScanComplete),
    PentestUpdate(ProgressUpdate),
    PentestComplete,
    PentestStarted(PentestStarted),
    PentestOutput(OutputLine),
    IdsStatus(StatusUpdate),
    IdsAlert(IdsAlert),
    RealtimeThreat(RealtimeThreat),
}

impl Inbound {
    pub fn name(&self) -> &'static str {
        match self {
            Inbound::CanStatus(_) => "can_status",
            Inbound::CanMessage => "can_message",
            Inbound::ScanUpdate(_) => "scan_update",
            Inbound::ScanComplete(_) => "scan_complete",
            Inbound::PentestUpdate(_) => "pentest_update",
            Inbound::PentestComplete => "pentest_complete",
            Inbound::PentestStarted(_) => "pentest_started",
            Inbound::PentestOutput(_) => "pentest_output",
            Inbound::IdsStatus(_) => "ids_status",
            Inbound::IdsAlert(_) => "ids_alert",
            Inbound::RealtimeThreat(_) => "realtime_threat",
        }
    }

    /// Decodes one wire line.
    pub fn from_line(line: &str) -> Result<Self, ProtocolError> {
        let envelope: Envelope =
            serde_json::from_str(line.trim()).map_err(ProtocolError::Envelope)?;
        Self::from_envelope(envelope)
    }

    pub fn from_envelope(envelope: Envelope) -> Result<Self, ProtocolError> {
        let Envelope { event, data } = envelope;

        fn payload<T: serde::de::DeserializeOwned>(
            event: &str,
            data: Value,
        ) -> Result<T, ProtocolError> {
            // `data: null` and a missing `data` both mean "no fields"
            let data = if data.is_null() { json!({}) } else { data };
            serde_json::from_value(data).map_err(|source| ProtocolError::Payload {
                event: event.to_string(),
                source,
            })
        }

        let inbound = match event.as_str() {
            "can_status" => Inbound::CanStatus(payload(&event, data)?),
            "can_message" => Inbound::CanMessage,
            "scan_update" => Inbound::ScanUpdate(payload(&event, data)?),
            "scan_complete" => Inbound::ScanComplete(payload(&event, data)?),
            "pentest_update" => Inbound::PentestUpdate(payload(&event, data)?),
            "pentest_complete" => Inbound::PentestComplete,
            "pentest_started" => Inbound::PentestStarted(payload(&event, data)?),
            "pentest_output" => Inbound::PentestOutput(payload(&event, data)?),
            "ids_status" => Inbound::IdsStatus(payload(&event, data)?),
            "ids_alert" => Inbound::IdsAlert(payload(&event, data)?),
            "realtime_threat" => Inbound::RealtimeThreat(payload(&event, data)?),
            _ => return Err(ProtocolError::UnknownEvent(event)),
        };
        Ok(inbound)
    }
}

/// Commands emitted towards the server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outbound {
    ToggleCanMonitoring,
    StartScan { scan_type: String },
    StartPentest { profile: String },
    StopPentest,
    ToggleIds,
    StartIds,
    StopIds,
}

impl Outbound {
    pub fn name(&self) -> &'static str {
        match self {
            Outbound::ToggleCanMonitoring => "toggle_can_monitoring",
            Outbound::StartScan { .. } => "start_scan",
            Outbound::StartPentest { .. } => "start_pentest",
            Outbound::StopPentest => "stop_pentest",
            Outbound::ToggleIds => "toggle_ids",
            Outbound::StartIds => "start_ids",
            Outbound::StopIds => "stop_ids",
        }
    }

    pub fn to_envelope(&self) -> Envelope {
        let data = match self {
            Outbound::StartScan { scan_type } => json!({ "scan_type": scan_type }),
            Outbound::StartPentest { profile } => json!({ "profile": profile }),
            _ => Value::Null,
        };
        Envelope {
            event: self.name().to_string(),
            data,
        }
    }

    /// Serialized wire line, without the trailing newline.
    pub fn to_line(&self) -> String {
        serde_json::to_string(&self.to_envelope()).unwrap_or_else(|_| {
            // Envelope holds only strings and a json Value; serialization cannot fail
            format!("{{\"event\":\"{}\"}}", self.name())
        })
    }
}

/// Everything the channel client hands to the UI: decoded messages plus the
/// connection lifecycle.
#[derive(Debug, Clone, PartialEq)]
pub enum ChannelEvent {
    Connected,
    Reconnected { attempts: u32 },
    Disconnected,
    ConnectError(String),
    Message(Inbound),
    Rejected { reason: String },
}
