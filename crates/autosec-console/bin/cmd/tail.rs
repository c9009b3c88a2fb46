use autosec_console::channel::{default_reconnect_delay, default_server};
use autosec_console::{ChannelConfig, ChannelEvent, Inbound, Severity, TcpChannel};
use clap::Parser;
use colored::{ColoredString, Colorize};
use eyre::{eyre, Result};

use super::init_term_logger;

#[derive(Debug, Parser)]
pub struct TailArgs {
    /// Event server address (host:port)
    #[arg(long, default_value_t = default_server())]
    pub server: String,

    /// Stop after this many inbound messages
    #[arg(long)]
    pub count: Option<u64>,
}

impl TailArgs {
    pub fn run(&self) -> Result<()> {
        init_term_logger()?;

        let config = ChannelConfig {
            server: self.server.clone(),
            reconnect_delay: default_reconnect_delay(),
        };
        let channel = TcpChannel::connect(&config)
            .map_err(|e| eyre!("Cannot open event channel to {}: {}", self.server, e))?;

        let mut seen = 0u64;
        while self.count.map_or(true, |limit| seen < limit) {
            let event = channel
                .events()
                .recv()
                .map_err(|_| eyre!("Event channel closed"))?;

            match &event {
                ChannelEvent::Message(inbound) => {
                    seen += 1;
                    let (severity, summary) = describe(inbound);
                    println!(
                        "{} {} {}",
                        timestamp().dimmed(),
                        format!("{:<16}", inbound.name()).cyan().bold(),
                        paint(severity, &summary)
                    );
                }
                ChannelEvent::Connected => {
                    println!("{}", format!("connected to {}", channel.addr()).green())
                }
                ChannelEvent::Reconnected { attempts } => {
                    println!("{}", format!("reconnected after {} attempts", attempts).green())
                }
                ChannelEvent::Disconnected => println!("{}", "disconnected".yellow()),
                ChannelEvent::ConnectError(reason) => {
                    println!("{}", format!("connect error: {}", reason).red())
                }
                ChannelEvent::Rejected { reason } => {
                    println!("{}", format!("rejected: {}", reason).magenta())
                }
            }
        }
        Ok(())
    }
}

fn timestamp() -> String {
    chrono::Local::now().format("%H:%M:%S").to_string()
}

fn paint(severity: Severity, text: &str) -> ColoredString {
    match severity {
        Severity::Critical => text.red().bold(),
        Severity::High | Severity::Error => text.red(),
        Severity::Medium | Severity::Warning => text.yellow(),
        Severity::Success => text.green(),
        Severity::Low | Severity::Info => text.normal(),
    }
}

fn describe(inbound: &Inbound) -> (Severity, String) {
    match inbound {
        Inbound::CanStatus(s) | Inbound::IdsStatus(s) => (Severity::Info, s.status.clone()),
        Inbound::CanMessage | Inbound::PentestComplete => (Severity::Info, String::new()),
        Inbound::ScanUpdate(u) | Inbound::PentestUpdate(u) => {
            let progress = u
                .percent()
                .map(|p| format!("{}%", p))
                .unwrap_or_else(|| "-".to_string());
            match &u.finding {
                Some(finding) => (
                    u.severity.unwrap_or_default(),
                    format!("{} {}", progress, finding),
                ),
                None => (Severity::Info, progress),
            }
        }
        Inbound::ScanComplete(done) => (
            Severity::Success,
            format!("{} findings at {}", done.findings, done.last_scan),
        ),
        Inbound::PentestStarted(started) => (
            Severity::Info,
            format!("{} ({})", started.target, started.scan_type),
        ),
        Inbound::PentestOutput(line) => (line.level, line.message.clone()),
        Inbound::IdsAlert(alert) => (
            alert.effective_severity(),
            format!("[{}] {}", alert.kind.to_uppercase(), alert.message),
        ),
        Inbound::RealtimeThreat(threat) => {
            let mut text = format!("[{}] {}", threat.level.label(), threat.message);
            if let Some(stats) = threat.stats {
                text.push_str(&format!(
                    " (threats {}, rate {}, safety {})",
                    stats.threats, stats.rate, stats.safety
                ));
            }
            (threat.level, text)
        }
    }
}
