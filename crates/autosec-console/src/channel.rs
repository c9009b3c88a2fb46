//! Event channel client.
//!
//! A background thread keeps a TCP connection to the server, decodes the
//! newline-delimited JSON stream into [`ChannelEvent`]s and hands them to the
//! UI over an unbounded crossbeam channel. Lost connections are retried with
//! a fixed delay. Commands emitted while disconnected are buffered and sent
//! on the next connect.

use crossbeam_channel::{unbounded, Receiver, Sender};
use std::collections::VecDeque;
use std::io::{self, BufRead, BufReader, Write};
use std::net::{SocketAddr, TcpStream, ToSocketAddrs};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::protocol::{ChannelEvent, Inbound, Outbound};

const DEFAULT_SERVER: &str = "127.0.0.1:5000";
const DEFAULT_RECONNECT_MS: u64 = 2000;
const CONNECT_TIMEOUT: Duration = Duration::from_secs(20);
const READ_POLL: Duration = Duration::from_millis(250);
const WRITE_TIMEOUT: Duration = Duration::from_secs(2);

/// Default server address, overridable with `AUTOSEC_SERVER`.
pub fn default_server() -> String {
    std::env::var("AUTOSEC_SERVER").unwrap_or_else(|_| DEFAULT_SERVER.to_string())
}

/// Default reconnect delay, overridable with `AUTOSEC_RECONNECT_MS`.
pub fn default_reconnect_delay() -> Duration {
    let ms = std::env::var("AUTOSEC_RECONNECT_MS")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(DEFAULT_RECONNECT_MS);
    Duration::from_millis(ms)
}

#[derive(Debug, thiserror::Error)]
pub enum ChannelError {
    #[error("cannot resolve server address `{addr}`: {source}")]
    Resolve {
        addr: String,
        #[source]
        source: io::Error,
    },
    #[error("server address `{0}` resolved to nothing")]
    NoAddress(String),
    #[error("failed to spawn channel thread: {0}")]
    Spawn(#[source] io::Error),
}

/// Outbound half of the channel as seen by controllers.
pub trait EventChannel {
    fn emit(&self, message: Outbound);
}

#[derive(Debug, Clone)]
pub struct ChannelConfig {
    pub server: String,
    pub reconnect_delay: Duration,
}

impl Default for ChannelConfig {
    fn default() -> Self {
        Self {
            server: default_server(),
            reconnect_delay: default_reconnect_delay(),
        }
    }
}

#[derive(Default)]
struct Writer {
    stream: Option<TcpStream>,
    pending: VecDeque<String>,
}

impl Writer {
    fn send(&mut self, line: String) {
        if let Some(stream) = self.stream.as_mut() {
            match writeln!(stream, "{}", line) {
                Ok(()) => return,
                Err(e) => {
                    log::warn!("write failed, buffering until reconnect: {}", e);
                    // a partial line may be on the wire, so the connection is unusable
                    let _ = stream.shutdown(std::net::Shutdown::Both);
                    self.stream = None;
                }
            }
        }
        self.pending.push_back(line);
    }

    fn attach(&mut self, mut stream: TcpStream) {
        while let Some(line) = self.pending.pop_front() {
            if let Err(e) = writeln!(stream, "{}", line) {
                log::warn!("flush of buffered command failed: {}", e);
                self.pending.push_front(line);
                return;
            }
        }
        self.stream = Some(stream);
    }

    fn detach(&mut self) {
        if let Some(stream) = self.stream.take() {
            let _ = stream.shutdown(std::net::Shutdown::Both);
        }
    }
}

/// TCP client with automatic reconnect.
pub struct TcpChannel {
    writer: Arc<Mutex<Writer>>,
    events: Receiver<ChannelEvent>,
    shutdown: Arc<AtomicBool>,
    addr: SocketAddr,
}

impl TcpChannel {
    /// Resolves the server and starts the connection thread.
    ///
    /// Fails only when the address cannot be resolved; an unreachable server
    /// is reported through [`ChannelEvent::ConnectError`] and retried.
    pub fn connect(config: &ChannelConfig) -> Result<Self, ChannelError> {
        let addr = config
            .server
            .to_socket_addrs()
            .map_err(|source| ChannelError::Resolve {
                addr: config.server.clone(),
                source,
            })?
            .next()
            .ok_or_else(|| ChannelError::NoAddress(config.server.clone()))?;

        let (tx, rx) = unbounded::<ChannelEvent>();
        let writer = Arc::new(Mutex::new(Writer::default()));
        let shutdown = Arc::new(AtomicBool::new(false));

        let worker = Worker {
            addr,
            reconnect_delay: config.reconnect_delay,
            tx,
            writer: Arc::clone(&writer),
            shutdown: Arc::clone(&shutdown),
        };

        std::thread::Builder::new()
            .name("event-channel".into())
            .spawn(move || worker.run())
            .map_err(ChannelError::Spawn)?;

        log::info!("event channel targeting {}", addr);

        Ok(Self {
            writer,
            events: rx,
            shutdown,
            addr,
        })
    }

    /// Events decoded by the background thread, in arrival order.
    pub fn events(&self) -> &Receiver<ChannelEvent> {
        &self.events
    }

    pub fn addr(&self) -> SocketAddr {
        self.addr
    }
}

impl EventChannel for TcpChannel {
    fn emit(&self, message: Outbound) {
        log::debug!("emit {}", message.name());
        match self.writer.lock() {
            Ok(mut writer) => writer.send(message.to_line()),
            Err(poisoned) => poisoned.into_inner().send(message.to_line()),
        }
    }
}

impl Drop for TcpChannel {
    fn drop(&mut self) {
        self.shutdown.store(true, Ordering::Relaxed);
        if let Ok(mut writer) = self.writer.lock() {
            writer.detach();
        }
    }
}

struct Worker {
    addr: SocketAddr,
    reconnect_delay: Duration,
    tx: Sender<ChannelEvent>,
    writer: Arc<Mutex<Writer>>,
    shutdown: Arc<AtomicBool>,
}

impl Worker {
    fn stopped(&self) -> bool {
        self.shutdown.load(Ordering::Relaxed)
    }

    fn run(self) {
        let mut ever_connected = false;
        let mut attempts: u32 = 0;

        while !self.stopped() {
            match TcpStream::connect_timeout(&self.addr, CONNECT_TIMEOUT) {
                Ok(stream) => {
                    if let Err(e) = self.serve(stream, ever_connected, attempts) {
                        log::warn!("connection to {} lost: {}", self.addr, e);
                    }
                    ever_connected = true;
                    attempts = 0;
                    if self.stopped() {
                        break;
                    }
                    let _ = self.tx.send(ChannelEvent::Disconnected);
                }
                Err(e) => {
                    attempts = attempts.saturating_add(1);
                    log::warn!("connect to {} failed (attempt {}): {}", self.addr, attempts, e);
                    let _ = self.tx.send(ChannelEvent::ConnectError(e.to_string()));
                }
            }
            self.sleep_before_retry();
        }
        log::debug!("event channel thread stopped");
    }

    fn sleep_before_retry(&self) {
        let step = Duration::from_millis(50);
        let mut waited = Duration::ZERO;
        while waited < self.reconnect_delay && !self.stopped() {
            std::thread::sleep(step);
            waited += step;
        }
    }

    fn serve(&self, stream: TcpStream, reconnect: bool, attempts: u32) -> io::Result<()> {
        stream.set_read_timeout(Some(READ_POLL))?;
        let _ = stream.set_nodelay(true);
        let write_half = stream.try_clone()?;
        write_half.set_write_timeout(Some(WRITE_TIMEOUT))?;

        match self.writer.lock() {
            Ok(mut writer) => writer.attach(write_half),
            Err(poisoned) => poisoned.into_inner().attach(write_half),
        }

        log::info!("connected to {}", self.addr);
        let _ = self.tx.send(ChannelEvent::Connected);
        if reconnect {
            let _ = self.tx.send(ChannelEvent::Reconnected {
                attempts: attempts.max(1),
            });
        }

        let result = self.read_loop(stream);

        match self.writer.lock() {
            Ok(mut writer) => writer.detach(),
            Err(poisoned) => poisoned.into_inner().detach(),
        }
        result
    }

    fn read_loop(&self, stream: TcpStream) -> io::Result<()> {
        let mut reader = BufReader::new(stream);
        let mut buf: Vec<u8> = Vec::new();

        while !self.stopped() {
            match reader.read_until(b'\n', &mut buf) {
                Ok(0) => return Ok(()),
                Ok(_) => {
                    if buf.last() != Some(&b'\n') {
                        // EOF in the middle of a line
                        return Ok(());
                    }
                    self.dispatch(&buf);
                    buf.clear();
                }
                Err(e)
                    if matches!(
                        e.kind(),
                        io::ErrorKind::WouldBlock
                            | io::ErrorKind::TimedOut
                            | io::ErrorKind::Interrupted
                    ) =>
                {
                    continue;
                }
                Err(e) => return Err(e),
            }
        }
        Ok(())
    }

    fn dispatch(&self, raw: &[u8]) {
        let line = String::from_utf8_lossy(raw);
        let line = line.trim();
        if line.is_empty() {
            return;
        }
        let event = match Inbound::from_line(line) {
            Ok(inbound) => {
                log::debug!("received {}", inbound.name());
                ChannelEvent::Message(inbound)
            }
            Err(e) => {
                log::warn!("rejected inbound message: {}", e);
                ChannelEvent::Rejected {
                    reason: e.to_string(),
                }
            }
        };
        let _ = self.tx.send(event);
    }
}

/// Channel that records emitted commands instead of sending them.
///
/// Lets controllers run without a server, as the integration tests do.
#[derive(Debug, Default)]
pub struct RecordingChannel {
    sent: Mutex<Vec<Outbound>>,
}

impl RecordingChannel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sent(&self) -> Vec<Outbound> {
        match self.sent.lock() {
            Ok(sent) => sent.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    pub fn take(&self) -> Vec<Outbound> {
        match self.sent.lock() {
            Ok(mut sent) => std::mem::take(&mut *sent),
            Err(poisoned) => std::mem::take(&mut *poisoned.into_inner()),
        }
    }
}

impl EventChannel for RecordingChannel {
    fn emit(&self, message: Outbound) {
        log::debug!("recorded {}", message.name());
        match self.sent.lock() {
            Ok(mut sent) => sent.push(message),
            Err(poisoned) => poisoned.into_inner().push(message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{BufRead, BufReader, Write};
    use std::net::TcpListener;

    fn config_for(listener: &TcpListener) -> ChannelConfig {
        ChannelConfig {
            server: listener.local_addr().unwrap().to_string(),
            reconnect_delay: Duration::from_millis(100),
        }
    }

    fn next_event(channel: &TcpChannel) -> ChannelEvent {
        channel
            .events()
            .recv_timeout(Duration::from_secs(5))
            .expect("no channel event within 5s")
    }

    #[test]
    fn decodes_stream_and_sends_commands() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let channel = TcpChannel::connect(&config_for(&listener)).unwrap();

        let (mut server, _) = listener.accept().unwrap();
        assert_eq!(next_event(&channel), ChannelEvent::Connected);

        server
            .write_all(b"{\"event\":\"can_message\"}\n{\"event\":\"bogus\"}\n")
            .unwrap();
        assert_eq!(
            next_event(&channel),
            ChannelEvent::Message(Inbound::CanMessage)
        );
        assert!(matches!(
            next_event(&channel),
            ChannelEvent::Rejected { .. }
        ));

        channel.emit(Outbound::ToggleIds);
        let mut line = String::new();
        BufReader::new(server.try_clone().unwrap())
            .read_line(&mut line)
            .unwrap();
        assert_eq!(line.trim(), r#"{"event":"toggle_ids"}"#);
    }

    #[test]
    fn buffers_commands_until_connected_and_reports_reconnect() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let channel = TcpChannel::connect(&config_for(&listener)).unwrap();

        let (first, _) = listener.accept().unwrap();
        assert_eq!(next_event(&channel), ChannelEvent::Connected);
        drop(first);
        assert_eq!(next_event(&channel), ChannelEvent::Disconnected);

        // Emitted while the client is between connections
        channel.emit(Outbound::StartIds);

        let (second, _) = listener.accept().unwrap();
        assert_eq!(next_event(&channel), ChannelEvent::Connected);
        assert!(matches!(
            next_event(&channel),
            ChannelEvent::Reconnected { .. }
        ));

        let mut line = String::new();
        BufReader::new(second).read_line(&mut line).unwrap();
        assert_eq!(line.trim(), r#"{"event":"start_ids"}"#);
    }

    #[test]
    fn stalled_server_does_not_block_emit() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let channel = TcpChannel::connect(&config_for(&listener)).unwrap();

        // accepted but never read, so the socket buffers fill up
        let (_server, _) = listener.accept().unwrap();
        assert_eq!(next_event(&channel), ChannelEvent::Connected);

        let started = std::time::Instant::now();
        for _ in 0..400 {
            channel.emit(Outbound::StartScan {
                scan_type: "x".repeat(64 * 1024),
            });
        }
        assert!(
            started.elapsed() < Duration::from_secs(10),
            "emit blocked for {:?}",
            started.elapsed()
        );
        assert_eq!(next_event(&channel), ChannelEvent::Disconnected);
    }

    #[test]
    fn unresolvable_server_is_an_error() {
        let config = ChannelConfig {
            server: "definitely not an address".to_string(),
            reconnect_delay: Duration::from_millis(10),
        };
        assert!(TcpChannel::connect(&config).is_err());
    }

    #[test]
    fn recording_channel_keeps_order() {
        let channel = RecordingChannel::new();
        channel.emit(Outbound::StartIds);
        channel.emit(Outbound::StopIds);
        assert_eq!(channel.take(), vec![Outbound::StartIds, Outbound::StopIds]);
        assert!(channel.sent().is_empty());
    }
}
