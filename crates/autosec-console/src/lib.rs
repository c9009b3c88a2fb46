//! Presentation layer for a vehicle security monitoring console.
//!
//! Two controllers drive a [`View`]: the [`Dashboard`] reacts to server
//! events (CAN bus, scanner, pentest, IDS) and the [`IdsPanel`] runs a local
//! traffic simulator next to a server-driven real-time IDS view. Server
//! traffic goes through an [`EventChannel`].

pub mod bounded;
pub mod channel;
pub mod clock;
pub mod dashboard;
pub mod ids;
pub mod protocol;
pub mod random;
pub mod schedule;
pub mod summary;
pub mod view;

pub use bounded::{BoundedList, Insertion};
pub use channel::{ChannelConfig, ChannelError, EventChannel, RecordingChannel, TcpChannel};
pub use clock::{Clock, FixedClock, LocalClock};
pub use dashboard::{Command, Dashboard, DashboardSettings};
pub use ids::IdsPanel;
pub use protocol::{ChannelEvent, Inbound, Outbound, ProtocolError, Severity};
pub use random::{RandomSource, ScriptedRandom, StdRandom};
pub use summary::{Format, SessionSummary};
pub use view::{Element, FeedEntry, Section, View};
