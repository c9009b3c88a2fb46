//! IDS panel: a local traffic simulator with its network map, and the
//! server-driven real-time view.

pub mod realtime;
pub mod simulator;
pub mod topology;

use std::time::Instant;

use crate::clock::Clock;
use crate::protocol::ChannelEvent;
use crate::random::RandomSource;
use crate::view::View;

pub use realtime::RealtimeMonitor;
pub use simulator::{SimulatedMonitor, TrafficEvent};
pub use topology::{MapLayout, NodeStatus, TopologyMap};

#[derive(Debug)]
pub struct IdsPanel<R: RandomSource, C: Clock> {
    pub simulated: SimulatedMonitor<R>,
    pub realtime: RealtimeMonitor<C>,
}

impl<R: RandomSource, C: Clock> IdsPanel<R, C> {
    pub fn new(rng: R, clock: C) -> Self {
        Self {
            simulated: SimulatedMonitor::new(rng),
            realtime: RealtimeMonitor::new(clock),
        }
    }

    /// Channel events only reach the real-time view.
    pub fn handle(&mut self, view: &mut View, event: &ChannelEvent) {
        self.realtime.handle(view, event);
    }

    pub fn poll(&mut self, view: &mut View, now: Instant) -> bool {
        self.simulated.poll(view, now)
    }

    /// Stops both monitors and clears the simulator counters.
    pub fn reset(&mut self, view: &mut View) {
        if self.simulated.is_active() {
            self.simulated.stop(view);
        }
        self.simulated.reset(view);
        self.realtime.clear_alerts(view);
    }
}
