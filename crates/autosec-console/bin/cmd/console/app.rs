use autosec_console::channel::{default_reconnect_delay, default_server};
use autosec_console::ids::topology::VEHICLE_NODES;
use autosec_console::{
    ChannelConfig, ChannelEvent, Command, Dashboard, DashboardSettings, Format, IdsPanel,
    LocalClock, Section, SessionSummary, StdRandom, TcpChannel, View,
};
use clap::Parser;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use eyre::{eyre, Result};
use ratatui::{
    layout::{Constraint, Direction, Layout},
    DefaultTerminal, Frame,
};
use std::io;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use super::state::{Focus, Link};
use super::views::bottom_bar::render_bottom_bar;
use super::views::dashboard::render_dashboard_section;
use super::views::ids_panel::render_ids_panel;
use super::views::node_popup::render_node_popup;
use super::views::tabs::render_tabs;
use crate::cmd::init_file_logger;

#[derive(Debug, Parser)]
pub struct ConsoleArgs {
    /// Event server address (host:port)
    #[arg(long, default_value_t = default_server())]
    pub server: String,

    /// Scan type sent with `start_scan`
    #[arg(long, default_value = "quick")]
    pub scan_type: String,

    /// Profile sent with `start_pentest`
    #[arg(long, default_value = "basic")]
    pub pentest_profile: String,

    /// Delay between reconnection attempts, in milliseconds
    #[arg(long)]
    pub reconnect_ms: Option<u64>,

    /// Seed for the traffic simulator
    #[arg(long)]
    pub seed: Option<u64>,

    /// Write logs to this file (the terminal is owned by the UI)
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// Session summary printed on exit: table, json or json-pretty
    #[arg(long, default_value = "table")]
    pub summary: Format,
}

pub(crate) struct App {
    view: View,
    dashboard: Dashboard<LocalClock>,
    ids: IdsPanel<StdRandom, LocalClock>,
    channel: TcpChannel,
    server: String,
    link: Link,
    rejected: u64,
    exit: bool,
    focus: Focus,
    selected_node: usize,
    started: Instant,
}

impl ConsoleArgs {
    pub fn run(&self) -> Result<()> {
        if let Some(path) = &self.log_file {
            init_file_logger(path)?;
        }

        let config = ChannelConfig {
            server: self.server.clone(),
            reconnect_delay: self
                .reconnect_ms
                .map(Duration::from_millis)
                .unwrap_or_else(default_reconnect_delay),
        };
        let channel = TcpChannel::connect(&config)
            .map_err(|e| eyre!("Cannot open event channel to {}: {}", self.server, e))?;

        let rng = match self.seed {
            Some(seed) => StdRandom::seeded(seed),
            None => StdRandom::from_entropy(),
        };

        let settings = DashboardSettings {
            scan_type: self.scan_type.clone(),
            pentest_profile: self.pentest_profile.clone(),
        };

        let mut app = App {
            view: View::new(),
            dashboard: Dashboard::new(settings, LocalClock),
            ids: IdsPanel::new(rng, LocalClock),
            channel,
            server: self.server.clone(),
            link: Link::Connecting,
            rejected: 0,
            exit: false,
            focus: Focus::Sections,
            selected_node: 0,
            started: Instant::now(),
        };

        let mut terminal = ratatui::init();
        let app_result = app.run(&mut terminal);
        ratatui::restore();
        app_result.map_err(|e| eyre!("TUI error: {}", e))?;

        SessionSummary::collect(
            &app.server,
            app.started.elapsed(),
            &app.dashboard,
            &app.ids,
            app.rejected,
        )
        .print(self.summary);
        Ok(())
    }
}

impl App {
    pub fn run(&mut self, terminal: &mut DefaultTerminal) -> io::Result<()> {
        while !self.exit {
            self.drain_channel();
            self.ids.poll(&mut self.view, Instant::now());

            terminal.draw(|frame| self.draw(frame))?;

            self.handle_events()?;
        }
        Ok(())
    }

    fn drain_channel(&mut self) {
        let events: Vec<ChannelEvent> = self.channel.events().try_iter().collect();
        for event in events {
            self.apply(&event);
        }
    }

    fn apply(&mut self, event: &ChannelEvent) {
        match event {
            ChannelEvent::Connected | ChannelEvent::Reconnected { .. } => {
                self.link = Link::Connected;
            }
            ChannelEvent::Disconnected | ChannelEvent::ConnectError(_) => {
                self.link = Link::Disconnected;
            }
            ChannelEvent::Rejected { reason } => {
                self.rejected += 1;
                log::warn!("rejected inbound message: {}", reason);
            }
            ChannelEvent::Message(inbound) => {
                log::debug!("inbound `{}`", inbound.name());
            }
        }
        self.dashboard.handle(&mut self.view, event);
        self.ids.handle(&mut self.view, event);
    }

    fn draw(&mut self, frame: &mut Frame) {
        let area = frame.area();
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Min(10),
                Constraint::Length(3),
            ])
            .split(area);

        let section = self.view.active_section();
        render_tabs(frame, chunks[0], section, self.link, &self.server);

        let now = Instant::now();
        match section {
            Section::IdsPanel => render_ids_panel(
                frame,
                chunks[1],
                &self.view,
                self.ids.simulated.map(),
                self.selected_node,
                now,
            ),
            _ => render_dashboard_section(frame, chunks[1], &self.view),
        }

        render_bottom_bar(frame, chunks[2], section, self.focus);

        if self.focus == Focus::NodeDetails {
            if let Some(details) = self.selected_node_details(now) {
                render_node_popup(&details, area, frame);
            }
        }
    }

    fn handle_events(&mut self) -> io::Result<()> {
        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key_event) = event::read()? {
                if key_event.kind == KeyEventKind::Press {
                    self.handle_key_event(key_event);
                }
            }
        }
        Ok(())
    }

    fn handle_key_event(&mut self, key_event: KeyEvent) {
        let now = Instant::now();
        match key_event.code {
            KeyCode::Char('q') | KeyCode::Char('Q') => self.exit(),
            KeyCode::Esc => self.focus = Focus::Sections,
            KeyCode::Left | KeyCode::Char('h') => {
                self.select_section(self.view.active_section().previous())
            }
            KeyCode::Right | KeyCode::Char('l') => {
                self.select_section(self.view.active_section().next())
            }
            KeyCode::Char(c @ '1'..='6') => {
                let index = c as usize - '1' as usize;
                self.select_section(Section::ALL[index]);
            }
            KeyCode::Char('c') => self.click(Command::ToggleCan),
            KeyCode::Char('s') => self.click(Command::RunScan),
            KeyCode::Char('p') => self.click(Command::RunPentest),
            KeyCode::Char('i') => self.click(Command::ToggleIds),
            KeyCode::Char('P') => self.dashboard.stop_pentest(&self.channel),
            KeyCode::Char('m') => {
                self.ids.simulated.start(&mut self.view, now);
            }
            KeyCode::Char('x') => self.ids.simulated.stop(&mut self.view),
            KeyCode::Char('b') => self.ids.simulated.block_all(&mut self.view, now),
            KeyCode::Char('z') => self.ids.reset(&mut self.view),
            KeyCode::Char('r') => {
                self.ids.realtime.start(&mut self.view, &self.channel);
            }
            KeyCode::Char('t') => self.ids.realtime.stop(&mut self.view, &self.channel),
            KeyCode::Char('C') => self.ids.realtime.clear_alerts(&mut self.view),
            KeyCode::Up | KeyCode::Char('k') => self.select_previous_node(),
            KeyCode::Down | KeyCode::Char('j') => self.select_next_node(),
            KeyCode::Enter | KeyCode::Char('o') => self.toggle_node_details(),
            _ => {}
        }
    }

    fn click(&mut self, command: Command) {
        self.dashboard
            .click(&mut self.view, &self.channel, command);
    }

    fn select_section(&mut self, section: Section) {
        self.focus = Focus::Sections;
        self.dashboard.select_section(&mut self.view, section);
    }

    fn select_previous_node(&mut self) {
        if self.view.active_section() == Section::IdsPanel {
            self.selected_node = self.selected_node.saturating_sub(1);
        }
    }

    fn select_next_node(&mut self) {
        if self.view.active_section() == Section::IdsPanel {
            self.selected_node = (self.selected_node + 1).min(VEHICLE_NODES.len() - 1);
        }
    }

    fn toggle_node_details(&mut self) {
        self.focus = match self.focus {
            Focus::NodeDetails => Focus::Sections,
            Focus::Sections if self.view.active_section() == Section::IdsPanel => {
                Focus::NodeDetails
            }
            Focus::Sections => Focus::Sections,
        };
    }

    fn selected_node_details(&self, now: Instant) -> Option<String> {
        let map = self.ids.simulated.map();
        let node = map.nodes().get(self.selected_node)?;
        self.ids.simulated.node_details(node.spec.id, now)
    }

    fn exit(&mut self) {
        self.exit = true;
    }
}
