/// Represents which UI component has focus
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Focus {
    Sections,
    NodeDetails,
}

/// Connection state as last reported by the event channel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Link {
    Connecting,
    Connected,
    Disconnected,
}

impl Link {
    pub(crate) fn label(&self) -> &'static str {
        match self {
            Link::Connecting => "connecting",
            Link::Connected => "online",
            Link::Disconnected => "offline",
        }
    }
}
