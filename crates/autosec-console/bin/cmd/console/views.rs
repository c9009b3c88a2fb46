pub(crate) mod bottom_bar;
pub(crate) mod dashboard;
pub(crate) mod feed;
pub(crate) mod ids_panel;
pub(crate) mod network_map;
pub(crate) mod node_popup;
pub(crate) mod tabs;
