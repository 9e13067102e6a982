pub mod chart;
#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod ir;
pub mod layout;
pub mod layout_dump;
pub mod navigation;
pub mod parser;
pub mod render;
pub mod theme;

pub use chart::{OrgChart, SearchHit};
#[cfg(feature = "cli")]
pub use cli::run;
pub use config::{Config, LayoutConfig, RenderConfig, ViewportConfig, load_config};
pub use ir::{NodeRecord, TreeNode};
pub use layout::{CanvasMetrics, Dimension, Layout, LayoutError, Position, compute_layout};
pub use navigation::{Highlight, NavigationError, Query, ScrollTarget, find, scroll_target_for};
pub use parser::parse_tree;
pub use render::render_svg;
pub use theme::Theme;
