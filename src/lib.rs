#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod ir;
pub mod layout;
pub mod layout_dump;
pub mod metadata;
pub mod parser;
pub mod render;
pub mod theme;
pub mod viewport;

#[cfg(feature = "cli")]
pub use cli::run;
pub use config::{Config, LayoutConfig, RenderConfig, load_config};
pub use ir::{LeafMetadata, TreeNode};
pub use layout::{Bounds, LayoutError, LayoutMode, TreeLayout, compute_layout, elbow_path};
pub use metadata::{MetadataLookup, bind_metadata};
pub use parser::{ParseError, parse_newick};
pub use render::{render_svg, render_svg_with_viewport};
pub use theme::Theme;
pub use viewport::{Viewport, ViewportLimits, ViewportTransform};
