#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod ir;
pub mod layout;
pub mod layout_dump;
pub mod parser;

#[cfg(feature = "cli")]
pub use cli::run;
pub use config::{LayeringStrategy, LayoutConfig, Margin, Orientation, load_config};
pub use ir::{LinkRecord, NodeRecord, SankeyData};
pub use layout::{
    LayoutError, Sankey, SankeyEvent, SankeyLayout, SankeyLinkLayout, SankeyNodeLayout,
    compute_sankey_layout,
};
pub use parser::{ParseError, parse_data};

/// Parses `input` (JSON/JSON5 or CSV text) and lays it out in one go.
pub fn layout_from_str(input: &str, config: &LayoutConfig) -> anyhow::Result<SankeyLayout> {
    let data = parse_data(input)?;
    Ok(compute_sankey_layout(&data, config)?)
}
