use crate::config::{LayoutConfig, Orientation, load_config};
use crate::layout::Sankey;
use crate::layout_dump::{text_dump, write_layout_dump};
use crate::parser::parse_data;
use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "sankey-layout", version, about = "Sankey diagram layout engine")]
pub struct Args {
    /// Input file (.json, .json5 or sankey CSV text) or '-' for stdin
    #[arg(short = 'i', long = "input")]
    pub input: Option<PathBuf>,

    /// Output file. Defaults to stdout if omitted.
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,

    /// Output format
    #[arg(short = 'e', long = "outputFormat", value_enum, default_value = "text")]
    pub output_format: OutputFormat,

    /// Layout config JSON file
    #[arg(short = 'c', long = "configFile")]
    pub config: Option<PathBuf>,

    /// Layer direction; overrides the config file
    #[arg(long = "orient", value_enum)]
    pub orient: Option<OrientArg>,

    /// Gap between nodes of one layer; overrides the config file
    #[arg(long = "padding")]
    pub padding: Option<f32>,

    /// Container width
    #[arg(short = 'w', long = "width")]
    pub width: Option<f32>,

    /// Container height
    #[arg(short = 'H', long = "height")]
    pub height: Option<f32>,
}

#[derive(ValueEnum, Debug, Clone, Copy)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(ValueEnum, Debug, Clone, Copy)]
pub enum OrientArg {
    Horizontal,
    Vertical,
}

pub fn run() -> Result<()> {
    init_tracing();
    let args = Args::parse();
    let config = apply_overrides(load_config(args.config.as_deref())?, &args);

    let input = read_input(args.input.as_deref())?;
    let data = parse_data(&input).context("failed to parse input data")?;
    let sankey = Sankey::new(&data, config)?;
    let layout = sankey.layout();
    tracing::info!(
        nodes = layout.nodes.len(),
        links = layout.links.len(),
        layers = layout.max_layer + 1,
        "layout computed"
    );

    match args.output_format {
        OutputFormat::Json => write_layout_dump(args.output.as_deref(), &layout)?,
        OutputFormat::Text => write_text(&text_dump(&layout), args.output.as_deref())?,
    }
    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();
}

fn apply_overrides(mut config: LayoutConfig, args: &Args) -> LayoutConfig {
    if let Some(orient) = args.orient {
        config.orientation = match orient {
            OrientArg::Horizontal => Orientation::Horizontal,
            OrientArg::Vertical => Orientation::Vertical,
        };
    }
    if let Some(padding) = args.padding {
        config.padding = padding;
    }
    if let Some(width) = args.width {
        config.width = width;
    }
    if let Some(height) = args.height {
        config.height = height;
    }
    config
}

fn read_input(path: Option<&Path>) -> Result<String> {
    if let Some(path) = path {
        if path != Path::new("-") {
            return std::fs::read_to_string(path)
                .with_context(|| format!("failed to read {}", path.display()));
        }
    }
    let mut buf = String::new();
    io::stdin().read_to_string(&mut buf)?;
    Ok(buf)
}

fn write_text(text: &str, output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => std::fs::write(path, format!("{text}\n"))
            .with_context(|| format!("failed to write {}", path.display()))?,
        None => {
            let mut stdout = io::stdout().lock();
            writeln!(stdout, "{text}")?;
        }
    }
    Ok(())
}
