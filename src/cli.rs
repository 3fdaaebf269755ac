use crate::config::{Config, load_config};
use crate::layout::{Bounds, LayoutMode, TreeLayout, compute_layout};
use crate::layout_dump::write_layout_dump;
use crate::metadata::{MetadataLookup, bind_metadata};
use crate::parser::parse_newick;
use crate::render::{render_svg, write_output_svg};
use anyhow::Result;
use clap::{Parser, ValueEnum};
use std::io::{self, Read};
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(name = "phyr", version, about = "Newick phylogram/dendrogram renderer")]
pub struct Args {
    /// Input file (.nwk) or '-' for stdin
    #[arg(short = 'i', long = "input")]
    pub input: Option<PathBuf>,

    /// Output file (svg/png/json). Defaults to stdout for SVG if omitted.
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,

    /// Output format
    #[arg(short = 'e', long = "outputFormat", value_enum, default_value = "svg")]
    pub output_format: OutputFormat,

    /// Config JSON/JSON5 file
    #[arg(short = 'c', long = "configFile")]
    pub config: Option<PathBuf>,

    /// Metadata lookup tables (JSON)
    #[arg(short = 'm', long = "metadata")]
    pub metadata: Option<PathBuf>,

    /// Leaf name of the query element
    #[arg(short = 'q', long = "query")]
    pub query: Option<String>,

    /// Depth-axis mode
    #[arg(long = "mode", value_enum)]
    pub mode: Option<ModeArg>,

    /// Pull all leaves to the far depth edge
    #[arg(long = "align-leaves")]
    pub align_leaves: bool,

    /// Canvas width
    #[arg(short = 'w', long = "width", default_value_t = 800.0)]
    pub width: f32,

    /// Canvas height
    #[arg(short = 'H', long = "height", default_value_t = 600.0)]
    pub height: f32,
}

#[derive(ValueEnum, Debug, Clone, Copy)]
pub enum OutputFormat {
    Svg,
    Png,
    Json,
}

#[derive(ValueEnum, Debug, Clone, Copy)]
pub enum ModeArg {
    Dendrogram,
    Phylogram,
}

impl From<ModeArg> for LayoutMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Dendrogram => LayoutMode::Dendrogram,
            ModeArg::Phylogram => LayoutMode::Phylogram,
        }
    }
}

pub fn run() -> Result<()> {
    let args = Args::parse();
    let mut config = load_config(args.config.as_deref())?;
    config.render.width = args.width;
    config.render.height = args.height;
    if let Some(mode) = args.mode {
        config.layout.mode = mode.into();
    }
    if args.align_leaves {
        config.layout.align_leaves = true;
    }
    if args.query.is_some() {
        config.render.query_name = args.query.clone();
    }

    let input = read_input(args.input.as_deref())?;
    let mut tree = parse_newick(&input)?;

    let mut lookup = match args.metadata.as_deref() {
        Some(path) => read_lookup(path)?,
        None => MetadataLookup::default(),
    };
    if args.query.is_some() {
        lookup.query = args.query.clone();
    }
    if config.render.query_name.is_none() {
        config.render.query_name = lookup.query.clone();
    }
    bind_metadata(&mut tree, &lookup);

    let layout = layout_with_recommended_extent(&tree, &mut config)?;

    match args.output_format {
        OutputFormat::Svg => {
            let svg = render_svg(&layout, &config.theme, &config.render);
            write_output_svg(&svg, args.output.as_deref())?;
        }
        OutputFormat::Png => {
            let output = ensure_output(&args.output, "png")?;
            write_png(&layout, &config, &output)?;
        }
        OutputFormat::Json => {
            let output = ensure_output(&args.output, "json")?;
            write_layout_dump(&output, &layout)?;
        }
    }

    Ok(())
}

/// Lays out the tree, growing the canvas laterally when the leaf count
/// needs more room than the requested width allows.
fn layout_with_recommended_extent(
    tree: &crate::ir::TreeNode,
    config: &mut Config,
) -> Result<TreeLayout> {
    let bounds = Bounds::new(config.render.width, config.render.height);
    let layout = compute_layout(tree, bounds, &config.layout)?;
    if layout.recommended_width <= bounds.width {
        return Ok(layout);
    }
    config.render.width = layout.recommended_width;
    let expanded = Bounds::new(layout.recommended_width, bounds.height);
    Ok(compute_layout(tree, expanded, &config.layout)?)
}

#[cfg(feature = "png")]
fn write_png(layout: &TreeLayout, config: &Config, output: &Path) -> Result<()> {
    let svg = render_svg(layout, &config.theme, &config.render);
    crate::render::write_output_png(&svg, output, &config.render)
}

#[cfg(not(feature = "png"))]
fn write_png(_layout: &TreeLayout, _config: &Config, _output: &Path) -> Result<()> {
    Err(anyhow::anyhow!(
        "PNG output requires building with the 'png' feature"
    ))
}

fn read_input(path: Option<&Path>) -> Result<String> {
    if let Some(path) = path {
        if path == Path::new("-") {
            let mut buf = String::new();
            io::stdin().read_to_string(&mut buf)?;
            return Ok(buf);
        }
        return Ok(std::fs::read_to_string(path)?);
    }
    let mut buf = String::new();
    io::stdin().read_to_string(&mut buf)?;
    Ok(buf)
}

fn read_lookup(path: &Path) -> Result<MetadataLookup> {
    let contents = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&contents)?)
}

fn ensure_output(output: &Option<PathBuf>, ext: &str) -> Result<PathBuf> {
    if let Some(path) = output {
        return Ok(path.clone());
    }
    Err(anyhow::anyhow!("Output path required for {} output", ext))
}
