use crate::chart::OrgChart;
use crate::config::load_config;
use crate::layout_dump::{LayoutDump, write_layout_dump};
use crate::navigation::{Query, ScrollTarget};
use crate::parser::parse_tree;
use crate::render::{render_svg, write_output_svg};
use anyhow::Result;
use clap::{Parser, ValueEnum};
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "orgc", version, about = "Org chart layout and navigation")]
pub struct Args {
    /// Input file (JSON/JSON5 tree or record list) or '-' for stdin
    #[arg(short = 'i', long = "input")]
    pub input: Option<PathBuf>,

    /// Output file. Defaults to stdout if omitted.
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,

    /// Output format
    #[arg(short = 'e', long = "outputFormat", value_enum, default_value = "svg")]
    pub output_format: OutputFormat,

    /// Config JSON file
    #[arg(short = 'c', long = "configFile")]
    pub config: Option<PathBuf>,

    /// Viewport width
    #[arg(short = 'w', long = "width")]
    pub width: Option<f32>,

    /// Viewport height
    #[arg(short = 'H', long = "height")]
    pub height: Option<f32>,

    /// Search text; the first match in pre-order is highlighted
    #[arg(short = 'f', long = "find")]
    pub find: Option<String>,

    /// Restrict --find to one display field (e.g. matricule)
    #[arg(long = "field", requires = "find")]
    pub field: Option<String>,

    /// Node id to highlight and scroll to
    #[arg(long = "highlight")]
    pub highlight: Option<String>,
}

#[derive(ValueEnum, Debug, Clone, Copy)]
pub enum OutputFormat {
    Svg,
    Png,
    Json,
}

pub fn run() -> Result<()> {
    let args = Args::parse();
    init_tracing();

    let mut config = load_config(args.config.as_deref())?;
    if let Some(width) = args.width {
        config.viewport.width = width;
    }
    if let Some(height) = args.height {
        config.viewport.height = height;
    }

    let input = read_input(args.input.as_deref())?;
    let tree = parse_tree(&input, config.layout.max_depth)?;

    let mut chart = OrgChart::new(config);
    chart.set_tree(tree)?;

    if let Some(id) = args.highlight.clone() {
        chart.highlight(Some(id.clone()));
        if let Err(err) = chart.request_scroll(&id) {
            eprintln!("{err}");
        }
    }
    if let Some(needle) = args.find.as_deref() {
        let query = match args.field.as_deref() {
            Some(field) => Query::field(field, needle),
            None => Query::text(needle),
        };
        match chart.search(&query) {
            Some(hit) => tracing::info!(id = %hit.node.id, "search matched"),
            None => eprintln!("no node matches \"{needle}\""),
        }
    }
    // Nothing mounts here, so the surface is ready as soon as layout exists.
    let scroll = chart.surface_ready();
    if let Some(ScrollTarget { x, y }) = scroll {
        eprintln!("scroll target: x={x:.1} y={y:.1}");
    }

    let config = chart.config();
    let layout = chart.layout();
    match args.output_format {
        OutputFormat::Json => {
            let dump = LayoutDump::from_layout(&layout, chart.tree(), chart.highlight_state())
                .with_scroll(scroll);
            write_layout_dump(args.output.as_deref(), &dump)?;
        }
        OutputFormat::Svg | OutputFormat::Png => {
            let svg = render_svg(
                &layout,
                chart.tree(),
                chart.highlight_state(),
                &config.theme,
                &config.layout,
                &config.render,
            );
            write_image(&svg, args.output_format, args.output.as_deref(), config)?;
        }
    }
    Ok(())
}

fn write_image(
    svg: &str,
    format: OutputFormat,
    output: Option<&Path>,
    config: &crate::config::Config,
) -> Result<()> {
    match format {
        #[cfg(feature = "png")]
        OutputFormat::Png => {
            let output = ensure_output(output, "png")?;
            crate::render::write_output_png(svg, output, &config.theme)
        }
        #[cfg(not(feature = "png"))]
        OutputFormat::Png => {
            let _ = config;
            Err(anyhow::anyhow!("PNG output requires the `png` feature"))
        }
        _ => write_output_svg(svg, output),
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();
}

fn read_input(path: Option<&Path>) -> Result<String> {
    if let Some(path) = path
        && path != Path::new("-")
    {
        return Ok(std::fs::read_to_string(path)?);
    }
    let mut buf = String::new();
    io::stdin().read_to_string(&mut buf)?;
    Ok(buf)
}

#[cfg(feature = "png")]
fn ensure_output<'a>(output: Option<&'a Path>, ext: &str) -> Result<&'a Path> {
    output.ok_or_else(|| anyhow::anyhow!("Output path required for {} output", ext))
}
