//! qgantt CLI - Quarterly roadmap charts
//!
//! Command-line interface for rendering roadmap charts to SVG, PNG and PDF
//! and for inspecting their computed layout.

mod config;
mod input;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use config::Config;
use qgantt_core::{Chart, Renderer};
use qgantt_render::{ChartLayout, PdfRenderer, PngRenderer, RowPolicy, SvgRenderer};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "qgantt")]
#[command(author, version, about = "Quarterly roadmap Gantt charts", long_about = None)]
struct Cli {
    /// Verbose output (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// TOML file overriding layout metrics
    #[arg(long, env = "QGANTT_CONFIG", global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render a chart
    Render {
        /// Chart or chart store JSON file
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Output format (inferred from the output extension, else svg)
        #[arg(short, long, value_enum)]
        format: Option<Format>,

        /// Output file (stdout if not specified; SVG only)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Chart id when the file holds several charts
        #[arg(long)]
        chart: Option<String>,
    },

    /// Print the computed layout as JSON
    Layout {
        /// Chart or chart store JSON file
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Row height policy
        #[arg(long, value_enum, default_value_t = Policy::Wrapped)]
        policy: Policy,

        /// Chart id when the file holds several charts
        #[arg(long)]
        chart: Option<String>,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Format {
    Svg,
    Png,
    Pdf,
}

impl Format {
    fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "svg" => Some(Self::Svg),
            "png" => Some(Self::Png),
            "pdf" => Some(Self::Pdf),
            _ => None,
        }
    }

    fn is_binary(self) -> bool {
        self != Self::Svg
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Policy {
    /// Constant row heights (PNG and PDF)
    Fixed,
    /// Rows grow with wrapped text (SVG)
    Wrapped,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)))
        .init();

    let config = Config::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Render {
            file,
            format,
            output,
            chart,
        } => {
            let chart = load_chart(&file, chart.as_deref())?;
            let format = format
                .or_else(|| output.as_deref().and_then(Format::from_path))
                .unwrap_or(Format::Svg);
            cmd_render(&chart, format, output.as_deref(), &config)
        }
        Commands::Layout {
            file,
            policy,
            chart,
        } => {
            let chart = load_chart(&file, chart.as_deref())?;
            cmd_layout(&chart, policy, &config)
        }
    }
}

fn load_chart(file: &Path, id: Option<&str>) -> Result<Chart> {
    let charts = input::load_charts(file)?;
    info!(path = %file.display(), charts = charts.len(), "loaded input");
    input::select_chart(charts, id)
}

fn cmd_render(chart: &Chart, format: Format, output: Option<&Path>, config: &Config) -> Result<()> {
    if format.is_binary() && output.is_none() {
        bail!("{:?} output is binary; choose a file with --output", format);
    }

    let bytes = match format {
        Format::Svg => SvgRenderer::new()
            .metrics(config.pixel_metrics())
            .wrap(config.wrap)
            .render(chart)?
            .into_bytes(),
        Format::Png => PngRenderer::new()
            .metrics(config.pixel_metrics())
            .render(chart)?,
        Format::Pdf => PdfRenderer::new()
            .metrics(config.page_metrics())
            .render(chart)?,
    };

    match output {
        Some(path) => {
            std::fs::write(path, &bytes)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            info!(path = %path.display(), bytes = bytes.len(), ?format, "wrote chart");
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(&bytes)?;
            stdout.flush()?;
        }
    }
    Ok(())
}

fn cmd_layout(chart: &Chart, policy: Policy, config: &Config) -> Result<()> {
    let policy = match policy {
        Policy::Fixed => RowPolicy::Fixed,
        Policy::Wrapped => RowPolicy::Wrapped(config.wrap),
    };
    let layout = ChartLayout::compute(chart, config.pixel_metrics(), policy);
    println!("{}", serde_json::to_string_pretty(&layout)?);
    Ok(())
}
