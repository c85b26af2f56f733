//! Show one time window of a miniSEED file as stacked plots.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use seiswaves::config::AppConfig;
use seiswaves::extract::window;
use seiswaves::stream::Stream;
use seiswaves::timefmt::parse_timestamp;
use seiswaves::viewer::{report_segment, StreamViewer, NO_DATA_EXIT_CODE};

#[derive(Debug, Parser)]
#[command(name = "seiswaves-view", version, about = "Plot a time window of a miniSEED file")]
struct Cli {
    /// Path to the file, or a name under the project's mseed directory.
    file: PathBuf,
    /// Window start, ISO-8601 (e.g. 2024-07-29T03:45:12).
    start: String,
    /// Window length in seconds.
    duration: f64,
    /// Print the segment summary without opening a window.
    #[arg(long)]
    no_plot: bool,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();
    let config = AppConfig::load().context("load configuration")?;
    let path = config.resolve_mseed_path(&cli.file)?;
    let start = parse_timestamp(&cli.start)?;
    let (t0, t1) = window(start, cli.duration)?;

    let stream = Stream::read(&path)?;
    log::debug!("{}: {} trace(s) before slicing", path.display(), stream.len());
    let Some(segment) = report_segment(&stream, t0, t1, &mut std::io::stdout().lock())? else {
        std::process::exit(NO_DATA_EXIT_CODE);
    };
    if cli.no_plot {
        return Ok(());
    }

    let title = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title(title.clone())
            .with_inner_size([1000.0, 200.0 + 180.0 * segment.len().min(4) as f32]),
        ..Default::default()
    };
    eframe::run_native(
        "seiswaves-view",
        native_options,
        Box::new(move |_cc| Ok(Box::new(StreamViewer::new(title, &segment)))),
    )
    .map_err(|e| anyhow::anyhow!("{e}"))
}
