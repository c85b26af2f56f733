#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

use std::path::PathBuf;

use anyhow::Context;
use seiswaves::app;
use seiswaves::config::AppConfig;

const USAGE: &str = "Usage:\n  seiswaves [options] [file.mseed]\n\nOptions:\n  --open-file <file.mseed>\n  --start <hh:mm:ss[,mmm]>\n  --duration <seconds>\n  --channel <code>\n  --preview\n  --help";

fn parse_startup_config() -> app::StartupConfig {
    let mut cfg = app::StartupConfig::default();
    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--open-file" => {
                if let Some(p) = args.next() {
                    cfg.open_file = Some(PathBuf::from(p));
                }
            }
            "--start" => {
                if let Some(v) = args.next() {
                    cfg.start_time = Some(v);
                }
            }
            "--duration" => {
                if let Some(v) = args.next() {
                    match v.parse::<f64>() {
                        Ok(d) if d.is_finite() && d > 0.0 => cfg.duration_secs = Some(d),
                        _ => log::warn!("ignoring --duration {v}"),
                    }
                }
            }
            "--channel" => {
                if let Some(v) = args.next() {
                    cfg.channel = Some(v);
                }
            }
            "--preview" => {
                cfg.preview = true;
            }
            "--help" | "-h" => {
                eprintln!("{USAGE}");
                std::process::exit(0);
            }
            _ => {
                if arg.starts_with('-') {
                    log::warn!("unknown option {arg}");
                    continue;
                }
                cfg.open_file = Some(PathBuf::from(arg));
            }
        }
    }
    cfg
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let mut startup = parse_startup_config();
    let config = AppConfig::load().context("load configuration")?;
    let [w, h] = config.window_size;
    startup.config = Some(config);
    let viewport = egui::ViewportBuilder::default()
        .with_title(app::APP_TITLE)
        .with_min_inner_size([640.0, 480.0])
        .with_inner_size([w, h]);
    let native_options = eframe::NativeOptions {
        viewport,
        ..Default::default()
    };
    eframe::run_native(
        app::APP_TITLE,
        native_options,
        Box::new(move |cc| Ok(Box::new(app::EventExtractor::new(cc, startup)?))),
    )
    .map_err(|e| anyhow::anyhow!("{e}"))
}
