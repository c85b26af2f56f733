use std::path::PathBuf;

use anyhow::Result;
use egui::{Color32, FontId, TextStyle, Visuals};

use crate::config::AppConfig;
use crate::extract::WaveformSource;

mod dialogs;
mod loading_ops;
mod pointer_ops;
mod preview_ops;
pub mod types;
mod ui;

pub use types::{CenteringMode, Notice, NoticeLevel, PreviewPlot};

use types::LoadingState;

pub const APP_TITLE: &str = "Event Extraction - GPD";

/// Options applied once at launch.
#[derive(Clone, Debug, Default)]
pub struct StartupConfig {
    pub open_file: Option<PathBuf>,
    pub start_time: Option<String>,
    pub duration_secs: Option<f64>,
    pub channel: Option<String>,
    pub preview: bool,
    /// Skips `AppConfig::load` when set.
    pub config: Option<AppConfig>,
}

struct StartupState {
    cfg: StartupConfig,
    preview_pending: bool,
}

pub struct EventExtractor {
    pub config: AppConfig,
    pub source: Option<WaveformSource>,
    pub file_path_text: String,
    pub file_info_text: String,
    pub start_time_text: String,
    pub duration_secs: f64,
    pub shift_text: String,
    pub channel: String,
    pub file_channels: Vec<String>,
    pub centering: CenteringMode,
    pub center_text: String,
    pub position_text: String,
    pub plot: Option<PreviewPlot>,
    pub notice: Option<Notice>,
    loading: Option<LoadingState>,
    startup: StartupState,
    #[cfg(feature = "kittest")]
    test_dialogs: dialogs::TestDialogQueue,
}

impl EventExtractor {
    pub fn new(cc: &eframe::CreationContext<'_>, mut startup: StartupConfig) -> Result<Self> {
        let mut visuals = Visuals::dark();
        visuals.panel_fill = Color32::from_rgb(22, 22, 26);
        visuals.widgets.noninteractive.bg_fill = Color32::from_rgb(24, 24, 28);
        cc.egui_ctx.set_visuals(visuals);
        let mut style = (*cc.egui_ctx.style()).clone();
        style.text_styles.insert(TextStyle::Body, FontId::proportional(14.0));
        style.text_styles.insert(TextStyle::Monospace, FontId::monospace(13.0));
        cc.egui_ctx.set_style(style);

        let config = match startup.config.take() {
            Some(cfg) => cfg,
            None => AppConfig::load()?,
        };
        Ok(Self::with_config(config, startup))
    }

    /// Build the app state without an egui context.
    pub fn with_config(config: AppConfig, startup: StartupConfig) -> Self {
        let duration_secs = startup
            .duration_secs
            .unwrap_or(config.default_duration_secs);
        let channel = startup
            .channel
            .clone()
            .unwrap_or_else(|| config.default_channel.clone());
        let centering = CenteringMode::default();
        let mut app = Self {
            source: None,
            file_path_text: String::new(),
            file_info_text: "Date: --   Start: --   End: --".to_string(),
            start_time_text: startup.start_time.clone().unwrap_or_default(),
            duration_secs,
            shift_text: "0".to_string(),
            channel,
            file_channels: Vec::new(),
            centering,
            center_text: "Center: --".to_string(),
            position_text: centering.idle_label(),
            plot: None,
            notice: None,
            loading: None,
            startup: StartupState {
                preview_pending: startup.preview,
                cfg: startup,
            },
            config,
            #[cfg(feature = "kittest")]
            test_dialogs: dialogs::TestDialogQueue::default(),
        };
        if let Some(path) = app.startup.cfg.open_file.clone() {
            app.begin_load(path);
        }
        app
    }

    /// Configured channels followed by any extra channel found in the file.
    pub fn channel_options(&self) -> Vec<String> {
        let mut out = self.config.channels.clone();
        for c in &self.file_channels {
            if !out.contains(c) {
                out.push(c.clone());
            }
        }
        out
    }

    pub fn toggle_centering(&mut self) {
        self.centering.toggle();
        self.position_text = self.centering.idle_label();
    }

    pub fn dismiss_notice(&mut self) {
        self.notice = None;
    }
}

impl eframe::App for EventExtractor {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if self.poll_loading() || self.is_loading() {
            ctx.request_repaint();
        }
        self.ui_top_bar(ctx);
        self.ui_plot_area(ctx);
        self.ui_notice(ctx);
    }
}
