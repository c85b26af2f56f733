//! Stacked per-trace plots of a whole stream, used by `seiswaves-view`.

use std::io::Write;

use chrono::{DateTime, Utc};
use egui::RichText;
use egui_plot::{Line, Plot};

use crate::stream::{Stream, Trace};

pub struct ViewTrace {
    pub id: String,
    /// x is the UTC epoch time in seconds.
    pub points: Vec<[f64; 2]>,
}

impl ViewTrace {
    pub fn from_trace(tr: &Trace) -> Self {
        let t0 = tr.stats.starttime.timestamp() as f64
            + f64::from(tr.stats.starttime.timestamp_subsec_nanos()) * 1e-9;
        let points = tr
            .times()
            .into_iter()
            .zip(tr.data.iter())
            .map(|(t, y)| [t0 + t, *y])
            .collect();
        Self { id: tr.id(), points }
    }
}

/// Axis label for an epoch-seconds value.
pub fn format_epoch_hms(x: f64) -> String {
    if !x.is_finite() {
        return String::new();
    }
    let secs = x.floor();
    let nanos = ((x - secs) * 1e9) as u32;
    DateTime::from_timestamp(secs as i64, nanos)
        .map(|dt| dt.format("%H:%M:%S").to_string())
        .unwrap_or_default()
}

/// Exit status of `seiswaves-view` when the window holds no samples.
pub const NO_DATA_EXIT_CODE: i32 = 1;

/// Slice `[start, end]` and print its summary to `out`. `None` when the
/// window is empty, after printing the no-data line.
pub fn report_segment(
    stream: &Stream,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    out: &mut impl Write,
) -> std::io::Result<Option<Stream>> {
    let segment = stream.slice(start, end);
    writeln!(out, "Showing segment: {segment}")?;
    if segment.is_empty() {
        writeln!(out, "No data found in the specified interval.")?;
        return Ok(None);
    }
    Ok(Some(segment))
}

pub struct StreamViewer {
    title: String,
    traces: Vec<ViewTrace>,
}

impl StreamViewer {
    pub fn new(title: impl Into<String>, stream: &Stream) -> Self {
        Self {
            title: title.into(),
            traces: stream.iter().map(ViewTrace::from_trace).collect(),
        }
    }

    pub fn traces(&self) -> &[ViewTrace] {
        &self.traces
    }
}

impl eframe::App for StreamViewer {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        egui::CentralPanel::default().show(ctx, |ui| {
            ui.heading(&self.title);
            if self.traces.is_empty() {
                ui.label(RichText::new("No traces.").weak());
                return;
            }
            let n = self.traces.len() as f32;
            let spacing = ui.spacing().item_spacing.y;
            let height = ((ui.available_height() - spacing * n) / n - 18.0).max(60.0);
            for (i, tr) in self.traces.iter().enumerate() {
                ui.label(RichText::new(&tr.id).strong());
                Plot::new(("trace_plot", i))
                    .height(height)
                    .link_axis("stream_view", [true, false])
                    .link_cursor("stream_view", [true, false])
                    .x_axis_formatter(|x, _range| format_epoch_hms(x.value))
                    .show(ui, |plot_ui| {
                        plot_ui.line(Line::new(tr.id.clone(), tr.points.clone()));
                    });
            }
        });
    }
}
