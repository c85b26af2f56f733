use std::path::PathBuf;
use std::sync::mpsc::Receiver;
use std::time::Instant;

use chrono::{DateTime, NaiveTime, Utc};

use crate::extract::{ExtractError, WaveformSource};
use crate::stream::Stream;
use crate::timefmt::seconds_between;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NoticeLevel {
    Warning,
    Error,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub title: String,
    pub message: String,
}

impl Notice {
    pub fn warning(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Warning,
            title: title.into(),
            message: message.into(),
        }
    }

    pub fn error(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            title: title.into(),
            message: message.into(),
        }
    }
}

/// Offset of `x` from the middle of a window of `duration` seconds.
pub fn center_offset(x: f64, duration: f64) -> f64 {
    x - duration / 2.0
}

/// While active, a click on the plot turns into a shift that re-centers the window.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CenteringMode {
    active: bool,
}

impl CenteringMode {
    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn toggle(&mut self) {
        self.active = !self.active;
    }

    pub fn deactivate(&mut self) {
        self.active = false;
    }

    pub fn button_text(&self) -> &'static str {
        if self.active {
            "Center: ON"
        } else {
            "Center: OFF"
        }
    }

    pub fn idle_label(&self) -> String {
        if self.active {
            "Δ: --".to_string()
        } else {
            "Position: --".to_string()
        }
    }

    pub fn hover_label(&self, x: Option<f64>, duration: f64) -> String {
        match x {
            Some(x) if x.is_finite() => {
                if self.active {
                    format!("Δ: {:+.2} s", center_offset(x, duration))
                } else {
                    format!("Position: {x:.2} s")
                }
            }
            _ => self.idle_label(),
        }
    }

    /// New shift text for a click at `x`; leaves the mode afterwards.
    /// `None` when the mode is off.
    pub fn click(&mut self, x: f64, duration: f64) -> Option<String> {
        if !self.active || !x.is_finite() {
            return None;
        }
        self.toggle();
        Some(format!("{:.3}", center_offset(x, duration)))
    }
}

#[derive(Clone, Debug)]
pub struct PlotTrace {
    pub label: String,
    pub points: Vec<[f64; 2]>,
}

#[derive(Clone, Debug)]
pub struct PreviewPlot {
    pub title: String,
    pub duration: f64,
    pub traces: Vec<PlotTrace>,
    pub reset_bounds: bool,
}

impl PreviewPlot {
    /// x is seconds since `window_start`, so the center line sits at `duration / 2`.
    pub fn from_segment(
        segment: &Stream,
        window_start: DateTime<Utc>,
        duration: f64,
        title: impl Into<String>,
    ) -> Self {
        let traces = segment
            .iter()
            .map(|tr| {
                let offset = seconds_between(window_start, tr.stats.starttime);
                let points = tr
                    .times()
                    .into_iter()
                    .zip(tr.data.iter())
                    .map(|(t, y)| [offset + t, *y])
                    .collect();
                PlotTrace {
                    label: tr.stats.channel.clone(),
                    points,
                }
            })
            .collect();
        Self {
            title: title.into(),
            duration,
            traces,
            reset_bounds: true,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct PreviewParams {
    pub time: NaiveTime,
    pub duration: f64,
    pub shift_seconds: f64,
    pub channel: String,
}

pub struct LoadingState {
    pub path: PathBuf,
    pub started_at: Instant,
    pub rx: Receiver<Result<WaveformSource, ExtractError>>,
}
