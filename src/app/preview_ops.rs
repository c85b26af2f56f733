use std::path::Path;

use super::types::{Notice, PreviewParams, PreviewPlot};
use crate::extract::ExtractError;
use crate::timefmt::{add_seconds, combine, format_time_with_ms, parse_time_with_ms};

const INVALID_TIME: &str = "Invalid start time format.";
const INVALID_NUMBERS: &str = "Invalid duration or shift.";

impl super::EventExtractor {
    /// Validate the parameter fields. Errors are ready-made notices.
    pub(super) fn preview_params(&self) -> Result<PreviewParams, Notice> {
        let time = parse_time_with_ms(&self.start_time_text).map_err(|err| {
            log::debug!("{err}");
            Notice::error("Error", INVALID_TIME)
        })?;
        let shift_seconds = self
            .shift_text
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|s| s.is_finite())
            .ok_or_else(|| Notice::error("Error", INVALID_NUMBERS))?;
        let duration = self.duration_secs;
        if !duration.is_finite() || duration <= 0.0 {
            return Err(Notice::error("Error", INVALID_NUMBERS));
        }
        Ok(PreviewParams {
            time,
            duration,
            shift_seconds,
            channel: self.channel.clone(),
        })
    }

    pub fn run_preview(&mut self) {
        let Some(source) = self.source.as_ref() else {
            self.notice = Some(Notice::warning("Warning", "Open an mseed file first."));
            return;
        };
        let params = match self.preview_params() {
            Ok(p) => p,
            Err(notice) => {
                self.notice = Some(notice);
                return;
            }
        };
        let date = source.file_start.date_naive();
        let Ok(start) = combine(date, params.time, params.shift_seconds) else {
            self.notice = Some(Notice::error("Error", INVALID_NUMBERS));
            return;
        };
        let segment = match source.extract_segment(start, params.duration, &params.channel) {
            Ok(seg) => seg,
            Err(ExtractError::NoData) => {
                log::info!("no {} data at {start} (+{} s)", params.channel, params.duration);
                self.notice = Some(Notice::warning("Warning", ExtractError::NoData.to_string()));
                return;
            }
            Err(err) => {
                self.notice = Some(Notice::error("Error", err.to_string()));
                return;
            }
        };
        log::info!(
            "preview {} from {start} for {} s",
            params.channel,
            params.duration
        );

        let title = Path::new(&self.file_path_text)
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        self.plot = Some(PreviewPlot::from_segment(
            &segment,
            start,
            params.duration,
            title,
        ));
        self.start_time_text = format_time_with_ms(start.time());
        self.shift_text = "0".to_string();
        self.center_text = match add_seconds(start, params.duration / 2.0) {
            Some(center) => format!("Center: {}", format_time_with_ms(center.time())),
            None => "Center: --".to_string(),
        };
        self.centering.deactivate();
        self.position_text = self.centering.idle_label();
    }
}
