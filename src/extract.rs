//! Loaded file state and segment extraction, independent of any UI.

use std::path::Path;

use chrono::{DateTime, NaiveDate, Utc};
use thiserror::Error;

use crate::stream::Stream;
use crate::timefmt::{add_seconds, format_hms};

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("Error loading file: {0}")]
    Load(String),
    #[error("No file loaded.")]
    NoFile,
    #[error("Invalid window: {0}")]
    InvalidWindow(String),
    #[error("No data in the specified interval.")]
    NoData,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FileInfo {
    pub date: NaiveDate,
    pub start_time: String,
    pub end_time: String,
}

impl FileInfo {
    pub fn summary(&self) -> String {
        format!(
            "Date: {}   Start: {}   End: {}",
            self.date.format("%Y-%m-%d"),
            self.start_time,
            self.end_time
        )
    }
}

/// A decoded and resampled file plus the span of its first trace.
#[derive(Clone, Debug)]
pub struct WaveformSource {
    pub stream: Stream,
    pub file_start: DateTime<Utc>,
    pub file_end: DateTime<Utc>,
}

impl WaveformSource {
    pub fn from_stream(mut stream: Stream, resample_hz: f64) -> Result<Self, ExtractError> {
        stream
            .resample(resample_hz)
            .map_err(|e| ExtractError::Load(e.to_string()))?;
        let first = stream
            .iter()
            .find(|tr| !tr.data.is_empty())
            .ok_or_else(|| ExtractError::Load("file contains no waveform data".to_string()))?;
        let (file_start, file_end) = (first.stats.starttime, first.endtime());
        Ok(Self {
            stream,
            file_start,
            file_end,
        })
    }

    pub fn load(path: &Path, resample_hz: f64) -> Result<Self, ExtractError> {
        let stream = Stream::read(path).map_err(|e| ExtractError::Load(e.to_string()))?;
        Self::from_stream(stream, resample_hz)
    }

    pub fn file_info(&self) -> FileInfo {
        FileInfo {
            date: self.file_start.date_naive(),
            start_time: format_hms(self.file_start.time()),
            end_time: format_hms(self.file_end.time()),
        }
    }

    pub fn channels(&self) -> Vec<String> {
        self.stream.channels()
    }

    /// Segment of `channel` between `start` and `start + duration`.
    pub fn extract_segment(
        &self,
        start: DateTime<Utc>,
        duration: f64,
        channel: &str,
    ) -> Result<Stream, ExtractError> {
        let (t0, t1) = window(start, duration)?;
        let segment = self.stream.slice(t0, t1).select(channel);
        if segment.is_empty() {
            return Err(ExtractError::NoData);
        }
        log::debug!("extracted {} trace(s) for {channel} at {t0}", segment.len());
        Ok(segment)
    }
}

/// `(start, start + duration)`.
pub fn window(
    start: DateTime<Utc>,
    duration: f64,
) -> Result<(DateTime<Utc>, DateTime<Utc>), ExtractError> {
    if !duration.is_finite() || duration <= 0.0 {
        return Err(ExtractError::InvalidWindow(format!(
            "duration must be positive, got {duration}"
        )));
    }
    let end = add_seconds(start, duration)
        .ok_or_else(|| ExtractError::InvalidWindow("window end out of range".to_string()))?;
    Ok((start, end))
}
