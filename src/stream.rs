use std::fmt;
use std::path::Path;

use chrono::{DateTime, Utc};
use mseed::{MSControlFlags, MSReader, MSRecord, MSSampleType};
use rubato::{
    Resampler, SincFixedIn, SincInterpolationParameters, SincInterpolationType, WindowFunction,
};
use thiserror::Error;

use crate::timefmt::{add_seconds, seconds_between};

const RESAMPLE_CHUNK: usize = 1024;
const SINC_LEN: usize = 256;
/// Input index of the impulse used to measure resampler latency.
const LATENCY_PULSE_AT: usize = 1024;

#[derive(Debug, Error)]
pub enum StreamError {
    #[error("cannot read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("cannot decode {path}: {source}")]
    Decode {
        path: String,
        #[source]
        source: mseed::MSError,
    },
    #[error("cannot resample {id} from {from} Hz to {to} Hz: {detail}")]
    Resample {
        id: String,
        from: f64,
        to: f64,
        detail: String,
    },
}

#[derive(Clone, Debug, PartialEq)]
pub struct TraceStats {
    pub network: String,
    pub station: String,
    pub location: String,
    pub channel: String,
    pub starttime: DateTime<Utc>,
    pub sampling_rate: f64,
    pub npts: usize,
}

#[derive(Clone, Debug)]
pub struct Trace {
    pub stats: TraceStats,
    pub data: Vec<f64>,
}

impl Trace {
    pub fn new(stats: TraceStats, data: Vec<f64>) -> Self {
        let mut stats = stats;
        stats.npts = data.len();
        Self { stats, data }
    }

    pub fn id(&self) -> String {
        let s = &self.stats;
        format!("{}.{}.{}.{}", s.network, s.station, s.location, s.channel)
    }

    fn delta(&self) -> f64 {
        if self.stats.sampling_rate > 0.0 {
            1.0 / self.stats.sampling_rate
        } else {
            0.0
        }
    }

    /// Time of the last sample.
    pub fn endtime(&self) -> DateTime<Utc> {
        let span = self.data.len().saturating_sub(1) as f64 * self.delta();
        add_seconds(self.stats.starttime, span).unwrap_or(self.stats.starttime)
    }

    /// Sample offsets in seconds from the trace start.
    pub fn times(&self) -> Vec<f64> {
        let dt = self.delta();
        (0..self.data.len()).map(|i| i as f64 * dt).collect()
    }

    /// Trim to the samples nearest to `[start, end]`. `None` when nothing is left.
    pub fn slice(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> Option<Trace> {
        if self.data.is_empty() || end < start {
            return None;
        }
        let t0 = self.stats.starttime;
        let t_end = self.endtime();
        if end < t0 || start > t_end {
            return None;
        }
        let sr = self.stats.sampling_rate;
        if sr <= 0.0 {
            return Some(self.clone());
        }
        let n = self.data.len() as i64;
        let lo = (seconds_between(t0, start) * sr).round().max(0.0) as i64;
        let hi_trim = (seconds_between(end, t_end) * sr).round().max(0.0) as i64;
        let hi = n - 1 - hi_trim;
        if hi < lo || lo >= n {
            return None;
        }
        let mut stats = self.stats.clone();
        stats.starttime = add_seconds(t0, lo as f64 / sr)?;
        Some(Trace::new(stats, self.data[lo as usize..=hi as usize].to_vec()))
    }

    /// Band-limited resampling to `rate` Hz. The start time is kept.
    pub fn resample(&mut self, rate: f64) -> Result<(), StreamError> {
        let from = self.stats.sampling_rate;
        if (from - rate).abs() < 1e-9 || self.data.is_empty() {
            self.stats.sampling_rate = rate;
            return Ok(());
        }
        let fail = |detail: String| StreamError::Resample {
            id: self.id(),
            from,
            to: rate,
            detail,
        };
        if !(from > 0.0 && rate > 0.0 && from.is_finite() && rate.is_finite()) {
            return Err(fail("sampling rates must be positive".to_string()));
        }
        let out = resample_samples(&self.data, from, rate).map_err(fail)?;
        log::debug!(
            "resampled {} from {from} Hz ({} pts) to {rate} Hz ({} pts)",
            self.id(),
            self.data.len(),
            out.len()
        );
        self.data = out;
        self.stats.sampling_rate = rate;
        self.stats.npts = self.data.len();
        Ok(())
    }
}

fn sinc_resampler(ratio: f64) -> Result<SincFixedIn<f64>, String> {
    let params = SincInterpolationParameters {
        sinc_len: SINC_LEN,
        f_cutoff: 0.95,
        interpolation: SincInterpolationType::Linear,
        oversampling_factor: 256,
        window: WindowFunction::BlackmanHarris2,
    };
    SincFixedIn::<f64>::new(ratio, 1.0, params, RESAMPLE_CHUNK, 1).map_err(|e| e.to_string())
}

/// Feed `data` followed by zeros until at least `min_out` frames came out.
fn drive(
    resampler: &mut SincFixedIn<f64>,
    data: &[f64],
    min_out: usize,
) -> Result<Vec<f64>, String> {
    let mut out: Vec<f64> = Vec::with_capacity(min_out + RESAMPLE_CHUNK);
    let mut pos = 0usize;
    while out.len() < min_out {
        let need = resampler.input_frames_next();
        let mut chunk = vec![0.0f64; need];
        if pos < data.len() {
            let take = (data.len() - pos).min(need);
            chunk[..take].copy_from_slice(&data[pos..pos + take]);
        }
        pos += need;
        let input = vec![chunk];
        let frames = resampler
            .process(&input, None)
            .map_err(|e| e.to_string())?;
        match frames.into_iter().next() {
            Some(ch) => out.extend(ch),
            None => return Err("resampler produced no channels".to_string()),
        }
        if pos > data.len() + min_out * 4 + RESAMPLE_CHUNK * 4 {
            return Err("resampler did not converge".to_string());
        }
    }
    Ok(out)
}

/// Output frames between an input sample and its resampled image, found by
/// pushing a unit impulse through a resampler built like the real one.
fn measured_latency(ratio: f64) -> Result<isize, String> {
    let mut resampler = sinc_resampler(ratio)?;
    let mut pulse = vec![0.0f64; 2 * LATENCY_PULSE_AT];
    pulse[LATENCY_PULSE_AT] = 1.0;
    let min_out = (pulse.len() as f64 * ratio).ceil() as usize + resampler.output_delay() + 1;
    let out = drive(&mut resampler, &pulse, min_out)?;
    let peak = out
        .iter()
        .enumerate()
        .max_by(|a, b| a.1.abs().total_cmp(&b.1.abs()))
        .map(|(i, _)| i)
        .ok_or_else(|| "resampler produced no output".to_string())?;
    let expected = (LATENCY_PULSE_AT as f64 * ratio).round() as isize;
    Ok(peak as isize - expected)
}

fn resample_samples(data: &[f64], from: f64, to: f64) -> Result<Vec<f64>, String> {
    let ratio = to / from;
    let expected = (data.len() as f64 * ratio).floor() as usize;
    if expected == 0 {
        return Ok(Vec::new());
    }
    let latency = measured_latency(ratio)?;
    let mut resampler = sinc_resampler(ratio)?;
    let lead = latency.max(0) as usize;
    let mut out = drive(&mut resampler, data, expected + lead)?;
    if latency >= 0 {
        out.drain(..lead);
    } else {
        let first = out.first().copied().unwrap_or(0.0);
        out.splice(0..0, std::iter::repeat(first).take(latency.unsigned_abs()));
    }
    out.truncate(expected);
    Ok(out)
}

/// `*` matches any run, `?` a single character.
pub fn glob_match(pattern: &str, text: &str) -> bool {
    fn go(p: &[char], t: &[char]) -> bool {
        match (p.first(), t.first()) {
            (None, None) => true,
            (Some('*'), _) => go(&p[1..], t) || (!t.is_empty() && go(p, &t[1..])),
            (Some('?'), Some(_)) => go(&p[1..], &t[1..]),
            (Some(a), Some(b)) if a == b => go(&p[1..], &t[1..]),
            _ => false,
        }
    }
    let p: Vec<char> = pattern.chars().collect();
    let t: Vec<char> = text.chars().collect();
    go(&p, &t)
}

/// Header fields and unpacked samples of one data record.
#[derive(Clone, Debug, PartialEq)]
pub struct RecordBlock {
    pub network: String,
    pub station: String,
    pub location: String,
    pub channel: String,
    pub starttime: DateTime<Utc>,
    pub sampling_rate: f64,
    pub samples: Vec<f64>,
}

impl RecordBlock {
    /// `None` for records without numeric samples (text or log records).
    pub fn from_record(rec: &MSRecord) -> Result<Option<Self>, mseed::MSError> {
        let samples: Vec<f64> = match rec.sample_type() {
            MSSampleType::Integer32 => rec
                .data_samples::<i32>()
                .map(|s| s.iter().map(|&v| f64::from(v)).collect())
                .unwrap_or_default(),
            MSSampleType::Float32 => rec
                .data_samples::<f32>()
                .map(|s| s.iter().map(|&v| f64::from(v)).collect())
                .unwrap_or_default(),
            MSSampleType::Float64 => rec
                .data_samples::<f64>()
                .map(|s| s.to_vec())
                .unwrap_or_default(),
            _ => return Ok(None),
        };
        let start_ns = rec.start_time()?.unix_timestamp_nanos();
        let starttime = i64::try_from(start_ns)
            .map(DateTime::from_timestamp_nanos)
            .unwrap_or_default();
        Ok(Some(Self {
            network: rec.network()?,
            station: rec.station()?,
            location: rec.location()?,
            channel: rec.channel()?,
            starttime,
            sampling_rate: rec.sample_rate_hz(),
            samples,
        }))
    }
}

#[derive(Clone, Debug, Default)]
pub struct Stream {
    pub traces: Vec<Trace>,
}

impl Stream {
    /// Decode every data record of a miniSEED file and merge them into traces.
    pub fn read(path: &Path) -> Result<Self, StreamError> {
        std::fs::metadata(path).map_err(|source| StreamError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let decode = |source: mseed::MSError| StreamError::Decode {
            path: path.display().to_string(),
            source,
        };
        let reader = MSReader::new_with_flags(path, MSControlFlags::MSF_UNPACKDATA)
            .map_err(decode)?;
        let mut records = Vec::new();
        for rec in reader {
            match RecordBlock::from_record(&rec.map_err(decode)?).map_err(decode)? {
                Some(block) => records.push(block),
                None => log::debug!("{}: skipping record without samples", path.display()),
            }
        }
        let stream = Self::from_records(records);
        log::info!("read {} trace(s) from {}", stream.len(), path.display());
        Ok(stream)
    }

    /// Merge contiguous records of the same id and rate into traces.
    pub fn from_records(records: Vec<RecordBlock>) -> Self {
        let mut traces: Vec<Trace> = Vec::new();
        for rec in records {
            if rec.samples.is_empty() {
                continue;
            }
            let sr = rec.sampling_rate;
            let target = traces.iter_mut().rev().find(|tr| {
                let s = &tr.stats;
                if s.network != rec.network
                    || s.station != rec.station
                    || s.location != rec.location
                    || s.channel != rec.channel
                    || (s.sampling_rate - sr).abs() > 1e-9
                    || sr <= 0.0
                {
                    return false;
                }
                let expected = tr.data.len() as f64 / sr;
                (seconds_between(s.starttime, rec.starttime) - expected).abs() <= 0.5 / sr
            });
            match target {
                Some(tr) => {
                    tr.data.extend_from_slice(&rec.samples);
                    tr.stats.npts = tr.data.len();
                }
                None => {
                    let stats = TraceStats {
                        network: rec.network,
                        station: rec.station,
                        location: rec.location,
                        channel: rec.channel,
                        starttime: rec.starttime,
                        sampling_rate: sr,
                        npts: 0,
                    };
                    traces.push(Trace::new(stats, rec.samples));
                }
            }
        }
        Self { traces }
    }

    pub fn len(&self) -> usize {
        self.traces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.traces.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Trace> {
        self.traces.iter()
    }

    pub fn slice(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> Stream {
        Stream {
            traces: self.traces.iter().filter_map(|tr| tr.slice(start, end)).collect(),
        }
    }

    pub fn select(&self, channel: &str) -> Stream {
        Stream {
            traces: self
                .traces
                .iter()
                .filter(|tr| glob_match(channel, &tr.stats.channel))
                .cloned()
                .collect(),
        }
    }

    /// Resample every trace. Traces too short to yield a sample are dropped.
    pub fn resample(&mut self, rate: f64) -> Result<(), StreamError> {
        for tr in &mut self.traces {
            tr.resample(rate)?;
        }
        self.traces.retain(|tr| {
            if tr.data.is_empty() {
                log::debug!("dropping {}: no samples left at {rate} Hz", tr.id());
            }
            !tr.data.is_empty()
        });
        Ok(())
    }

    /// Distinct channel codes, in order of first appearance.
    pub fn channels(&self) -> Vec<String> {
        let mut out: Vec<String> = Vec::new();
        for tr in &self.traces {
            if !out.contains(&tr.stats.channel) {
                out.push(tr.stats.channel.clone());
            }
        }
        out
    }
}

impl<'a> IntoIterator for &'a Stream {
    type Item = &'a Trace;
    type IntoIter = std::slice::Iter<'a, Trace>;

    fn into_iter(self) -> Self::IntoIter {
        self.traces.iter()
    }
}

fn iso(t: DateTime<Utc>) -> String {
    t.format("%Y-%m-%dT%H:%M:%S%.6fZ").to_string()
}

impl fmt::Display for Trace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} | {} - {} | {:.1} Hz, {} samples",
            self.id(),
            iso(self.stats.starttime),
            iso(self.endtime()),
            self.stats.sampling_rate,
            self.data.len()
        )
    }
}

impl fmt::Display for Stream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} Trace(s) in Stream:", self.traces.len())?;
        for tr in &self.traces {
            write!(f, "\n{tr}")?;
        }
        Ok(())
    }
}
