#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

/// Record length exponent used by every fixture record (4096 bytes).
pub const REC_EXP: u8 = 12;
pub const MAX_SAMPLES_PER_RECORD: usize = ((1 << REC_EXP) - 64) / 4;

/// One big-endian INT32 data record.
pub struct RecordFields<'a> {
    pub channel: &'a str,
    pub year: u16,
    pub day_of_year: u16,
    /// Seconds since midnight, resolved to 0.1 ms.
    pub start_secs: f64,
    pub rate_factor: i16,
    pub samples: &'a [i32],
}

pub fn make_temp_dir(tag: &str) -> PathBuf {
    static NEXT_ID: AtomicU64 = AtomicU64::new(1);
    let now_ms = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or(0);
    let seq = NEXT_ID.fetch_add(1, Ordering::Relaxed);
    let mut dir = std::env::temp_dir();
    dir.push(format!(
        "seiswaves_test_{tag}_{}_{}_{}",
        std::process::id(),
        now_ms,
        seq
    ));
    std::fs::create_dir_all(&dir).expect("create temp test dir");
    dir
}

pub fn encode_record(seq: usize, fields: &RecordFields<'_>) -> Vec<u8> {
    assert!(fields.samples.len() <= MAX_SAMPLES_PER_RECORD);
    let ticks = (fields.start_secs * 10_000.0).round() as u64;
    let (whole, fract) = (ticks / 10_000, (ticks % 10_000) as u16);
    let mut h = vec![b' '; 64];
    h[0..6].copy_from_slice(format!("{:06}", seq % 1_000_000).as_bytes());
    h[6] = b'D';
    h[8..13].copy_from_slice(b"UNIO ");
    h[13..15].copy_from_slice(b"00");
    let mut cha = [b' '; 3];
    cha[..fields.channel.len()].copy_from_slice(fields.channel.as_bytes());
    h[15..18].copy_from_slice(&cha);
    h[18..20].copy_from_slice(b"XX");
    h[20..22].copy_from_slice(&fields.year.to_be_bytes());
    h[22..24].copy_from_slice(&fields.day_of_year.to_be_bytes());
    h[24] = (whole / 3600) as u8;
    h[25] = ((whole / 60) % 60) as u8;
    h[26] = (whole % 60) as u8;
    h[27] = 0;
    h[28..30].copy_from_slice(&fract.to_be_bytes());
    h[30..32].copy_from_slice(&(fields.samples.len() as u16).to_be_bytes());
    h[32..34].copy_from_slice(&fields.rate_factor.to_be_bytes());
    h[34..36].copy_from_slice(&1i16.to_be_bytes());
    h[36..40].copy_from_slice(&[0, 0, 0, 1]);
    h[40..44].copy_from_slice(&0i32.to_be_bytes());
    h[44..46].copy_from_slice(&64u16.to_be_bytes());
    h[46..48].copy_from_slice(&48u16.to_be_bytes());
    h[48..56].copy_from_slice(&[0x03, 0xE8, 0, 0, 3, 1, REC_EXP, 0]);
    for v in fields.samples {
        h.extend_from_slice(&v.to_be_bytes());
    }
    h.resize(1 << REC_EXP, 0);
    h
}

/// A continuous channel split into as many records as needed.
pub fn channel_records(
    channel: &str,
    start_secs: f64,
    rate: i16,
    samples: &[i32],
    first_seq: usize,
) -> Vec<Vec<u8>> {
    samples
        .chunks(1000)
        .enumerate()
        .map(|(i, chunk)| {
            let fields = RecordFields {
                channel,
                year: 2024,
                day_of_year: 211,
                start_secs: start_secs + (i * 1000) as f64 / f64::from(rate),
                rate_factor: rate,
                samples: chunk,
            };
            encode_record(first_seq + i, &fields)
        })
        .collect()
}

/// A triangle wave, so slices are recognisable by value.
pub fn ramp(n: usize) -> Vec<i32> {
    (0..n).map(|i| (i % 200) as i32 - 100).collect()
}

/// `secs` of ENT and ENR at 100 Hz starting 2024-07-29 03:45:12, records interleaved.
pub fn write_event_file(dir: &Path, name: &str, secs: usize) -> PathBuf {
    let start = 3.0 * 3600.0 + 45.0 * 60.0 + 12.0;
    let samples = ramp(secs * 100);
    let ent = channel_records("ENT", start, 100, &samples, 1);
    let enr = channel_records("ENR", start, 100, &samples, 1 + ent.len());
    let mut bytes = Vec::new();
    for (a, b) in ent.iter().zip(enr.iter()) {
        bytes.extend_from_slice(a);
        bytes.extend_from_slice(b);
    }
    let path = dir.join(name);
    std::fs::write(&path, bytes).expect("write mseed fixture");
    path
}
