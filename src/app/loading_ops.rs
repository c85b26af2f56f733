use std::path::PathBuf;
use std::sync::mpsc;
use std::time::Instant;

use super::types::{LoadingState, Notice};
use crate::extract::{ExtractError, WaveformSource};
use crate::timefmt::format_hms;

impl super::EventExtractor {
    pub(super) fn open_file_clicked(&mut self) {
        if let Some(path) = self.pick_mseed_dialog() {
            self.begin_load(path);
        }
    }

    /// Decode and resample `path` on a worker thread.
    pub fn begin_load(&mut self, path: PathBuf) {
        let (tx, rx) = mpsc::channel();
        let resample_hz = self.config.resample_hz;
        let worker_path = path.clone();
        log::info!("loading {}", path.display());
        let spawned = std::thread::Builder::new()
            .name("mseed-load".to_string())
            .spawn(move || {
                let _ = tx.send(WaveformSource::load(&worker_path, resample_hz));
            });
        if let Err(err) = spawned {
            self.finish_load(path, Err(ExtractError::Load(err.to_string())));
            return;
        }
        self.loading = Some(LoadingState {
            path,
            started_at: Instant::now(),
            rx,
        });
    }

    pub fn is_loading(&self) -> bool {
        self.loading.is_some()
    }

    /// Apply a finished load, if any. Returns `true` when state changed.
    pub fn poll_loading(&mut self) -> bool {
        let received = match &self.loading {
            Some(state) => match state.rx.try_recv() {
                Ok(res) => Some(res),
                Err(mpsc::TryRecvError::Empty) => None,
                Err(mpsc::TryRecvError::Disconnected) => Some(Err(ExtractError::Load(
                    "loader thread exited unexpectedly".to_string(),
                ))),
            },
            None => None,
        };
        let Some(res) = received else {
            return false;
        };
        if let Some(state) = self.loading.take() {
            log::debug!(
                "load of {} finished in {:?}",
                state.path.display(),
                state.started_at.elapsed()
            );
            self.finish_load(state.path, res);
        }
        true
    }

    /// Block until the pending load finishes. Used by headless callers.
    pub fn wait_for_load(&mut self) {
        let Some(state) = self.loading.take() else {
            return;
        };
        let res = state.rx.recv().unwrap_or_else(|_| {
            Err(ExtractError::Load(
                "loader thread exited unexpectedly".to_string(),
            ))
        });
        self.finish_load(state.path, res);
    }

    pub(super) fn loading_label(&self) -> Option<String> {
        self.loading.as_ref().map(|state| {
            let name = state
                .path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            format!("Loading {name}...")
        })
    }

    fn finish_load(&mut self, path: PathBuf, res: Result<WaveformSource, ExtractError>) {
        self.plot = None;
        self.centering.deactivate();
        self.position_text = self.centering.idle_label();
        match res {
            Ok(source) => {
                let info = source.file_info();
                log::info!("loaded {}: {}", path.display(), info.summary());
                self.file_path_text = path.display().to_string();
                self.file_info_text = info.summary();
                self.start_time_text = format_hms(source.file_start.time());
                self.shift_text = "0".to_string();
                self.center_text = "Center: --".to_string();
                self.file_channels = source.channels();
                self.source = Some(source);
                self.apply_startup_overrides();
            }
            Err(err) => {
                log::error!("{}: {err}", path.display());
                self.source = None;
                self.file_channels.clear();
                self.file_info_text = "Date: --   Start: --   End: --".to_string();
                self.notice = Some(Notice::error("Error", err.to_string()));
                self.startup.preview_pending = false;
            }
        }
    }

    fn apply_startup_overrides(&mut self) {
        if let Some(start) = self.startup.cfg.start_time.take() {
            self.start_time_text = start;
        }
        if std::mem::take(&mut self.startup.preview_pending) {
            self.run_preview();
        }
    }
}
