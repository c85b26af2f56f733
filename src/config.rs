use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

pub const PROJECT_ROOT_VAR: &str = "PROJECT_LOCAL_ROOT";
pub const CONFIG_FILE_NAME: &str = "seiswaves.toml";
pub const DURATION_MIN_SECS: f64 = 0.1;
pub const DURATION_MAX_SECS: f64 = 600.0;
pub const DURATION_STEP_SECS: f64 = 0.1;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub project_root: Option<PathBuf>,
    pub mseed_subdir: PathBuf,
    pub resample_hz: f64,
    pub channels: Vec<String>,
    pub default_channel: String,
    pub default_duration_secs: f64,
    pub window_size: [f32; 2],
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            project_root: None,
            mseed_subdir: PathBuf::from("resultados").join("mseed"),
            resample_hz: 100.0,
            channels: vec!["ENT".to_string(), "ENR".to_string(), "ENV".to_string()],
            default_channel: "ENT".to_string(),
            default_duration_secs: 10.0,
            window_size: [800.0, 600.0],
        }
    }
}

impl AppConfig {
    /// Defaults, then the user config file, then `.env`, then the environment.
    pub fn load() -> Result<Self> {
        let mut cfg = match Self::config_path() {
            Some(path) if path.is_file() => Self::from_file(&path)?,
            _ => Self::default(),
        };
        let cwd = std::env::current_dir().context("resolve current directory")?;
        if let Some(env_file) = find_dotenv(&cwd) {
            match read_dotenv_var(&env_file, PROJECT_ROOT_VAR) {
                Ok(Some(root)) => cfg.project_root = Some(PathBuf::from(root)),
                Ok(None) => {}
                Err(err) => log::warn!("{err:#}"),
            }
        }
        if let Some(root) = std::env::var_os(PROJECT_ROOT_VAR) {
            if !root.is_empty() {
                cfg.project_root = Some(PathBuf::from(root));
            }
        }
        cfg.normalize();
        match cfg.project_root.as_ref() {
            Some(root) => log::info!("project root: {}", root.display()),
            None => log::warn!("{PROJECT_ROOT_VAR} is not set; using the current directory"),
        }
        Ok(cfg)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("read config {}", path.display()))?;
        let mut cfg: Self =
            toml::from_str(&text).with_context(|| format!("parse config {}", path.display()))?;
        cfg.normalize();
        Ok(cfg)
    }

    pub fn config_path() -> Option<PathBuf> {
        let base = std::env::var_os("APPDATA")
            .or_else(|| std::env::var_os("LOCALAPPDATA"))
            .or_else(|| std::env::var_os("XDG_CONFIG_HOME"))
            .map(PathBuf::from)
            .or_else(|| std::env::var_os("HOME").map(|h| PathBuf::from(h).join(".config")))?;
        Some(base.join("SeisWaves").join(CONFIG_FILE_NAME))
    }

    fn normalize(&mut self) {
        if !(self.resample_hz.is_finite() && self.resample_hz > 0.0) {
            log::warn!("ignoring resample_hz = {}", self.resample_hz);
            self.resample_hz = Self::default().resample_hz;
        }
        self.default_duration_secs = if self.default_duration_secs.is_finite() {
            self.default_duration_secs
                .clamp(DURATION_MIN_SECS, DURATION_MAX_SECS)
        } else {
            Self::default().default_duration_secs
        };
        self.channels.retain(|c| !c.trim().is_empty());
        if self.channels.is_empty() {
            self.channels = Self::default().channels;
        }
        if !self.channels.contains(&self.default_channel) {
            self.default_channel = self.channels[0].clone();
        }
    }

    /// Directory the open dialog starts in.
    pub fn mseed_dir(&self) -> PathBuf {
        match &self.project_root {
            Some(root) => root.join(&self.mseed_subdir),
            None => std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
        }
    }

    /// A path given on the command line, or a bare name under the mseed directory.
    pub fn resolve_mseed_path(&self, name: &Path) -> Result<PathBuf> {
        if name.is_file() {
            return Ok(name.to_path_buf());
        }
        let root = self.project_root.as_ref().with_context(|| {
            format!(
                "{} not found and {PROJECT_ROOT_VAR} is not set",
                name.display()
            )
        })?;
        let path = root.join(&self.mseed_subdir).join(name);
        if !path.is_file() {
            anyhow::bail!("mseed file does not exist: {}", path.display());
        }
        Ok(path)
    }
}

/// Nearest `.env` in `start` or one of its ancestors.
pub fn find_dotenv(start: &Path) -> Option<PathBuf> {
    start
        .ancestors()
        .map(|dir| dir.join(".env"))
        .find(|p| p.is_file())
}

/// Value of `key` in a dotenv file; the last assignment wins.
pub fn read_dotenv_var(path: &Path, key: &str) -> Result<Option<String>> {
    let iter =
        dotenvy::from_path_iter(path).with_context(|| format!("read {}", path.display()))?;
    last_value(iter, key).with_context(|| format!("parse {}", path.display()))
}

fn last_value<R: std::io::Read>(
    iter: dotenvy::Iter<R>,
    key: &str,
) -> std::result::Result<Option<String>, dotenvy::Error> {
    let mut found = None;
    for item in iter {
        let (k, v) = item?;
        if k == key {
            found = Some(v);
        }
    }
    Ok(found)
}
