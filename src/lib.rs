pub mod app;
pub mod config;
pub mod extract;
pub mod stream;
pub mod timefmt;
pub mod viewer;

pub use app::{EventExtractor, StartupConfig};

#[cfg(feature = "kittest")]
pub mod kittest;
