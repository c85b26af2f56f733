use egui::Vec2;
use egui_kittest::Harness;

use crate::config::AppConfig;
use crate::{EventExtractor, StartupConfig};

/// Harness with `AppConfig::default()` unless `startup.config` is set, so tests
/// never read the user's config file.
pub fn harness_with_startup(mut startup: StartupConfig) -> Harness<'static, EventExtractor> {
    if startup.config.is_none() {
        startup.config = Some(AppConfig::default());
    }
    Harness::builder()
        .with_size(Vec2::new(800.0, 600.0))
        .with_os(egui::os::OperatingSystem::from_target_os())
        .build_eframe(|cc| EventExtractor::new(cc, startup).expect("init test app"))
}

pub fn harness_default() -> Harness<'static, EventExtractor> {
    harness_with_startup(StartupConfig::default())
}
