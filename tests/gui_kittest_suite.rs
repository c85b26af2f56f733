mod common;

#[cfg(feature = "kittest")]
mod kittest_suite {
    use std::path::PathBuf;
    use std::time::{Duration, Instant};

    use egui_kittest::{kittest::Queryable, Harness};
    use seiswaves::app::NoticeLevel;
    use seiswaves::kittest::{harness_default, harness_with_startup};
    use seiswaves::{EventExtractor, StartupConfig};

    use crate::common::{make_temp_dir, write_event_file};

    const LOAD_TIMEOUT: Duration = Duration::from_secs(30);

    fn fixture(tag: &str) -> PathBuf {
        let dir = make_temp_dir(tag);
        write_event_file(&dir, "event.mseed", 60)
    }

    fn wait_for_load(harness: &mut Harness<'static, EventExtractor>) {
        let start = Instant::now();
        loop {
            harness.run_steps(1);
            if !harness.state().is_loading() {
                break;
            }
            if start.elapsed() > LOAD_TIMEOUT {
                panic!("load timeout");
            }
            std::thread::sleep(Duration::from_millis(20));
        }
        harness.run_steps(1);
    }

    #[test]
    fn empty_app_shows_controls() {
        let mut harness = harness_default();
        harness.run_steps(1);
        harness.get_by_label("mseed file:");
        harness.get_by_label("Open…");
        harness.get_by_label("Start time (hh:mm:ss):");
        harness.get_by_label("Duration (s):");
        harness.get_by_label("Shift (s):");
        harness.get_by_label("Channel:");
        harness.get_by_label("Center: OFF");
        harness.get_by_label("Quit");
        harness.get_by_label("Center: --");
        harness.get_by_label("Position: --");
        harness.get_by_label("Date: --   Start: --   End: --");
    }

    #[test]
    fn preview_before_open_shows_warning_notice() {
        let mut harness = harness_default();
        harness.run_steps(1);
        harness.get_by_label("Preview").click();
        harness.run_steps(2);
        harness.get_by_label("Open an mseed file first.");
        assert_eq!(
            harness.state().notice.as_ref().map(|n| n.level),
            Some(NoticeLevel::Warning)
        );
        harness.get_by_label("OK").click();
        harness.run_steps(2);
        assert!(harness.state().notice.is_none());
    }

    #[test]
    fn notice_blocks_the_controls_behind_it() {
        let mut harness = harness_default();
        harness.run_steps(1);
        harness.get_by_label("Preview").click();
        harness.run_steps(2);
        assert!(harness.state().notice.is_some());
        harness.get_by_label("Center: OFF").click();
        harness.run_steps(2);
        assert!(!harness.state().centering.is_active());
        assert!(harness.state().notice.is_some());

        harness.get_by_label("OK").click();
        harness.run_steps(2);
        assert!(harness.state().notice.is_none());
        harness.get_by_label("Center: OFF").click();
        harness.run_steps(2);
        assert!(harness.state().centering.is_active());
    }

    #[test]
    fn open_dialog_uses_queue() {
        let path = fixture("open");
        let mut harness = harness_default();
        harness
            .state_mut()
            .test_queue_open_dialog(Some(path.clone()));
        harness.run_steps(1);
        harness.get_by_label("Open…").click();
        wait_for_load(&mut harness);
        let state = harness.state();
        assert_eq!(state.file_path_text, path.display().to_string());
        assert_eq!(state.start_time_text, "03:45:12");
        harness.get_by_label("Date: 2024-07-29   Start: 03:45:12   End: 03:46:11");
    }

    #[test]
    fn cancelled_dialog_keeps_state() {
        let mut harness = harness_default();
        harness.state_mut().test_queue_open_dialog(None);
        harness.run_steps(1);
        harness.get_by_label("Open…").click();
        harness.run_steps(2);
        assert!(!harness.state().is_loading());
        assert!(harness.state().source.is_none());
        assert!(harness.state().notice.is_none());
    }

    #[test]
    fn preview_and_centering_through_buttons() {
        let startup = StartupConfig {
            open_file: Some(fixture("center")),
            ..StartupConfig::default()
        };
        let mut harness = harness_with_startup(startup);
        wait_for_load(&mut harness);
        harness.state_mut().start_time_text = "03:45:20".to_string();
        harness.state_mut().duration_secs = 10.0;
        harness.get_by_label("Preview").click();
        harness.run_steps(2);
        assert!(harness.state().plot.is_some());
        harness.get_by_label("Center: 03:45:25,000");
        harness.get_by_label("event.mseed");

        harness.get_by_label("Center: OFF").click();
        harness.run_steps(2);
        assert!(harness.state().centering.is_active());
        harness.get_by_label("Center: ON").click();
        harness.run_steps(2);
        assert!(!harness.state().centering.is_active());
    }
}
