mod common;

use std::process::Command;

use common::{make_temp_dir, write_event_file};

fn viewer() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_seiswaves-view"));
    cmd.env("RUST_LOG", "off");
    cmd
}

#[test]
fn empty_window_exits_with_status_one() {
    let dir = make_temp_dir("viewer_empty");
    let path = write_event_file(&dir, "event.mseed", 30);
    let out = viewer()
        .arg(&path)
        .args(["2024-07-29T06:00:00", "10", "--no-plot"])
        .output()
        .expect("run seiswaves-view");
    assert_eq!(out.status.code(), Some(1));
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(stdout.contains("Showing segment: 0 Trace(s) in Stream:"), "{stdout}");
    assert!(stdout.contains("No data found in the specified interval."), "{stdout}");
}

#[test]
fn summary_only_run_succeeds() {
    let dir = make_temp_dir("viewer_ok");
    let path = write_event_file(&dir, "event.mseed", 30);
    let out = viewer()
        .arg(&path)
        .args(["2024-07-29T03:45:20", "2.5", "--no-plot"])
        .output()
        .expect("run seiswaves-view");
    assert!(out.status.success(), "{out:?}");
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(stdout.contains("Showing segment: 2 Trace(s) in Stream:"), "{stdout}");
    assert!(stdout.contains("XX.UNIO.00.ENT | 2024-07-29T03:45:20.000000Z"), "{stdout}");
}

#[test]
fn missing_file_is_an_error() {
    let dir = make_temp_dir("viewer_missing");
    let out = viewer()
        .current_dir(&dir)
        .env("PROJECT_LOCAL_ROOT", &dir)
        .args(["nope.mseed", "2024-07-29T03:45:20", "2", "--no-plot"])
        .output()
        .expect("run seiswaves-view");
    assert!(!out.status.success());
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("mseed file does not exist"), "{stderr}");
}
