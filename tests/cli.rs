mod common;

use common::synthetic_image::{camera_frame, straight_lanes};
use lane_estimator::image::io::save_rgb_png;
use lane_estimator::{Calibration, PerspectiveTransformer};
use std::fs;
use std::path::PathBuf;
use std::process::Command;

const W: usize = 160;
const H: usize = 120;

fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("lane_demo_{name}_{}", std::process::id()));
    let _ = fs::remove_dir_all(&dir);
    fs::create_dir_all(&dir).expect("create scratch dir");
    dir
}

#[test]
fn debug_output_failure_does_not_stop_later_frames() {
    let dir = scratch_dir("debug_failure");
    let transformer = PerspectiveTransformer::new(&Calibration::proportional(W, H)).expect("valid");
    let frame = camera_frame(&transformer, &straight_lanes(W, H, 45.0, 115.0));

    let inputs: Vec<PathBuf> = (0..3)
        .map(|i| {
            let path = dir.join(format!("frame_{i}.png"));
            save_rgb_png(&frame, &path).expect("write frame");
            path
        })
        .collect();

    // A regular file where a directory is expected makes every debug write fail.
    let blocker = dir.join("not_a_dir");
    fs::write(&blocker, b"").expect("write blocker");
    let config = serde_json::json!({
        "inputs": inputs,
        "output": { "format": "text", "debug_dir": blocker.join("dbg") },
    });
    let config_path = dir.join("config.json");
    fs::write(&config_path, config.to_string()).expect("write config");

    let output = Command::new(env!("CARGO_BIN_EXE_lane_demo"))
        .arg(&config_path)
        .output()
        .expect("run lane_demo");
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    for index in 0..3 {
        assert!(stdout.contains(&format!("Frame {index} ")), "stdout: {stdout}");
    }

    let _ = fs::remove_dir_all(&dir);
}
