use crate::control::{
    ControlOptions, HeuristicController, PidController, PidOptions, SteeringController,
};
use crate::detector::LaneParams;
use crate::error::IoError;
use crate::overlay::OverlayOptions;
use crate::perspective::Calibration;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Clone, Copy, Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
    Both,
}

impl OutputFormat {
    pub fn includes_text(self) -> bool {
        matches!(self, OutputFormat::Text | OutputFormat::Both)
    }

    pub fn includes_json(self) -> bool {
        matches!(self, OutputFormat::Json | OutputFormat::Both)
    }
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub json_out: Option<PathBuf>,
    pub debug_dir: Option<PathBuf>,
    pub format: OutputFormat,
}

#[derive(Clone, Copy, Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ControllerKind {
    #[default]
    Heuristic,
    Pid,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct ControlConfig {
    pub controller: ControllerKind,
    pub heuristic: ControlOptions,
    pub pid: PidOptions,
}

impl ControlConfig {
    pub fn build(&self) -> Box<dyn SteeringController> {
        match self.controller {
            ControllerKind::Heuristic => Box::new(HeuristicController::new(self.heuristic)),
            ControllerKind::Pid => Box::new(PidController::new(self.pid, self.heuristic)),
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct RuntimeConfig {
    /// Frames processed in order as one tracking session.
    pub inputs: Vec<PathBuf>,
    /// Falls back to `Calibration::proportional` for the first frame's size.
    #[serde(default)]
    pub calibration: Option<Calibration>,
    #[serde(default)]
    pub params: LaneParams,
    #[serde(default)]
    pub control: ControlConfig,
    #[serde(default)]
    pub overlay: OverlayOptions,
    #[serde(default)]
    pub output: OutputConfig,
}

impl RuntimeConfig {
    pub fn calibration_for(&self, width: usize, height: usize) -> Calibration {
        self.calibration
            .clone()
            .unwrap_or_else(|| Calibration::proportional(width, height))
    }
}

pub fn load_config(path: &Path) -> Result<RuntimeConfig, IoError> {
    let contents = fs::read_to_string(path).map_err(|source| IoError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&contents).map_err(|source| IoError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// `<program> <config.json>`
pub fn parse_cli(program: &str) -> Result<RuntimeConfig, String> {
    let mut args = std::env::args().skip(1);
    let path = args
        .next()
        .ok_or_else(|| format!("Usage: {program} <config.json>"))?;
    if args.next().is_some() {
        return Err(format!("Usage: {program} <config.json>"));
    }
    load_config(Path::new(&path)).map_err(|e| e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minimal_config_uses_defaults() {
        let cfg: RuntimeConfig = serde_json::from_str(r#"{ "inputs": ["a.png"] }"#).expect("parse");
        assert_eq!(cfg.inputs, vec![PathBuf::from("a.png")]);
        assert!(cfg.calibration.is_none());
        assert_eq!(cfg.params, LaneParams::default());
        assert_eq!(cfg.output.format, OutputFormat::Text);
        assert_eq!(cfg.control.controller, ControllerKind::Heuristic);
        assert_eq!(cfg.calibration_for(640, 480).camera_size, (640, 480));
    }

    #[test]
    fn nested_overrides_are_partial() {
        let cfg: RuntimeConfig = serde_json::from_str(
            r#"{
                "inputs": [],
                "params": {
                    "sliding_window": { "margin": 50 },
                    "tracking": { "max_stale_frames": 2 },
                    "parallel_sides": true
                },
                "control": { "controller": "pid", "pid": { "kp": 0.8 } },
                "output": { "format": "both", "json_out": "out/report.json" }
            }"#,
        )
        .expect("parse");
        assert_eq!(cfg.params.sliding_window.margin, 50);
        assert_eq!(cfg.params.sliding_window.windows, 9);
        assert_eq!(cfg.params.tracking.max_stale_frames, 2);
        assert!(cfg.params.parallel_sides);
        assert_eq!(cfg.control.controller, ControllerKind::Pid);
        assert_eq!(cfg.control.pid.kp, 0.8);
        assert_eq!(cfg.control.pid.ki, 0.1);
        assert!(cfg.output.format.includes_text() && cfg.output.format.includes_json());
    }

    #[test]
    fn explicit_calibration_is_parsed() {
        let cfg: RuntimeConfig = serde_json::from_str(
            r#"{
                "inputs": [],
                "calibration": {
                    "src": [[364, 326], [0, 599], [766, 599], [494, 326]],
                    "dst": [[200, 0], [200, 600], [600, 600], [600, 0]],
                    "camera_size": [800, 600],
                    "top_down_size": [800, 600]
                }
            }"#,
        )
        .expect("parse");
        let calib = cfg.calibration_for(1, 1);
        assert_eq!(calib.src[2], [766.0, 599.0]);
        assert_eq!(calib.top_down_size, (800, 600));
    }

    #[test]
    fn missing_file_is_read_error() {
        let err = load_config(Path::new("/nonexistent/lane.json")).unwrap_err();
        assert!(matches!(err, IoError::Read { .. }));
    }
}
