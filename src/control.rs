//! Reference mapping from lane estimates to steering and throttle.
//!
//! Steering is in `[-1, 1]` (negative = left), throttle in `[0, 1]`. Both
//! controllers steer toward the lane center: a vehicle right of the center
//! (positive offset) gets a negative, leftward command. When a frame has no
//! estimate the previous command is held.
use crate::types::{CurveDirection, Estimate, FrameReport};
use serde::{Deserialize, Serialize};

/// Tuned constants of [`HeuristicController`].
#[derive(Clone, Copy, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct ControlOptions {
    /// Offset (cm) that maps to full steering before sensitivity.
    pub offset_normalization_cm: f64,
    pub steering_sensitivity: f64,
    /// Curves tighter than this add steering in the bend direction.
    pub tight_curve_radius_m: f64,
    /// Radius floor when computing the curve factor.
    pub curve_radius_floor_m: f64,
    pub max_curve_factor: f64,
    pub curve_gain: f64,
    pub base_throttle: f64,
    /// Curves tighter than this scale throttle by `radius / slow_curve_radius_m`.
    pub slow_curve_radius_m: f64,
    /// Offset (cm) at which the off-center slowdown saturates.
    pub off_center_limit_cm: f64,
    /// Throttle fraction removed at `off_center_limit_cm`.
    pub off_center_slowdown: f64,
    pub min_throttle: f64,
}

impl Default for ControlOptions {
    fn default() -> Self {
        Self {
            offset_normalization_cm: 100.0,
            steering_sensitivity: 0.5,
            tight_curve_radius_m: 500.0,
            curve_radius_floor_m: 50.0,
            max_curve_factor: 2.0,
            curve_gain: 0.1,
            base_throttle: 0.7,
            slow_curve_radius_m: 300.0,
            off_center_limit_cm: 50.0,
            off_center_slowdown: 0.5,
            min_throttle: 0.3,
        }
    }
}

/// Gains of [`PidController`]. The error is the lane offset in meters.
#[derive(Clone, Copy, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct PidOptions {
    pub kp: f64,
    pub ki: f64,
    pub kd: f64,
    /// Anti-windup bound on the integral term.
    pub integral_limit: f64,
}

impl Default for PidOptions {
    fn default() -> Self {
        Self {
            kp: 1.0,
            ki: 0.1,
            kd: 0.05,
            integral_limit: 10.0,
        }
    }
}

/// Continuous actuator command.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ControlCommand {
    pub steering: f64,
    pub throttle: f64,
}

/// Key-level steering input.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum SteerInput {
    Left,
    Center,
    Right,
}

/// Key-level pedal input.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum PedalInput {
    Forward,
    Brake,
}

impl ControlCommand {
    /// Reduce to on/off inputs; values within `deadband` count as neutral.
    pub fn discretize(&self, deadband: f64) -> (SteerInput, PedalInput) {
        let steer = if self.steering < -deadband {
            SteerInput::Left
        } else if self.steering > deadband {
            SteerInput::Right
        } else {
            SteerInput::Center
        };
        let pedal = if self.throttle > deadband {
            PedalInput::Forward
        } else {
            PedalInput::Brake
        };
        (steer, pedal)
    }
}

/// Anything that turns frame reports into actuator commands.
pub trait SteeringController {
    fn update(&mut self, report: &FrameReport) -> ControlCommand;

    /// Command issued for the most recent report.
    fn last_command(&self) -> ControlCommand;
}

/// Throttle shared by both controllers: slow down in tight curves and when
/// off-center, never below `min_throttle`.
pub fn throttle_for(estimate: &Estimate, opts: &ControlOptions) -> f64 {
    let mut throttle = opts.base_throttle;
    let radius = estimate.mean_radius_m;
    if radius < opts.slow_curve_radius_m {
        throttle *= (radius / opts.slow_curve_radius_m).min(1.0);
    }
    let off = estimate.offset_cm().abs().min(opts.off_center_limit_cm);
    throttle *= 1.0 - (off / opts.off_center_limit_cm) * opts.off_center_slowdown;
    throttle.max(opts.min_throttle).min(1.0)
}

/// Proportional offset steering with a curve feed-forward term.
#[derive(Clone, Debug, Default)]
pub struct HeuristicController {
    opts: ControlOptions,
    last: ControlCommand,
}

impl HeuristicController {
    pub fn new(opts: ControlOptions) -> Self {
        Self {
            opts,
            last: ControlCommand::default(),
        }
    }

    pub fn command_for(&self, estimate: &Estimate) -> ControlCommand {
        let o = &self.opts;
        let mut steering = (-estimate.offset_cm() / o.offset_normalization_cm
            * o.steering_sensitivity)
            .clamp(-1.0, 1.0);
        if estimate.mean_radius_m < o.tight_curve_radius_m {
            let radius = estimate.mean_radius_m.max(o.curve_radius_floor_m);
            let factor = (o.tight_curve_radius_m / radius).min(o.max_curve_factor);
            match estimate.curve_direction {
                CurveDirection::Left => steering -= factor * o.curve_gain,
                CurveDirection::Right => steering += factor * o.curve_gain,
                CurveDirection::Straight => {}
            }
        }
        ControlCommand {
            steering: steering.clamp(-1.0, 1.0),
            throttle: throttle_for(estimate, o),
        }
    }
}

impl SteeringController for HeuristicController {
    fn update(&mut self, report: &FrameReport) -> ControlCommand {
        if let Some(estimate) = &report.estimate {
            self.last = self.command_for(estimate);
        }
        self.last
    }

    fn last_command(&self) -> ControlCommand {
        self.last
    }
}

/// PID on the lane offset, one step per frame.
#[derive(Clone, Debug, Default)]
pub struct PidController {
    gains: PidOptions,
    throttle: ControlOptions,
    integral: f64,
    previous_error: Option<f64>,
    last: ControlCommand,
}

impl PidController {
    pub fn new(gains: PidOptions, throttle: ControlOptions) -> Self {
        Self {
            gains,
            throttle,
            ..Self::default()
        }
    }

    /// Advance the loop with a new error sample and return the raw output.
    pub fn compute(&mut self, error: f64) -> f64 {
        let g = &self.gains;
        self.integral = (self.integral + error).clamp(-g.integral_limit, g.integral_limit);
        let derivative = self.previous_error.map_or(0.0, |prev| error - prev);
        self.previous_error = Some(error);
        g.kp * error + g.ki * self.integral + g.kd * derivative
    }

    pub fn integral(&self) -> f64 {
        self.integral
    }

    pub fn reset(&mut self) {
        self.integral = 0.0;
        self.previous_error = None;
        self.last = ControlCommand::default();
    }
}

impl SteeringController for PidController {
    fn update(&mut self, report: &FrameReport) -> ControlCommand {
        if let Some(estimate) = &report.estimate {
            let steering = self.compute(-estimate.center_offset_m).clamp(-1.0, 1.0);
            self.last = ControlCommand {
                steering,
                throttle: throttle_for(estimate, &self.throttle),
            };
        }
        self.last
    }

    fn last_command(&self) -> ControlCommand {
        self.last
    }
}
