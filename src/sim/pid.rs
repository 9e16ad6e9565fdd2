//! PID controller used to turn the ship toward the pointer

use std::f32::consts::PI;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::settings::Tuning;
use crate::{angle_between, bound_angle};

/// State carried between ticks
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PidState {
    pub integral: f32,
    pub error: f32,
    pub output: f32,
}

/// Gains and sample period
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PidConfig {
    pub kp: f32,
    pub ki: f32,
    pub kd: f32,
    pub dt: f32,
}

impl PidConfig {
    pub fn from_tuning(tuning: &Tuning) -> Self {
        Self {
            kp: tuning.pid_kp,
            ki: tuning.pid_ki,
            kd: tuning.pid_kd,
            dt: tuning.pid_dt,
        }
    }
}

/// Advance the controller one sample. Output is unclamped.
pub fn next_state(prev: &PidState, error: f32, config: &PidConfig) -> PidState {
    let integral = prev.integral + error * config.dt;
    let derivative = (error - prev.error) / config.dt;
    PidState {
        integral,
        error,
        output: config.kp * error + config.ki * integral + config.kd * derivative,
    }
}

/// Signed heading error toward the pointer, as a fraction of π in [-1, 1].
/// Positive means the ship should turn toward increasing angles.
pub fn aim_error(heading: f32, ship_on_screen: Vec2, pointer: Vec2) -> f32 {
    let to_pointer = pointer - ship_on_screen;
    let bearing = to_pointer.y.atan2(to_pointer.x);
    angle_between(bound_angle(bearing), bound_angle(heading)) / PI
}
