//! Camera pose as a pure function of elapsed time.
//!
//! Nothing is integrated between frames, so the same timestamp always yields
//! the same pose.

use glam::{Mat3, Vec3};

/// Distance the camera settles at once the fly-in has decayed.
pub const BASE_DEPTH: f32 = 35.0;
/// Upper bound of the fly-in offset; reached exactly at `t = 0`.
pub const FLY_IN_CAP: f32 = 500.0;
pub const BOB_AMPLITUDE: f32 = 10.0;
pub const BOB_OFFSET: f32 = 5.0;

const BOB_RATE: f32 = 1.0 / 10.0;
const YAW_RATE: f32 = 1.0 / 4.0;
const PITCH_RATE: f32 = 1.0 / (19.0 / 10.0 * 4.0);
const PITCH_AMPLITUDE: f32 = 1.0 / 4.0;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CameraPose {
    /// Position already rotated into camera-relative space.
    pub position: Vec3,
    pub orientation: Mat3,
}

impl CameraPose {
    pub fn at(seconds: f32) -> Self {
        let orientation = orientation(seconds);
        let position = orientation * Vec3::new(0.0, 0.0, depth(seconds));
        Self {
            position,
            orientation,
        }
    }

    /// Orientation as the column-major array expected by `cameraDir`.
    pub fn orientation_cols(&self) -> [f32; 9] {
        self.orientation.to_cols_array()
    }
}

/// Inverse-square fly-in term, `min(500, 500 / (3t²))`.
///
/// At `t = 0` the division produces `+inf` and the cap returns exactly
/// [`FLY_IN_CAP`].
pub fn fly_in_offset(seconds: f32) -> f32 {
    FLY_IN_CAP.min(FLY_IN_CAP / (seconds * seconds * 3.0))
}

pub fn depth(seconds: f32) -> f32 {
    BASE_DEPTH
        + fly_in_offset(seconds)
        + ((seconds * BOB_RATE).sin() * BOB_AMPLITUDE + BOB_OFFSET)
}

/// Yaw about Y, then a small pitch oscillation about X.
pub fn orientation(seconds: f32) -> Mat3 {
    let yaw = seconds * YAW_RATE;
    let pitch = (seconds * PITCH_RATE).sin() * PITCH_AMPLITUDE;
    Mat3::from_rotation_y(yaw) * Mat3::from_rotation_x(pitch)
}
