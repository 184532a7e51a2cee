//! Angle conversion factors.

/// Degrees to radians.
pub const DEG_TO_RAD: f32 = (std::f64::consts::PI / 180.0) as f32;
/// Radians to degrees.
pub const RAD_TO_DEG: f32 = (180.0 / std::f64::consts::PI) as f32;
/// Gradians to radians.
pub const GRAD_TO_RAD: f32 = (std::f64::consts::PI / 200.0) as f32;
/// Radians to gradians.
pub const RAD_TO_GRAD: f32 = (200.0 / std::f64::consts::PI) as f32;
