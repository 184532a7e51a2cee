//! Math library
//!
//! The small matrix/vector toolkit the scene substrate is built on:
//! - [`Matrix`]: element access with wrapping indices, column-major export
//! - [`StandardMatrix`]: fixed-size column-major matrix, [`Matrix4`] for homogeneous transforms
//! - [`Vector2f`] / [`Vector3f`]: plain float aggregates
//! - Angle conversion constants
//!
//! Everything converts to and from `glam` at the edges so callers can hand the
//! results to code that already speaks `glam`.

pub mod constants;
pub mod matrix;
pub mod vector;

pub use constants::{DEG_TO_RAD, GRAD_TO_RAD, RAD_TO_DEG, RAD_TO_GRAD};
pub use matrix::{Matrix, Matrix4, StandardMatrix, multiply_into, wrap_index};
pub use vector::{Vector2f, Vector3f};
