//! Error Types
//!
//! This module defines the error type used throughout the engine.
//!
//! # Overview
//!
//! [`SurrealError`] covers the failure modes of the scene substrate:
//! - Stale or mistyped handles into the scene arenas
//! - Structural misuse of the object hierarchy (cycles, removing a required transform)
//! - Degenerate transform input
//! - Failures reported by the rendering backend
//!
//! Shape-mismatched matrix multiplication is not an error value: the const-generic
//! [`StandardMatrix`](crate::math::StandardMatrix) rejects it at compile time and the
//! dynamic [`multiply_into`](crate::math::multiply_into) panics.
//!
//! # Usage
//!
//! All fallible public APIs return [`Result<T>`], an alias for
//! `std::result::Result<T, SurrealError>`.
//!
//! ```rust,ignore
//! use surreal::errors::Result;
//!
//! fn move_player(scene: &mut Scene, player: ComponentKey) -> Result<()> {
//!     scene.set_local_position(player, Vector3f::new(0.0, 1.0, 0.0))?;
//!     Ok(())
//! }
//! ```

use thiserror::Error;

use crate::scene::{ComponentKey, SceneObjectKey};

/// The main error type for the Surreal engine.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SurrealError {
    // ========================================================================
    // Handle Errors
    // ========================================================================
    /// The scene object handle does not refer to a live object.
    #[error("Scene object not found: {0:?}")]
    StaleObject(SceneObjectKey),

    /// The component handle does not refer to a live component.
    #[error("Component not found: {0:?}")]
    StaleComponent(ComponentKey),

    /// Typed access to a component of a different concrete type.
    #[error("Component {key:?} is not a {expected}")]
    ComponentTypeMismatch {
        /// The component that was accessed
        key: ComponentKey,
        /// Name of the requested type
        expected: &'static str,
    },

    /// A transform operation was given a handle to a non-transform component.
    #[error("Component {0:?} is not a transform")]
    NotATransform(ComponentKey),

    /// The operation needs the component's owning object, but it is not attached.
    #[error("Component {0:?} is not attached to a scene object")]
    Detached(ComponentKey),

    /// The object's renderer slot holds a component without a render capability.
    #[error("Component {0:?} occupies a renderer slot but cannot render")]
    NotRenderable(ComponentKey),

    // ========================================================================
    // Structural Errors
    // ========================================================================
    /// The operation would leave a scene object without a transform.
    #[error("Scene object {0:?} must keep exactly one transform")]
    TransformRequired(SceneObjectKey),

    /// Reparenting would make a transform its own ancestor.
    #[error("Parenting {child:?} under {parent:?} would create a cycle")]
    HierarchyCycle {
        /// The transform being reparented
        child: ComponentKey,
        /// The requested parent
        parent: ComponentKey,
    },

    // ========================================================================
    // Math Errors
    // ========================================================================
    /// Scale components must be non-zero so the inverse transform exists.
    #[error("Scale components must be non-zero, got ({x}, {y}, {z})")]
    DegenerateScale {
        /// X scale
        x: f32,
        /// Y scale
        y: f32,
        /// Z scale
        z: f32,
    },

    /// Not enough values to fill a matrix.
    #[error("Matrix needs {expected} values, got {actual}")]
    MatrixDataLength {
        /// Number of elements the matrix holds
        expected: usize,
        /// Number of elements supplied
        actual: usize,
    },

    // ========================================================================
    // Rendering Errors
    // ========================================================================
    /// The rendering backend rejected a call.
    #[error("Render failed: {0}")]
    RenderFailed(String),
}

/// Alias for `Result<T, SurrealError>`.
pub type Result<T> = std::result::Result<T, SurrealError>;
