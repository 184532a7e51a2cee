//! Chainable object operation wrapper.
//!
//! [`SceneObjectMut`] borrows a [`Scene`] mutably and provides a fluent API
//! for placing objects without threading a `Result` through every call.
//!
//! All methods silently no-op when the handle is stale. Rejected input
//! (a zero scale, a cyclic parent) is logged and skipped.
//!
//! # Example
//!
//! ```rust,ignore
//! scene.object(moon)
//!     .set_position(2.0, 0.0, 0.0)
//!     .set_scale(0.25)
//!     .set_parent(Some(earth));
//! ```
#![allow(clippy::return_self_not_must_use)]
#![allow(clippy::must_use_candidate)]

use crate::errors::Result;
use crate::math::Vector3f;
use crate::scene::scene::Scene;
use crate::scene::{ComponentKey, SceneObjectKey};

/// Temporary mutable borrow of a scene object for chainable operations.
pub struct SceneObjectMut<'a> {
    scene: &'a mut Scene,
    handle: SceneObjectKey,
}

impl<'a> SceneObjectMut<'a> {
    #[inline]
    pub fn new(scene: &'a mut Scene, handle: SceneObjectKey) -> Self {
        Self { scene, handle }
    }

    /// Returns the underlying handle.
    #[inline]
    #[must_use]
    pub fn handle(&self) -> SceneObjectKey {
        self.handle
    }

    /// The object's current transform, if the handle is live.
    pub fn transform(&self) -> Option<ComponentKey> {
        self.scene.transform_of(self.handle).ok()
    }

    // -- Transform setters (chainable) --

    #[inline]
    pub fn set_position(self, x: f32, y: f32, z: f32) -> Self {
        self.set_position_vec(Vector3f::new(x, y, z))
    }

    #[inline]
    pub fn set_position_vec(self, position: Vector3f) -> Self {
        self.with_transform("set_position", |scene, t| scene.set_local_position(t, position))
    }

    /// Euler angles in degrees.
    #[inline]
    pub fn set_rotation(self, x: f32, y: f32, z: f32) -> Self {
        self.with_transform("set_rotation", |scene, t| {
            scene.set_local_rotation(t, Vector3f::new(x, y, z))
        })
    }

    /// Adds to the current Euler angles (degrees).
    #[inline]
    pub fn rotate(self, x: f32, y: f32, z: f32) -> Self {
        self.with_transform("rotate", |scene, t| scene.rotate(t, Vector3f::new(x, y, z)))
    }

    #[inline]
    pub fn translate(self, x: f32, y: f32, z: f32) -> Self {
        self.with_transform("translate", |scene, t| scene.translate(t, Vector3f::new(x, y, z)))
    }

    /// Sets uniform scale.
    #[inline]
    pub fn set_scale(self, s: f32) -> Self {
        self.set_scale_xyz(s, s, s)
    }

    /// Sets non-uniform scale.
    #[inline]
    pub fn set_scale_xyz(self, x: f32, y: f32, z: f32) -> Self {
        self.with_transform("set_scale", |scene, t| {
            scene.set_local_scale(t, Vector3f::new(x, y, z))
        })
    }

    // -- Hierarchy --

    /// Parents this object under `parent`, or detaches it from its parent with `None`.
    pub fn set_parent(self, parent: Option<SceneObjectKey>) -> Self {
        let handle = self.handle;
        self.with_transform("set_parent", |scene, _| scene.set_object_parent(handle, parent))
    }

    /// Appends this object to the scene's root list.
    pub fn add_to_scene(self) -> Self {
        let handle = self.handle;
        self.with_transform("add_to_scene", |scene, _| scene.add_scene_object(handle))
    }

    fn with_transform(
        self,
        operation: &str,
        apply: impl FnOnce(&mut Scene, ComponentKey) -> Result<()>,
    ) -> Self {
        if let Ok(transform) = self.scene.transform_of(self.handle)
            && let Err(err) = apply(self.scene, transform)
        {
            log::warn!("{operation} on {:?} skipped: {err}", self.handle);
        }
        self
    }
}
