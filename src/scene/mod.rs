//! Scene graph module
//!
//! Manages scene objects, their components and the spatial hierarchy:
//! - [`SceneObject`]: a node owning an ordered component list, one transform, at most one renderer
//! - [`Component`]: the attachable behaviour contract and its arena bookkeeping
//! - [`TransformComponent`]: local SRT plus four cached matrices with dirty tracking
//! - [`Scene`]: the owning arena and the list of root objects
//! - [`CameraComponent`]: projection settings, view matrix read from its transform
//! - `transform_system`: hierarchy walks (cache fill, invalidation, cycle checks)
//!
//! Objects and components live in `slotmap` arenas owned by [`Scene`]; every link
//! between them (component → owner, transform → parent/children) is a key.

pub mod camera;
pub mod component;
pub mod object;
pub mod scene;
pub mod transform;
pub mod transform_system;
pub mod wrapper;

pub use camera::{CameraComponent, CameraSettings, Projection};
pub use component::{BaseComponent, Component, ComponentEntry, ComponentRole};
pub use object::SceneObject;
pub use scene::{Scene, SceneObjectBuilder};
pub use transform::{CacheState, MatrixCache, TransformComponent};
pub use wrapper::SceneObjectMut;

use slotmap::new_key_type;

new_key_type! {
    /// Handle to a [`SceneObject`] in a [`Scene`].
    pub struct SceneObjectKey;
    /// Handle to any component stored in a [`Scene`].
    pub struct ComponentKey;
}
