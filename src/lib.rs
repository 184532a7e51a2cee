#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

//! Surreal: a small scene graph.
//!
//! Scene objects carry components. Every object has exactly one
//! [`TransformComponent`] placing it in a parent/child hierarchy, and at most
//! one renderer. Transforms cache their local and world matrices and only
//! recompute what a change actually invalidated.
//!
//! ```rust,ignore
//! use surreal::{MeshRendererComponent, MeshId, MaterialId, Scene, Vector3f};
//!
//! let mut scene = Scene::new();
//! let sun = scene.build_object("Sun").build()?;
//! let earth = scene
//!     .build_object("Earth")
//!     .with_position(5.0, 0.0, 0.0)
//!     .with_parent(sun)
//!     .with_renderer(MeshRendererComponent::new(MeshId(0), MaterialId(0)))
//!     .build()?;
//!
//! let world = scene.model_to_world(scene.transform_of(earth)?)?;
//! ```

pub mod errors;
pub mod math;
pub mod render;
pub mod scene;

pub use errors::{Result, SurrealError};
pub use math::{Matrix, Matrix4, StandardMatrix, Vector2f, Vector3f};
pub use render::{MaterialId, MeshId, MeshRendererComponent, RenderBackend, RenderContext, RenderStats, Renderable};
pub use scene::{
    BaseComponent, CameraComponent, CameraSettings, Component, ComponentKey, ComponentRole, Scene,
    SceneObject, SceneObjectKey, TransformComponent,
};
