//! Render seam
//!
//! The scene layer does not draw anything itself. It walks the object tree and
//! hands every renderer component an [`ObjectFrame`] (which object, where it is in
//! the world) plus the [`RenderContext`] of the current pass. Actual GPU work
//! happens behind [`RenderBackend`], implemented by the graphics layer.
//!
//! ```rust,ignore
//! let mut ctx = RenderContext::with_camera(&mut backend, view, projection);
//! scene.render(&mut ctx)?;
//! log::info!("{:?}", ctx.stats());
//! ```

pub mod context;
pub mod mesh_renderer;

pub use context::{MaterialId, MeshId, RenderBackend, RenderContext, RenderStats};
pub use mesh_renderer::MeshRendererComponent;

use crate::errors::Result;
use crate::math::Matrix4;
use crate::scene::SceneObjectKey;

/// Per-object input of a render call.
#[derive(Debug, Clone, Copy)]
pub struct ObjectFrame {
    /// The object being drawn.
    pub object: SceneObjectKey,
    /// Model → world matrix of the object's transform.
    pub model_to_world: Matrix4,
}

/// The render capability of a component.
pub trait Renderable {
    /// Draws one object. An error stops the surrounding traversal.
    fn render(&self, frame: &ObjectFrame, ctx: &mut RenderContext<'_>) -> Result<()>;
}
