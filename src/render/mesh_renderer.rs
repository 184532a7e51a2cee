use crate::errors::Result;
use crate::math::Matrix;
use crate::render::context::{MaterialId, MeshId, RenderContext};
use crate::render::{ObjectFrame, Renderable};
use crate::scene::component::Component;

/// Shader parameter receiving the model → world matrix.
pub const MODEL_UNIFORM: &str = "u_Model";
/// Shader parameter receiving the camera's view matrix.
pub const VIEW_UNIFORM: &str = "u_View";
/// Shader parameter receiving the camera's projection matrix.
pub const PROJECTION_UNIFORM: &str = "u_Projection";

/// Draws a mesh with a material at the owning object's world transform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MeshRendererComponent {
    pub mesh: MeshId,
    pub material: MaterialId,
}

impl MeshRendererComponent {
    #[must_use]
    pub fn new(mesh: MeshId, material: MaterialId) -> Self {
        Self { mesh, material }
    }
}

impl Renderable for MeshRendererComponent {
    fn render(&self, frame: &ObjectFrame, ctx: &mut RenderContext<'_>) -> Result<()> {
        let view = *ctx.view();
        let projection = *ctx.projection();
        let backend = ctx.backend();

        backend.set_matrix_parameter(self.material, MODEL_UNIFORM, frame.model_to_world.col_major_data())?;
        backend.set_matrix_parameter(self.material, VIEW_UNIFORM, view.col_major_data())?;
        backend.set_matrix_parameter(self.material, PROJECTION_UNIFORM, projection.col_major_data())?;
        backend.draw_elements(self.mesh, self.material)
    }
}

impl Component for MeshRendererComponent {
    fn name(&self) -> &str {
        "MeshRenderer"
    }

    fn as_renderable(&self) -> Option<&dyn Renderable> {
        Some(self)
    }
}
