use crate::errors::Result;
use crate::math::Matrix4;

/// Opaque handle to an uploaded mesh, issued by the graphics layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MeshId(pub u32);

/// Opaque handle to a material (shader plus parameters), issued by the graphics layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MaterialId(pub u32);

/// What the scene layer needs from a graphics API.
pub trait RenderBackend {
    /// Sets a 4×4 matrix parameter on a material. `col_major` holds 16 floats.
    fn set_matrix_parameter(&mut self, material: MaterialId, name: &str, col_major: &[f32]) -> Result<()>;

    /// Binds mesh and material and issues an indexed draw.
    fn draw_elements(&mut self, mesh: MeshId, material: MaterialId) -> Result<()>;
}

/// Counters collected during one render traversal.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderStats {
    /// Scene objects reached by the traversal.
    pub objects_visited: usize,
    /// Renderer components invoked.
    pub renderers_invoked: usize,
}

/// State of one render pass, threaded through every render call.
///
/// Holds what would otherwise be process-wide: the backend, and the view and
/// projection of the camera the pass renders from.
pub struct RenderContext<'a> {
    backend: &'a mut dyn RenderBackend,
    view: Matrix4,
    projection: Matrix4,
    stats: RenderStats,
}

impl<'a> RenderContext<'a> {
    /// Context with identity view and projection.
    pub fn new(backend: &'a mut dyn RenderBackend) -> Self {
        Self::with_camera(backend, Matrix4::identity(), Matrix4::identity())
    }

    pub fn with_camera(backend: &'a mut dyn RenderBackend, view: Matrix4, projection: Matrix4) -> Self {
        Self {
            backend,
            view,
            projection,
            stats: RenderStats::default(),
        }
    }

    #[inline]
    pub fn backend(&mut self) -> &mut (dyn RenderBackend + 'a) {
        &mut *self.backend
    }

    #[inline]
    #[must_use]
    pub fn view(&self) -> &Matrix4 {
        &self.view
    }

    #[inline]
    #[must_use]
    pub fn projection(&self) -> &Matrix4 {
        &self.projection
    }

    #[inline]
    #[must_use]
    pub fn stats(&self) -> RenderStats {
        self.stats
    }

    pub(crate) fn record_object(&mut self) {
        self.stats.objects_visited += 1;
    }

    pub(crate) fn record_renderer(&mut self) {
        self.stats.renderers_invoked += 1;
    }
}
