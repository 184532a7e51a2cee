use crate::math::{DEG_TO_RAD, Matrix4};
use crate::scene::component::Component;

/// 4:3 aspect ratio.
pub const RATIO_4X3: f32 = 4.0 / 3.0;
/// 16:9 aspect ratio.
pub const RATIO_16X9: f32 = 16.0 / 9.0;
/// 21:9 aspect ratio.
pub const RATIO_21X9: f32 = 21.0 / 9.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Projection {
    Perspective,
    Orthographic,
}

/// Camera configuration.
///
/// | Field          | Description                                  | Default        |
/// |----------------|----------------------------------------------|----------------|
/// | `projection`   | Perspective or orthographic                  | `Perspective`  |
/// | `fov_degrees`  | Vertical field of view (perspective only)    | `75.0`         |
/// | `aspect`       | Width / height of the render plane           | [`RATIO_16X9`] |
/// | `near`         | Distance to the near clipping plane          | `0.1`          |
/// | `far`          | Distance to the far clipping plane           | `1000.0`       |
/// | `ortho_size`   | Half height of the view (orthographic only)  | `10.0`         |
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraSettings {
    pub projection: Projection,
    pub fov_degrees: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
    pub ortho_size: f32,
}

impl Default for CameraSettings {
    fn default() -> Self {
        Self {
            projection: Projection::Perspective,
            fov_degrees: 75.0,
            aspect: RATIO_16X9,
            near: 0.1,
            far: 1000.0,
            ortho_size: 10.0,
        }
    }
}

/// Turns the object it is attached to into a viewpoint.
///
/// The camera only owns its projection. Its view matrix is the world→model
/// matrix of the owning object's transform; see
/// [`Scene::view_matrix`](crate::scene::Scene::view_matrix).
#[derive(Debug, Clone, Default)]
pub struct CameraComponent {
    pub settings: CameraSettings,
}

impl CameraComponent {
    #[must_use]
    pub fn new(settings: CameraSettings) -> Self {
        Self { settings }
    }

    /// Perspective camera with the default clip planes.
    #[must_use]
    pub fn perspective(fov_degrees: f32, aspect: f32) -> Self {
        Self::new(CameraSettings {
            fov_degrees,
            aspect,
            ..CameraSettings::default()
        })
    }

    /// Projection matrix with OpenGL clip-space conventions (right-handed, depth -1..1).
    #[must_use]
    pub fn projection_matrix(&self) -> Matrix4 {
        let CameraSettings {
            projection,
            fov_degrees,
            aspect,
            near,
            far,
            ortho_size,
        } = self.settings;

        match projection {
            Projection::Perspective => {
                let f = 1.0 / (fov_degrees * DEG_TO_RAD * 0.5).tan();
                let depth = near - far;
                Matrix4::from_cols([
                    [f / aspect, 0.0, 0.0, 0.0],
                    [0.0, f, 0.0, 0.0],
                    [0.0, 0.0, (far + near) / depth, -1.0],
                    [0.0, 0.0, 2.0 * far * near / depth, 0.0],
                ])
            }
            Projection::Orthographic => {
                let w = ortho_size * aspect;
                let h = ortho_size;
                let depth = far - near;
                Matrix4::from_cols([
                    [1.0 / w, 0.0, 0.0, 0.0],
                    [0.0, 1.0 / h, 0.0, 0.0],
                    [0.0, 0.0, -2.0 / depth, 0.0],
                    [0.0, 0.0, -(far + near) / depth, 1.0],
                ])
            }
        }
    }
}

impl Component for CameraComponent {
    fn name(&self) -> &str {
        "Camera"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Mat4;

    #[test]
    fn perspective_matches_glam_gl() {
        let camera = CameraComponent::perspective(60.0, RATIO_4X3);
        let expected = Mat4::perspective_rh_gl(60f32.to_radians(), RATIO_4X3, 0.1, 1000.0);
        assert!(camera.projection_matrix().approx_eq(&Matrix4::from(expected), 1e-4));
    }

    #[test]
    fn orthographic_matches_glam_gl() {
        let camera = CameraComponent::new(CameraSettings {
            projection: Projection::Orthographic,
            aspect: 2.0,
            ortho_size: 5.0,
            near: 1.0,
            far: 50.0,
            ..CameraSettings::default()
        });
        let expected = Mat4::orthographic_rh_gl(-10.0, 10.0, -5.0, 5.0, 1.0, 50.0);
        assert!(camera.projection_matrix().approx_eq(&Matrix4::from(expected), 1e-5));
    }
}
