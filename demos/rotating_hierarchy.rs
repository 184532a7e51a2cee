use surreal::errors::Result as SceneResult;
use surreal::math::Vector3f;
use surreal::render::{MaterialId, MeshId, MeshRendererComponent, RenderBackend};
use surreal::scene::{CameraComponent, Scene};

/// Prints every backend call instead of talking to a GPU.
#[derive(Default)]
struct LogBackend {
    draws: usize,
}

impl RenderBackend for LogBackend {
    fn set_matrix_parameter(&mut self, material: MaterialId, name: &str, col_major: &[f32]) -> SceneResult<()> {
        log::trace!("material {} {name} = {col_major:?}", material.0);
        Ok(())
    }

    fn draw_elements(&mut self, mesh: MeshId, material: MaterialId) -> SceneResult<()> {
        self.draws += 1;
        log::debug!("draw mesh {} with material {}", mesh.0, material.0);
        Ok(())
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    // 1. Sun > Earth > Moon, each with a mesh
    let mut scene = Scene::new();
    let sun = scene
        .build_object("Sun")
        .with_scale(2.0)
        .with_renderer(MeshRendererComponent::new(MeshId(0), MaterialId(0)))
        .build()?;
    let earth = scene
        .build_object("Earth")
        .with_position(6.0, 0.0, 0.0)
        .with_scale(0.5)
        .with_parent(sun)
        .with_renderer(MeshRendererComponent::new(MeshId(0), MaterialId(1)))
        .build()?;
    let moon = scene
        .build_object("Moon")
        .with_position(2.0, 0.0, 0.0)
        .with_scale(0.3)
        .with_parent(earth)
        .with_renderer(MeshRendererComponent::new(MeshId(0), MaterialId(2)))
        .build()?;

    // 2. Camera looking down the -Z axis
    let camera_object = scene
        .build_object("Camera")
        .with_position(0.0, 5.0, 40.0)
        .with_component(CameraComponent::default())
        .build()?;
    let camera = scene
        .find_component::<CameraComponent>(camera_object)?
        .ok_or_else(|| anyhow::anyhow!("camera component missing"))?;

    let sun_t = scene.transform_of(sun)?;
    let earth_t = scene.transform_of(earth)?;
    let moon_t = scene.transform_of(moon)?;

    // 3. Spin the sun and the earth, render a few frames
    let mut backend = LogBackend::default();
    for frame in 0..8 {
        scene.rotate(sun_t, Vector3f::new(0.0, 15.0, 0.0))?;
        scene.rotate(earth_t, Vector3f::new(0.0, 45.0, 0.0))?;

        let stats = scene.render_from_camera(camera, &mut backend)?;
        let moon_position = scene.model_to_world(moon_t)?.translation_part();
        log::info!(
            "frame {frame}: {} objects, {} draws, moon at ({:.2}, {:.2}, {:.2})",
            stats.objects_visited,
            stats.renderers_invoked,
            moon_position.x,
            moon_position.y,
            moon_position.z
        );
    }

    println!("{} draw calls issued", backend.draws);
    Ok(())
}
