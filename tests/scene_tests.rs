//! Scene Integration Tests
//!
//! Tests for:
//! - Scene: create/destroy objects, root list order
//! - Object builder
//! - Hierarchy queries: children, parent, lookup by name
//! - SceneObjectMut wrapper convenience API

use surreal::errors::SurrealError;
use surreal::math::Vector3f;
use surreal::render::{MaterialId, MeshId, MeshRendererComponent};
use surreal::scene::{BaseComponent, Component, ComponentRole, Scene, SceneObjectKey, TransformComponent};

fn local_position(scene: &Scene, object: SceneObjectKey) -> Vector3f {
    let t = scene.transform_of(object).unwrap();
    scene.transform(t).unwrap().local_position()
}

// ============================================================================
// Object Creation & Destruction
// ============================================================================

#[test]
fn scene_create_object() {
    let mut scene = Scene::new();
    let obj = scene.create_object("TestObject");

    assert_eq!(scene.get_object(obj).unwrap().name, "TestObject");
    assert_eq!(scene.object_count(), 1);
    assert_eq!(scene.component_count(), 1);
    // Not a root until added
    assert!(scene.root_objects().is_empty());
}

#[test]
fn scene_create_object_with_renderer() {
    let mut scene = Scene::new();
    let obj = scene
        .create_object_with_renderer("Cube", MeshRendererComponent::new(MeshId(3), MaterialId(4)))
        .unwrap();
    let object = scene.get_object(obj).unwrap();
    let renderer = object.renderer().unwrap();

    assert_eq!(object.components().len(), 2);
    assert_eq!(object.components()[1], renderer);
    assert_eq!(
        scene.component::<MeshRendererComponent>(renderer).unwrap().mesh,
        MeshId(3)
    );
}

#[test]
fn scene_find_object_by_name() {
    let mut scene = Scene::new();
    let a = scene.create_object("A");
    let b = scene.create_object("B");

    assert_eq!(scene.find_object("A"), Some(a));
    assert_eq!(scene.find_object("B"), Some(b));
    assert_eq!(scene.find_object("C"), None);
}

#[test]
fn scene_destroy_object_is_recursive() {
    let mut scene = Scene::new();
    let root = scene.build_object("Root").build().unwrap();
    let middle = scene.build_object("Middle").with_parent(root).build().unwrap();
    let leaf = scene.build_object("Leaf").with_parent(middle).build().unwrap();
    scene.add_component(leaf, BaseComponent::new("Tag")).unwrap();
    let sibling = scene.build_object("Sibling").with_parent(root).build().unwrap();

    assert_eq!(scene.object_count(), 4);
    assert_eq!(scene.component_count(), 5);

    scene.destroy_object(middle).unwrap();

    assert!(scene.get_object(middle).is_none());
    assert!(scene.get_object(leaf).is_none());
    assert_eq!(scene.object_count(), 2);
    assert_eq!(scene.component_count(), 2);
    assert_eq!(scene.children_of(root), Ok(vec![sibling]));
    assert_eq!(scene.destroy_object(middle), Err(SurrealError::StaleObject(middle)));
}

#[test]
fn scene_destroy_deep_chain() {
    let mut scene = Scene::new();
    let root = scene.build_object("Root").build().unwrap();
    let mut parent = root;
    for _ in 0..5_000 {
        parent = scene.build_object("Link").with_parent(parent).build().unwrap();
    }

    scene.destroy_object(root).unwrap();
    assert_eq!(scene.object_count(), 0);
    assert_eq!(scene.component_count(), 0);
    assert!(scene.root_objects().is_empty());
}

#[test]
fn scene_destroy_root_leaves_root_list() {
    let mut scene = Scene::new();
    let a = scene.build_object("A").build().unwrap();
    let b = scene.build_object("B").build().unwrap();

    scene.destroy_object(a).unwrap();
    assert_eq!(scene.root_objects(), &[b]);
}

#[test]
fn scene_destroy_keeps_detached_components() {
    let mut scene = Scene::new();
    let obj = scene.create_object("Obj");
    let tag = scene.add_component(obj, BaseComponent::new("Tag")).unwrap();
    scene.detach(tag).unwrap();

    scene.destroy_object(obj).unwrap();
    assert_eq!(scene.owner_of(tag), Ok(None));
}

// ============================================================================
// Root list
// ============================================================================

#[test]
fn root_list_keeps_insertion_order() {
    let mut scene = Scene::new();
    let a = scene.create_object("A");
    let b = scene.create_object("B");
    let c = scene.create_object("C");

    for obj in [a, b, c] {
        scene.add_scene_object(obj).unwrap();
    }
    assert_eq!(scene.root_objects(), &[a, b, c]);

    scene.remove_scene_object(b);
    assert_eq!(scene.root_objects(), &[a, c]);

    // Removing an absent object changes nothing
    scene.remove_scene_object(b);
    assert_eq!(scene.root_objects(), &[a, c]);
}

#[test]
fn add_stale_object_to_roots_fails() {
    let mut scene = Scene::new();
    let obj = scene.create_object("Obj");
    scene.destroy_object(obj).unwrap();

    assert_eq!(scene.add_scene_object(obj), Err(SurrealError::StaleObject(obj)));
    assert!(scene.root_objects().is_empty());
}

#[test]
fn parenting_removes_child_from_roots() {
    let mut scene = Scene::new();
    let parent = scene.build_object("Parent").build().unwrap();
    let child = scene.build_object("Child").build().unwrap();
    assert_eq!(scene.root_objects(), &[parent, child]);

    scene.set_object_parent(child, Some(parent)).unwrap();
    assert_eq!(scene.root_objects(), &[parent]);
    assert_eq!(scene.parent_of(child), Ok(Some(parent)));

    // Unparenting does not re-add
    scene.set_object_parent(child, None).unwrap();
    assert_eq!(scene.root_objects(), &[parent]);
    assert_eq!(scene.parent_of(child), Ok(None));
}

// ============================================================================
// Builder
// ============================================================================

#[test]
fn builder_applies_srt() {
    let mut scene = Scene::new();
    let obj = scene
        .build_object("Obj")
        .with_position(1.0, 2.0, 3.0)
        .with_rotation(0.0, 90.0, 0.0)
        .with_scale(2.0)
        .build()
        .unwrap();
    let t = scene.transform(scene.transform_of(obj).unwrap()).unwrap();

    assert_eq!(t.local_position(), Vector3f::new(1.0, 2.0, 3.0));
    assert_eq!(t.local_rotation(), Vector3f::new(0.0, 90.0, 0.0));
    assert_eq!(t.local_scale(), Vector3f::splat(2.0));
}

#[test]
fn builder_attaches_components_in_order() {
    let mut scene = Scene::new();
    let obj = scene
        .build_object("Obj")
        .with_component(BaseComponent::new("First"))
        .with_renderer(MeshRendererComponent::new(MeshId(0), MaterialId(0)))
        .with_component(BaseComponent::new("Last"))
        .build()
        .unwrap();

    let object = scene.get_object(obj).unwrap();
    let names: Vec<&str> = object
        .components()
        .iter()
        .map(|&c| scene.component_entry(c).unwrap().component().name())
        .collect();
    assert_eq!(names, ["Transform", "First", "MeshRenderer", "Last"]);
    assert!(object.renderer().is_some());
}

#[test]
fn builder_with_parent_is_not_a_root() {
    let mut scene = Scene::new();
    let parent = scene.build_object("Parent").build().unwrap();
    let child = scene.build_object("Child").with_parent(parent).build().unwrap();

    assert_eq!(scene.root_objects(), &[parent]);
    assert_eq!(scene.children_of(parent), Ok(vec![child]));
}

#[test]
fn builder_rejects_bad_input_before_inserting() {
    let mut scene = Scene::new();
    let result = scene.build_object("Flat").with_scale_xyz(1.0, 1.0, 0.0).build();
    assert!(matches!(result, Err(SurrealError::DegenerateScale { .. })));

    let gone = scene.create_object("Gone");
    scene.destroy_object(gone).unwrap();
    let result = scene.build_object("Orphan").with_parent(gone).build();
    assert_eq!(result, Err(SurrealError::StaleObject(gone)));

    assert_eq!(scene.object_count(), 0);
    assert_eq!(scene.component_count(), 0);
}

#[derive(Debug)]
struct FakeTransform;

impl Component for FakeTransform {
    fn name(&self) -> &str {
        "FakeTransform"
    }

    fn role(&self) -> ComponentRole {
        ComponentRole::Transform
    }
}

#[test]
fn failed_build_leaves_nothing_behind() {
    let mut scene = Scene::new();
    let kept = scene.build_object("Kept").build().unwrap();

    let result = scene
        .build_object("Obj")
        .with_component(BaseComponent::new("Tag"))
        .with_component(FakeTransform)
        .build();

    assert!(matches!(result, Err(SurrealError::NotATransform(_))));
    assert_eq!(scene.object_count(), 1);
    assert_eq!(scene.component_count(), 1);
    assert_eq!(scene.root_objects(), &[kept]);
    assert_eq!(scene.find_object("Obj"), None);
}

#[test]
fn builder_srt_applies_to_queued_transform() {
    let mut scene = Scene::new();
    let parent = scene.build_object("Parent").build().unwrap();
    let obj = scene
        .build_object("Obj")
        .with_position(1.0, 2.0, 3.0)
        .with_scale(2.0)
        .with_component(TransformComponent::new())
        .with_parent(parent)
        .build()
        .unwrap();

    let t = scene.transform(scene.transform_of(obj).unwrap()).unwrap();
    assert_eq!(t.local_position(), Vector3f::new(1.0, 2.0, 3.0));
    assert_eq!(t.local_scale(), Vector3f::splat(2.0));
    assert_eq!(scene.parent_of(obj), Ok(Some(parent)));
    assert_eq!(scene.component_count(), 2);
}

// ============================================================================
// SceneObjectMut wrapper
// ============================================================================

#[test]
fn wrapper_chains_transform_edits() {
    let mut scene = Scene::new();
    let parent = scene.build_object("Parent").build().unwrap();
    let obj = scene.create_object("Obj");

    scene
        .object(obj)
        .set_position(1.0, 0.0, 0.0)
        .translate(0.0, 2.0, 0.0)
        .set_rotation(0.0, 0.0, 10.0)
        .rotate(0.0, 0.0, 5.0)
        .set_scale(3.0)
        .set_parent(Some(parent));

    let t = scene.transform(scene.transform_of(obj).unwrap()).unwrap();
    assert_eq!(t.local_position(), Vector3f::new(1.0, 2.0, 0.0));
    assert_eq!(t.local_rotation(), Vector3f::new(0.0, 0.0, 15.0));
    assert_eq!(t.local_scale(), Vector3f::splat(3.0));
    assert_eq!(scene.parent_of(obj), Ok(Some(parent)));
}

#[test]
fn wrapper_skips_rejected_edits() {
    let mut scene = Scene::new();
    let obj = scene.create_object("Obj");

    scene.object(obj).set_scale(2.0).set_scale_xyz(0.0, 1.0, 1.0);
    let t = scene.transform(scene.transform_of(obj).unwrap()).unwrap();
    assert_eq!(t.local_scale(), Vector3f::splat(2.0));

    // Cycle: obj cannot become its own parent
    scene.object(obj).set_parent(Some(obj));
    assert_eq!(scene.parent_of(obj), Ok(None));
}

#[test]
fn wrapper_on_stale_handle_is_noop() {
    let mut scene = Scene::new();
    let obj = scene.create_object("Obj");
    scene.destroy_object(obj).unwrap();

    let wrapper = scene.object(obj).set_position(1.0, 1.0, 1.0).add_to_scene();
    assert_eq!(wrapper.handle(), obj);
    assert_eq!(wrapper.transform(), None);
    assert!(scene.root_objects().is_empty());
}

#[test]
fn wrapper_add_to_scene() {
    let mut scene = Scene::new();
    let obj = scene.create_object("Obj");
    scene.object(obj).set_position(0.0, 4.0, 0.0).add_to_scene();

    assert_eq!(scene.root_objects(), &[obj]);
    assert_eq!(local_position(&scene, obj), Vector3f::new(0.0, 4.0, 0.0));
}
