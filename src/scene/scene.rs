use std::borrow::Cow;

use slotmap::SlotMap;

use crate::errors::{Result, SurrealError};
use crate::math::{Matrix4, Vector3f};
use crate::render::{ObjectFrame, RenderBackend, RenderContext, RenderStats};
use crate::scene::camera::CameraComponent;
use crate::scene::component::{Component, ComponentEntry, ComponentRole};
use crate::scene::object::SceneObject;
use crate::scene::transform::TransformComponent;
use crate::scene::transform_system::{self, ComponentArena};
use crate::scene::wrapper::SceneObjectMut;
use crate::scene::{ComponentKey, SceneObjectKey};

/// Scene graph
///
/// Owns every scene object and every component, in two `slotmap` arenas, plus
/// the ordered list of root objects a render pass starts from.
///
/// All structural mutation goes through the scene so that the three views of
/// one relationship stay consistent: a component's owner back-reference, the
/// owner's component list, and the owner's transform/renderer slots.
#[derive(Debug, Default)]
pub struct Scene {
    pub(crate) objects: SlotMap<SceneObjectKey, SceneObject>,
    pub(crate) components: ComponentArena,
    root_objects: Vec<SceneObjectKey>,
}

impl Scene {
    #[must_use]
    pub fn new() -> Self {
        Self {
            objects: SlotMap::with_key(),
            components: SlotMap::with_key(),
            root_objects: Vec::new(),
        }
    }

    // ========================================================================
    // Scene objects
    // ========================================================================

    /// Creates an object with a fresh identity transform and no renderer.
    ///
    /// The object is not added to the root list; see [`Scene::add_scene_object`].
    pub fn create_object(&mut self, name: impl Into<Cow<'static, str>>) -> SceneObjectKey {
        let transform = self
            .components
            .insert(ComponentEntry::new(Box::new(TransformComponent::new())));
        let object = self.objects.insert(SceneObject::new(name.into(), transform));
        self.components[transform].owner = Some(object);

        log::debug!("Created object {object:?} '{}'", self.objects[object].name);
        object
    }

    /// Creates an object and attaches `renderer` to it.
    pub fn create_object_with_renderer<C: Component>(
        &mut self,
        name: impl Into<Cow<'static, str>>,
        renderer: C,
    ) -> Result<SceneObjectKey> {
        let object = self.create_object(name);
        self.add_component(object, renderer)?;
        Ok(object)
    }

    /// Starts building an object.
    pub fn build_object(&'_ mut self, name: impl Into<Cow<'static, str>>) -> SceneObjectBuilder<'_> {
        SceneObjectBuilder::new(self, name.into())
    }

    /// Chainable mutable handle to an object.
    pub fn object(&'_ mut self, object: SceneObjectKey) -> SceneObjectMut<'_> {
        SceneObjectMut::new(self, object)
    }

    #[must_use]
    pub fn get_object(&self, object: SceneObjectKey) -> Option<&SceneObject> {
        self.objects.get(object)
    }

    /// First object with the given name, in arena order.
    #[must_use]
    pub fn find_object(&self, name: &str) -> Option<SceneObjectKey> {
        self.objects
            .iter()
            .find_map(|(key, object)| (object.name == name).then_some(key))
    }

    pub fn objects(&self) -> impl Iterator<Item = (SceneObjectKey, &SceneObject)> {
        self.objects.iter()
    }

    #[must_use]
    pub fn object_count(&self) -> usize {
        self.objects.len()
    }

    #[must_use]
    pub fn component_count(&self) -> usize {
        self.components.len()
    }

    /// The object's current transform component.
    pub fn transform_of(&self, object: SceneObjectKey) -> Result<ComponentKey> {
        Ok(self.object_ref(object)?.transform)
    }

    /// Objects owning the children of `object`'s transform, in child order.
    /// Ownerless child transforms are skipped.
    pub fn children_of(&self, object: SceneObjectKey) -> Result<Vec<SceneObjectKey>> {
        let transform = self.transform(self.object_ref(object)?.transform)?;
        Ok(transform
            .children()
            .iter()
            .filter_map(|&child| self.owner_entry(child))
            .collect())
    }

    /// Object owning the parent of `object`'s transform.
    pub fn parent_of(&self, object: SceneObjectKey) -> Result<Option<SceneObjectKey>> {
        let transform = self.transform(self.object_ref(object)?.transform)?;
        Ok(transform.parent().and_then(|parent| self.owner_entry(parent)))
    }

    /// Removes an object together with every object below it in the hierarchy.
    ///
    /// The object leaves its parent's children and the root list, and all of its
    /// attached components are dropped. Detached components are untouched. The
    /// subtree is walked with an explicit stack, so depth is not limited by the
    /// call stack.
    pub fn destroy_object(&mut self, object: SceneObjectKey) -> Result<()> {
        let transform = self.object_ref(object)?.transform;

        // 1. Collect the subtree; ownerless transforms below it become roots
        let mut doomed = vec![object];
        let mut orphans = Vec::new();
        let mut stack = vec![transform];
        while let Some(current) = stack.pop() {
            for &child in self.transform(current)?.children() {
                match self.owner_entry(child) {
                    Some(child_object) => {
                        doomed.push(child_object);
                        stack.push(child);
                    }
                    None => orphans.push(child),
                }
            }
        }
        for orphan in orphans {
            transform_system::set_parent(&mut self.components, orphan, None)?;
        }

        // 2. Leave the parent and the root list
        transform_system::set_parent(&mut self.components, transform, None)?;
        self.root_objects.retain(|root| !doomed.contains(root));

        // 3. Drop the objects and their components
        for key in doomed {
            if let Some(removed) = self.objects.remove(key) {
                for component in &removed.components {
                    self.components.remove(*component);
                }
                log::debug!(
                    "Destroyed object {key:?} '{}' ({} components)",
                    removed.name,
                    removed.components.len()
                );
            }
        }
        Ok(())
    }

    // ========================================================================
    // Root objects
    // ========================================================================

    /// Appends an object to the root list.
    pub fn add_scene_object(&mut self, object: SceneObjectKey) -> Result<()> {
        self.object_ref(object)?;
        self.root_objects.push(object);
        Ok(())
    }

    /// Removes every occurrence of `object` from the root list, keeping the
    /// order of the rest. Absent objects are ignored.
    pub fn remove_scene_object(&mut self, object: SceneObjectKey) {
        self.root_objects.retain(|&root| root != object);
    }

    #[inline]
    #[must_use]
    pub fn root_objects(&self) -> &[SceneObjectKey] {
        &self.root_objects
    }

    // ========================================================================
    // Components
    // ========================================================================

    /// Stores a component in the scene, detached.
    pub fn insert_component<C: Component>(&mut self, component: C) -> ComponentKey {
        self.insert_boxed_component(Box::new(component))
    }

    pub fn insert_boxed_component(&mut self, component: Box<dyn Component>) -> ComponentKey {
        self.components.insert(ComponentEntry::new(component))
    }

    /// Stores a component and attaches it to `object`.
    pub fn add_component<C: Component>(&mut self, object: SceneObjectKey, component: C) -> Result<ComponentKey> {
        self.object_ref(object)?;
        let key = self.insert_component(component);
        self.attach(key, object)?;
        Ok(key)
    }

    /// Attaches a component to an object.
    ///
    /// A component attached elsewhere is detached from its previous owner first;
    /// re-attaching to the same owner moves it to the end of the list. Then:
    /// - a transform replaces the object's transform and takes over its place
    ///   in the hierarchy
    /// - a renderer replaces the object's renderer
    ///
    /// The replaced transform or renderer is destroyed and its key goes stale.
    /// Detach it first to keep it.
    ///
    /// A transform that is still some object's current transform cannot move.
    /// A component whose `role()` claims the transform slot without being a
    /// [`TransformComponent`] is refused with [`SurrealError::NotATransform`].
    pub fn attach(&mut self, component: ComponentKey, object: SceneObjectKey) -> Result<()> {
        let entry = self.entry(component)?;
        if entry.claims_foreign_transform() {
            return Err(SurrealError::NotATransform(component));
        }
        let role = entry.role();
        let previous_owner = entry.owner;
        self.object_ref(object)?;

        if role == ComponentRole::Transform
            && let Some(owner) = previous_owner
            && self.objects.get(owner).is_some_and(|o| o.transform == component)
        {
            if owner == object {
                return Ok(());
            }
            return Err(SurrealError::TransformRequired(owner));
        }

        if previous_owner.is_some() {
            self.detach(component)?;
        }

        match role {
            ComponentRole::Transform => {
                let old = self.objects[object].transform;
                transform_system::transfer_links(&mut self.components, old, component)?;
                self.release(old, object);
                self.objects[object].transform = component;
                self.drop_displaced(old, object);
            }
            ComponentRole::Renderer => {
                if let Some(old) = self.objects[object].renderer {
                    self.release(old, object);
                    self.drop_displaced(old, object);
                }
                self.objects[object].renderer = Some(component);
            }
            ComponentRole::Plain => {}
        }

        self.components[component].owner = Some(object);
        self.objects[object].components.push(component);

        log::debug!(
            "Attached {} {component:?} to {object:?}",
            self.components[component].component().name()
        );
        Ok(())
    }

    /// Detaches a component from its owner. Detached components stay in the
    /// scene and can be attached again; detaching one is a no-op.
    ///
    /// An object's current transform cannot be detached.
    pub fn detach(&mut self, component: ComponentKey) -> Result<()> {
        let Some(owner) = self.entry(component)?.owner else {
            return Ok(());
        };
        if self.objects.get(owner).is_some_and(|o| o.transform == component) {
            return Err(SurrealError::TransformRequired(owner));
        }

        self.release(component, owner);
        log::debug!("Detached {component:?} from {owner:?}");
        Ok(())
    }

    /// Detaches `component` if `object` owns it.
    pub fn remove_component(&mut self, object: SceneObjectKey, component: ComponentKey) -> Result<()> {
        self.object_ref(object)?;
        if self.entry(component)?.owner != Some(object) {
            log::warn!("remove_component: {component:?} is not attached to {object:?}");
            return Ok(());
        }
        self.detach(component)
    }

    /// Detaches a component and takes it out of the scene.
    ///
    /// A transform leaves the hierarchy; its children become roots.
    pub fn destroy_component(&mut self, component: ComponentKey) -> Result<Box<dyn Component>> {
        self.detach(component)?;
        if self.entry(component)?.role() == ComponentRole::Transform {
            transform_system::isolate(&mut self.components, component)?;
        }
        self.components
            .remove(component)
            .map(|entry| entry.component)
            .ok_or(SurrealError::StaleComponent(component))
    }

    /// The object a component is attached to.
    pub fn owner_of(&self, component: ComponentKey) -> Result<Option<SceneObjectKey>> {
        Ok(self.entry(component)?.owner)
    }

    #[must_use]
    pub fn component_entry(&self, component: ComponentKey) -> Option<&ComponentEntry> {
        self.components.get(component)
    }

    /// Typed access to a component.
    pub fn component<T: Component>(&self, key: ComponentKey) -> Result<&T> {
        self.entry(key)?
            .downcast_ref::<T>()
            .ok_or(SurrealError::ComponentTypeMismatch {
                key,
                expected: std::any::type_name::<T>(),
            })
    }

    /// Typed mutable access to a component.
    pub fn component_mut<T: Component>(&mut self, key: ComponentKey) -> Result<&mut T> {
        self.components
            .get_mut(key)
            .ok_or(SurrealError::StaleComponent(key))?
            .downcast_mut::<T>()
            .ok_or(SurrealError::ComponentTypeMismatch {
                key,
                expected: std::any::type_name::<T>(),
            })
    }

    /// First attached component of type `T` on `object`.
    pub fn find_component<T: Component>(&self, object: SceneObjectKey) -> Result<Option<ComponentKey>> {
        Ok(self
            .object_ref(object)?
            .components
            .iter()
            .copied()
            .find(|&key| self.components.get(key).is_some_and(|e| e.downcast_ref::<T>().is_some())))
    }

    // ========================================================================
    // Transforms
    // ========================================================================

    pub fn transform(&self, key: ComponentKey) -> Result<&TransformComponent> {
        transform_system::transform_at(&self.components, key)
    }

    pub fn set_local_position(&mut self, transform: ComponentKey, position: Vector3f) -> Result<()> {
        transform_system::transform_at_mut(&mut self.components, transform)?.write_position(position);
        transform_system::mark_subtree_dirty(&self.components, transform)?;
        Ok(())
    }

    /// Euler angles in degrees.
    pub fn set_local_rotation(&mut self, transform: ComponentKey, rotation: Vector3f) -> Result<()> {
        transform_system::transform_at_mut(&mut self.components, transform)?.write_rotation(rotation);
        transform_system::mark_subtree_dirty(&self.components, transform)?;
        Ok(())
    }

    /// Fails with [`SurrealError::DegenerateScale`] if any component is zero.
    pub fn set_local_scale(&mut self, transform: ComponentKey, scale: Vector3f) -> Result<()> {
        if scale.has_zero_component() {
            return Err(SurrealError::DegenerateScale {
                x: scale.x,
                y: scale.y,
                z: scale.z,
            });
        }
        transform_system::transform_at_mut(&mut self.components, transform)?.write_scale(scale);
        transform_system::mark_subtree_dirty(&self.components, transform)?;
        Ok(())
    }

    pub fn translate(&mut self, transform: ComponentKey, delta: Vector3f) -> Result<()> {
        let position = self.transform(transform)?.local_position();
        self.set_local_position(transform, position + delta)
    }

    pub fn rotate(&mut self, transform: ComponentKey, delta_degrees: Vector3f) -> Result<()> {
        let rotation = self.transform(transform)?.local_rotation();
        self.set_local_rotation(transform, rotation + delta_degrees)
    }

    /// Moves `child` under `parent`, or makes it a hierarchy root with `None`.
    ///
    /// A child's owner leaves the root list, since the render pass reaches it
    /// through the parent. Unparenting does not put it back.
    pub fn set_parent(&mut self, child: ComponentKey, parent: Option<ComponentKey>) -> Result<()> {
        transform_system::set_parent(&mut self.components, child, parent)?;
        if parent.is_some()
            && let Some(owner) = self.owner_entry(child)
        {
            self.root_objects.retain(|&root| root != owner);
        }
        Ok(())
    }

    pub fn add_child(&mut self, parent: ComponentKey, child: ComponentKey) -> Result<()> {
        self.set_parent(child, Some(parent))
    }

    /// [`Scene::set_parent`] on the objects' transforms.
    pub fn set_object_parent(&mut self, child: SceneObjectKey, parent: Option<SceneObjectKey>) -> Result<()> {
        let child = self.transform_of(child)?;
        let parent = parent.map(|p| self.transform_of(p)).transpose()?;
        self.set_parent(child, parent)
    }

    pub fn model_to_other(&self, transform: ComponentKey) -> Result<Matrix4> {
        Ok(self.transform(transform)?.model_to_other())
    }

    pub fn other_to_model(&self, transform: ComponentKey) -> Result<Matrix4> {
        Ok(self.transform(transform)?.other_to_model())
    }

    pub fn model_to_world(&self, transform: ComponentKey) -> Result<Matrix4> {
        transform_system::model_to_world(&self.components, transform)
    }

    pub fn world_to_model(&self, transform: ComponentKey) -> Result<Matrix4> {
        transform_system::world_to_model(&self.components, transform)
    }

    /// Model-to-world matrix as 16 column-major floats, ready for upload.
    pub fn world_matrix_data(&self, transform: ComponentKey) -> Result<[f32; 16]> {
        Ok(self.model_to_world(transform)?.to_cols_array())
    }

    // ========================================================================
    // Rendering
    // ========================================================================

    /// The camera's view matrix: world-to-model of its owner's transform.
    pub fn view_matrix(&self, camera: ComponentKey) -> Result<Matrix4> {
        self.component::<CameraComponent>(camera)?;
        let owner = self.entry(camera)?.owner.ok_or(SurrealError::Detached(camera))?;
        self.world_to_model(self.transform_of(owner)?)
    }

    /// Renders every root object in list order, each subtree depth-first.
    /// Stops at the first error.
    pub fn render(&self, ctx: &mut RenderContext<'_>) -> Result<()> {
        for &object in &self.root_objects {
            self.render_object(object, ctx)?;
        }
        Ok(())
    }

    /// Renders `object` with its renderer, if any, then the objects below it,
    /// depth-first in child order.
    pub fn render_object(&self, object: SceneObjectKey, ctx: &mut RenderContext<'_>) -> Result<()> {
        let mut stack = vec![object];
        while let Some(current) = stack.pop() {
            let scene_object = self.object_ref(current)?;
            ctx.record_object();

            if let Some(renderer) = scene_object.renderer {
                let renderable = self
                    .entry(renderer)?
                    .component()
                    .as_renderable()
                    .ok_or(SurrealError::NotRenderable(renderer))?;
                let frame = ObjectFrame {
                    object: current,
                    model_to_world: self.model_to_world(scene_object.transform)?,
                };
                ctx.record_renderer();
                renderable.render(&frame, ctx)?;
            }

            // Reversed so the first child is rendered first
            for &child in self.transform(scene_object.transform)?.children().iter().rev() {
                match self.owner_entry(child) {
                    Some(child_object) => stack.push(child_object),
                    None => log::warn!("Transform {child:?} has no owner, skipped during render"),
                }
            }
        }
        Ok(())
    }

    /// Renders the scene from `camera` into `backend`.
    pub fn render_from_camera(&self, camera: ComponentKey, backend: &mut dyn RenderBackend) -> Result<RenderStats> {
        let view = self.view_matrix(camera)?;
        let projection = self.component::<CameraComponent>(camera)?.projection_matrix();

        let mut ctx = RenderContext::with_camera(backend, view, projection);
        self.render(&mut ctx)?;
        Ok(ctx.stats())
    }

    // ========================================================================
    // Internals
    // ========================================================================

    fn object_ref(&self, object: SceneObjectKey) -> Result<&SceneObject> {
        self.objects.get(object).ok_or(SurrealError::StaleObject(object))
    }

    fn entry(&self, component: ComponentKey) -> Result<&ComponentEntry> {
        self.components
            .get(component)
            .ok_or(SurrealError::StaleComponent(component))
    }

    fn owner_entry(&self, component: ComponentKey) -> Option<SceneObjectKey> {
        self.components.get(component).and_then(ComponentEntry::owner)
    }

    /// Removes a transform or renderer that `object` no longer uses.
    fn drop_displaced(&mut self, component: ComponentKey, object: SceneObjectKey) {
        if let Some(entry) = self.components.remove(component) {
            log::debug!(
                "Dropped {} {component:?} replaced on {object:?}",
                entry.component.name()
            );
        }
    }

    /// Unhooks `component` from `owner`: list, renderer slot and back-reference.
    fn release(&mut self, component: ComponentKey, owner: SceneObjectKey) {
        if let Some(object) = self.objects.get_mut(owner) {
            object.components.retain(|&c| c != component);
            if object.renderer == Some(component) {
                object.renderer = None;
            }
        }
        if let Some(entry) = self.components.get_mut(component) {
            entry.owner = None;
        }
    }
}

/// Builds an object in one expression.
///
/// ```rust,ignore
/// let moon = scene
///     .build_object("Moon")
///     .with_position(2.0, 0.0, 0.0)
///     .with_scale(0.25)
///     .with_parent(earth)
///     .with_renderer(MeshRendererComponent::new(sphere, grey))
///     .build()?;
/// ```
pub struct SceneObjectBuilder<'a> {
    scene: &'a mut Scene,
    name: Cow<'static, str>,
    position: Vector3f,
    rotation: Vector3f,
    scale: Vector3f,
    parent: Option<SceneObjectKey>,
    components: Vec<Box<dyn Component>>,
}

impl<'a> SceneObjectBuilder<'a> {
    pub fn new(scene: &'a mut Scene, name: Cow<'static, str>) -> Self {
        Self {
            scene,
            name,
            position: Vector3f::zero(),
            rotation: Vector3f::zero(),
            scale: Vector3f::one(),
            parent: None,
            components: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_position(mut self, x: f32, y: f32, z: f32) -> Self {
        self.position = Vector3f::new(x, y, z);
        self
    }

    /// Euler angles in degrees.
    #[must_use]
    pub fn with_rotation(mut self, x: f32, y: f32, z: f32) -> Self {
        self.rotation = Vector3f::new(x, y, z);
        self
    }

    #[must_use]
    pub fn with_scale(mut self, s: f32) -> Self {
        self.scale = Vector3f::splat(s);
        self
    }

    #[must_use]
    pub fn with_scale_xyz(mut self, x: f32, y: f32, z: f32) -> Self {
        self.scale = Vector3f::new(x, y, z);
        self
    }

    /// Parent object. Without one the object is added to the root list.
    #[must_use]
    pub fn with_parent(mut self, parent: SceneObjectKey) -> Self {
        self.parent = Some(parent);
        self
    }

    #[must_use]
    pub fn with_renderer<C: Component>(self, renderer: C) -> Self {
        self.with_component(renderer)
    }

    /// Any component, attached in call order after the transform. A queued
    /// [`TransformComponent`] replaces the default one and receives the
    /// builder's position, rotation and scale.
    #[must_use]
    pub fn with_component<C: Component>(mut self, component: C) -> Self {
        self.components.push(Box::new(component));
        self
    }

    /// Inserts the object and returns its key.
    pub fn build(self) -> Result<SceneObjectKey> {
        let Self {
            scene,
            name,
            position,
            rotation,
            scale,
            parent,
            components,
        } = self;

        // Validate before anything is inserted.
        if scale.has_zero_component() {
            return Err(SurrealError::DegenerateScale {
                x: scale.x,
                y: scale.y,
                z: scale.z,
            });
        }
        let parent_transform = parent.map(|p| scene.transform_of(p)).transpose()?;

        let object = scene.create_object(name);
        for component in components {
            let key = scene.insert_boxed_component(component);
            if let Err(err) = scene.attach(key, object) {
                scene.components.remove(key);
                if let Err(cleanup) = scene.destroy_object(object) {
                    log::warn!("build: rollback of {object:?} failed: {cleanup}");
                }
                return Err(err);
            }
        }

        // A queued transform may have replaced the default one
        let transform = scene.transform_of(object)?;
        scene.set_local_position(transform, position)?;
        scene.set_local_rotation(transform, rotation)?;
        scene.set_local_scale(transform, scale)?;

        match parent_transform {
            Some(parent) => scene.set_parent(transform, Some(parent))?,
            None => scene.root_objects.push(object),
        }
        Ok(object)
    }
}
