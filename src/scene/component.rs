use std::any::Any;
use std::borrow::Cow;
use std::fmt;

use crate::render::Renderable;
use crate::scene::SceneObjectKey;
use crate::scene::transform::TransformComponent;

/// Which slot of a [`SceneObject`](crate::scene::SceneObject) a component fills when attached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComponentRole {
    /// Only listed in the object's component collection.
    Plain,
    /// Becomes the object's transform, replacing the previous one.
    Transform,
    /// Becomes the object's renderer, replacing the previous one.
    Renderer,
}

/// An attachable behaviour.
///
/// Implementors only describe themselves; the attach/detach bookkeeping (owner
/// back-reference, the owner's component list, slot replacement) is done by
/// [`Scene`](crate::scene::Scene) on the [`ComponentEntry`] wrapping the component.
///
/// # Example
///
/// ```rust,ignore
/// #[derive(Debug)]
/// struct Spin { degrees_per_frame: f32 }
///
/// impl Component for Spin {
///     fn name(&self) -> &str { "Spin" }
/// }
///
/// let spin = scene.insert_component(Spin { degrees_per_frame: 2.0 });
/// scene.attach(spin, player)?;
/// ```
pub trait Component: Any + fmt::Debug {
    /// Human readable name, used in logs.
    fn name(&self) -> &str;

    /// The object slot this component occupies. Components that can render
    /// default to [`ComponentRole::Renderer`].
    fn role(&self) -> ComponentRole {
        if self.as_renderable().is_some() {
            ComponentRole::Renderer
        } else {
            ComponentRole::Plain
        }
    }

    /// The render capability, for components that draw something.
    fn as_renderable(&self) -> Option<&dyn Renderable> {
        None
    }
}

/// Arena slot of a component: the component itself plus its non-owning
/// back-reference to the scene object it is attached to.
#[derive(Debug)]
pub struct ComponentEntry {
    pub(crate) owner: Option<SceneObjectKey>,
    pub(crate) component: Box<dyn Component>,
}

impl ComponentEntry {
    pub(crate) fn new(component: Box<dyn Component>) -> Self {
        Self {
            owner: None,
            component,
        }
    }

    /// The scene object this component is attached to, if any.
    #[inline]
    #[must_use]
    pub fn owner(&self) -> Option<SceneObjectKey> {
        self.owner
    }

    #[inline]
    #[must_use]
    pub fn component(&self) -> &dyn Component {
        &*self.component
    }

    /// The slot this component fills. The transform slot is decided by the
    /// concrete type: only a [`TransformComponent`] fills it, and any other
    /// component claiming [`ComponentRole::Transform`] counts as plain.
    #[must_use]
    pub fn role(&self) -> ComponentRole {
        if self.downcast_ref::<TransformComponent>().is_some() {
            return ComponentRole::Transform;
        }
        match self.component.role() {
            ComponentRole::Transform => ComponentRole::Plain,
            role => role,
        }
    }

    /// True when the component says it is a transform but is not one.
    pub(crate) fn claims_foreign_transform(&self) -> bool {
        self.component.role() == ComponentRole::Transform && self.role() != ComponentRole::Transform
    }

    /// Typed view of the component.
    #[must_use]
    pub fn downcast_ref<T: Component>(&self) -> Option<&T> {
        let any: &dyn Any = &*self.component;
        any.downcast_ref::<T>()
    }

    /// Typed mutable view of the component.
    pub fn downcast_mut<T: Component>(&mut self) -> Option<&mut T> {
        let any: &mut dyn Any = &mut *self.component;
        any.downcast_mut::<T>()
    }
}

/// The generic component: a name and nothing else.
///
/// Useful as a tag, and as the simplest thing to attach in tests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BaseComponent {
    pub name: Cow<'static, str>,
}

impl BaseComponent {
    #[must_use]
    pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
        Self { name: name.into() }
    }
}

impl Default for BaseComponent {
    fn default() -> Self {
        Self::new("Component")
    }
}

impl Component for BaseComponent {
    fn name(&self) -> &str {
        &self.name
    }
}
