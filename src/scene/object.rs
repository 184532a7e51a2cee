use std::borrow::Cow;

use crate::scene::ComponentKey;

/// A node of the object hierarchy.
///
/// # Components
///
/// - `components`: every attached component, in attachment order
/// - `transform`: the one transform component (always present, always also listed in `components`)
/// - `renderer`: at most one component with a render capability
///
/// Objects are created by [`Scene`](crate::scene::Scene), which attaches a fresh
/// transform immediately, and all mutation goes through the scene so the
/// component back-references stay in sync.
///
/// # Hierarchy
///
/// Objects have no parent/child fields of their own. The spatial hierarchy lives
/// on the transforms; the children of an object are the owners of its
/// transform's children.
#[derive(Debug, Clone)]
pub struct SceneObject {
    pub name: Cow<'static, str>,
    pub(crate) components: Vec<ComponentKey>,
    pub(crate) transform: ComponentKey,
    pub(crate) renderer: Option<ComponentKey>,
}

impl SceneObject {
    pub(crate) fn new(name: Cow<'static, str>, transform: ComponentKey) -> Self {
        Self {
            name,
            components: vec![transform],
            transform,
            renderer: None,
        }
    }

    /// Attached components in attachment order.
    #[inline]
    #[must_use]
    pub fn components(&self) -> &[ComponentKey] {
        &self.components
    }

    /// The object's transform component.
    #[inline]
    #[must_use]
    pub fn transform(&self) -> ComponentKey {
        self.transform
    }

    /// The object's renderer component, if one is attached.
    #[inline]
    #[must_use]
    pub fn renderer(&self) -> Option<ComponentKey> {
        self.renderer
    }

    #[inline]
    #[must_use]
    pub fn has_component(&self, key: ComponentKey) -> bool {
        self.components.contains(&key)
    }
}
