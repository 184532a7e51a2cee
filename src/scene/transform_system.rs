//! Transform system
//!
//! Hierarchy algorithms over the component arena, kept apart from [`Scene`] so
//! they only borrow the arena and never the whole scene.
//!
//! - Hierarchical reads ([`model_to_world`], [`world_to_model`]) walk up to the
//!   nearest ancestor whose cache is clean, then fill the caches on the way back
//!   down. The walk uses an explicit list instead of recursion, so deep chains
//!   are fine. The scene's destroy and render walks use explicit stacks too.
//! - [`mark_subtree_dirty`] invalidates a node and every descendant.
//! - [`set_parent`] relinks both directions and refuses cycles.
//!
//! [`Scene`]: crate::scene::Scene

use slotmap::SlotMap;
use smallvec::SmallVec;

use crate::errors::{Result, SurrealError};
use crate::math::Matrix4;
use crate::scene::ComponentKey;
use crate::scene::component::ComponentEntry;
use crate::scene::transform::{MatrixCache, TransformComponent};

/// The component arena the system works on.
pub type ComponentArena = SlotMap<ComponentKey, ComponentEntry>;

/// Resolves `key` to a transform.
pub fn transform_at(components: &ComponentArena, key: ComponentKey) -> Result<&TransformComponent> {
    components
        .get(key)
        .ok_or(SurrealError::StaleComponent(key))?
        .downcast_ref::<TransformComponent>()
        .ok_or(SurrealError::NotATransform(key))
}

/// Resolves `key` to a mutable transform.
pub fn transform_at_mut(
    components: &mut ComponentArena,
    key: ComponentKey,
) -> Result<&mut TransformComponent> {
    components
        .get_mut(key)
        .ok_or(SurrealError::StaleComponent(key))?
        .downcast_mut::<TransformComponent>()
        .ok_or(SurrealError::NotATransform(key))
}

// ============================================================================
// Hierarchical reads
// ============================================================================

/// Model space → world space: `parent.model_to_world · model_to_other`, or just
/// `model_to_other` for a root.
pub fn model_to_world(components: &ComponentArena, key: ComponentKey) -> Result<Matrix4> {
    resolve_chain(
        components,
        key,
        MatrixCache::ModelToWorld,
        TransformComponent::model_to_other,
        |parent_world, local| parent_world.mul_m(local),
    )
}

/// World space → model space: `other_to_model · parent.world_to_model`, or just
/// `other_to_model` for a root. Inverse of [`model_to_world`].
pub fn world_to_model(components: &ComponentArena, key: ComponentKey) -> Result<Matrix4> {
    resolve_chain(
        components,
        key,
        MatrixCache::WorldToModel,
        TransformComponent::other_to_model,
        |parent_inverse, local_inverse| local_inverse.mul_m(parent_inverse),
    )
}

fn resolve_chain(
    components: &ComponentArena,
    key: ComponentKey,
    which: MatrixCache,
    local: fn(&TransformComponent) -> Matrix4,
    compose: fn(&Matrix4, &Matrix4) -> Matrix4,
) -> Result<Matrix4> {
    // Walk up until a clean ancestor (or the root) is found.
    let mut pending: SmallVec<[&TransformComponent; 8]> = SmallVec::new();
    let mut resolved = None;
    let mut cursor = Some(key);
    while let Some(current) = cursor {
        let transform = transform_at(components, current)?;
        if let Some(value) = transform.cached(which) {
            resolved = Some(value);
            break;
        }
        pending.push(transform);
        cursor = transform.parent;
    }

    // Fill caches from the top of the dirty run back down to `key`.
    for transform in pending.iter().rev() {
        let local_value = local(transform);
        let value = match &resolved {
            Some(above) => compose(above, &local_value),
            None => local_value,
        };
        transform.store(which, value);
        resolved = Some(value);
    }

    Ok(resolved.unwrap_or_else(Matrix4::identity))
}

// ============================================================================
// Invalidation
// ============================================================================

/// Marks all four caches of `root` and of every descendant dirty.
///
/// Returns the number of transforms touched.
pub fn mark_subtree_dirty(components: &ComponentArena, root: ComponentKey) -> Result<usize> {
    let mut stack: Vec<ComponentKey> = Vec::with_capacity(16);
    stack.push(root);
    let mut touched = 0;

    while let Some(key) = stack.pop() {
        let transform = transform_at(components, key)?;
        transform.mark_dirty();
        touched += 1;
        stack.extend(transform.children.iter().rev().copied());
    }

    Ok(touched)
}

// ============================================================================
// Structure
// ============================================================================

/// True when `ancestor` appears on the parent chain of `node`.
pub fn is_ancestor(
    components: &ComponentArena,
    ancestor: ComponentKey,
    node: ComponentKey,
) -> Result<bool> {
    let mut cursor = transform_at(components, node)?.parent;
    while let Some(current) = cursor {
        if current == ancestor {
            return Ok(true);
        }
        cursor = transform_at(components, current)?.parent;
    }
    Ok(false)
}

/// Moves `child` under `parent` (or makes it a root with `None`).
///
/// Removes `child` from its old parent's children, appends it to the new
/// parent's children, and dirties the moved subtree, whose world matrices now
/// depend on a different ancestor chain. Parenting a transform under itself or
/// under one of its descendants fails with [`SurrealError::HierarchyCycle`].
pub fn set_parent(
    components: &mut ComponentArena,
    child: ComponentKey,
    parent: Option<ComponentKey>,
) -> Result<()> {
    let old_parent = transform_at(components, child)?.parent;

    if let Some(new_parent) = parent {
        transform_at(components, new_parent)?;
        if new_parent == child || is_ancestor(components, child, new_parent)? {
            return Err(SurrealError::HierarchyCycle {
                child,
                parent: new_parent,
            });
        }
    }

    if old_parent == parent {
        return Ok(());
    }

    if let Some(old) = old_parent {
        transform_at_mut(components, old)?
            .children
            .retain(|c| *c != child);
    }
    if let Some(new_parent) = parent {
        transform_at_mut(components, new_parent)?.children.push(child);
    }
    transform_at_mut(components, child)?.parent = parent;

    let touched = mark_subtree_dirty(components, child)?;
    log::debug!("Reparented {child:?}: {old_parent:?} -> {parent:?} ({touched} transforms invalidated)");
    Ok(())
}

/// Hands `from`'s place in the hierarchy to `to`.
///
/// `to` is first isolated (removed from its parent, its own children become
/// roots). It then takes `from`'s slot in the parent's children (same index)
/// and adopts `from`'s children. `from` ends up isolated. Both subtrees are
/// dirtied.
pub fn transfer_links(
    components: &mut ComponentArena,
    from: ComponentKey,
    to: ComponentKey,
) -> Result<()> {
    transform_at(components, from)?;
    transform_at(components, to)?;
    if from == to {
        return Ok(());
    }

    isolate(components, to)?;

    // Take over `from`'s links
    let (parent, children) = {
        let source = transform_at_mut(components, from)?;
        (source.parent.take(), std::mem::take(&mut source.children))
    };

    if let Some(parent) = parent {
        let siblings = &mut transform_at_mut(components, parent)?.children;
        if let Some(slot) = siblings.iter_mut().find(|c| **c == from) {
            *slot = to;
        }
    }
    for &child in &children {
        transform_at_mut(components, child)?.parent = Some(to);
    }

    let target = transform_at_mut(components, to)?;
    target.parent = parent;
    target.children = children;

    mark_subtree_dirty(components, from)?;
    mark_subtree_dirty(components, to)?;
    Ok(())
}

/// Cuts every hierarchy link of `key`: it leaves its parent and its children
/// become roots.
pub fn isolate(components: &mut ComponentArena, key: ComponentKey) -> Result<()> {
    set_parent(components, key, None)?;
    let orphans = std::mem::take(&mut transform_at_mut(components, key)?.children);
    for orphan in orphans {
        transform_at_mut(components, orphan)?.parent = None;
        mark_subtree_dirty(components, orphan)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::Vector3f;
    use crate::scene::transform::CacheState;

    fn insert_transform(components: &mut ComponentArena, position: Vector3f) -> ComponentKey {
        let mut transform = TransformComponent::new();
        transform.write_position(position);
        components.insert(ComponentEntry::new(Box::new(transform)))
    }

    #[test]
    fn test_hierarchy_update() {
        let mut components = ComponentArena::with_key();

        let parent = insert_transform(&mut components, Vector3f::new(1.0, 0.0, 0.0));
        let child = insert_transform(&mut components, Vector3f::new(0.0, 1.0, 0.0));
        set_parent(&mut components, child, Some(parent)).unwrap();

        let world = model_to_world(&components, child).unwrap();
        let position = world.translation_part();
        assert!((position.x - 1.0).abs() < 1e-5);
        assert!((position.y - 1.0).abs() < 1e-5);

        // Reading the child filled the parent's cache on the way.
        let parent_t = transform_at(&components, parent).unwrap();
        assert_eq!(parent_t.cache_state(MatrixCache::ModelToWorld), CacheState::Clean);
    }

    #[test]
    fn walk_stops_at_clean_ancestor() {
        let mut components = ComponentArena::with_key();
        let a = insert_transform(&mut components, Vector3f::new(1.0, 0.0, 0.0));
        let b = insert_transform(&mut components, Vector3f::new(1.0, 0.0, 0.0));
        set_parent(&mut components, b, Some(a)).unwrap();

        model_to_world(&components, a).unwrap();
        transform_at(&components, b).unwrap().mark_dirty();

        let world = model_to_world(&components, b).unwrap();
        assert!((world.translation_part().x - 2.0).abs() < 1e-5);
    }

    #[test]
    fn cycle_is_rejected() {
        let mut components = ComponentArena::with_key();
        let a = insert_transform(&mut components, Vector3f::zero());
        let b = insert_transform(&mut components, Vector3f::zero());
        set_parent(&mut components, b, Some(a)).unwrap();

        assert_eq!(
            set_parent(&mut components, a, Some(b)),
            Err(SurrealError::HierarchyCycle { child: a, parent: b })
        );
        assert_eq!(
            set_parent(&mut components, a, Some(a)),
            Err(SurrealError::HierarchyCycle { child: a, parent: a })
        );
    }

    #[test]
    fn transfer_links_keeps_sibling_order() {
        let mut components = ComponentArena::with_key();
        let root = insert_transform(&mut components, Vector3f::zero());
        let first = insert_transform(&mut components, Vector3f::zero());
        let middle = insert_transform(&mut components, Vector3f::zero());
        let last = insert_transform(&mut components, Vector3f::zero());
        let grandchild = insert_transform(&mut components, Vector3f::zero());
        for key in [first, middle, last] {
            set_parent(&mut components, key, Some(root)).unwrap();
        }
        set_parent(&mut components, grandchild, Some(middle)).unwrap();

        let replacement = insert_transform(&mut components, Vector3f::zero());
        transfer_links(&mut components, middle, replacement).unwrap();

        let root_t = transform_at(&components, root).unwrap();
        assert_eq!(root_t.children(), &[first, replacement, last]);
        assert_eq!(transform_at(&components, grandchild).unwrap().parent(), Some(replacement));

        let old = transform_at(&components, middle).unwrap();
        assert_eq!(old.parent(), None);
        assert!(old.children().is_empty());
    }
}
