use std::cell::Cell;

use smallvec::SmallVec;

use crate::math::{Matrix4, Vector3f};
use crate::scene::ComponentKey;
use crate::scene::component::{Component, ComponentRole};

/// State of one cached matrix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheState {
    /// The cached value matches the current local SRT and ancestor state.
    Clean,
    /// The cached value must be recomputed before it is read.
    Dirty,
}

/// The four derived matrices a transform caches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MatrixCache {
    /// Local SRT: model space → parent ("other") space.
    ModelToOther,
    /// Inverse of [`ModelToOther`](Self::ModelToOther).
    OtherToModel,
    /// Model space → world space, composed up the parent chain.
    ModelToWorld,
    /// Inverse of [`ModelToWorld`](Self::ModelToWorld).
    WorldToModel,
}

#[derive(Debug, Clone, Copy)]
struct CachedMatrix {
    value: Matrix4,
    state: CacheState,
}

impl CachedMatrix {
    /// Identity placeholder, never trusted while dirty.
    fn dirty() -> Self {
        Self {
            value: Matrix4::identity(),
            state: CacheState::Dirty,
        }
    }
}

/// Transform component
///
/// Holds an object's local position, rotation (Euler angles in degrees) and
/// scale, its links in the spatial hierarchy, and four lazily computed matrices.
///
/// Caches sit in [`Cell`]s so reads work through `&self`; a read of a dirty entry
/// recomputes and stores it. Writes go through [`Scene`](crate::scene::Scene),
/// which dirties this node and every descendant.
///
/// The parent/children keys only record structure. Lifetimes belong to the
/// scene arenas.
#[derive(Debug)]
pub struct TransformComponent {
    position: Vector3f,
    rotation: Vector3f,
    scale: Vector3f,

    pub(crate) parent: Option<ComponentKey>,
    pub(crate) children: SmallVec<[ComponentKey; 4]>,

    model_to_other: Cell<CachedMatrix>,
    other_to_model: Cell<CachedMatrix>,
    model_to_world: Cell<CachedMatrix>,
    world_to_model: Cell<CachedMatrix>,
}

impl TransformComponent {
    /// Identity SRT, no parent, every cache dirty.
    #[must_use]
    pub fn new() -> Self {
        Self {
            position: Vector3f::zero(),
            rotation: Vector3f::zero(),
            scale: Vector3f::one(),

            parent: None,
            children: SmallVec::new(),

            model_to_other: Cell::new(CachedMatrix::dirty()),
            other_to_model: Cell::new(CachedMatrix::dirty()),
            model_to_world: Cell::new(CachedMatrix::dirty()),
            world_to_model: Cell::new(CachedMatrix::dirty()),
        }
    }

    // ========================================================================
    // Local SRT
    // ========================================================================

    #[inline]
    #[must_use]
    pub fn local_position(&self) -> Vector3f {
        self.position
    }

    /// Euler angles in degrees.
    #[inline]
    #[must_use]
    pub fn local_rotation(&self) -> Vector3f {
        self.rotation
    }

    #[inline]
    #[must_use]
    pub fn local_scale(&self) -> Vector3f {
        self.scale
    }

    // Raw field writes; the scene invalidates the subtree afterwards.
    pub(crate) fn write_position(&mut self, value: Vector3f) {
        self.position = value;
    }

    pub(crate) fn write_rotation(&mut self, value: Vector3f) {
        self.rotation = value;
    }

    pub(crate) fn write_scale(&mut self, value: Vector3f) {
        self.scale = value;
    }

    // ========================================================================
    // Hierarchy links
    // ========================================================================

    #[inline]
    #[must_use]
    pub fn parent(&self) -> Option<ComponentKey> {
        self.parent
    }

    #[inline]
    #[must_use]
    pub fn children(&self) -> &[ComponentKey] {
        &self.children
    }

    // ========================================================================
    // Local matrices
    // ========================================================================

    /// `Translation(position) · Rotation(rotation) · Scale(scale)`.
    pub fn model_to_other(&self) -> Matrix4 {
        self.read_or_compute(MatrixCache::ModelToOther, |t| {
            let translation = Matrix4::translation(t.position);
            let rotation = Matrix4::euler_rotation(t.rotation);
            let scale = Matrix4::scale(t.scale);
            translation.mul_m(&rotation.mul_m(&scale))
        })
    }

    /// `Scale(1 / scale) · Rotationᵀ · Translation(-position)`, the exact inverse
    /// of [`model_to_other`](Self::model_to_other).
    pub fn other_to_model(&self) -> Matrix4 {
        self.read_or_compute(MatrixCache::OtherToModel, |t| {
            let scale = Matrix4::scale(t.scale.recip());
            let rotation = Matrix4::euler_rotation(t.rotation).transpose();
            let translation = Matrix4::translation(-t.position);
            scale.mul_m(&rotation.mul_m(&translation))
        })
    }

    // ========================================================================
    // Cache state machine
    // ========================================================================

    #[must_use]
    pub fn cache_state(&self, which: MatrixCache) -> CacheState {
        self.cell(which).get().state
    }

    #[must_use]
    pub fn is_fully_clean(&self) -> bool {
        [
            MatrixCache::ModelToOther,
            MatrixCache::OtherToModel,
            MatrixCache::ModelToWorld,
            MatrixCache::WorldToModel,
        ]
        .into_iter()
        .all(|which| self.cache_state(which) == CacheState::Clean)
    }

    /// The cached value, if it is clean.
    pub(crate) fn cached(&self, which: MatrixCache) -> Option<Matrix4> {
        let entry = self.cell(which).get();
        (entry.state == CacheState::Clean).then_some(entry.value)
    }

    pub(crate) fn store(&self, which: MatrixCache, value: Matrix4) {
        self.cell(which).set(CachedMatrix {
            value,
            state: CacheState::Clean,
        });
    }

    /// Marks all four caches dirty. Descendants are the caller's business.
    pub(crate) fn mark_dirty(&self) {
        for cell in [
            &self.model_to_other,
            &self.other_to_model,
            &self.model_to_world,
            &self.world_to_model,
        ] {
            let mut entry = cell.get();
            entry.state = CacheState::Dirty;
            cell.set(entry);
        }
    }

    fn read_or_compute(&self, which: MatrixCache, compute: impl FnOnce(&Self) -> Matrix4) -> Matrix4 {
        if let Some(value) = self.cached(which) {
            return value;
        }
        let value = compute(self);
        log::trace!("Recomputed {which:?}");
        self.store(which, value);
        value
    }

    fn cell(&self, which: MatrixCache) -> &Cell<CachedMatrix> {
        match which {
            MatrixCache::ModelToOther => &self.model_to_other,
            MatrixCache::OtherToModel => &self.other_to_model,
            MatrixCache::ModelToWorld => &self.model_to_world,
            MatrixCache::WorldToModel => &self.world_to_model,
        }
    }
}

impl Default for TransformComponent {
    fn default() -> Self {
        Self::new()
    }
}

impl Component for TransformComponent {
    fn name(&self) -> &str {
        "Transform"
    }

    fn role(&self) -> ComponentRole {
        ComponentRole::Transform
    }
}
