use std::mem;
use std::num::NonZeroU32;

use crate::object::{CatalogObject, ObjectScalar};
use crate::octree::Octree;
use crate::vector::{Scalar, Vector};

/// Index of a node in a tree's node arena.
pub(crate) type NodeId = u32;

const ROOT: NodeId = 0;

pub(crate) struct BuilderNode<O: CatalogObject> {
    pub(crate) center: O::Point,
    pub(crate) half_size: ObjectScalar<O>,
    pub(crate) objects: Vec<O>,
    // First of eight consecutively allocated children; a node has all eight
    // or none.
    pub(crate) children: Option<NonZeroU32>,
}

/// Mutable, build-time octree. Accepts catalog objects one at a time in any
/// order and subdivides adaptively; [`finish`](OctreeBuilder::finish)
/// compacts it into an immutable [`Octree`] for querying.
///
/// ```
/// # use magnitree::prelude::*;
/// # use glam::Vec3A;
/// #
/// # #[derive(CatalogObject)]
/// # struct Source {
/// #     position: Vec3A,
/// #     abs_mag: f32,
/// # }
/// #
/// let mut builder = OctreeBuilder::new(Vec3A::ZERO, 100_000.0);
///
/// builder.insert(Source {
///     position: Vec3A::new(217.0, -135.5, 81.3),
///     abs_mag: 4.3,
/// });
///
/// let octree = builder.finish();
/// ```
pub struct OctreeBuilder<O: CatalogObject> {
    nodes: Vec<BuilderNode<O>>,
    object_count: usize,
}

impl<O: CatalogObject> OctreeBuilder<O> {
    /// Creates a builder whose root cube is centered on `center` and spans
    /// `half_size` along each semi-axis, covering the catalog's extent.
    pub fn new(center: O::Point, half_size: ObjectScalar<O>) -> Self {
        Self {
            nodes: vec![BuilderNode {
                center,
                half_size,
                objects: Vec::new(),
                children: None,
            }],
            object_count: 0,
        }
    }

    /// Number of objects inserted so far.
    pub fn object_count(&self) -> usize {
        self.object_count
    }

    /// Inserts an object, descending to the smallest node that fully
    /// contains its extent.
    ///
    /// Objects whose extent crosses a splitting plane stay at the coarsest
    /// node that contains them; a node that fills past
    /// [`SPLIT_THRESHOLD`](CatalogObject::SPLIT_THRESHOLD) subdivides and
    /// redistributes its residents. Insertion never fails; an object with a
    /// non-finite position is kept at the root rather than corrupting the
    /// tree.
    pub fn insert(&mut self, object: O) {
        if !object.position().is_finite() {
            log::warn!("catalog object with a non-finite position kept at the root node");
        }

        self.object_count += 1;

        let mut id = ROOT;
        loop {
            let node = &mut self.nodes[id as usize];

            if stays_put(&object, node.center, node.half_size) {
                node.objects.push(object);
                return;
            }

            if let Some(children) = node.children {
                id = children.get() + octant(object.position(), node.center);
                continue;
            }

            node.objects.push(object);
            let full = node.objects.len() > O::SPLIT_THRESHOLD;
            if full {
                self.split(id);
            }
            return;
        }
    }

    /// Consumes the builder, compacting it into an immutable [`Octree`].
    ///
    /// Called once per catalog load; insertion after the freeze is ruled out
    /// because the builder no longer exists.
    pub fn finish(self) -> Octree<O> {
        Octree::from_builder(self)
    }

    pub(crate) fn into_nodes(self) -> Vec<BuilderNode<O>> {
        self.nodes
    }

    // Subdivide: allocate the eight octant children, move every resident
    // that fits entirely inside one octant down into it, and keep splitting
    // children that come out over the threshold.
    fn split(&mut self, id: NodeId) {
        let (center, half_size) = {
            let node = &self.nodes[id as usize];
            (node.center, node.half_size)
        };
        let objects = mem::take(&mut self.nodes[id as usize].objects);

        // A degenerate cluster with every resident at one position stays
        // put instead of subdividing forever.
        if !objects.windows(2).any(|pair| pair[0].position() != pair[1].position()) {
            self.nodes[id as usize].objects = objects;
            return;
        }

        let first_child = self.nodes.len() as NodeId;
        let child_half_size = half_size * ObjectScalar::<O>::from_f32(0.5);

        for index in 0..8u32 {
            self.nodes.push(BuilderNode {
                center: child_center(center, child_half_size, index),
                half_size: child_half_size,
                objects: Vec::new(),
                children: None,
            });
        }
        self.nodes[id as usize].children = NonZeroU32::new(first_child);

        let mut kept = Vec::new();
        for object in objects {
            if stays_put(&object, center, half_size) {
                kept.push(object);
            } else {
                let child = first_child + octant(object.position(), center);
                self.nodes[child as usize].objects.push(object);
            }
        }
        self.nodes[id as usize].objects = kept;

        for index in 0..8 {
            let child = first_child + index;
            if self.nodes[child as usize].objects.len() > O::SPLIT_THRESHOLD {
                self.split(child);
            }
        }
    }
}

// An object stays at a node when it cannot be pushed into any child: its
// position is a contract violation, its extent outgrows the node's cube, or
// it overlaps a splitting plane.
fn stays_put<O: CatalogObject>(object: &O, center: O::Point, half_size: ObjectScalar<O>) -> bool {
    !object.position().is_finite()
        || object.bounding_radius() > half_size
        || object.straddles(center)
}

// Octant index from three sign tests: bit 0 set for +x, bit 1 for +y,
// bit 2 for +z.
fn octant<V: Vector>(position: V, center: V) -> u32 {
    let [px, py, pz] = position.to_array();
    let [cx, cy, cz] = center.to_array();

    (px >= cx) as u32 | ((py >= cy) as u32) << 1 | ((pz >= cz) as u32) << 2
}

fn child_center<V: Vector>(center: V, offset: V::Scalar, index: u32) -> V {
    let [x, y, z] = center.to_array();

    V::from_array([
        if index & 1 != 0 { x + offset } else { x - offset },
        if index & 2 != 0 { y + offset } else { y - offset },
        if index & 4 != 0 { z + offset } else { z - offset },
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Star;
    use glam::Vec3A;
    use rand::{rngs::StdRng, Rng, SeedableRng};

    const ROOT_HALF_SIZE: f32 = 100.0;

    fn point_star(catalog_number: u32, position: Vec3A) -> Star {
        Star {
            catalog_number,
            position,
            abs_mag: 5.0,
            orbital_radius: 0.0,
        }
    }

    fn builder() -> OctreeBuilder<Star> {
        OctreeBuilder::new(Vec3A::ZERO, ROOT_HALF_SIZE)
    }

    #[test]
    fn octant_selection_matches_child_centers() {
        for index in 0..8 {
            let center = child_center(Vec3A::ZERO, 0.5, index);
            assert_eq!(octant(center, Vec3A::ZERO), index);
        }
    }

    #[test]
    fn leaves_respect_the_split_threshold() {
        let mut rng = StdRng::seed_from_u64(31);
        let mut builder = builder();

        for i in 0..2_000 {
            let position = Vec3A::new(
                rng.gen_range(-90.0..90.0),
                rng.gen_range(-90.0..90.0),
                rng.gen_range(-90.0..90.0),
            );
            builder.insert(point_star(i, position));
        }

        assert!(builder.nodes.len() > 1);
        for node in &builder.nodes {
            if node.children.is_none() {
                assert!(node.objects.len() <= Star::SPLIT_THRESHOLD);
            }
        }
    }

    #[test]
    fn children_come_in_complete_sets() {
        let mut rng = StdRng::seed_from_u64(32);
        let mut builder = builder();

        for i in 0..500 {
            let position = Vec3A::new(
                rng.gen_range(-90.0..90.0),
                rng.gen_range(-90.0..90.0),
                rng.gen_range(-90.0..90.0),
            );
            builder.insert(point_star(i, position));
        }

        for node in &builder.nodes {
            if let Some(children) = node.children {
                assert!(children.get() as usize + 8 <= builder.nodes.len());
            }
        }
    }

    #[test]
    fn straddlers_stay_at_the_parent() {
        let mut builder = builder();

        // An orbit crossing the x splitting plane through the root center.
        let straddler = Star {
            catalog_number: u32::MAX,
            position: Vec3A::new(0.5, 50.0, 50.0),
            abs_mag: 1.0,
            orbital_radius: 2.0,
        };
        builder.insert(straddler);

        // Enough residents to force a split.
        for i in 0..Star::SPLIT_THRESHOLD as u32 + 8 {
            let offset = i as f32 * 0.1;
            builder.insert(point_star(i, Vec3A::new(10.0 + offset, 20.0, 30.0 + offset)));
        }

        let root = &builder.nodes[ROOT as usize];
        assert!(root.children.is_some());
        assert!(root
            .objects
            .iter()
            .any(|star| star.catalog_number == u32::MAX));
    }

    #[test]
    fn oversized_extent_is_kept_regardless_of_position() {
        let mut builder = builder();

        let oversized = Star {
            catalog_number: 7,
            position: Vec3A::new(60.0, 60.0, 60.0),
            abs_mag: 1.0,
            orbital_radius: ROOT_HALF_SIZE * 2.0,
        };
        builder.insert(oversized);

        assert_eq!(builder.nodes[ROOT as usize].objects.len(), 1);
    }

    #[test]
    fn non_finite_positions_are_routed_to_the_root() {
        let mut builder = builder();

        builder.insert(point_star(0, Vec3A::new(f32::NAN, 0.0, 0.0)));
        for i in 1..Star::SPLIT_THRESHOLD as u32 + 8 {
            let offset = i as f32 * 0.1;
            builder.insert(point_star(i, Vec3A::new(-20.0 - offset, 15.0, 40.0)));
        }

        let root = &builder.nodes[ROOT as usize];
        assert!(root
            .objects
            .iter()
            .any(|star| star.position.x.is_nan()));
    }

    #[test]
    fn degenerate_clusters_never_subdivide() {
        let mut builder = builder();

        for i in 0..200 {
            builder.insert(point_star(i, Vec3A::splat(12.0)));
        }

        assert_eq!(builder.nodes.len(), 1);
        assert_eq!(builder.nodes[ROOT as usize].objects.len(), 200);
    }
}
