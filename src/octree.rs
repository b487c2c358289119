use std::cmp::Ordering;
use std::num::NonZeroU32;

use crate::astro;
use crate::builder::{BuilderNode, NodeId, OctreeBuilder};
use crate::frustum::Plane;
use crate::object::{CatalogObject, ObjectScalar};
use crate::vector::{Scalar, Vector};

/// Callback invoked once per object that survives pruning during a query.
///
/// Implemented for any `FnMut` closure taking the object, its distance from
/// the observer and its apparent magnitude at that distance.
pub trait ObjectProcessor<O: CatalogObject> {
    /// Called for a surviving object with its distance from the observer and
    /// its apparent magnitude at that distance.
    fn process(&mut self, object: &O, distance: ObjectScalar<O>, app_mag: ObjectScalar<O>);
}

impl<O, F> ObjectProcessor<O> for F
where
    O: CatalogObject,
    F: FnMut(&O, ObjectScalar<O>, ObjectScalar<O>),
{
    #[inline]
    fn process(&mut self, object: &O, distance: ObjectScalar<O>, app_mag: ObjectScalar<O>) {
        self(object, distance, app_mag)
    }
}

// A flat octree node. Its objects are the contiguous, brightest-first slice
// `first_object .. first_object + object_count` of the tree's object array;
// its children, when present, are the eight consecutive records starting at
// `children`.
#[derive(Clone, Copy)]
struct Node<V: Vector> {
    center: V,
    half_size: V::Scalar,
    // No object in this node's subtree is brighter than this magnitude.
    exclusion_factor: V::Scalar,
    first_object: u32,
    object_count: u32,
    children: Option<NonZeroU32>,
}

impl<V: Vector> Node<V> {
    fn placeholder() -> Self {
        Self {
            center: V::ZERO,
            half_size: <V::Scalar as Scalar>::ZERO,
            exclusion_factor: <V::Scalar as Scalar>::INFINITY,
            first_object: 0,
            object_count: 0,
            children: None,
        }
    }
}

/// Per-depth tallies of an [`Octree`], root level first.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LevelStatistics {
    /// Nodes at this depth.
    pub nodes: usize,
    /// Objects owned directly by nodes at this depth.
    pub objects: usize,
}

/// Immutable, query-time octree produced by
/// [`OctreeBuilder::finish`](crate::builder::OctreeBuilder::finish).
///
/// Nodes live in one flat arena and each node's objects are a contiguous,
/// brightness-sorted slice of one global array, so per-frame traversals walk
/// coherent memory. The tree exposes no mutation; queries take `&self` and
/// any number of threads may run them concurrently.
pub struct Octree<O: CatalogObject> {
    nodes: Vec<Node<O::Point>>,
    objects: Vec<O>,
}

impl<O: CatalogObject> Octree<O> {
    pub(crate) fn from_builder(builder: OctreeBuilder<O>) -> Self {
        let object_count = builder.object_count();
        let mut source = builder.into_nodes();

        let mut tree = Self {
            nodes: Vec::with_capacity(source.len()),
            objects: Vec::with_capacity(object_count),
        };
        tree.nodes.push(Node::placeholder());
        tree.compact(&mut source, 0, 0);

        debug_assert!(tree.validate());
        log::debug!(
            "compacted octree: {} nodes, {} objects, {} levels",
            tree.nodes.len(),
            tree.objects.len(),
            tree.depth(),
        );
        tree
    }

    // Emits the record for the builder node `from` into `slot`, with its
    // child blocks appended behind, and computes exclusion factors on the
    // way back up.
    fn compact(&mut self, source: &mut [BuilderNode<O>], from: NodeId, slot: usize) {
        let center = source[from as usize].center;
        let half_size = source[from as usize].half_size;
        let source_children = source[from as usize].children;
        let mut residents = std::mem::take(&mut source[from as usize].objects);

        // Brightest first, so a scan can stop at the first resident past
        // its magnitude bound.
        residents.sort_by(|a, b| {
            a.absolute_magnitude()
                .partial_cmp(&b.absolute_magnitude())
                .unwrap_or(Ordering::Equal)
        });

        let mut node = Node {
            center,
            half_size,
            exclusion_factor: residents
                .first()
                .map(|object| object.absolute_magnitude())
                .unwrap_or(ObjectScalar::<O>::INFINITY),
            first_object: self.objects.len() as u32,
            object_count: residents.len() as u32,
            children: None,
        };
        self.objects.extend(residents);

        if let Some(block) = source_children {
            let first_child = self.nodes.len() as u32;
            // Reserve the eight consecutive child records before descending.
            for _ in 0..8 {
                self.nodes.push(Node::placeholder());
            }

            for index in 0..8 {
                self.compact(source, block.get() + index, (first_child + index) as usize);
                node.exclusion_factor = node
                    .exclusion_factor
                    .min(self.nodes[(first_child + index) as usize].exclusion_factor);
            }
            node.children = NonZeroU32::new(first_child);
        }

        self.nodes[slot] = node;
    }

    /// Invokes `handler` for every object likely to be visible to an
    /// observer at `observer` looking through the frustum bounded by
    /// `frustum_planes`, down to apparent magnitude `limiting_magnitude`.
    ///
    /// No object dimmer than the limit is reported, but objects outside the
    /// frustum may be: frustum tests run at node granularity to keep the
    /// traversal cheap, so an exact containment test, if one is required, is
    /// the handler's concern.
    pub fn process_visible_objects<H>(
        &self,
        handler: &mut H,
        observer: O::Point,
        frustum_planes: &[Plane<O::Point>],
        limiting_magnitude: ObjectScalar<O>,
    ) where
        H: ObjectProcessor<O>,
    {
        self.visible_in_node(0, handler, observer, frustum_planes, limiting_magnitude);
    }

    fn visible_in_node<H>(
        &self,
        id: usize,
        handler: &mut H,
        observer: O::Point,
        frustum_planes: &[Plane<O::Point>],
        limiting_magnitude: ObjectScalar<O>,
    ) where
        H: ObjectProcessor<O>,
    {
        let node = &self.nodes[id];

        for plane in frustum_planes {
            if plane.culls_cube(node.center, node.half_size) {
                return;
            }
        }

        // Closest the node's bounding sphere comes to the observer. While
        // the observer is inside that sphere nothing can be ruled out.
        let min_distance =
            observer.distance(node.center) - node.half_size * ObjectScalar::<O>::SQRT_3;

        if min_distance > ObjectScalar::<O>::ZERO
            && astro::abs_to_app_mag(node.exclusion_factor, min_distance) > limiting_magnitude
        {
            return;
        }

        // The dimmest absolute magnitude that could still reach the limit
        // from anywhere inside this node.
        let dimmest = if min_distance > ObjectScalar::<O>::ZERO {
            astro::app_to_abs_mag(limiting_magnitude, min_distance)
        } else {
            ObjectScalar::<O>::INFINITY
        };

        for object in self.node_objects(node) {
            if !object.is_brighter_than(dimmest) {
                break;
            }

            let distance = observer.distance(object.position());
            let app_mag = astro::abs_to_app_mag(object.absolute_magnitude(), distance);
            if app_mag < limiting_magnitude {
                handler.process(object, distance, app_mag);
            }
        }

        if let Some(children) = node.children {
            for index in 0..8 {
                self.visible_in_node(
                    children.get() as usize + index,
                    handler,
                    observer,
                    frustum_planes,
                    limiting_magnitude,
                );
            }
        }
    }

    /// Invokes `handler` for every object within `radius` of `center`,
    /// inclusive, with no magnitude filtering.
    pub fn process_close_objects<H>(&self, handler: &mut H, center: O::Point, radius: ObjectScalar<O>)
    where
        H: ObjectProcessor<O>,
    {
        self.close_in_node(0, handler, center, radius);
    }

    fn close_in_node<H>(
        &self,
        id: usize,
        handler: &mut H,
        center: O::Point,
        radius: ObjectScalar<O>,
    ) where
        H: ObjectProcessor<O>,
    {
        let node = &self.nodes[id];

        // The node's bounding sphere cannot contain anything within reach.
        let min_distance =
            center.distance(node.center) - node.half_size * ObjectScalar::<O>::SQRT_3;
        if min_distance > radius {
            return;
        }

        let radius_squared = radius * radius;
        for object in self.node_objects(node) {
            let distance_squared = center.distance_squared(object.position());
            if distance_squared <= radius_squared {
                let distance = distance_squared.sqrt();
                let app_mag = astro::abs_to_app_mag(object.absolute_magnitude(), distance);
                handler.process(object, distance, app_mag);
            }
        }

        if let Some(children) = node.children {
            for index in 0..8 {
                self.close_in_node(children.get() as usize + index, handler, center, radius);
            }
        }
    }

    /// Number of nodes in the tree, empty octants included.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of objects owned by the tree.
    pub fn object_count(&self) -> usize {
        self.objects.len()
    }

    /// Every object owned by the tree, grouped by owning node, brightest
    /// first within each group.
    pub fn objects(&self) -> &[O] {
        &self.objects
    }

    /// Number of levels in the tree; `1` for a tree that never subdivided.
    pub fn depth(&self) -> usize {
        self.level_statistics().len()
    }

    /// Node and object tallies per depth, root level first.
    pub fn level_statistics(&self) -> Vec<LevelStatistics> {
        let mut statistics = Vec::new();
        self.tally_level(0, 0, &mut statistics);
        statistics
    }

    fn tally_level(&self, id: usize, level: usize, statistics: &mut Vec<LevelStatistics>) {
        if level >= statistics.len() {
            statistics.resize(level + 1, LevelStatistics::default());
        }

        let node = &self.nodes[id];
        statistics[level].nodes += 1;
        statistics[level].objects += node.object_count as usize;

        if let Some(children) = node.children {
            for index in 0..8 {
                self.tally_level(children.get() as usize + index, level + 1, statistics);
            }
        }
    }

    fn node_objects(&self, node: &Node<O::Point>) -> &[O] {
        &self.objects[node.first_object as usize..(node.first_object + node.object_count) as usize]
    }

    // Full-tree walk over the shape and pruning invariants; compaction
    // asserts this in debug builds.
    fn validate(&self) -> bool {
        let mut counted = 0;
        self.validate_node(0, &mut counted) && counted == self.objects.len()
    }

    fn validate_node(&self, id: usize, counted: &mut usize) -> bool {
        let node = &self.nodes[id];
        let objects = self.node_objects(node);
        *counted += objects.len();

        let sorted = objects
            .windows(2)
            .all(|pair| pair[0].absolute_magnitude() <= pair[1].absolute_magnitude());
        let bounded = objects
            .iter()
            .all(|object| object.absolute_magnitude() >= node.exclusion_factor);

        let children = match node.children {
            None => true,
            Some(block) => (0..8).all(|index| {
                let child = block.get() as usize + index;
                self.nodes[child].exclusion_factor >= node.exclusion_factor
                    && self.validate_node(child, counted)
            }),
        };

        sorted && bounded && children
    }
}
