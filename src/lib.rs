//! # Magnitree
//!
//! Magnitree is a crate providing an octree for answering, every rendered
//! frame, "which catalog objects are potentially visible from this
//! viewpoint, within this frustum, brighter than this limiting magnitude?"
//! over catalogs of hundreds of thousands to millions of celestial objects.
//!
//! ## Goals
//!
//! The main goal of this crate is to make per-frame visibility and proximity
//! queries cheap enough for interactive rendering. It focuses on the spatial
//! structure alone: catalog parsing, rendering and kinematics live with the
//! caller, which feeds object records in during load and consumes a callback
//! per potentially visible object during queries.
//!
//! The tree has two phases. An [`OctreeBuilder`](builder::OctreeBuilder)
//! accepts objects in any order and subdivides adaptively; calling
//! [`finish`](builder::OctreeBuilder::finish) consumes it and produces an
//! immutable [`Octree`](octree::Octree) whose nodes own brightness-sorted
//! slices of one flat object array, so traversals scan coherent memory and
//! stop early. Each node also carries the brightest absolute magnitude found
//! anywhere below it, letting a query cull a whole subtree the moment no
//! object inside could beat the limiting magnitude at that distance.
//!
//! # Using Magnitree
//!
//! ## Implementing the [`CatalogObject`](object::CatalogObject) trait
//!
//! #### Deriving:
//!
//! Used for point objects, when the type has fields named `position` and
//! `abs_mag`:
//!
//! ```
//! # use magnitree::prelude::*;
//! # use glam::Vec3A;
//! #
//! #[derive(CatalogObject)]
//! struct Source {
//!     position: Vec3A,
//!     abs_mag: f32,
//! //  ...
//! }
//! ```
//!
//! #### Manual implementation:
//!
//! Used when the object has a spatial extent or more complex fields:
//!
//! ```
//! # use magnitree::prelude::*;
//! # use glam::Vec3A;
//! #
//! struct Source {
//!     position: Vec3A,
//!     luminosity: f32,
//! //  ...
//! }
//!
//! impl CatalogObject for Source {
//!     type Point = Vec3A;
//!
//!     fn position(&self) -> Vec3A {
//!         self.position
//!     }
//!
//!     fn absolute_magnitude(&self) -> f32 {
//!         magnitree::astro::lum_to_abs_mag(self.luminosity)
//!     }
//! }
//! ```
//!
//! ## Building and freezing the tree
//!
//! Insert the whole catalog into an [`OctreeBuilder`](builder::OctreeBuilder)
//! covering its spatial extent, then freeze it once:
//!
//! ```
//! # use magnitree::prelude::*;
//! # use glam::Vec3A;
//! #
//! # #[derive(CatalogObject)]
//! # struct Source {
//! #     position: Vec3A,
//! #     abs_mag: f32,
//! # }
//! # let catalog = vec![Source { position: Vec3A::ONE, abs_mag: 4.3 }];
//! #
//! let mut builder = OctreeBuilder::new(Vec3A::ZERO, 100_000.0);
//!
//! for source in catalog {
//!     builder.insert(source);
//! }
//!
//! let octree = builder.finish();
//! ```
//!
//! ## Querying
//!
//! The frozen tree is a read-only value; queries take `&self` and can run
//! from any number of threads. Handlers are plain closures (or
//! [`ObjectProcessor`](octree::ObjectProcessor) implementations) invoked
//! once per surviving object:
//!
//! ```
//! # use magnitree::prelude::*;
//! # use glam::Vec3A;
//! #
//! # #[derive(CatalogObject)]
//! # struct Source {
//! #     position: Vec3A,
//! #     abs_mag: f32,
//! # }
//! # let octree = OctreeBuilder::<Source>::new(Vec3A::ZERO, 100_000.0).finish();
//! # let observer = Vec3A::ZERO;
//! let frustum = [
//!     Plane::containing_point(Vec3A::Z, observer),
//! //  ...
//! ];
//!
//! octree.process_visible_objects(
//!     &mut |source: &Source, distance: f32, app_mag: f32| {
//!         // Hand the object to the renderer.
//!     },
//!     observer,
//!     &frustum,
//!     6.5,
//! );
//!
//! octree.process_close_objects(
//!     &mut |source: &Source, distance: f32, _: f32| {
//!         // Within one light-year of the observer.
//!     },
//!     observer,
//!     1.0,
//! );
//! ```

#![warn(missing_docs)]

/// Magnitude and luminosity conversions used by the pruning arithmetic.
pub mod astro;

/// Mutable, insertion-time octree.
pub mod builder;

/// Concrete catalog object kinds: stars and deep-sky objects.
pub mod catalog;

/// View-frustum planes for visibility queries.
pub mod frustum;

/// Trait to implement on types representing catalog objects.
pub mod object;

/// Immutable, query-time octree.
pub mod octree;

/// Scalar and vector abstractions over the supported glam types.
pub mod vector;

/// Derive macro for types representing point-like catalog objects.
pub mod magnitree_derive {
    pub use magnitree_derive::CatalogObject;
}

/// Everything needed to use the crate.
pub mod prelude {
    pub use crate::builder::OctreeBuilder;
    pub use crate::frustum::Plane;
    pub use crate::magnitree_derive::*;
    pub use crate::object::CatalogObject;
    pub use crate::octree::{Octree, ObjectProcessor};
}
