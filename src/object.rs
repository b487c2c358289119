use crate::vector::{Scalar, Vector};

/// Scalar type of a [`CatalogObject`]'s position, used for every distance,
/// radius and magnitude involving that object kind.
pub type ObjectScalar<O> = <<O as CatalogObject>::Point as Vector>::Scalar;

/// Trait describing a catalog object the octree can index: a
/// [position](CatalogObject::position), an intrinsic
/// [brightness](CatalogObject::absolute_magnitude) and an optional spatial
/// [extent](CatalogObject::bounding_radius).
///
/// #### Deriving:
///
/// Used for point objects, when the type has fields named `position` and
/// `abs_mag`:
///
/// ```
/// # use magnitree::prelude::*;
/// # use glam::Vec3A;
/// #
/// #[derive(CatalogObject)]
/// struct Source {
///     position: Vec3A,
///     abs_mag: f32,
/// //  ...
/// }
/// ```
///
/// #### Manual implementation:
///
/// Used when the object has an extent, or cannot directly provide a position
/// and an absolute magnitude:
///
/// ```
/// # use magnitree::prelude::*;
/// # use glam::Vec3A;
/// #
/// struct BinaryStar {
///     position: Vec3A,
///     abs_mag: f32,
///     orbital_radius: f32,
/// }
///
/// impl CatalogObject for BinaryStar {
///     type Point = Vec3A;
///
///     fn position(&self) -> Vec3A {
///         self.position
///     }
///
///     fn absolute_magnitude(&self) -> f32 {
///         self.abs_mag
///     }
///
///     fn bounding_radius(&self) -> f32 {
///         self.orbital_radius
///     }
/// }
/// ```
pub trait CatalogObject {
    /// Type of the [position](CatalogObject::position), fixing the precision
    /// of all culling arithmetic for this object kind.
    type Point: Vector;

    /// Number of direct residents a tree node may hold before it subdivides.
    ///
    /// Larger values mean fewer, fuller nodes: less memory, coarser culling.
    const SPLIT_THRESHOLD: usize = 75;

    /// The object's position in the catalog's rectangular frame, in
    /// light-years.
    fn position(&self) -> Self::Point;

    /// The object's absolute magnitude. Numerically lower is brighter.
    fn absolute_magnitude(&self) -> ObjectScalar<Self>;

    /// Radius of the sphere bounding the object's spatial extent, zero for
    /// idealized point objects.
    fn bounding_radius(&self) -> ObjectScalar<Self> {
        ObjectScalar::<Self>::ZERO
    }

    /// Whether the object's extent crosses one of the three splitting planes
    /// through `center`, in which case it cannot be assigned to a single
    /// octant of the node centered there.
    fn straddles(&self, center: Self::Point) -> bool {
        let radius = self.bounding_radius();
        if radius <= ObjectScalar::<Self>::ZERO {
            return false;
        }

        let [dx, dy, dz] = (self.position() - center).to_array();
        dx.abs().min(dy.abs()).min(dz.abs()) < radius
    }

    /// Whether the object is at least as bright as `limit`.
    fn is_brighter_than(&self, limit: ObjectScalar<Self>) -> bool {
        self.absolute_magnitude() <= limit
    }
}

impl<O> CatalogObject for &O
where
    O: CatalogObject,
{
    type Point = O::Point;

    const SPLIT_THRESHOLD: usize = O::SPLIT_THRESHOLD;

    #[inline]
    fn position(&self) -> Self::Point {
        (**self).position()
    }

    #[inline]
    fn absolute_magnitude(&self) -> ObjectScalar<Self> {
        (**self).absolute_magnitude()
    }

    #[inline]
    fn bounding_radius(&self) -> ObjectScalar<Self> {
        (**self).bounding_radius()
    }

    #[inline]
    fn straddles(&self, center: Self::Point) -> bool {
        (**self).straddles(center)
    }

    #[inline]
    fn is_brighter_than(&self, limit: ObjectScalar<Self>) -> bool {
        (**self).is_brighter_than(limit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3A;

    struct Extended {
        position: Vec3A,
        radius: f32,
    }

    impl CatalogObject for Extended {
        type Point = Vec3A;

        fn position(&self) -> Vec3A {
            self.position
        }

        fn absolute_magnitude(&self) -> f32 {
            0.0
        }

        fn bounding_radius(&self) -> f32 {
            self.radius
        }
    }

    #[test]
    fn point_objects_never_straddle() {
        let object = Extended {
            position: Vec3A::splat(0.001),
            radius: 0.0,
        };

        assert!(!object.straddles(Vec3A::ZERO));
    }

    #[test]
    fn extent_crossing_a_splitting_plane_straddles() {
        let object = Extended {
            position: Vec3A::new(1.0, 8.0, 8.0),
            radius: 2.0,
        };

        // Crosses the x plane through the center, clears the other two.
        assert!(object.straddles(Vec3A::ZERO));

        let clear = Extended {
            position: Vec3A::splat(8.0),
            radius: 2.0,
        };
        assert!(!clear.straddles(Vec3A::ZERO));
    }

    #[test]
    fn brightness_threshold_is_inclusive() {
        let object = Extended {
            position: Vec3A::ZERO,
            radius: 0.0,
        };

        assert!(object.is_brighter_than(0.0));
        assert!(object.is_brighter_than(3.0));
        assert!(!object.is_brighter_than(-0.5));
    }
}
