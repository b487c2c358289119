//! View-frustum geometry. A frustum is any slice of [`Planes`](Plane) whose
//! normals point into the visible volume; the infinite five-plane frusta
//! used for star rendering need no far plane.

use crate::vector::{Scalar, Vector};

/// A plane in Hessian normal form: the points `p` with `normal · p + d = 0`.
#[derive(Clone, Copy)]
pub struct Plane<V: Vector> {
    /// The plane's normal. Culling treats the half-space the normal points
    /// into as the visible side.
    pub normal: V,
    /// Signed offset from the origin along `normal`.
    pub d: V::Scalar,
}

impl<V: Vector> Plane<V> {
    /// Creates a plane from its normal and offset.
    pub fn new(normal: V, d: V::Scalar) -> Self {
        Self { normal, d }
    }

    /// Creates the plane with the given normal passing through `point`.
    pub fn containing_point(normal: V, point: V) -> Self {
        Self {
            normal,
            d: -normal.dot(point),
        }
    }

    /// Signed distance from the plane to `point`, positive on the side the
    /// normal points into.
    #[inline]
    pub fn distance_to(&self, point: V) -> V::Scalar {
        self.normal.dot(point) + self.d
    }

    /// Whether the axis-aligned cube at `center` with the given half-width
    /// lies entirely on the invisible side of the plane.
    #[inline]
    pub fn culls_cube(&self, center: V, half_size: V::Scalar) -> bool {
        let [nx, ny, nz] = self.normal.to_array();
        let projected = half_size * (nx.abs() + ny.abs() + nz.abs());

        self.distance_to(center) < -projected
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3A;

    #[test]
    fn signed_distance_sides() {
        let plane = Plane::containing_point(Vec3A::Y, Vec3A::ZERO);

        assert!(plane.distance_to(Vec3A::new(3.0, 2.0, -1.0)) > 0.0);
        assert!(plane.distance_to(Vec3A::new(3.0, -2.0, -1.0)) < 0.0);
        assert_eq!(plane.distance_to(Vec3A::new(5.0, 0.0, 5.0)), 0.0);
    }

    #[test]
    fn cube_culling_is_conservative() {
        let plane = Plane::containing_point(Vec3A::X, Vec3A::ZERO);

        // Entirely behind the plane.
        assert!(plane.culls_cube(Vec3A::new(-4.0, 0.0, 0.0), 1.0));
        // Touching the plane from behind survives.
        assert!(!plane.culls_cube(Vec3A::new(-1.0, 0.0, 0.0), 1.0));
        // In front.
        assert!(!plane.culls_cube(Vec3A::new(4.0, 0.0, 0.0), 1.0));
    }
}
