//! The two object kinds the in-memory catalogs index: point-like stars at
//! single precision and extended deep-sky objects at double precision. The
//! tree logic is identical for both; they differ in how their extent is
//! measured and in split-threshold tuning.

use glam::{DVec3, Vec3A};

use crate::object::CatalogObject;

/// A star catalog record.
///
/// Stars are idealized points, but a star orbiting in a multiple system
/// sweeps a sphere of [`orbital_radius`](Star::orbital_radius) around its
/// barycenter; when that sphere overlaps a splitting plane the star stays in
/// the parent node so distance-based culling keeps working wherever the star
/// is on its orbit.
#[derive(Clone, Copy, Debug)]
pub struct Star {
    /// Catalog number identifying the star.
    pub catalog_number: u32,
    /// Barycenter position in light-years.
    pub position: Vec3A,
    /// Absolute magnitude.
    pub abs_mag: f32,
    /// Orbital radius around the system barycenter, zero for single stars.
    pub orbital_radius: f32,
}

impl CatalogObject for Star {
    type Point = Vec3A;

    fn position(&self) -> Vec3A {
        self.position
    }

    fn absolute_magnitude(&self) -> f32 {
        self.abs_mag
    }

    fn bounding_radius(&self) -> f32 {
        self.orbital_radius
    }
}

/// A deep-sky object record: a galaxy, globular, nebula or open cluster.
///
/// Deep-sky catalogs are small but their objects are genuinely extended, so
/// positions use double precision and nodes subdivide much earlier than star
/// nodes do.
#[derive(Clone, Copy, Debug)]
pub struct DeepSkyObject {
    /// Catalog number identifying the object.
    pub catalog_number: u32,
    /// Position in light-years.
    pub position: DVec3,
    /// Absolute magnitude.
    pub abs_mag: f32,
    /// Radius of the sphere bounding the object's visible extent.
    pub radius: f64,
}

impl CatalogObject for DeepSkyObject {
    type Point = DVec3;

    const SPLIT_THRESHOLD: usize = 10;

    fn position(&self) -> DVec3 {
        self.position
    }

    fn absolute_magnitude(&self) -> f64 {
        f64::from(self.abs_mag)
    }

    fn bounding_radius(&self) -> f64 {
        self.radius
    }
}
