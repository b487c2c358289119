use std::ops::{Add, Div, Mul, Neg, Sub};

/// Floating-point scalars the octree measures distances and magnitudes with.
pub trait Scalar:
    Copy
    + PartialOrd
    + Add<Output = Self>
    + Sub<Output = Self>
    + Mul<Output = Self>
    + Div<Output = Self>
    + Neg<Output = Self>
{
    /// The additive identity.
    const ZERO: Self;

    /// Positive infinity, the magnitude bound of an empty subtree.
    const INFINITY: Self;

    /// `sqrt(3)`, the ratio of a cube's bounding-sphere radius to its half-width.
    const SQRT_3: Self;

    /// Lossless widening from an `f32` constant.
    fn from_f32(value: f32) -> Self;

    /// Square root.
    fn sqrt(self) -> Self;

    /// Absolute value.
    fn abs(self) -> Self;

    /// Base-10 logarithm.
    fn log10(self) -> Self;

    /// Natural logarithm.
    fn ln(self) -> Self;

    /// `e` raised to `self`.
    fn exp(self) -> Self;

    /// The smaller of `self` and `other`.
    fn min(self, other: Self) -> Self;
}

/// Three-component position vectors the octree partitions space with.
pub trait Vector: Copy + PartialEq + Add<Output = Self> + Sub<Output = Self> {
    /// Type of the vector's components.
    type Scalar: Scalar;

    /// The vector with all components zero.
    const ZERO: Self;

    /// Builds a vector from its `[x, y, z]` components.
    fn from_array(components: [Self::Scalar; 3]) -> Self;

    /// The vector's `[x, y, z]` components.
    fn to_array(self) -> [Self::Scalar; 3];

    /// Dot product.
    fn dot(self, other: Self) -> Self::Scalar;

    /// Euclidean distance to `other`.
    fn distance(self, other: Self) -> Self::Scalar;

    /// Squared Euclidean distance to `other`.
    fn distance_squared(self, other: Self) -> Self::Scalar;

    /// Whether all components are finite.
    fn is_finite(self) -> bool;
}

macro_rules! impl_scalar {
    ($s: ty) => {
        impl Scalar for $s {
            const ZERO: Self = 0.0;
            const INFINITY: Self = <$s>::INFINITY;
            const SQRT_3: Self = 1.732050807568877;

            #[inline]
            fn from_f32(value: f32) -> Self {
                value as $s
            }

            #[inline]
            fn sqrt(self) -> Self {
                self.sqrt()
            }

            #[inline]
            fn abs(self) -> Self {
                self.abs()
            }

            #[inline]
            fn log10(self) -> Self {
                self.log10()
            }

            #[inline]
            fn ln(self) -> Self {
                self.ln()
            }

            #[inline]
            fn exp(self) -> Self {
                self.exp()
            }

            #[inline]
            fn min(self, other: Self) -> Self {
                self.min(other)
            }
        }
    };
}

impl_scalar!(f32);
impl_scalar!(f64);

macro_rules! impl_vector {
    ($v: ty, $s: ty) => {
        impl Vector for $v {
            type Scalar = $s;

            const ZERO: Self = <$v>::ZERO;

            #[inline]
            fn from_array(components: [$s; 3]) -> Self {
                Self::from(components)
            }

            #[inline]
            fn to_array(self) -> [$s; 3] {
                self.into()
            }

            #[inline]
            fn dot(self, other: Self) -> $s {
                self.dot(other)
            }

            #[inline]
            fn distance(self, other: Self) -> $s {
                self.distance(other)
            }

            #[inline]
            fn distance_squared(self, other: Self) -> $s {
                self.distance_squared(other)
            }

            #[inline]
            fn is_finite(self) -> bool {
                self.is_finite()
            }
        }
    };
}

impl_vector!(glam::Vec3A, f32);
impl_vector!(glam::DVec3, f64);

#[cfg(test)]
mod tests {
    use super::*;
    use glam::{DVec3, Vec3A};

    #[test]
    fn array_round_trip() {
        let v = Vec3A::new(1.0, -2.0, 3.0);
        assert_eq!(Vec3A::from_array(v.to_array()), v);

        let v = DVec3::new(0.5, 0.25, -0.125);
        assert_eq!(DVec3::from_array(v.to_array()), v);
    }

    #[test]
    fn non_finite_components_detected() {
        assert!(Vector::is_finite(Vec3A::ONE));
        assert!(!Vector::is_finite(Vec3A::new(f32::NAN, 0.0, 0.0)));
        assert!(!Vector::is_finite(DVec3::new(0.0, f64::INFINITY, 0.0)));
    }
}
