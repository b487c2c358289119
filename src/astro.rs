//! Magnitude arithmetic. Distances are in light-years throughout; absolute
//! magnitude is brightness at a fixed reference distance of 10 parsecs,
//! apparent magnitude is brightness at the observer. Lower is brighter.

use crate::vector::Scalar;

/// Light-years per parsec.
const LY_PER_PARSEC: f32 = 3.2615638;

/// Absolute magnitude of the Sun.
const SOLAR_ABSMAG: f32 = 4.81;

/// Magnitudes per factor `e` of luminosity, `5 / ln(100)`.
const LN_MAG: f32 = 1.0857362;

/// Difference between the apparent and absolute magnitude of an object
/// `lyrs` light-years away.
#[inline]
pub fn distance_modulus<S: Scalar>(lyrs: S) -> S {
    let five = S::from_f32(5.0);
    five * (lyrs / S::from_f32(LY_PER_PARSEC)).log10() - five
}

/// Apparent magnitude of an object of absolute magnitude `abs_mag` seen from
/// `lyrs` light-years away.
#[inline]
pub fn abs_to_app_mag<S: Scalar>(abs_mag: S, lyrs: S) -> S {
    abs_mag + distance_modulus(lyrs)
}

/// Absolute magnitude of an object of apparent magnitude `app_mag` seen from
/// `lyrs` light-years away.
#[inline]
pub fn app_to_abs_mag<S: Scalar>(app_mag: S, lyrs: S) -> S {
    app_mag - distance_modulus(lyrs)
}

/// Absolute magnitude of an object of luminosity `lum`, in solar units.
#[inline]
pub fn lum_to_abs_mag<S: Scalar>(lum: S) -> S {
    S::from_f32(SOLAR_ABSMAG) - lum.ln() * S::from_f32(LN_MAG)
}

/// Luminosity of an object of absolute magnitude `abs_mag`, in solar units.
#[inline]
pub fn abs_mag_to_lum<S: Scalar>(abs_mag: S) -> S {
    ((S::from_f32(SOLAR_ABSMAG) - abs_mag) / S::from_f32(LN_MAG)).exp()
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f32 = 1E-4;

    #[test]
    fn magnitude_at_reference_distance() {
        // At 10 parsecs the distance modulus vanishes.
        let ten_parsecs = 10.0 * LY_PER_PARSEC;
        assert!(distance_modulus(ten_parsecs).abs() < EPSILON);
        assert!((abs_to_app_mag(4.81, ten_parsecs) - 4.81).abs() < EPSILON);
    }

    #[test]
    fn apparent_magnitude_inverts() {
        let abs_mag = 1.45_f32;
        let distance = 250.3_f32;
        let app_mag = abs_to_app_mag(abs_mag, distance);

        assert!(app_mag > abs_mag);
        assert!((app_to_abs_mag(app_mag, distance) - abs_mag).abs() < EPSILON);
    }

    #[test]
    fn solar_luminosity_is_unity() {
        assert!((abs_mag_to_lum(SOLAR_ABSMAG) - 1.0).abs() < EPSILON);
        assert!((lum_to_abs_mag(1.0_f64) - f64::from(SOLAR_ABSMAG)).abs() < f64::from(EPSILON));
    }

    #[test]
    fn five_magnitudes_per_hundredfold_luminosity() {
        let bright = abs_mag_to_lum(0.0_f32);
        let faint = abs_mag_to_lum(5.0_f32);
        assert!((bright / faint - 100.0).abs() < 0.01);
    }
}
