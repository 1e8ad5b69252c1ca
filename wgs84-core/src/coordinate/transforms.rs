use super::point::{EcefPoint, GeodeticPoint};
use crate::config::InverseConfig;
use crate::ellipsoid::WGS84;
use std::f64::consts::FRAC_PI_2;

/// Points closer than this to the Earth's center (meters) have no defined
/// geodetic position.
pub const CENTER_TOLERANCE_M: f64 = 1e-6;

/// Outcome of a single ECEF to geodetic inversion
#[derive(Debug, Clone, Copy)]
pub(crate) struct Inversion {
    pub point: GeodeticPoint,
    pub iterations: usize,
    pub converged: bool,
}

impl Inversion {
    pub(crate) fn exact(point: GeodeticPoint) -> Self {
        Self {
            point,
            iterations: 0,
            converged: true,
        }
    }
}

/// Convert geodetic coordinates to ECEF
pub(crate) fn geodetic_to_ecef(lla: &GeodeticPoint) -> EcefPoint {
    let (sin_lat, cos_lat) = lla.lat.sin_cos();
    let (sin_lon, cos_lon) = lla.lon.sin_cos();

    let n = WGS84.prime_vertical_radius(sin_lat);

    let x = (n + lla.alt) * cos_lat * cos_lon;
    let y = (n + lla.alt) * cos_lat * sin_lon;
    let z = (n * (1.0 - WGS84.e2) + lla.alt) * sin_lat;

    EcefPoint::new(x, y, z)
}

/// Geodetic result for a point at the Earth's center
pub(crate) fn center_point() -> GeodeticPoint {
    GeodeticPoint::new(0.0, 0.0, -WGS84.a)
}

pub(crate) fn is_center(p: f64, z: f64) -> bool {
    p.hypot(z) < CENTER_TOLERANCE_M
}

/// Height above the ellipsoid for a point at planar radius `p` and height `z`
/// given its geodetic latitude. Uses the polar form once |lat| exceeds 45
/// degrees so the divisor never approaches zero.
#[inline]
pub(crate) fn ellipsoidal_height(p: f64, z: f64, lat: f64, n: f64) -> f64 {
    let (sin_lat, cos_lat) = lat.sin_cos();
    if cos_lat.abs() >= sin_lat.abs() {
        p / cos_lat - n
    } else {
        z / sin_lat - n * (1.0 - WGS84.e2)
    }
}

/// Starting latitude for the Newton iteration, for `p > 0` and `z >= 0`.
///
/// Bowring's parametric-latitude formula is accurate to far below a
/// microradian outside the evolute of the meridian ellipse. Inside it the
/// formula's denominator turns non-positive and the seed is taken one Newton
/// step from the pole instead.
fn initial_latitude(p: f64, z: f64) -> f64 {
    let (sin_u, cos_u) = (WGS84.a * z).atan2(WGS84.b * p).sin_cos();
    let den = p - WGS84.e2 * WGS84.a * cos_u.powi(3);

    if den > 0.0 {
        (z + WGS84.ep2 * WGS84.b * sin_u.powi(3)).atan2(den)
    } else {
        FRAC_PI_2 - p / (z + WGS84.e2 * WGS84.prime_vertical_radius(1.0))
    }
}

/// Solve for the latitude of a point at planar radius `p > 0` and height
/// `z >= 0`. Returns (latitude, iterations, converged).
///
/// The latitude is a root of
/// `f(lat) = p sin(lat) - z cos(lat) - e^2 N sin(lat) cos(lat)`,
/// and `f(0) = -z`, `f(pi/2) = p` bracket one in [0, pi/2]. Newton steps that
/// leave the bracket are replaced by bisection.
fn solve_latitude(p: f64, z: f64, config: &InverseConfig) -> (f64, usize, bool) {
    let mut lat = initial_latitude(p, z);
    let (mut lo, mut hi) = (0.0, FRAC_PI_2);
    let mut iterations = 0;

    while iterations < config.max_iterations {
        iterations += 1;

        let (sin_lat, cos_lat) = lat.sin_cos();
        let w2 = 1.0 - WGS84.e2 * sin_lat * sin_lat;
        let n = WGS84.a / w2.sqrt();

        let f = p * sin_lat - z * cos_lat - WGS84.e2 * n * sin_lat * cos_lat;
        if f < 0.0 {
            lo = lat;
        } else {
            hi = lat;
        }

        let sin_cos2 = (sin_lat * cos_lat).powi(2);
        let df = p * cos_lat + z * sin_lat
            - WGS84.e2 * n * (WGS84.e2 * sin_cos2 / w2 + cos_lat * cos_lat - sin_lat * sin_lat);

        let step = lat - f / df;
        let next = if (lo..=hi).contains(&step) {
            step
        } else {
            0.5 * (lo + hi)
        };

        let delta = (next - lat).abs();
        lat = next;

        if delta < config.tolerance {
            return (lat, iterations, true);
        }
    }

    (lat, iterations, false)
}

/// Convert ECEF to geodetic coordinates by bounded, bracketed Newton
/// iteration on latitude. The returned latitude always lies in
/// [-pi/2, pi/2], also for points deep inside the ellipsoid.
pub(crate) fn inverse_fixed_point(ecef: &EcefPoint, config: &InverseConfig) -> Inversion {
    let p = ecef.x.hypot(ecef.y);
    let z = ecef.z;

    if is_center(p, z) {
        return Inversion::exact(center_point());
    }

    let lon = ecef.y.atan2(ecef.x);

    // Solved in the northern hemisphere, mirrored afterwards
    let (lat, iterations, converged) = if p == 0.0 {
        (FRAC_PI_2, 0, true)
    } else {
        solve_latitude(p, z.abs(), config)
    };
    let lat = if z < 0.0 { -lat } else { lat };

    let n = WGS84.prime_vertical_radius(lat.sin());
    let alt = ellipsoidal_height(p, z, lat, n);

    Inversion {
        point: GeodeticPoint { lat, lon, alt },
        iterations,
        converged,
    }
}
