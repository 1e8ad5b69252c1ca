//! Reference ellipsoid parameters

/// Reference ellipsoid parameters. All fields are derived at compile time
/// from the semi-major axis and flattening.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Ellipsoid {
    /// Semi-major axis (meters)
    pub a: f64,
    /// Flattening
    pub f: f64,
    /// Semi-minor axis: a * (1 - f)
    pub b: f64,
    /// First eccentricity squared: f * (2 - f)
    pub e2: f64,
    /// Second eccentricity squared: e^2 / (1 - e^2)
    pub ep2: f64,
}

impl Ellipsoid {
    pub const fn new(a: f64, f: f64) -> Self {
        let e2 = f * (2.0 - f);
        Self {
            a,
            f,
            b: a * (1.0 - f),
            e2,
            ep2: e2 / (1.0 - e2),
        }
    }

    /// First eccentricity
    pub fn eccentricity(&self) -> f64 {
        self.e2.sqrt()
    }

    /// Linear eccentricity, the distance from the center to a focus: a * e
    pub fn linear_eccentricity(&self) -> f64 {
        self.a * self.eccentricity()
    }

    /// Radius of curvature in the prime vertical at the given geodetic latitude
    #[inline]
    pub fn prime_vertical_radius(&self, sin_lat: f64) -> f64 {
        self.a / (1.0 - self.e2 * sin_lat * sin_lat).sqrt()
    }
}

pub const WGS84: Ellipsoid = Ellipsoid::new(6_378_137.0, 1.0 / 298.257_223_563);
