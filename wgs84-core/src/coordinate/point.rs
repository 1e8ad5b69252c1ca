use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

use super::transforms::{geodetic_to_ecef, inverse_fixed_point};
use crate::config::InverseConfig;

/// Geodetic coordinates on the WGS84 ellipsoid
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeodeticPoint {
    pub lat: f64, // radians
    pub lon: f64, // radians
    pub alt: f64, // meters above WGS84 ellipsoid
}

impl GeodeticPoint {
    pub fn new(lat: f64, lon: f64, alt: f64) -> Self {
        Self { lat, lon, alt }
    }

    /// Convert this point to ECEF
    pub fn to_ecef(&self) -> EcefPoint {
        geodetic_to_ecef(self)
    }

    pub(crate) fn components(&self) -> [(&'static str, f64); 3] {
        [("lat", self.lat), ("lon", self.lon), ("alt", self.alt)]
    }
}

/// ECEF coordinates (Earth-Centered, Earth-Fixed), meters
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct EcefPoint {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl EcefPoint {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Convert this point to geodetic coordinates using the default
    /// latitude iteration
    pub fn to_geodetic(&self) -> GeodeticPoint {
        inverse_fixed_point(self, &InverseConfig::default()).point
    }

    /// Distance from the Earth's center
    pub fn norm(&self) -> f64 {
        (self.x * self.x + self.y * self.y + self.z * self.z).sqrt()
    }

    pub(crate) fn components(&self) -> [(&'static str, f64); 3] {
        [("x", self.x), ("y", self.y), ("z", self.z)]
    }
}

impl From<Vector3<f64>> for EcefPoint {
    fn from(v: Vector3<f64>) -> Self {
        Self::new(v.x, v.y, v.z)
    }
}

impl From<EcefPoint> for Vector3<f64> {
    fn from(p: EcefPoint) -> Self {
        Vector3::new(p.x, p.y, p.z)
    }
}
