//! WGS84 geodetic (latitude, longitude, altitude) to ECEF conversions over
//! batches of points.
//!
//! Angles are radians throughout. Altitude is meters above the WGS84
//! ellipsoid.

pub mod config;
pub mod coordinate;
pub mod ellipsoid;
pub mod engine;
pub mod error;

pub use config::{InverseConfig, InverseMethod};
pub use coordinate::{EcefPoint, GeodeticPoint, CENTER_TOLERANCE_M};
pub use ellipsoid::{Ellipsoid, WGS84};
pub use engine::GeodeticTransformer;
pub use error::{InputError, Result, Wgs84Error};

/// Convert a batch of geodetic points to ECEF with the default configuration
pub fn lla_to_ecef(batch: &[GeodeticPoint]) -> Result<Vec<EcefPoint>> {
    GeodeticTransformer::new().lla_to_ecef(batch)
}

/// Convert a batch of ECEF points to geodetic coordinates with the default
/// bounded latitude iteration
pub fn ecef_to_lla(batch: &[EcefPoint]) -> Result<Vec<GeodeticPoint>> {
    GeodeticTransformer::new().ecef_to_lla(batch)
}
