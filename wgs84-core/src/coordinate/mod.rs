//! Geodetic and ECEF point types and the per-point transforms

pub(crate) mod osen;
mod point;
pub(crate) mod transforms;

pub use point::{EcefPoint, GeodeticPoint};
pub use transforms::CENTER_TOLERANCE_M;
