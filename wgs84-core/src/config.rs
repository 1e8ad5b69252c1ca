use serde::{Deserialize, Serialize};

use crate::error::{InputError, Result};

/// Algorithm used for the ECEF to geodetic inversion
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum InverseMethod {
    /// Bounded, bracketed Newton iteration on latitude
    #[default]
    FixedPoint,
    /// Osen (2017) closed form, falling back to the latitude iteration deep
    /// inside the ellipsoid
    Osen,
}

/// Parameters of the ECEF to geodetic inversion
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InverseConfig {
    pub method: InverseMethod,
    /// Latitude change (radians) between iterations below which the
    /// iteration stops
    pub tolerance: f64,
    pub max_iterations: usize,
}

impl Default for InverseConfig {
    fn default() -> Self {
        Self {
            method: InverseMethod::FixedPoint,
            tolerance: 1e-12,
            max_iterations: 10,
        }
    }
}

impl InverseConfig {
    pub fn validate(&self) -> Result<()> {
        if !self.tolerance.is_finite() || self.tolerance <= 0.0 {
            return Err(InputError::Config(format!(
                "tolerance must be positive and finite, got {}",
                self.tolerance
            ))
            .into());
        }

        if self.max_iterations == 0 {
            return Err(InputError::Config("max_iterations must be at least 1".to_string()).into());
        }

        Ok(())
    }
}
