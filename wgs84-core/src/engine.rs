//! Batch transform engine

use ndarray::{Array2, ArrayView2};
use rayon::prelude::*;
use tracing::{debug, trace, warn};

use crate::config::{InverseConfig, InverseMethod};
use crate::coordinate::osen::inverse_osen;
use crate::coordinate::transforms::{
    center_point, geodetic_to_ecef, inverse_fixed_point, is_center, Inversion,
};
use crate::coordinate::{EcefPoint, GeodeticPoint};
use crate::error::{InputError, Result};

/// Converts batches of points between geodetic and ECEF coordinates.
///
/// Output order always matches input order. A batch holding any non-finite
/// component is rejected as a whole before conversion.
#[derive(Debug, Clone, Copy, Default)]
pub struct GeodeticTransformer {
    config: InverseConfig,
}

impl GeodeticTransformer {
    /// Create a transformer with the default inverse configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a transformer with a custom inverse configuration
    pub fn with_config(config: InverseConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &InverseConfig {
        &self.config
    }

    /// Convert a batch of geodetic points to ECEF
    pub fn lla_to_ecef(&self, batch: &[GeodeticPoint]) -> Result<Vec<EcefPoint>> {
        check_finite(batch.iter().map(GeodeticPoint::components))?;
        debug!(points = batch.len(), "converting geodetic batch to ECEF");

        Ok(batch.iter().map(geodetic_to_ecef).collect())
    }

    /// Convert a batch of ECEF points to geodetic coordinates
    pub fn ecef_to_lla(&self, batch: &[EcefPoint]) -> Result<Vec<GeodeticPoint>> {
        check_finite(batch.iter().map(EcefPoint::components))?;
        debug!(
            points = batch.len(),
            method = ?self.config.method,
            "converting ECEF batch to geodetic"
        );

        let inversions: Vec<Inversion> = batch.iter().map(|p| self.invert(p)).collect();
        Ok(self.finish(inversions))
    }

    /// Parallel version of [`lla_to_ecef`](Self::lla_to_ecef)
    pub fn par_lla_to_ecef(&self, batch: &[GeodeticPoint]) -> Result<Vec<EcefPoint>> {
        check_finite(batch.iter().map(GeodeticPoint::components))?;
        debug!(points = batch.len(), "converting geodetic batch to ECEF in parallel");

        Ok(batch.par_iter().map(geodetic_to_ecef).collect())
    }

    /// Parallel version of [`ecef_to_lla`](Self::ecef_to_lla)
    pub fn par_ecef_to_lla(&self, batch: &[EcefPoint]) -> Result<Vec<GeodeticPoint>> {
        check_finite(batch.iter().map(EcefPoint::components))?;
        debug!(
            points = batch.len(),
            method = ?self.config.method,
            "converting ECEF batch to geodetic in parallel"
        );

        let inversions: Vec<Inversion> = batch.par_iter().map(|p| self.invert(p)).collect();
        Ok(self.finish(inversions))
    }

    /// Convert an `N x 3` array of (lat, lon, alt) rows to (x, y, z) rows
    pub fn lla_to_ecef_array(&self, batch: ArrayView2<'_, f64>) -> Result<Array2<f64>> {
        let points = rows_to_points(batch, GeodeticPoint::new)?;
        let ecef = self.lla_to_ecef(&points)?;

        Ok(Array2::from(
            ecef.iter().map(|p| [p.x, p.y, p.z]).collect::<Vec<_>>(),
        ))
    }

    /// Convert an `N x 3` array of (x, y, z) rows to (lat, lon, alt) rows
    pub fn ecef_to_lla_array(&self, batch: ArrayView2<'_, f64>) -> Result<Array2<f64>> {
        let points = rows_to_points(batch, EcefPoint::new)?;
        let lla = self.ecef_to_lla(&points)?;

        Ok(Array2::from(
            lla.iter().map(|p| [p.lat, p.lon, p.alt]).collect::<Vec<_>>(),
        ))
    }

    fn invert(&self, ecef: &EcefPoint) -> Inversion {
        match self.config.method {
            InverseMethod::FixedPoint => inverse_fixed_point(ecef, &self.config),
            InverseMethod::Osen => {
                if is_center(ecef.x.hypot(ecef.y), ecef.z) {
                    return Inversion::exact(center_point());
                }

                match inverse_osen(ecef) {
                    Some(point) => Inversion::exact(point),
                    None => {
                        trace!(
                            x = ecef.x,
                            y = ecef.y,
                            z = ecef.z,
                            "closed form undefined, iterating"
                        );
                        inverse_fixed_point(ecef, &self.config)
                    }
                }
            }
        }
    }

    fn finish(&self, inversions: Vec<Inversion>) -> Vec<GeodeticPoint> {
        let iterations = inversions.iter().map(|inv| inv.iterations).max().unwrap_or(0);
        trace!(iterations, "batch inversion finished");

        let capped = inversions.iter().filter(|inv| !inv.converged).count();
        if capped > 0 {
            warn!(
                points = capped,
                max_iterations = self.config.max_iterations,
                "latitude iteration stopped at the iteration cap"
            );
        }

        inversions.into_iter().map(|inv| inv.point).collect()
    }
}

/// Reject the batch at the first non-finite component
fn check_finite<I>(points: I) -> Result<()>
where
    I: Iterator<Item = [(&'static str, f64); 3]>,
{
    for (index, components) in points.enumerate() {
        if let Some(&(component, value)) = components.iter().find(|(_, v)| !v.is_finite()) {
            return Err(InputError::NonFinite {
                index,
                component,
                value,
            }
            .into());
        }
    }
    Ok(())
}

fn rows_to_points<T>(batch: ArrayView2<'_, f64>, make: fn(f64, f64, f64) -> T) -> Result<Vec<T>> {
    if batch.ncols() != 3 {
        return Err(InputError::Shape {
            expected: 3,
            found: batch.ncols(),
        }
        .into());
    }

    Ok(batch
        .rows()
        .into_iter()
        .map(|row| make(row[0], row[1], row[2]))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ellipsoid::WGS84;
    use crate::error::Wgs84Error;
    use ndarray::array;
    use std::f64::consts::FRAC_PI_2;

    fn sample_batch() -> Vec<GeodeticPoint> {
        vec![
            GeodeticPoint::new(0.429407141487312, 2.11220668133798, 0.0),
            GeodeticPoint::new(-0.6, -2.9, 1500.0),
            GeodeticPoint::new(1.2, 0.3, -200.0),
            GeodeticPoint::new(0.0, 0.0, 0.0),
            GeodeticPoint::new(-1.4, 3.1, 400_000.0),
        ]
    }

    #[test]
    fn test_empty_batch() {
        let engine = GeodeticTransformer::new();
        assert!(engine.lla_to_ecef(&[]).unwrap().is_empty());
        assert!(engine.ecef_to_lla(&[]).unwrap().is_empty());
        assert!(engine.par_lla_to_ecef(&[]).unwrap().is_empty());
        assert!(engine.par_ecef_to_lla(&[]).unwrap().is_empty());
    }

    #[test]
    fn test_batch_order_preserved() {
        let engine = GeodeticTransformer::new();
        let batch = sample_batch();

        let ecef = engine.lla_to_ecef(&batch).unwrap();
        assert_eq!(ecef.len(), batch.len());
        for (lla, p) in batch.iter().zip(&ecef) {
            assert_eq!(*p, lla.to_ecef());
        }

        let lla = engine.ecef_to_lla(&ecef).unwrap();
        assert_eq!(lla.len(), batch.len());
        for (expected, got) in batch.iter().zip(&lla) {
            assert!((expected.lat - got.lat).abs() < 1e-9);
            assert!((expected.lon - got.lon).abs() < 1e-9);
            assert!((expected.alt - got.alt).abs() < 1e-6);
        }
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let engine = GeodeticTransformer::new();
        let batch: Vec<GeodeticPoint> = (0..2_000)
            .map(|i| {
                let t = i as f64 / 2_000.0;
                GeodeticPoint::new((t - 0.5) * 3.1, (t - 0.5) * 6.2, t * 10_000.0)
            })
            .collect();

        let ecef = engine.lla_to_ecef(&batch).unwrap();
        assert_eq!(ecef, engine.par_lla_to_ecef(&batch).unwrap());
        assert_eq!(
            engine.ecef_to_lla(&ecef).unwrap(),
            engine.par_ecef_to_lla(&ecef).unwrap()
        );
    }

    #[test]
    fn test_deterministic() {
        let engine = GeodeticTransformer::new();
        let ecef = engine.lla_to_ecef(&sample_batch()).unwrap();

        let first = engine.ecef_to_lla(&ecef).unwrap();
        let second = engine.ecef_to_lla(&ecef).unwrap();
        for (a, b) in first.iter().zip(&second) {
            assert_eq!(a.lat.to_bits(), b.lat.to_bits());
            assert_eq!(a.lon.to_bits(), b.lon.to_bits());
            assert_eq!(a.alt.to_bits(), b.alt.to_bits());
        }
    }

    #[test]
    fn test_non_finite_rejected() {
        let engine = GeodeticTransformer::new();
        let mut batch = sample_batch();
        batch[2].alt = f64::NAN;

        let result = engine.lla_to_ecef(&batch);
        assert!(matches!(
            result.unwrap_err(),
            Wgs84Error::InvalidInput(InputError::NonFinite {
                index: 2,
                component: "alt",
                ..
            })
        ));

        let ecef = vec![EcefPoint::new(WGS84.a, 0.0, 0.0), EcefPoint::new(1.0, f64::INFINITY, 0.0)];
        let result = engine.par_ecef_to_lla(&ecef);
        assert!(matches!(
            result.unwrap_err(),
            Wgs84Error::InvalidInput(InputError::NonFinite {
                index: 1,
                component: "y",
                ..
            })
        ));
    }

    #[test]
    fn test_osen_method() {
        let config = InverseConfig {
            method: InverseMethod::Osen,
            ..InverseConfig::default()
        };
        let engine = GeodeticTransformer::with_config(config).unwrap();
        let batch = sample_batch();

        let ecef = engine.lla_to_ecef(&batch).unwrap();
        let lla = engine.ecef_to_lla(&ecef).unwrap();
        for (expected, got) in batch.iter().zip(&lla) {
            assert!((expected.lat - got.lat).abs() < 1e-9);
            assert!((expected.lon - got.lon).abs() < 1e-9);
            assert!((expected.alt - got.alt).abs() < 1e-6);
        }
    }

    #[test]
    fn test_osen_falls_back_inside_ellipsoid() {
        let osen = GeodeticTransformer::with_config(InverseConfig {
            method: InverseMethod::Osen,
            ..InverseConfig::default()
        })
        .unwrap();
        let fixed = GeodeticTransformer::new();

        let deep = [
            EcefPoint::new(1_000.0, 0.0, 10.0),
            EcefPoint::new(10_000.0, 0.0, 5_000.0),
            EcefPoint::new(30_000.0, 0.0, 100.0),
        ];
        let a = osen.ecef_to_lla(&deep).unwrap();
        let b = fixed.ecef_to_lla(&deep).unwrap();
        assert_eq!(a, b);

        let back = osen.lla_to_ecef(&a).unwrap();
        for ((lla, input), output) in a.iter().zip(&deep).zip(&back) {
            assert!(lla.lat.abs() <= std::f64::consts::FRAC_PI_2);
            assert!((input.x - output.x).abs() < 1e-6);
            assert!((input.y - output.y).abs() < 1e-6);
            assert!((input.z - output.z).abs() < 1e-6);
        }
    }

    #[test]
    fn test_earth_center_both_methods() {
        let center = [EcefPoint::new(0.0, 0.0, 0.0)];
        for method in [InverseMethod::FixedPoint, InverseMethod::Osen] {
            let engine = GeodeticTransformer::with_config(InverseConfig {
                method,
                ..InverseConfig::default()
            })
            .unwrap();
            let lla = engine.ecef_to_lla(&center).unwrap();
            assert_eq!(lla, vec![GeodeticPoint::new(0.0, 0.0, -WGS84.a)]);
        }
    }

    #[test]
    fn test_pole_batch() {
        let engine = GeodeticTransformer::new();
        let ecef = engine
            .lla_to_ecef(&[GeodeticPoint::new(FRAC_PI_2, 0.0, 0.0)])
            .unwrap();

        assert!(ecef[0].x.abs() < 1e-3);
        assert!(ecef[0].y.abs() < 1e-3);
        assert!((ecef[0].z - WGS84.a * (1.0 - WGS84.f)).abs() < 1e-3);
    }

    #[test]
    fn test_with_invalid_config() {
        let result = GeodeticTransformer::with_config(InverseConfig {
            max_iterations: 0,
            ..InverseConfig::default()
        });
        assert!(matches!(
            result.unwrap_err(),
            Wgs84Error::InvalidInput(InputError::Config(_))
        ));
    }

    #[test]
    fn test_array_roundtrip() {
        let engine = GeodeticTransformer::new();
        let lla = array![[0.429407141487312, 2.11220668133798, 0.0], [0.0, 0.0, 0.0]];

        let ecef = engine.lla_to_ecef_array(lla.view()).unwrap();
        assert_eq!(ecef.dim(), (2, 3));
        assert!((ecef[[1, 0]] - WGS84.a).abs() < 1e-6);

        let lla2 = engine.ecef_to_lla_array(ecef.view()).unwrap();
        assert_eq!(lla2.dim(), (2, 3));
        for (a, b) in lla.iter().zip(lla2.iter()) {
            assert!((a - b).abs() < 1e-6);
        }
    }

    #[test]
    fn test_array_wrong_shape() {
        let engine = GeodeticTransformer::new();
        let ragged = array![[1.0, 2.0], [3.0, 4.0]];

        let result = engine.ecef_to_lla_array(ragged.view());
        assert!(matches!(
            result.unwrap_err(),
            Wgs84Error::InvalidInput(InputError::Shape {
                expected: 3,
                found: 2
            })
        ));
    }

    #[test]
    fn test_array_empty() {
        let engine = GeodeticTransformer::new();
        let empty = Array2::<f64>::zeros((0, 3));
        let out = engine.lla_to_ecef_array(empty.view()).unwrap();
        assert_eq!(out.dim(), (0, 3));
    }
}
