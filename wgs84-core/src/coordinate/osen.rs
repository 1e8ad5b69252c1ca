//! Closed-form ECEF to geodetic conversion.
//!
//! K. Osen, "Accurate Conversion of Earth-Fixed Earth-Centered Coordinates to
//! Geodetic Coordinates", Norwegian University of Science and Technology,
//! 2017 (hal-01704943v2).
//!
//! The geodetic latitude is recovered from the root of a quartic in an
//! auxiliary variable `t`, solved in closed form and refined by a single
//! Newton-Raphson step. The formulation is undefined close to the Earth's
//! center, where the discriminant `H` drops below `e^12 / 4`.

use super::point::{EcefPoint, GeodeticPoint};
use crate::ellipsoid::WGS84;

struct OsenConstants {
    inv_aa: f64,       // 1 / a^2
    l: f64,            // e^2 / 2
    p1mee: f64,        // 1 - e^2
    p1mee_daa: f64,    // (1 - e^2) / a^2
    h_min: f64,        // e^12 / 4
    ll4: f64,          // e^4
    ll: f64,           // e^4 / 4
    inv_cbrt2: f64,    // 1 / 2^(1/3)
}

const OSEN: OsenConstants = {
    let e2 = WGS84.e2;
    let e4 = e2 * e2;
    OsenConstants {
        inv_aa: 1.0 / (WGS84.a * WGS84.a),
        l: e2 / 2.0,
        p1mee: 1.0 - e2,
        p1mee_daa: (1.0 - e2) / (WGS84.a * WGS84.a),
        h_min: e4 * e4 * e4 / 4.0,
        ll4: e4,
        ll: e4 / 4.0,
        inv_cbrt2: 0.793_700_525_984_099_8,
    }
};

/// Convert ECEF to geodetic coordinates. Returns `None` when the point lies
/// too deep inside the ellipsoid for the closed form to apply.
pub(crate) fn inverse_osen(ecef: &EcefPoint) -> Option<GeodeticPoint> {
    let k = &OSEN;
    let (x, y, z) = (ecef.x, ecef.y, ecef.z);

    let ww = x * x + y * y;
    let m = ww * k.inv_aa;
    let n = z * z * k.p1mee_daa;
    let mpn = m + n;
    let p = (mpn - k.ll4) / 6.0;
    let g = m * n * k.ll;
    let h = 2.0 * p * p * p + g;

    if h.is_nan() || h < k.h_min {
        return None;
    }

    let c = (h + g + 2.0 * (h * g).sqrt()).cbrt() * k.inv_cbrt2;
    let i = -k.ll - 0.5 * mpn;
    let beta = i / 3.0 - c - p * p / c;
    let kk = k.ll * (k.ll - mpn);

    // Left part of t
    let t1 = beta * beta - kk;
    let t2 = t1.sqrt();
    let t3 = t2 - 0.5 * (beta + i);
    let t4 = t3.sqrt();

    // Right part of t. Rounding can push this just below zero near +-45.3
    // degrees latitude.
    let t5 = (0.5 * (beta - i)).abs();
    let t6 = t5.sqrt();
    let t7 = if m < n { t6 } else { -t6 };

    let t = t4 + t7;

    // Newton-Raphson correction of t
    let j = k.l * (m - n);
    let g2 = 2.0 * j;
    let tt = t * t;
    let ttt = tt * t;
    let tttt = tt * tt;
    let f = tttt + 2.0 * i * tt + g2 * t + kk;
    let df_dt = 4.0 * ttt + 4.0 * i * t + g2;
    let dt = -f / df_dt;

    let u = t + dt + k.l;
    let v = t + dt - k.l;
    let w = ww.sqrt();
    let zu = z * u;
    let wv = w * v;
    let lat = zu.atan2(wv);

    let inv_uv = 1.0 / (u * v);
    let dw = w - wv * inv_uv;
    let dz = z - zu * k.p1mee * inv_uv;
    let da = dw.hypot(dz);
    let alt = if u < 1.0 { -da } else { da };

    let lon = y.atan2(x);

    let point = GeodeticPoint { lat, lon, alt };
    if point.lat.is_finite() && point.alt.is_finite() {
        Some(point)
    } else {
        None
    }
}
