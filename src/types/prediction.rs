use serde::Serialize;

/// Decimal places applied to every reported number.
pub const PRECISION: i32 = 2;

/// Values too large to scale are already integral and pass through unchanged.
pub fn round_to_precision(value: f64) -> f64 {
    let scale = 10f64.powi(PRECISION);
    let scaled = value * scale;
    if !scaled.is_finite() {
        return value;
    }
    scaled.round() / scale
}

/// Unrounded output of the linear combination and its propagated error.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Estimate {
    pub point: f64,
    pub standard_error: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PredictionResult {
    pub point_estimate: f64,
    pub lower_bound: f64,
    pub upper_bound: f64,
    pub standard_error: f64,
    pub z: f64,
}

impl PredictionResult {
    pub fn from_estimate(estimate: Estimate, z: f64) -> Self {
        let margin = if z == 0.0 || estimate.standard_error == 0.0 {
            0.0
        } else {
            z * estimate.standard_error
        };
        Self {
            point_estimate: round_to_precision(estimate.point),
            lower_bound: round_to_precision(estimate.point - margin),
            upper_bound: round_to_precision(estimate.point + margin),
            standard_error: round_to_precision(estimate.standard_error),
            z,
        }
    }

    pub fn width(&self) -> f64 {
        self.upper_bound - self.lower_bound
    }
}
