use serde::{Deserialize, Serialize};

/// A pressure measurement, stored in millimeters of mercury.
///
/// Serialized as a bare number of mmHg so the frontend can format it
/// without knowing about the wrapper.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Pressure {
    millimeters_of_mercury: f64,
}

impl Pressure {
    pub fn millimeters_of_mercury(value: f64) -> Self {
        Self {
            millimeters_of_mercury: value,
        }
    }

    pub fn in_millimeters_of_mercury(self) -> f64 {
        self.millimeters_of_mercury
    }

    /// Whole-mmHg value, rounding halves away from zero.
    pub fn rounded(self) -> f64 {
        self.millimeters_of_mercury.round()
    }
}
