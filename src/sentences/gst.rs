//! Receiver error estimates: *GST* pseudorange error statistics and *GBS*
//! satellite fault detection.

use chrono::NaiveTime;

use super::fields::Fields;
use crate::err::DecodeError;

/// All errors are one-sigma values in metres.
#[derive(Debug, Clone, PartialEq)]
pub struct Gst {
    pub fix_time: Option<NaiveTime>,
    /// RMS value of the standard deviation of the range inputs.
    pub rms: f64,
    pub semi_major_error: f64,
    pub semi_minor_error: f64,
    /// Orientation of the semi-major axis, degrees from true north.
    pub error_orientation: f64,
    pub sigma_latitude_error: f64,
    pub sigma_longitude_error: f64,
    pub sigma_height_error: f64,
}

impl Gst {
    pub(crate) fn decode(f: Fields) -> Result<Self, DecodeError> {
        require_fields!(f.code, f, 8);

        Ok(Gst {
            fix_time: f.time(0),
            rms: f.f64(1),
            semi_major_error: f.f64(2),
            semi_minor_error: f.f64(3),
            error_orientation: f.f64(4),
            sigma_latitude_error: f.f64(5),
            sigma_longitude_error: f.f64(6),
            sigma_height_error: f.f64(7),
        })
    }

    /// Combined horizontal error, rounded to millimetres.
    pub fn horizontal_error(&self) -> f64 {
        let h = self.sigma_latitude_error.hypot(self.sigma_longitude_error);
        (h * 1000.0).round() / 1000.0
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Gbs {
    pub fix_time: Option<NaiveTime>,
    pub latitude_error: f64,
    pub longitude_error: f64,
    pub altitude_error: f64,
    /// PRN of the most likely failed satellite.
    pub failed_satellite: Option<u16>,
    /// Probability of missed detection for the failed satellite.
    pub missed_detection_probability: f64,
    /// Estimated bias in metres on the failed satellite.
    pub bias_estimate: f64,
    pub bias_standard_deviation: f64,
}

impl Gbs {
    pub(crate) fn decode(f: Fields) -> Result<Self, DecodeError> {
        require_fields!(f.code, f, 8);

        Ok(Gbs {
            fix_time: f.time(0),
            latitude_error: f.f64(1),
            longitude_error: f.f64(2),
            altitude_error: f.f64(3),
            failed_satellite: f.opt_int(4)?,
            missed_detection_probability: f.f64(5),
            bias_estimate: f.f64(6),
            bias_standard_deviation: f.f64(7),
        })
    }
}
