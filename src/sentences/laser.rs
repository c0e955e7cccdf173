//! Laser rangefinder sentences (Trimble `PTNLA`/`PTNLB`, Laser Technology
//! `PLTIT`). Units are passed through as reported (`M`/`F` for distances,
//! `D` for degrees).

use super::fields::Fields;
use crate::err::DecodeError;

const HORIZONTAL_VECTOR: &str = "HV";

/// A horizontal vector measurement.
#[derive(Debug, Clone, PartialEq)]
pub struct LaserRange {
    pub horizontal_distance: f64,
    pub horizontal_distance_units: String,
    pub horizontal_angle: f64,
    pub horizontal_angle_units: String,
    pub vertical_angle: f64,
    pub vertical_angle_units: String,
    pub slope_distance: f64,
    pub slope_distance_units: String,
}

impl LaserRange {
    pub(crate) fn decode(f: Fields) -> Result<Self, DecodeError> {
        require_fields!(f.code, f, 9);

        if f.str(0).trim() != HORIZONTAL_VECTOR {
            return Err(f.invalid(0, format!("unsupported record \"{}\"", f.str(0))));
        }

        Ok(LaserRange {
            horizontal_distance: f.f64(1),
            horizontal_distance_units: f.string(2),
            horizontal_angle: f.f64(3),
            horizontal_angle_units: f.string(4),
            vertical_angle: f.f64(5),
            vertical_angle_units: f.string(6),
            slope_distance: f.f64(7),
            slope_distance_units: f.string(8),
        })
    }
}

/// A tree height measurement.
#[derive(Debug, Clone, PartialEq)]
pub struct TreeMeasurement {
    pub tree_height: f64,
    pub tree_height_units: String,
    pub slope_distance_to_base: f64,
    pub slope_distance_units: String,
    pub vertical_angle_to_base: f64,
    pub vertical_angle_units: String,
}

impl TreeMeasurement {
    pub(crate) fn decode(f: Fields) -> Result<Self, DecodeError> {
        require_fields!(f.code, f, 6);

        Ok(TreeMeasurement {
            tree_height: f.f64(0),
            tree_height_units: f.string(1),
            slope_distance_to_base: f.f64(2),
            slope_distance_units: f.string(3),
            vertical_angle_to_base: f.f64(4),
            vertical_angle_units: f.string(5),
        })
    }
}
