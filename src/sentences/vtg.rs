//! *VTG*: course over ground and ground speed.

use super::fields::Fields;
use super::ModeIndicator;
use crate::err::DecodeError;

#[derive(Debug, Clone, PartialEq)]
pub struct Vtg {
    pub course_true: f64,
    pub course_magnetic: f64,
    pub speed_knots: f64,
    pub speed_kph: f64,
    pub mode: Option<ModeIndicator>,
}

impl Vtg {
    pub(crate) fn decode(f: Fields) -> Result<Self, DecodeError> {
        require_fields!(f.code, f, 4);

        // NMEA 2.0 and later tag each value with a unit letter; older
        // receivers send the four bare values.
        if f.str(1).trim() != "T" {
            return Ok(Vtg {
                course_true: f.f64(0),
                course_magnetic: f.f64(1),
                speed_knots: f.f64(2),
                speed_kph: f.f64(3),
                mode: None,
            });
        }

        require_fields!(f.code, f, 8);
        Ok(Vtg {
            course_true: f.f64(0),
            course_magnetic: f.f64(2),
            speed_knots: f.f64(4),
            speed_kph: f.f64(6),
            mode: ModeIndicator::from_field(&f, 8)?,
        })
    }
}
