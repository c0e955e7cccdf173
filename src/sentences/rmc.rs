//! *RMC*: recommended minimum specific GNSS data.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

use super::fields::Fields;
use super::ModeIndicator;
use crate::err::DecodeError;

#[derive(Debug, Clone, PartialEq)]
pub struct Rmc {
    pub fix_time: Option<NaiveTime>,
    pub fix_date: Option<NaiveDate>,
    /// `A` in the status field; `V` (void) means the receiver has no fix.
    pub active: bool,
    pub latitude: f64,
    pub longitude: f64,
    /// Speed over ground in knots.
    pub speed_knots: f64,
    /// Course over ground in degrees true.
    pub course: f64,
    /// Magnetic variation in degrees, negative when west.
    pub magnetic_variation: f64,
    pub mode: Option<ModeIndicator>,
}

impl Rmc {
    pub(crate) fn decode(f: Fields) -> Result<Self, DecodeError> {
        require_fields!(f.code, f, 11);

        let active = match f.char(1) {
            Some('A') => true,
            Some('V') | None => false,
            Some(c) => return Err(f.invalid(1, format!("unknown status '{}'", c))),
        };

        Ok(Rmc {
            fix_time: f.time(0),
            fix_date: f.date(8),
            active,
            latitude: f.latitude(2),
            longitude: f.longitude(4),
            speed_knots: f.f64(6),
            course: f.f64(7),
            magnetic_variation: f.signed(9, 'W'),
            mode: ModeIndicator::from_field(&f, 11)?,
        })
    }

    pub fn fix_datetime(&self) -> Option<NaiveDateTime> {
        Some(self.fix_date?.and_time(self.fix_time?))
    }
}
