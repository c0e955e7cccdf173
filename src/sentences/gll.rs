//! *GLL*: geographic position, latitude and longitude.

use chrono::NaiveTime;

use super::fields::Fields;
use super::ModeIndicator;
use crate::err::DecodeError;

#[derive(Debug, Clone, PartialEq)]
pub struct Gll {
    pub latitude: f64,
    pub longitude: f64,
    pub fix_time: Option<NaiveTime>,
    pub active: bool,
    pub mode: Option<ModeIndicator>,
}

impl Gll {
    pub(crate) fn decode(f: Fields) -> Result<Self, DecodeError> {
        require_fields!(f.code, f, 6);

        Ok(Gll {
            latitude: f.latitude(0),
            longitude: f.longitude(2),
            fix_time: f.time(4),
            active: f.is_active(5),
            mode: ModeIndicator::from_field(&f, 6)?,
        })
    }
}
