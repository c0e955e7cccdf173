//! *GNS*: GNSS fix data with a mode indicator per constellation.

use chrono::NaiveTime;

use super::fields::Fields;
use super::{FixQuality, ModeIndicator};
use crate::err::DecodeError;

#[derive(Debug, Clone, PartialEq)]
pub struct Gns {
    pub fix_time: Option<NaiveTime>,
    pub latitude: f64,
    pub longitude: f64,
    /// One indicator per constellation, in the order GPS, GLONASS, Galileo,
    /// BeiDou, QZSS, NavIC.
    pub modes: Vec<ModeIndicator>,
    pub satellites: u32,
    pub hdop: f64,
    /// Height above mean sea level in metres.
    pub orthometric_height: f64,
    pub geoidal_separation: f64,
    pub dgps_age: f64,
    pub dgps_station_id: Option<u16>,
    /// NMEA 4.1 navigational status (`S`afe, `C`aution, `U`nsafe, `V`oid).
    pub navigational_status: Option<char>,
}

impl Gns {
    pub(crate) fn decode(f: Fields) -> Result<Self, DecodeError> {
        require_fields!(f.code, f, 12);

        let modes = f
            .str(5)
            .trim()
            .chars()
            .map(|c| {
                ModeIndicator::from_char(c)
                    .ok_or_else(|| f.invalid(5, format!("unknown mode indicator '{}'", c)))
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Gns {
            fix_time: f.time(0),
            latitude: f.latitude(1),
            longitude: f.longitude(3),
            modes,
            satellites: f.opt_int(6)?.unwrap_or(0),
            hdop: f.f64(7),
            orthometric_height: f.f64(8),
            geoidal_separation: f.f64(9),
            dgps_age: f.f64(10),
            dgps_station_id: f.opt_int(11)?,
            navigational_status: f.char(12),
        })
    }

    /// Quality of the best constellation; `Invalid` when every constellation
    /// reports no fix.
    pub fn fix_quality(&self) -> FixQuality {
        self.modes
            .iter()
            .find(|m| **m != ModeIndicator::NotValid)
            .map(|m| m.fix_quality())
            .unwrap_or(FixQuality::Invalid)
    }

    pub fn ellipsoidal_height(&self) -> f64 {
        self.orthometric_height + self.geoidal_separation
    }
}
