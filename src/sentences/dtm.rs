//! *DTM*: datum reference.

use super::fields::Fields;
use crate::err::DecodeError;

#[derive(Debug, Clone, PartialEq)]
pub struct Dtm {
    /// Datum the reported positions are expressed in (`W84`, `W72`, `S85`,
    /// `P90`, `999` for user defined, or an IHO code).
    pub local_datum: String,
    pub local_datum_subdivision: String,
    /// Offset from the reference datum in minutes, negative when south.
    pub latitude_offset: f64,
    /// Offset from the reference datum in minutes, negative when west.
    pub longitude_offset: f64,
    /// Altitude offset in metres.
    pub altitude_offset: f64,
    pub reference_datum: String,
}

impl Dtm {
    pub(crate) fn decode(f: Fields) -> Result<Self, DecodeError> {
        require_fields!(f.code, f, 8);

        Ok(Dtm {
            local_datum: f.string(0),
            local_datum_subdivision: f.string(1),
            latitude_offset: f.signed(2, 'S'),
            longitude_offset: f.signed(4, 'W'),
            altitude_offset: f.f64(6),
            reference_datum: f.string(7),
        })
    }

    /// Whether `other` names a different geodetic frame.
    pub fn differs_from(&self, other: &Dtm) -> bool {
        self.local_datum != other.local_datum
            || self.local_datum_subdivision != other.local_datum_subdivision
            || self.reference_datum != other.reference_datum
    }

    pub fn local_datum_name(&self) -> Option<&'static str> {
        datum_name(&self.local_datum)
    }
}

/// Human readable name of an NMEA datum code.
pub fn datum_name(code: &str) -> Option<&'static str> {
    match code {
        "W84" => Some("WGS 84"),
        "W72" => Some("WGS 72"),
        "S85" => Some("SGS 85"),
        "P90" => Some("PE 90"),
        "999" => Some("User defined"),
        _ => None,
    }
}
