//! *GGA*: Global Positioning System fix data.

use chrono::NaiveTime;

use super::fields::Fields;
use crate::err::DecodeError;

/// Indicator of the quality of the position fix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FixQuality {
    Invalid,
    GpsFix,
    DgpsFix,
    PpsFix,
    RealTimeKinematic,
    FloatRtk,
    Estimated,
    ManualInput,
    Simulation,
}

impl FixQuality {
    /// Takes the single digit of the quality field (`0..=8`).
    /// An empty field means no fix is available.
    fn from_field(f: &Fields, index: usize) -> Result<Self, DecodeError> {
        match f.str(index).trim() {
            "" | "0" => Ok(FixQuality::Invalid),
            "1" => Ok(FixQuality::GpsFix),
            "2" => Ok(FixQuality::DgpsFix),
            "3" => Ok(FixQuality::PpsFix),
            "4" => Ok(FixQuality::RealTimeKinematic),
            "5" => Ok(FixQuality::FloatRtk),
            "6" => Ok(FixQuality::Estimated),
            "7" => Ok(FixQuality::ManualInput),
            "8" => Ok(FixQuality::Simulation),
            other => Err(f.invalid(index, format!("unknown fix quality \"{}\"", other))),
        }
    }

    /// Whether a receiver reporting this quality holds a usable fix.
    pub fn has_fix(self) -> bool {
        !matches!(self, FixQuality::Invalid | FixQuality::Estimated)
    }
}

/// A decoded GGA sentence.
#[derive(Debug, Clone, PartialEq)]
pub struct Gga {
    /// Universal Time Coordinated (UTC)
    pub fix_time: Option<NaiveTime>,
    /// Latitude in decimal degrees, negative in the southern hemisphere.
    pub latitude: f64,
    /// Longitude in decimal degrees, negative in the western hemisphere.
    pub longitude: f64,
    pub quality: FixQuality,
    /// Number of satellites in use.
    pub satellites: u32,
    /// Horizontal dilution of precision
    pub hdop: f64,
    /// Antenna altitude above/below mean-sea-level (geoid)
    pub altitude: f64,
    pub altitude_units: String,
    /// Geoidal separation, the difference between the WGS-84 earth ellipsoid
    /// and mean-sea-level (geoid), negative when mean-sea-level is below the
    /// ellipsoid
    pub geoidal_separation: f64,
    pub geoidal_separation_units: String,
    /// Age of differential GPS data in seconds, NaN when DGPS is not used
    pub dgps_age: f64,
    /// Differential reference station ID, 0000-1023
    pub dgps_station_id: Option<u16>,
}

impl Gga {
    pub(crate) fn decode(f: Fields) -> Result<Self, DecodeError> {
        require_fields!(f.code, f, 14);

        let dgps_station_id = match f.opt_int::<u16>(13)? {
            Some(id) if id > 1023 => {
                return Err(f.invalid(13, "station id must be between 0 and 1023"))
            }
            id => id,
        };

        Ok(Gga {
            fix_time: f.time(0),
            latitude: f.latitude(1),
            longitude: f.longitude(3),
            quality: FixQuality::from_field(&f, 5)?,
            satellites: f.opt_int(6)?.unwrap_or(0),
            hdop: f.f64(7),
            altitude: f.f64(8),
            altitude_units: f.string(9),
            geoidal_separation: f.f64(10),
            geoidal_separation_units: f.string(11),
            dgps_age: f.f64(12),
            dgps_station_id,
        })
    }

    /// Height above the ellipsoid: altitude plus geoidal separation.
    pub fn ellipsoidal_height(&self) -> f64 {
        self.altitude + self.geoidal_separation
    }
}
