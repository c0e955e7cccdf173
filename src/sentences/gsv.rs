//! *GSV*: satellites in view, paged over several sentences.

use std::fmt;

use super::fields::Fields;
use crate::err::DecodeError;
use crate::talker::TalkerId;

const HEADER_FIELDS: usize = 3;
const FIELDS_PER_SATELLITE: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SatelliteSystem {
    Gps,
    Sbas,
    Glonass,
    Galileo,
    BeiDou,
    Qzss,
    NavIc,
    Unknown,
}

impl SatelliteSystem {
    /// The constellation of a satellite, from the talker of the reporting
    /// sentence and, for GPS/combined talkers, the NMEA PRN range.
    pub fn identify(talker: TalkerId, prn: u16) -> Self {
        match talker {
            TalkerId::Glonass => SatelliteSystem::Glonass,
            TalkerId::Galileo => SatelliteSystem::Galileo,
            TalkerId::BeiDou => SatelliteSystem::BeiDou,
            TalkerId::Qzss => SatelliteSystem::Qzss,
            TalkerId::NavIc => SatelliteSystem::NavIc,
            TalkerId::Gps | TalkerId::Combined => match prn {
                1..=32 => SatelliteSystem::Gps,
                33..=64 | 120..=158 => SatelliteSystem::Sbas,
                65..=96 => SatelliteSystem::Glonass,
                193..=200 => SatelliteSystem::Qzss,
                201..=237 | 401..=437 => SatelliteSystem::BeiDou,
                301..=336 => SatelliteSystem::Galileo,
                _ => SatelliteSystem::Unknown,
            },
            TalkerId::Proprietary | TalkerId::Unknown => SatelliteSystem::Unknown,
        }
    }
}

impl fmt::Display for SatelliteSystem {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            SatelliteSystem::Gps => "GPS",
            SatelliteSystem::Sbas => "SBAS",
            SatelliteSystem::Glonass => "GLONASS",
            SatelliteSystem::Galileo => "Galileo",
            SatelliteSystem::BeiDou => "BeiDou",
            SatelliteSystem::Qzss => "QZSS",
            SatelliteSystem::NavIc => "NavIC",
            SatelliteSystem::Unknown => "Unknown",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SatelliteVehicle {
    pub prn: u16,
    pub system: SatelliteSystem,
    /// Degrees above the horizon.
    pub elevation: f64,
    /// Degrees from true north.
    pub azimuth: f64,
    /// Signal to noise ratio in dB-Hz; NaN when not tracking.
    pub snr: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Gsv {
    pub total_messages: u8,
    pub message_number: u8,
    pub satellites_in_view: u16,
    pub satellites: Vec<SatelliteVehicle>,
    /// NMEA 4.1 signal id, present when the field count leaves one extra.
    pub signal_id: Option<String>,
}

impl Gsv {
    pub(crate) fn decode(f: Fields) -> Result<Self, DecodeError> {
        require_fields!(f.code, f, HEADER_FIELDS);

        let total_messages: u8 = f.required_int(0)?;
        let message_number: u8 = f.required_int(1)?;
        if message_number == 0 || message_number > total_messages {
            return Err(f.invalid(
                1,
                format!("message {} of {} is out of range", message_number, total_messages),
            ));
        }
        let talker = TalkerId::from_code(f.code);

        let body = f.len() - HEADER_FIELDS;
        let groups = body / FIELDS_PER_SATELLITE;
        let signal_id = if body % FIELDS_PER_SATELLITE == 1 {
            Some(f.string(f.len() - 1)).filter(|s| !s.is_empty())
        } else {
            None
        };

        let mut satellites = Vec::with_capacity(groups);
        for group in 0..groups {
            let base = HEADER_FIELDS + group * FIELDS_PER_SATELLITE;
            // Receivers pad the last page with empty groups.
            let prn = match f.opt_int::<u16>(base)? {
                Some(prn) => prn,
                None => continue,
            };
            satellites.push(SatelliteVehicle {
                prn,
                system: SatelliteSystem::identify(talker, prn),
                elevation: f.f64(base + 1),
                azimuth: f.f64(base + 2),
                snr: f.f64(base + 3),
            });
        }

        Ok(Gsv {
            total_messages,
            message_number,
            satellites_in_view: f.opt_int(2)?.unwrap_or(0),
            satellites,
            signal_id,
        })
    }

    pub fn is_last_page(&self) -> bool {
        self.message_number == self.total_messages
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode(code: &str, line: &str) -> Result<Gsv, DecodeError> {
        let fields: Vec<String> = line.split(',').map(str::to_owned).collect();
        Gsv::decode(Fields::new(code, &fields))
    }

    #[test]
    fn decodes_page() {
        let gsv = decode(
            "GPGSV",
            "3,1,11,03,03,111,00,04,15,270,00,06,01,010,00,13,06,292,",
        )
        .unwrap();
        assert_eq!(gsv.total_messages, 3);
        assert_eq!(gsv.message_number, 1);
        assert_eq!(gsv.satellites_in_view, 11);
        assert_eq!(gsv.satellites.len(), 4);
        assert_eq!(gsv.satellites[0].prn, 3);
        assert_eq!(gsv.satellites[0].system, SatelliteSystem::Gps);
        assert_eq!(gsv.satellites[1].azimuth, 270.0);
        assert!(gsv.satellites[3].snr.is_nan());
        assert_eq!(gsv.signal_id, None);
        assert!(!gsv.is_last_page());
    }

    #[test]
    fn signal_id_and_short_last_page() {
        let gsv = decode("GLGSV", "2,2,05,70,40,083,46,1").unwrap();
        assert_eq!(gsv.satellites.len(), 1);
        assert_eq!(gsv.satellites[0].system, SatelliteSystem::Glonass);
        assert_eq!(gsv.signal_id.as_deref(), Some("1"));
        assert!(gsv.is_last_page());
    }

    #[test]
    fn combined_talker_uses_prn_ranges() {
        assert_eq!(
            SatelliteSystem::identify(TalkerId::Combined, 72),
            SatelliteSystem::Glonass
        );
        assert_eq!(
            SatelliteSystem::identify(TalkerId::Gps, 135),
            SatelliteSystem::Sbas
        );
    }

    #[test]
    fn rejects_page_out_of_range() {
        let err = decode("GPGSV", "2,3,08").unwrap_err();
        assert_matches!(err, DecodeError::InvalidField { index: 1, .. });
    }
}
