//! Parsing of a caster's source table.
//!
//! Each record is one `;`-separated line whose first field is its type tag.
//! Only caster (`CAS`) and stream (`STR`) records are decoded; other tags
//! (e.g. `NET`, or HTTP header lines) are skipped.

use std::str::FromStr;
use tracing::debug;

use crate::err::SourceTableError;

pub const END_MARKER: &str = "ENDSOURCETABLE";
const CASTER_TAG: &str = "CAS";
const STREAM_TAG: &str = "STR";
const CASTER_MIN_FIELDS: usize = 9;
const STREAM_MIN_FIELDS: usize = 12;

#[derive(Debug, Clone, PartialEq)]
pub struct NtripCaster {
    pub address: String,
    pub port: u16,
    pub identifier: String,
    pub operator: String,
    pub supports_nmea: bool,
    pub country_code: String,
    pub latitude: f64,
    pub longitude: f64,
    pub fallback_address: Option<(String, u16)>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthenticationType {
    None,
    Basic,
    Digest,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NtripStream {
    pub mountpoint: String,
    /// Source identifier, usually the nearest city.
    pub identifier: String,
    pub format: String,
    pub format_details: String,
    /// 0 = no phase, 1 = L1, 2 = L1 and L2.
    pub carrier: u8,
    pub nav_system: String,
    pub network: String,
    pub country_code: String,
    pub latitude: f64,
    pub longitude: f64,
    /// The caster expects the client to send its position as GGA.
    pub supports_nmea: bool,
    /// The stream is generated from a network solution rather than a
    /// single base station.
    pub network_solution: bool,
    pub generator: String,
    pub compression: String,
    pub authentication: AuthenticationType,
    pub fee: bool,
    /// Bits per second.
    pub bitrate: Option<u32>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum NtripSourceEntry {
    Caster(NtripCaster),
    Stream(NtripStream),
}

impl NtripSourceEntry {
    /// Decode one source-table line. Returns `Ok(None)` for records of a
    /// type this client does not decode.
    pub fn parse_line(line: &str) -> Result<Option<Self>, SourceTableError> {
        let fields: Vec<&str> = line.split(';').collect();
        match fields[0] {
            CASTER_TAG => parse_caster(&fields).map(|c| Some(NtripSourceEntry::Caster(c))),
            STREAM_TAG => parse_stream(&fields).map(|s| Some(NtripSourceEntry::Stream(s))),
            _ => Ok(None),
        }
    }
}

/// Decode a whole source-table response. Records that fail to decode are
/// skipped; parsing stops at the `ENDSOURCETABLE` line.
pub fn parse_source_table(text: &str) -> Vec<NtripSourceEntry> {
    let mut entries = Vec::new();
    for line in text.lines() {
        let line = line.trim_end_matches('\r');
        if line.is_empty() {
            continue;
        }
        if line.trim() == END_MARKER {
            break;
        }
        match NtripSourceEntry::parse_line(line) {
            Ok(Some(entry)) => entries.push(entry),
            Ok(None) => {}
            Err(e) => debug!(error = %e, line, "skipping source table record"),
        }
    }
    entries
}

fn require(fields: &[&str], tag: &str, min: usize) -> Result<(), SourceTableError> {
    if fields.len() < min {
        return Err(SourceTableError::TooFewFields {
            tag: tag.to_owned(),
            expected: min,
            actual: fields.len(),
        });
    }
    Ok(())
}

fn number<T: FromStr>(value: &str, field: &'static str) -> Result<T, SourceTableError> {
    T::from_str(value.trim()).map_err(|_| SourceTableError::InvalidNumber {
        field,
        value: value.to_owned(),
    })
}

fn flag(value: &str) -> bool {
    matches!(value.trim(), "1" | "Y")
}

fn parse_caster(fields: &[&str]) -> Result<NtripCaster, SourceTableError> {
    require(fields, CASTER_TAG, CASTER_MIN_FIELDS)?;

    let fallback_address = match (fields.get(9), fields.get(10)) {
        (Some(host), Some(port)) if !host.is_empty() && *host != "0.0.0.0" => {
            match number::<u16>(port, "fallback port") {
                Ok(p) if p != 0 => Some((host.to_string(), p)),
                _ => None,
            }
        }
        _ => None,
    };

    Ok(NtripCaster {
        address: fields[1].to_owned(),
        port: number(fields[2], "port")?,
        identifier: fields[3].to_owned(),
        operator: fields[4].to_owned(),
        supports_nmea: flag(fields[5]),
        country_code: fields[6].to_owned(),
        latitude: number(fields[7], "latitude")?,
        longitude: number(fields[8], "longitude")?,
        fallback_address,
    })
}

fn parse_stream(fields: &[&str]) -> Result<NtripStream, SourceTableError> {
    require(fields, STREAM_TAG, STREAM_MIN_FIELDS)?;

    let field = |i: usize| fields.get(i).copied().unwrap_or("");
    let authentication = match field(15).trim() {
        "B" => AuthenticationType::Basic,
        "D" => AuthenticationType::Digest,
        _ => AuthenticationType::None,
    };

    Ok(NtripStream {
        mountpoint: fields[1].to_owned(),
        identifier: fields[2].to_owned(),
        format: fields[3].to_owned(),
        format_details: fields[4].to_owned(),
        carrier: number(fields[5], "carrier")?,
        nav_system: fields[6].to_owned(),
        network: fields[7].to_owned(),
        country_code: fields[8].to_owned(),
        latitude: number(fields[9], "latitude")?,
        longitude: number(fields[10], "longitude")?,
        supports_nmea: flag(fields[11]),
        network_solution: flag(field(12)),
        generator: field(13).to_owned(),
        compression: field(14).to_owned(),
        authentication,
        fee: flag(field(16)),
        bitrate: number(field(17), "bitrate").ok(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const STREAM: &str = "STR;station1;City;RTCM 3.1;1004(1),1005(5);2;GPS;Net1;USA;40.00;-105.00;0;0;sNTRIP;none;N;N;9600;";
    const CASTER: &str = "CAS;rtk2go.com;2101;RTK2GO;SNIP;0;USA;47.61;-122.33;0.0.0.0;0;http://rtk2go.com";

    #[test]
    fn parses_stream_record() {
        let entry = NtripSourceEntry::parse_line(STREAM).unwrap().unwrap();
        let stream = match entry {
            NtripSourceEntry::Stream(s) => s,
            other => panic!("expected stream, got {:?}", other),
        };
        assert_eq!(stream.mountpoint, "station1");
        assert_eq!(stream.identifier, "City");
        assert_eq!(stream.format, "RTCM 3.1");
        assert_eq!(stream.format_details, "1004(1),1005(5)");
        assert_eq!(stream.carrier, 2);
        assert_eq!(stream.network, "Net1");
        assert_eq!(stream.country_code, "USA");
        assert_eq!(stream.latitude, 40.0);
        assert_eq!(stream.longitude, -105.0);
        assert!(!stream.supports_nmea);
        assert_eq!(stream.authentication, AuthenticationType::None);
        assert_eq!(stream.bitrate, Some(9600));
    }

    #[test]
    fn parses_caster_record() {
        let entry = NtripSourceEntry::parse_line(CASTER).unwrap().unwrap();
        assert_matches!(entry, NtripSourceEntry::Caster(ref c) if c.port == 2101 && c.address == "rtk2go.com");
        if let NtripSourceEntry::Caster(c) = entry {
            assert_eq!(c.fallback_address, None);
            assert_eq!(c.operator, "SNIP");
            assert_eq!(c.latitude, 47.61);
        }
    }

    #[test]
    fn caster_fallback_address() {
        let line = "CAS;a.example;2101;A;Op;1;DEU;52.5;13.4;b.example;2102;";
        match NtripSourceEntry::parse_line(line).unwrap() {
            Some(NtripSourceEntry::Caster(c)) => {
                assert!(c.supports_nmea);
                assert_eq!(c.fallback_address, Some(("b.example".to_string(), 2102)));
            }
            other => panic!("expected caster, got {:?}", other),
        }
    }

    #[test]
    fn short_records_fail() {
        assert_matches!(
            NtripSourceEntry::parse_line("STR;short;City"),
            Err(SourceTableError::TooFewFields { expected: 12, actual: 3, .. })
        );
        assert_matches!(
            NtripSourceEntry::parse_line("CAS;host;port;x;y;0;DEU;1;2"),
            Err(SourceTableError::InvalidNumber { field: "port", .. })
        );
    }

    #[test]
    fn other_tags_are_ignored() {
        assert_eq!(
            NtripSourceEntry::parse_line("NET;EUREF;BKG;B;N;http://a;http://b;x;none").unwrap(),
            None
        );
        assert_eq!(NtripSourceEntry::parse_line("SOURCETABLE 200 OK").unwrap(), None);
    }

    #[test]
    fn table_parsing_is_best_effort() {
        let text = format!(
            "SOURCETABLE 200 OK\r\nContent-Type: text/plain\r\n\r\n{}\r\nSTR;broken\r\n{}\r\nNET;x;y\r\n{}\r\n{}\r\n",
            CASTER, STREAM, END_MARKER, STREAM
        );
        let entries = parse_source_table(&text);
        assert_eq!(entries.len(), 2);
        assert_matches!(entries[0], NtripSourceEntry::Caster(_));
        assert_matches!(entries[1], NtripSourceEntry::Stream(_));
    }
}
