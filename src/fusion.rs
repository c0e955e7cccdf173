//! Fuses the decoded sentence stream of one receiver into a single fix.
//!
//! A [`GnssMonitor`] is fed every [`DecodedMessage`] of a device, in order,
//! through [`GnssMonitor::on_message`]. It owns the [`FixState`] and is the
//! only thing that mutates it; concurrent producers must funnel their
//! messages through one consumer.
//!
//! Two sticky flags decide which sources count:
//!
//! * once a combined (`GN`) talker is seen, sentences from single
//!   constellation talkers are ignored, since they repeat the same data.
//!   Satellites-in-view reports are exempt, as they only exist per
//!   constellation;
//! * once a GGA or GNS sentence is seen, RMC and GLL no longer move the
//!   position.

use chrono::NaiveTime;
use std::collections::HashMap;
use tracing::{debug, trace};

use crate::registry::{DecodedMessage, MessageData};
use crate::sentences::{
    Dtm, FixQuality, Gga, Gns, Gsa, Gst, Gsv, Rmc, SatelliteVehicle, Vtg,
};
use crate::talker::TalkerId;

const METRES_PER_SECOND_PER_KNOT: f64 = 1852.0 / 3600.0;

/// Fix transitions reported by [`GnssMonitor::on_message`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FixEvent {
    /// A new fix was accepted. Raised for every accepted fix, even when the
    /// coordinates did not change.
    Acquired { latitude: f64, longitude: f64 },
    /// The fix went from valid to invalid.
    Lost,
}

enum Pending {
    NewFix { latitude: f64, longitude: f64 },
    LostFix,
}

/// The fused navigation state of one receiver. Unknown values are NaN.
#[derive(Debug, Clone)]
pub struct FixState {
    is_valid: bool,
    latitude: f64,
    longitude: f64,
    altitude: f64,
    geoid_height: f64,
    horizontal_error: f64,
    vertical_error: f64,
    fix_time: Option<NaiveTime>,

    uses_combined_talker_only: bool,
    has_position_fix_sentence: bool,

    last_seen_by_code: HashMap<String, DecodedMessage>,
    gga: Option<Gga>,
    gns: Option<Gns>,
    rmc: Option<Rmc>,
    vtg: Option<Vtg>,
    gsa: Option<Gsa>,
    gst: Option<Gst>,
    dtm: Option<Dtm>,
    map_datum: Option<String>,
    /// Pages of a satellites-in-view report still being collected, per code.
    gsv_pages: HashMap<String, Vec<Gsv>>,
    /// The last complete satellites-in-view report, per code.
    satellites_by_code: HashMap<String, Vec<SatelliteVehicle>>,
}

impl Default for FixState {
    fn default() -> Self {
        FixState {
            is_valid: false,
            latitude: f64::NAN,
            longitude: f64::NAN,
            altitude: f64::NAN,
            geoid_height: f64::NAN,
            horizontal_error: f64::NAN,
            vertical_error: f64::NAN,
            fix_time: None,
            uses_combined_talker_only: false,
            has_position_fix_sentence: false,
            last_seen_by_code: HashMap::new(),
            gga: None,
            gns: None,
            rmc: None,
            vtg: None,
            gsa: None,
            gst: None,
            dtm: None,
            map_datum: None,
            gsv_pages: HashMap::new(),
            satellites_by_code: HashMap::new(),
        }
    }
}

impl FixState {
    pub fn is_valid(&self) -> bool {
        self.is_valid
    }

    /// Decimal degrees, negative south of the equator.
    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    /// Decimal degrees, negative west of Greenwich.
    pub fn longitude(&self) -> f64 {
        self.longitude
    }

    /// Height above the ellipsoid in metres.
    pub fn altitude(&self) -> f64 {
        self.altitude
    }

    /// Geoidal separation in metres.
    pub fn geoid_height(&self) -> f64 {
        self.geoid_height
    }

    /// Estimated horizontal position error in metres.
    pub fn horizontal_error(&self) -> f64 {
        self.horizontal_error
    }

    /// Estimated vertical position error in metres.
    pub fn vertical_error(&self) -> f64 {
        self.vertical_error
    }

    pub fn fix_time(&self) -> Option<NaiveTime> {
        self.fix_time
    }

    /// Speed over ground in metres per second, from RMC when available and
    /// VTG otherwise.
    pub fn speed(&self) -> f64 {
        let knots = self
            .rmc
            .as_ref()
            .map(|r| r.speed_knots)
            .filter(|s| !s.is_nan())
            .or_else(|| self.vtg.as_ref().map(|v| v.speed_knots))
            .unwrap_or(f64::NAN);
        knots * METRES_PER_SECOND_PER_KNOT
    }

    /// Course over ground in degrees true, from RMC when available and VTG
    /// otherwise.
    pub fn course(&self) -> f64 {
        self.rmc
            .as_ref()
            .map(|r| r.course)
            .filter(|c| !c.is_nan())
            .or_else(|| self.vtg.as_ref().map(|v| v.course_true))
            .unwrap_or(f64::NAN)
    }

    /// HDOP of the position fix sentence, falling back to GSA.
    pub fn hdop(&self) -> f64 {
        self.gga
            .as_ref()
            .map(|g| g.hdop)
            .filter(|h| !h.is_nan())
            .or_else(|| self.gns.as_ref().map(|g| g.hdop).filter(|h| !h.is_nan()))
            .or_else(|| self.gsa.as_ref().map(|g| g.hdop))
            .unwrap_or(f64::NAN)
    }

    pub fn pdop(&self) -> f64 {
        self.gsa.as_ref().map_or(f64::NAN, |g| g.pdop)
    }

    pub fn vdop(&self) -> f64 {
        self.gsa.as_ref().map_or(f64::NAN, |g| g.vdop)
    }

    /// Quality of the last position fix sentence; GGA wins over GNS.
    pub fn fix_quality(&self) -> Option<FixQuality> {
        self.gga
            .as_ref()
            .map(|g| g.quality)
            .or_else(|| self.gns.as_ref().map(Gns::fix_quality))
    }

    /// NMEA code of the datum positions are reported in, from DTM.
    pub fn datum(&self) -> Option<&str> {
        self.dtm.as_ref().map(|d| d.local_datum.as_str())
    }

    /// Readable datum name, from DTM or the Garmin map datum sentence.
    pub fn datum_name(&self) -> Option<&str> {
        self.dtm
            .as_ref()
            .and_then(Dtm::local_datum_name)
            .or(self.map_datum.as_deref())
    }

    /// Satellites of the latest complete satellites-in-view report of every
    /// talker.
    pub fn satellites(&self) -> Vec<SatelliteVehicle> {
        let mut codes: Vec<&String> = self.satellites_by_code.keys().collect();
        codes.sort();
        codes
            .into_iter()
            .flat_map(|code| self.satellites_by_code[code].iter().copied())
            .collect()
    }

    pub fn satellite_count(&self) -> usize {
        self.satellites_by_code.values().map(Vec::len).sum()
    }

    /// The latest message received with `code`, whether or not it was used.
    pub fn last_seen(&self, code: &str) -> Option<&DecodedMessage> {
        self.last_seen_by_code.get(code)
    }

    pub fn messages(&self) -> impl Iterator<Item = &DecodedMessage> {
        self.last_seen_by_code.values()
    }

    pub fn uses_combined_talker_only(&self) -> bool {
        self.uses_combined_talker_only
    }

    pub fn has_position_fix_sentence(&self) -> bool {
        self.has_position_fix_sentence
    }

    fn record_satellites(&mut self, code: &str, gsv: &Gsv) {
        if gsv.message_number == 1 {
            self.gsv_pages.insert(code.to_owned(), vec![gsv.clone()]);
        } else {
            let in_sequence = self
                .gsv_pages
                .get(code)
                .and_then(|pages| pages.last())
                .map_or(false, |last| {
                    last.message_number + 1 == gsv.message_number
                        && last.total_messages == gsv.total_messages
                });
            if !in_sequence {
                trace!(code, page = gsv.message_number, "dropping out of sequence GSV page");
                self.gsv_pages.remove(code);
                return;
            }
            if let Some(pages) = self.gsv_pages.get_mut(code) {
                pages.push(gsv.clone());
            }
        }

        if gsv.is_last_page() {
            if let Some(pages) = self.gsv_pages.remove(code) {
                let satellites = pages.into_iter().flat_map(|p| p.satellites).collect();
                self.satellites_by_code.insert(code.to_owned(), satellites);
            }
        }
    }

    fn resolve(&mut self, pending: Option<Pending>) -> Option<FixEvent> {
        match pending? {
            Pending::LostFix => {
                if !self.is_valid {
                    return None;
                }
                self.is_valid = false;
                debug!("fix lost");
                Some(FixEvent::Lost)
            }
            Pending::NewFix {
                latitude,
                longitude,
            } => {
                self.latitude = latitude;
                self.longitude = longitude;
                self.is_valid = true;
                debug!(latitude, longitude, "fix acquired");
                Some(FixEvent::Acquired {
                    latitude,
                    longitude,
                })
            }
        }
    }
}

/// Maintains the [`FixState`] of one receiver.
#[derive(Debug, Clone, Default)]
pub struct GnssMonitor {
    state: FixState,
}

impl GnssMonitor {
    pub fn new() -> Self {
        GnssMonitor::default()
    }

    pub fn state(&self) -> &FixState {
        &self.state
    }

    /// Fold one message into the state. Returns the fix transition it
    /// caused, if any.
    pub fn on_message(&mut self, msg: &DecodedMessage) -> Option<FixEvent> {
        let s = &mut self.state;
        s.last_seen_by_code
            .insert(msg.code().to_owned(), msg.clone());

        // Satellites in view are reported per constellation even by
        // receivers that use the combined talker for everything else.
        if let MessageData::Gsv(gsv) = msg.data() {
            if msg.talker() == TalkerId::Combined {
                s.uses_combined_talker_only = true;
            }
            s.record_satellites(msg.code(), gsv);
            return None;
        }

        match msg.talker() {
            TalkerId::Combined => s.uses_combined_talker_only = true,
            talker if s.uses_combined_talker_only && talker.is_constellation() => {
                trace!(code = msg.code(), "ignoring single constellation sentence");
                return None;
            }
            _ => {}
        }

        let mut pending = None;
        match msg.data() {
            MessageData::Gst(gst) => {
                s.horizontal_error = gst.horizontal_error();
                s.vertical_error = gst.sigma_height_error;
                s.gst = Some(gst.clone());
            }
            MessageData::Pgrme(rme) => {
                s.horizontal_error = rme.horizontal_error;
                s.vertical_error = rme.vertical_error;
            }
            MessageData::Pgrmm(rmm) => s.map_datum = Some(rmm.datum.clone()),
            MessageData::Vtg(vtg) => s.vtg = Some(vtg.clone()),
            MessageData::Dtm(dtm) => {
                let changed = s.dtm.as_ref().map_or(true, |prev| prev.differs_from(dtm));
                if changed {
                    debug!(datum = %dtm.local_datum, "datum changed, discarding position");
                    s.latitude = f64::NAN;
                    s.longitude = f64::NAN;
                    s.is_valid = false;
                }
                s.dtm = Some(dtm.clone());
            }
            MessageData::Rmc(rmc) => {
                s.rmc = Some(rmc.clone());
                if !s.has_position_fix_sentence {
                    pending = Some(if rmc.active {
                        s.fix_time = rmc.fix_time;
                        Pending::NewFix {
                            latitude: rmc.latitude,
                            longitude: rmc.longitude,
                        }
                    } else {
                        Pending::LostFix
                    });
                }
            }
            MessageData::Gll(gll) => {
                if !s.has_position_fix_sentence {
                    pending = Some(if gll.active {
                        s.fix_time = gll.fix_time;
                        Pending::NewFix {
                            latitude: gll.latitude,
                            longitude: gll.longitude,
                        }
                    } else {
                        Pending::LostFix
                    });
                }
            }
            MessageData::Gga(gga) => {
                s.has_position_fix_sentence = true;
                s.latitude = gga.latitude;
                s.longitude = gga.longitude;
                s.geoid_height = gga.geoidal_separation;
                s.altitude = gga.ellipsoidal_height();
                s.fix_time = gga.fix_time;
                pending = Some(position_fix(gga.quality, gga.latitude, gga.longitude));
                s.gga = Some(gga.clone());
            }
            MessageData::Gns(gns) => {
                s.has_position_fix_sentence = true;
                s.latitude = gns.latitude;
                s.longitude = gns.longitude;
                s.geoid_height = gns.geoidal_separation;
                s.altitude = gns.ellipsoidal_height();
                s.fix_time = gns.fix_time;
                pending = Some(position_fix(gns.fix_quality(), gns.latitude, gns.longitude));
                s.gns = Some(gns.clone());
            }
            MessageData::Gsa(gsa) => s.gsa = Some(gsa.clone()),
            _ => {}
        }

        s.resolve(pending)
    }
}

fn position_fix(quality: FixQuality, latitude: f64, longitude: f64) -> Pending {
    if quality.has_fix() {
        Pending::NewFix {
            latitude,
            longitude,
        }
    } else {
        Pending::LostFix
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::parse;

    fn feed(monitor: &mut GnssMonitor, line: &str) -> Option<FixEvent> {
        let msg = parse(line).unwrap_or_else(|e| panic!("{}: {}", line, e));
        monitor.on_message(&msg)
    }

    const GGA: &str = "$GPGGA,123519,4807.038,N,01131.000,E,1,08,0.9,545.4,M,46.9,M,,";
    const GGA_INVALID: &str = "$GPGGA,123520,,,,,0,00,,,M,,M,,";
    const RMC: &str = "$GPRMC,123519,A,4807.038,N,01131.000,E,022.4,084.4,230394,003.1,W";

    #[test]
    fn starts_unknown() {
        let monitor = GnssMonitor::new();
        let s = monitor.state();
        assert!(!s.is_valid());
        assert!(s.latitude().is_nan());
        assert!(s.speed().is_nan());
        assert!(s.hdop().is_nan());
        assert_eq!(s.fix_quality(), None);
        assert_eq!(s.satellite_count(), 0);
    }

    #[test]
    fn gga_acquires_fix() {
        let mut monitor = GnssMonitor::new();
        let event = feed(&mut monitor, GGA);
        assert_matches!(event, Some(FixEvent::Acquired { .. }));
        let s = monitor.state();
        assert!(s.is_valid());
        assert!((s.latitude() - 48.1173).abs() < 1e-4);
        assert!((s.longitude() - 11.5167).abs() < 1e-4);
        assert!((s.altitude() - 592.3).abs() < 1e-9);
        assert_eq!(s.geoid_height(), 46.9);
        assert_eq!(s.fix_quality(), Some(FixQuality::GpsFix));
        assert_eq!(s.hdop(), 0.9);
        assert_eq!(s.fix_time(), NaiveTime::from_hms_opt(12, 35, 19));
        assert!(s.has_position_fix_sentence());
    }

    #[test]
    fn every_new_fix_notifies() {
        let mut monitor = GnssMonitor::new();
        assert!(feed(&mut monitor, GGA).is_some());
        assert!(feed(&mut monitor, GGA).is_some());
    }

    #[test]
    fn lost_fix_fires_once() {
        let mut monitor = GnssMonitor::new();
        feed(&mut monitor, GGA);
        assert_eq!(feed(&mut monitor, GGA_INVALID), Some(FixEvent::Lost));
        assert!(!monitor.state().is_valid());
        assert_eq!(feed(&mut monitor, GGA_INVALID), None);
    }

    #[test]
    fn lost_without_prior_fix_is_silent() {
        let mut monitor = GnssMonitor::new();
        assert_eq!(feed(&mut monitor, GGA_INVALID), None);
    }

    #[test]
    fn estimated_quality_counts_as_lost() {
        let mut monitor = GnssMonitor::new();
        feed(&mut monitor, GGA);
        let event = feed(
            &mut monitor,
            "$GPGGA,123521,4807.038,N,01131.000,E,6,04,2.0,545.4,M,46.9,M,,",
        );
        assert_eq!(event, Some(FixEvent::Lost));
    }

    #[test]
    fn rmc_drives_fix_until_gga_appears() {
        let mut monitor = GnssMonitor::new();
        assert_matches!(feed(&mut monitor, RMC), Some(FixEvent::Acquired { .. }));
        assert_eq!(
            feed(&mut monitor, "$GPRMC,123520,V,,,,,,,230394,,"),
            Some(FixEvent::Lost)
        );

        feed(&mut monitor, GGA);
        // A void RMC no longer affects the fix once GGA is established.
        assert_eq!(feed(&mut monitor, "$GPRMC,123521,V,,,,,,,230394,,"), None);
        assert!(monitor.state().is_valid());
        let moved = "$GPRMC,123522,A,5000.000,N,01000.000,E,1.0,1.0,230394,,";
        assert_eq!(feed(&mut monitor, moved), None);
        assert!((monitor.state().latitude() - 48.1173).abs() < 1e-4);
    }

    #[test]
    fn speed_prefers_rmc_over_vtg() {
        let mut monitor = GnssMonitor::new();
        feed(&mut monitor, "$GPVTG,054.7,T,034.4,M,005.5,N,010.2,K,A");
        assert!((monitor.state().speed() - 5.5 * METRES_PER_SECOND_PER_KNOT).abs() < 1e-9);
        assert_eq!(monitor.state().course(), 54.7);

        feed(&mut monitor, RMC);
        assert!((monitor.state().speed() - 22.4 * METRES_PER_SECOND_PER_KNOT).abs() < 1e-9);
        assert_eq!(monitor.state().course(), 84.4);
    }

    #[test]
    fn errors_from_gst_and_pgrme() {
        let mut monitor = GnssMonitor::new();
        feed(
            &mut monitor,
            "$GPGST,172814.0,0.006,0.023,0.020,273.6,0.023,0.020,0.031",
        );
        assert_eq!(monitor.state().horizontal_error(), 0.03);
        assert_eq!(monitor.state().vertical_error(), 0.031);

        feed(&mut monitor, "$PGRME,15.0,M,45.0,M,25.0,M");
        assert_eq!(monitor.state().horizontal_error(), 15.0);
        assert_eq!(monitor.state().vertical_error(), 45.0);
    }

    #[test]
    fn datum_change_invalidates_position() {
        let mut monitor = GnssMonitor::new();
        feed(&mut monitor, "$GPDTM,W84,,0.0,N,0.0,E,0.0,W84");
        feed(&mut monitor, GGA);
        assert!(monitor.state().is_valid());

        feed(&mut monitor, "$GPDTM,W84,,0.0,N,0.0,E,0.0,W84");
        assert!(monitor.state().is_valid());
        assert_eq!(monitor.state().datum(), Some("W84"));
        assert_eq!(monitor.state().datum_name(), Some("WGS 84"));

        assert_eq!(feed(&mut monitor, "$GPDTM,W72,,0.0,N,0.0,E,0.0,W84"), None);
        assert!(!monitor.state().is_valid());
        assert!(monitor.state().latitude().is_nan());
        assert!(monitor.state().longitude().is_nan());
    }

    #[test]
    fn dop_falls_back_to_gsa() {
        let mut monitor = GnssMonitor::new();
        feed(&mut monitor, "$GPGSA,A,3,04,05,,09,12,,,24,,,,,2.5,1.3,2.1");
        assert_eq!(monitor.state().hdop(), 1.3);
        assert_eq!(monitor.state().pdop(), 2.5);
        assert_eq!(monitor.state().vdop(), 2.1);

        feed(&mut monitor, GGA);
        assert_eq!(monitor.state().hdop(), 0.9);

        feed(&mut monitor, "$GPGGA,123520,4807.038,N,01131.000,E,1,08,,545.4,M,46.9,M,,");
        assert_eq!(monitor.state().hdop(), 1.3);
    }

    #[test]
    fn combined_talker_mutes_single_constellation() {
        let mut monitor = GnssMonitor::new();
        feed(&mut monitor, GGA);
        let gn = "$GNGGA,123519,5000.000,N,01000.000,E,2,12,0.7,100.0,M,40.0,M,,";
        assert_matches!(feed(&mut monitor, gn), Some(FixEvent::Acquired { .. }));
        assert!(monitor.state().uses_combined_talker_only());

        assert_eq!(feed(&mut monitor, GGA_INVALID), None);
        let s = monitor.state();
        assert!(s.is_valid());
        assert_eq!(s.latitude(), 50.0);
        assert_eq!(s.fix_quality(), Some(FixQuality::DgpsFix));
        // Recorded, but not used.
        assert!(s.last_seen("GPGGA").is_some());
    }

    #[test]
    fn proprietary_sentences_survive_combined_talker() {
        let mut monitor = GnssMonitor::new();
        feed(&mut monitor, "$GNGSA,A,3,04,05,,09,12,,,24,,,,,2.5,1.3,2.1");
        feed(&mut monitor, "$PGRME,15.0,M,45.0,M,25.0,M");
        assert_eq!(monitor.state().horizontal_error(), 15.0);
    }

    #[test]
    fn satellites_publish_on_last_page() {
        let mut monitor = GnssMonitor::new();
        feed(&mut monitor, "$GPGSV,2,1,05,01,40,083,46,02,17,308,41,12,07,344,39,14,22,228,45");
        assert_eq!(monitor.state().satellite_count(), 0);
        feed(&mut monitor, "$GPGSV,2,2,05,32,10,010,30");
        assert_eq!(monitor.state().satellite_count(), 5);

        feed(&mut monitor, "$GLGSV,1,1,01,70,40,083,46");
        assert_eq!(monitor.state().satellite_count(), 6);

        // A new cycle replaces the previous report of the same code.
        feed(&mut monitor, "$GPGSV,1,1,01,05,40,083,46");
        let sats = monitor.state().satellites();
        assert_eq!(sats.len(), 2);
        assert!(sats.iter().any(|s| s.prn == 70));
        assert!(sats.iter().any(|s| s.prn == 5));
    }

    #[test]
    fn combined_talker_keeps_constellation_satellites() {
        let mut monitor = GnssMonitor::new();
        feed(&mut monitor, "$GNGGA,123521,5000.000,N,01000.000,E,2,12,0.8,100.0,M,47.0,M,,");
        feed(&mut monitor, "$GPGSV,1,1,02,01,40,083,46,02,17,308,41");
        feed(&mut monitor, "$GLGSV,1,1,01,70,40,083,46");
        assert!(monitor.state().uses_combined_talker_only());
        assert_eq!(monitor.state().satellite_count(), 3);
        assert!(monitor.state().satellites().iter().any(|s| s.prn == 70));
    }

    #[test]
    fn out_of_sequence_pages_are_dropped() {
        let mut monitor = GnssMonitor::new();
        feed(&mut monitor, "$GPGSV,3,1,09,01,40,083,46,02,17,308,41,12,07,344,39,14,22,228,45");
        feed(&mut monitor, "$GPGSV,3,3,09,32,10,010,30");
        assert_eq!(monitor.state().satellite_count(), 0);
    }

    #[test]
    fn gns_is_a_position_fix_sentence() {
        let mut monitor = GnssMonitor::new();
        let gns = "$GNGNS,014035.00,4332.69262,S,17235.48549,E,RR,13,0.9,25.63,11.24,,";
        assert_matches!(feed(&mut monitor, gns), Some(FixEvent::Acquired { .. }));
        assert!(monitor.state().has_position_fix_sentence());
        assert_eq!(monitor.state().fix_quality(), Some(FixQuality::RealTimeKinematic));
        assert!((monitor.state().altitude() - 36.87).abs() < 1e-9);
    }
}
