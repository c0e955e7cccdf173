use std::fmt;

/// The source system named by the first letters of a sentence code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TalkerId {
    Gps,
    Glonass,
    Galileo,
    BeiDou,
    Qzss,
    NavIc,
    /// `GN`: a solution combining several constellations.
    Combined,
    /// Vendor specific `P...` sentences, which carry no talker.
    Proprietary,
    Unknown,
}

impl TalkerId {
    pub fn from_code(code: &str) -> Self {
        if code.starts_with('P') {
            return TalkerId::Proprietary;
        }
        match code.get(..2) {
            Some("GP") => TalkerId::Gps,
            Some("GL") => TalkerId::Glonass,
            Some("GA") => TalkerId::Galileo,
            Some("GB") | Some("BD") => TalkerId::BeiDou,
            Some("GQ") | Some("QZ") => TalkerId::Qzss,
            Some("GI") => TalkerId::NavIc,
            Some("GN") => TalkerId::Combined,
            _ => TalkerId::Unknown,
        }
    }

    /// Whether sentences from this talker describe a single constellation
    /// (or a combination of them), as opposed to vendor or unknown sources.
    pub fn is_constellation(self) -> bool {
        !matches!(self, TalkerId::Proprietary | TalkerId::Unknown)
    }
}

impl fmt::Display for TalkerId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            TalkerId::Gps => "GPS",
            TalkerId::Glonass => "GLONASS",
            TalkerId::Galileo => "Galileo",
            TalkerId::BeiDou => "BeiDou",
            TalkerId::Qzss => "QZSS",
            TalkerId::NavIc => "NavIC",
            TalkerId::Combined => "GNSS",
            TalkerId::Proprietary => "Proprietary",
            TalkerId::Unknown => "Unknown",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn talker_from_code() {
        assert_eq!(TalkerId::from_code("GPGGA"), TalkerId::Gps);
        assert_eq!(TalkerId::from_code("GNRMC"), TalkerId::Combined);
        assert_eq!(TalkerId::from_code("GLGSV"), TalkerId::Glonass);
        assert_eq!(TalkerId::from_code("BDGSA"), TalkerId::BeiDou);
        assert_eq!(TalkerId::from_code("PGRME"), TalkerId::Proprietary);
        assert_eq!(TalkerId::from_code("IIHDT"), TalkerId::Unknown);
        assert_eq!(TalkerId::from_code("G"), TalkerId::Unknown);
    }
}
