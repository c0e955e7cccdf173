//! Typed NMEA 0183 sentences.
//!
//! Every sentence type has a `decode` rule taking the fields of a framed
//! line. Rules never return partially decoded values: either all required
//! fields parse or the rule fails with `DecodeError::InvalidField`.

pub mod fields;

mod dtm;
mod garmin;
mod gga;
mod gll;
mod gns;
mod gsa;
mod gst;
mod gsv;
mod heading;
mod laser;
mod navigation;
mod rmc;
mod vtg;
mod zda;

pub use self::dtm::Dtm;
pub use self::garmin::{Pgrme, Pgrmm, Pgrmz};
pub use self::gga::{FixQuality, Gga};
pub use self::gll::Gll;
pub use self::gns::Gns;
pub use self::gsa::{FixMode, Gsa, SelectionMode};
pub use self::gst::{Gbs, Gst};
pub use self::gsv::{Gsv, SatelliteSystem, SatelliteVehicle};
pub use self::heading::{Heading, HeadingReference};
pub use self::laser::{LaserRange, TreeMeasurement};
pub use self::navigation::{Bod, Rmb, Rte, RouteType, Vlw};
pub use self::rmc::Rmc;
pub use self::vtg::Vtg;
pub use self::zda::Zda;

use self::fields::Fields;
use crate::err::DecodeError;

/// Positioning system mode indicator carried by RMC, GLL, VTG and GNS.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModeIndicator {
    Autonomous,
    Differential,
    Estimated,
    FloatRtk,
    Manual,
    NotValid,
    Precise,
    RealTimeKinematic,
    Simulator,
}

impl ModeIndicator {
    pub fn from_char(c: char) -> Option<Self> {
        match c {
            'A' => Some(ModeIndicator::Autonomous),
            'D' => Some(ModeIndicator::Differential),
            'E' => Some(ModeIndicator::Estimated),
            'F' => Some(ModeIndicator::FloatRtk),
            'M' => Some(ModeIndicator::Manual),
            'N' => Some(ModeIndicator::NotValid),
            'P' => Some(ModeIndicator::Precise),
            'R' => Some(ModeIndicator::RealTimeKinematic),
            'S' => Some(ModeIndicator::Simulator),
            _ => None,
        }
    }

    /// Optional mode field: `None` when empty or absent.
    pub(crate) fn from_field(f: &Fields, index: usize) -> Result<Option<Self>, DecodeError> {
        match f.char(index) {
            None => Ok(None),
            Some(c) => Self::from_char(c)
                .map(Some)
                .ok_or_else(|| f.invalid(index, format!("unknown mode indicator '{}'", c))),
        }
    }

    pub fn fix_quality(self) -> FixQuality {
        match self {
            ModeIndicator::Autonomous => FixQuality::GpsFix,
            ModeIndicator::Differential => FixQuality::DgpsFix,
            ModeIndicator::Estimated => FixQuality::Estimated,
            ModeIndicator::FloatRtk => FixQuality::FloatRtk,
            ModeIndicator::Manual => FixQuality::ManualInput,
            ModeIndicator::NotValid => FixQuality::Invalid,
            ModeIndicator::Precise => FixQuality::PpsFix,
            ModeIndicator::RealTimeKinematic => FixQuality::RealTimeKinematic,
            ModeIndicator::Simulator => FixQuality::Simulation,
        }
    }
}
