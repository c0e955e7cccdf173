//! *GSA*: dilution of precision and active satellites.

use arrayvec::ArrayVec;

use super::fields::Fields;
use crate::err::DecodeError;

const MAX_ACTIVE_SATELLITES: usize = 12;
const FIRST_PRN_FIELD: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionMode {
    Manual,
    Automatic,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FixMode {
    NotAvailable,
    Fix2D,
    Fix3D,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Gsa {
    pub selection_mode: SelectionMode,
    pub fix_mode: FixMode,
    /// PRNs of the satellites used in the solution.
    pub satellites: ArrayVec<u16, MAX_ACTIVE_SATELLITES>,
    pub pdop: f64,
    pub hdop: f64,
    pub vdop: f64,
    /// NMEA 4.1 GNSS system id.
    pub system_id: Option<u8>,
}

impl Gsa {
    pub(crate) fn decode(f: Fields) -> Result<Self, DecodeError> {
        require_fields!(f.code, f, 17);

        let selection_mode = match f.char(0) {
            Some('M') => SelectionMode::Manual,
            Some('A') => SelectionMode::Automatic,
            _ => return Err(f.invalid(0, format!("unknown selection mode \"{}\"", f.str(0)))),
        };
        let fix_mode = match f.str(1).trim() {
            "" | "1" => FixMode::NotAvailable,
            "2" => FixMode::Fix2D,
            "3" => FixMode::Fix3D,
            other => return Err(f.invalid(1, format!("unknown fix mode \"{}\"", other))),
        };

        let mut satellites = ArrayVec::new();
        for index in FIRST_PRN_FIELD..FIRST_PRN_FIELD + MAX_ACTIVE_SATELLITES {
            if let Some(prn) = f.opt_int::<u16>(index)? {
                satellites.push(prn);
            }
        }

        Ok(Gsa {
            selection_mode,
            fix_mode,
            satellites,
            pdop: f.f64(14),
            hdop: f.f64(15),
            vdop: f.f64(16),
            system_id: f.opt_int(17)?,
        })
    }
}
