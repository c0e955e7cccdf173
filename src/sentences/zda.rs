//! *ZDA*: UTC date, time and local time zone.

use chrono::{FixedOffset, NaiveDate, NaiveDateTime};

use super::fields::Fields;
use crate::err::DecodeError;

#[derive(Debug, Clone, PartialEq)]
pub struct Zda {
    pub fix_time: NaiveDateTime,
    /// Local zone offset from UTC, when the receiver reports one.
    pub local_zone: Option<FixedOffset>,
}

impl Zda {
    pub(crate) fn decode(f: Fields) -> Result<Self, DecodeError> {
        require_fields!(f.code, f, 4);

        let time = f
            .time(0)
            .ok_or_else(|| f.invalid(0, format!("\"{}\" is not a time of day", f.str(0))))?;
        let day: u32 = f.required_int(1)?;
        let month: u32 = f.required_int(2)?;
        let year: i32 = f.required_int(3)?;
        let date = NaiveDate::from_ymd_opt(year, month, day)
            .ok_or_else(|| f.invalid(1, format!("{}-{}-{} is not a date", year, month, day)))?;

        let local_zone = match (f.opt_int::<i32>(4)?, f.opt_int::<i32>(5)?) {
            (None, None) => None,
            (hours, minutes) => {
                let hours = hours.unwrap_or(0);
                let minutes = minutes.unwrap_or(0);
                if !(-13..=13).contains(&hours) {
                    return Err(f.invalid(4, format!("zone hours {} out of range", hours)));
                }
                if !(0..=59).contains(&minutes) {
                    return Err(f.invalid(5, format!("zone minutes {} out of range", minutes)));
                }
                // The minutes carry the sign of the hours field.
                let sign = if f.str(4).trim_start().starts_with('-') { -1 } else { 1 };
                let seconds = hours * 3600 + sign * minutes * 60;
                Some(
                    FixedOffset::east_opt(seconds)
                        .ok_or_else(|| f.invalid(4, "local zone out of range"))?,
                )
            }
        };

        Ok(Zda {
            fix_time: date.and_time(time),
            local_zone,
        })
    }
}
