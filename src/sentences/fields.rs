//! Field-level parsing shared by all decode rules.
//!
//! Required fields fail with `DecodeError::InvalidField`; optional numeric
//! fields that are empty or unparseable become `f64::NAN`.

use chrono::{NaiveDate, NaiveTime};
use std::str::FromStr;

use crate::err::DecodeError;

const LAT_SPLIT: usize = 2;
const ABS_MAX_LAT: f64 = 90.0;
const LONG_SPLIT: usize = 3;
const ABS_MAX_LONG: f64 = 180.0;

/// Borrowed view of a sentence's fields, carrying the code for error reports.
#[derive(Debug, Clone, Copy)]
pub struct Fields<'a> {
    pub code: &'a str,
    values: &'a [String],
}

impl<'a> Fields<'a> {
    pub fn new(code: &'a str, values: &'a [String]) -> Self {
        Fields { code, values }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// The raw text of field `index`, `""` when absent.
    pub fn str(&self, index: usize) -> &'a str {
        self.values.get(index).map(String::as_str).unwrap_or("")
    }

    pub fn string(&self, index: usize) -> String {
        self.str(index).to_owned()
    }

    pub fn slice(&self, from: usize) -> &'a [String] {
        self.values.get(from..).unwrap_or(&[])
    }

    pub fn invalid<R: Into<String>>(&self, index: usize, reason: R) -> DecodeError {
        DecodeError::invalid(self.code, index, reason)
    }

    /// Optional decimal value; NaN when empty or not a number.
    pub fn f64(&self, index: usize) -> f64 {
        f64::from_str(self.str(index).trim()).unwrap_or(f64::NAN)
    }

    /// Decimal value that must be present and parseable.
    pub fn required_f64(&self, index: usize) -> Result<f64, DecodeError> {
        let s = self.str(index);
        f64::from_str(s.trim()).map_err(|_| self.invalid(index, format!("\"{}\" is not a number", s)))
    }

    /// Optional integer; `None` when empty, an error when present but malformed.
    pub fn opt_int<T: FromStr>(&self, index: usize) -> Result<Option<T>, DecodeError> {
        let s = self.str(index).trim();
        if s.is_empty() {
            return Ok(None);
        }
        T::from_str(s)
            .map(Some)
            .map_err(|_| self.invalid(index, format!("\"{}\" is not an integer", s)))
    }

    /// Integer that must be present.
    pub fn required_int<T: FromStr>(&self, index: usize) -> Result<T, DecodeError> {
        self.opt_int(index)?
            .ok_or_else(|| self.invalid(index, "required integer is empty"))
    }

    /// Single character flag, `None` when empty.
    pub fn char(&self, index: usize) -> Option<char> {
        self.str(index).trim().chars().next()
    }

    /// `A` (active/valid) versus anything else.
    pub fn is_active(&self, index: usize) -> bool {
        self.char(index) == Some('A')
    }

    /// Latitude from a `ddmm.mmmm` field and its `N`/`S` hemisphere field.
    pub fn latitude(&self, index: usize) -> f64 {
        parse_coord(self.str(index), self.str(index + 1), LAT_SPLIT, ABS_MAX_LAT)
    }

    /// Longitude from a `dddmm.mmmm` field and its `E`/`W` hemisphere field.
    pub fn longitude(&self, index: usize) -> f64 {
        parse_coord(self.str(index), self.str(index + 1), LONG_SPLIT, ABS_MAX_LONG)
    }

    /// Time of day in `hhmmss[.sss]`; `None` when empty or malformed.
    pub fn time(&self, index: usize) -> Option<NaiveTime> {
        parse_time(self.str(index))
    }

    /// Date in `ddmmyy`; two-digit years are placed in 2000..=2099 unless
    /// they are 80 or above.
    pub fn date(&self, index: usize) -> Option<NaiveDate> {
        parse_date(self.str(index))
    }

    /// Magnitude with a direction letter; `negative` names the letter that
    /// flips the sign (e.g. `W` for magnetic variation).
    pub fn signed(&self, index: usize, negative: char) -> f64 {
        let value = self.f64(index);
        if self.char(index + 1) == Some(negative) {
            -value
        } else {
            value
        }
    }
}

/// Combine the degree prefix with the decimal-minute remainder.
/// `deg_split` is the number of digits that make up the degrees.
/// `abs_max` is the maximum value in degrees, e.g. 180 for longitude.
pub fn parse_coord(coord: &str, dir: &str, deg_split: usize, abs_max: f64) -> f64 {
    let coord = coord.trim();
    // This check is needed to ensure we don't panic
    if coord.len() < deg_split || !coord.is_char_boundary(deg_split) {
        return f64::NAN;
    }

    let (deg, dec_min) = coord.split_at(deg_split);
    let degrees = match u16::from_str(deg) {
        Ok(d) => f64::from(d),
        Err(_) => return f64::NAN,
    };
    let minutes = if dec_min.is_empty() {
        0.0
    } else {
        match f64::from_str(dec_min) {
            Ok(m) if m >= 0.0 => m,
            _ => return f64::NAN,
        }
    };
    let dec_deg = degrees + minutes / 60.0;
    if dec_deg > abs_max {
        return f64::NAN;
    }
    match dir.trim() {
        "S" | "W" => -dec_deg,
        _ => dec_deg,
    }
}

pub fn parse_time(utc: &str) -> Option<NaiveTime> {
    let utc = utc.trim();
    if utc.is_empty() {
        return None;
    }
    NaiveTime::parse_from_str(utc, "%H%M%S%.f").ok()
}

pub fn parse_date(ddmmyy: &str) -> Option<NaiveDate> {
    let s = ddmmyy.trim();
    if s.len() != 6 || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let day = u32::from_str(&s[0..2]).ok()?;
    let month = u32::from_str(&s[2..4]).ok()?;
    let yy = i32::from_str(&s[4..6]).ok()?;
    let year = if yy >= 80 { 1900 + yy } else { 2000 + yy };
    NaiveDate::from_ymd_opt(year, month, day)
}
