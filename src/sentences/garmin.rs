//! Garmin proprietary sentences.

use super::fields::Fields;
use crate::err::DecodeError;

const METRES_PER_FOOT: f64 = 0.3048;

/// *PGRME*: the receiver's estimated position error in metres.
#[derive(Debug, Clone, PartialEq)]
pub struct Pgrme {
    pub horizontal_error: f64,
    pub vertical_error: f64,
    pub spherical_error: f64,
}

impl Pgrme {
    pub(crate) fn decode(f: Fields) -> Result<Self, DecodeError> {
        require_fields!(f.code, f, 6);

        Ok(Pgrme {
            horizontal_error: metres(&f, 0)?,
            vertical_error: metres(&f, 2)?,
            spherical_error: metres(&f, 4)?,
        })
    }
}

/// *PGRMZ*: altitude.
#[derive(Debug, Clone, PartialEq)]
pub struct Pgrmz {
    /// Altitude in metres; converted when the receiver reports feet.
    pub altitude: f64,
    /// 2 for user altitude, 3 for GPS altitude.
    pub fix_dimension: Option<u8>,
}

impl Pgrmz {
    pub(crate) fn decode(f: Fields) -> Result<Self, DecodeError> {
        require_fields!(f.code, f, 2);

        Ok(Pgrmz {
            altitude: metres(&f, 0)?,
            fix_dimension: f.opt_int(2)?,
        })
    }
}

/// *PGRMM*: map datum currently in use.
#[derive(Debug, Clone, PartialEq)]
pub struct Pgrmm {
    pub datum: String,
}

impl Pgrmm {
    pub(crate) fn decode(f: Fields) -> Result<Self, DecodeError> {
        require_fields!(f.code, f, 1);

        Ok(Pgrmm {
            datum: f.str(0).trim().to_owned(),
        })
    }
}

/// Value at `index` with its unit letter at `index + 1`, in metres.
fn metres(f: &Fields, index: usize) -> Result<f64, DecodeError> {
    let value = f.f64(index);
    match f.char(index + 1) {
        None | Some('M') | Some('m') => Ok(value),
        Some('f') | Some('F') => Ok(value * METRES_PER_FOOT),
        Some(c) => Err(f.invalid(index + 1, format!("unknown unit '{}'", c))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn values(line: &str) -> Vec<String> {
        line.split(',').map(str::to_owned).collect()
    }

    #[test]
    fn pgrme_errors() {
        let v = values("15.0,M,45.0,M,25.0,M");
        let rme = Pgrme::decode(Fields::new("PGRME", &v)).unwrap();
        assert_eq!(rme.horizontal_error, 15.0);
        assert_eq!(rme.vertical_error, 45.0);
        assert_eq!(rme.spherical_error, 25.0);
    }

    #[test]
    fn pgrmz_converts_feet() {
        let v = values("1000,f,3");
        let rmz = Pgrmz::decode(Fields::new("PGRMZ", &v)).unwrap();
        assert!((rmz.altitude - 304.8).abs() < 1e-9);
        assert_eq!(rmz.fix_dimension, Some(3));
    }

    #[test]
    fn pgrmz_rejects_unknown_unit() {
        let v = values("1000,x");
        assert_matches!(
            Pgrmz::decode(Fields::new("PGRMZ", &v)),
            Err(DecodeError::InvalidField { index: 1, .. })
        );
    }

    #[test]
    fn pgrmm_datum() {
        let v = values("WGS 84");
        assert_eq!(Pgrmm::decode(Fields::new("PGRMM", &v)).unwrap().datum, "WGS 84");
    }
}
