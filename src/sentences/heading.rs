//! *HDT* / *HDM*: vessel heading, true or magnetic.

use super::fields::Fields;
use crate::err::DecodeError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeadingReference {
    True,
    Magnetic,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Heading {
    /// Degrees, relative to `reference`.
    pub heading: f64,
    pub reference: HeadingReference,
}

impl Heading {
    pub(crate) fn decode_true(f: Fields) -> Result<Self, DecodeError> {
        Self::decode(f, HeadingReference::True)
    }

    pub(crate) fn decode_magnetic(f: Fields) -> Result<Self, DecodeError> {
        Self::decode(f, HeadingReference::Magnetic)
    }

    fn decode(f: Fields, reference: HeadingReference) -> Result<Self, DecodeError> {
        require_fields!(f.code, f, 1);

        Ok(Heading {
            heading: f.f64(0),
            reference,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn true_and_magnetic_share_fields() {
        let values = vec!["274.07".to_string(), "T".to_string()];
        let hdt = Heading::decode_true(Fields::new("GPHDT", &values)).unwrap();
        let hdm = Heading::decode_magnetic(Fields::new("HCHDM", &values)).unwrap();
        assert_eq!(hdt.heading, hdm.heading);
        assert_eq!(hdt.reference, HeadingReference::True);
        assert_eq!(hdm.reference, HeadingReference::Magnetic);
    }
}
