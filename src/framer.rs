//! Splits a single `$CODE,f1,f2,...*hh` line into its code and fields.

use std::fmt;

use crate::err::FrameError;

const START: char = '$';
const CHECKSUM_DELIMITER: char = '*';
const CHECKSUM_LENGTH: usize = 2;

/// One framed line: the sentence code (talker + type, e.g. `GPGGA`) and its
/// comma separated fields in original order. Unreported fields are `""`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawSentence {
    pub code: String,
    pub fields: Vec<String>,
}

impl RawSentence {
    pub fn new<C: Into<String>>(code: C, fields: Vec<String>) -> Self {
        RawSentence {
            code: code.into(),
            fields,
        }
    }

    /// The characters between `$` and `*`, i.e. what the checksum covers.
    fn body(&self) -> String {
        let mut body = self.code.clone();
        for f in &self.fields {
            body.push(',');
            body.push_str(f);
        }
        body
    }
}

/// Formats the sentence with a freshly computed checksum, without a line ending.
impl fmt::Display for RawSentence {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let body = self.body();
        write!(f, "{}{}{}{:02X}", START, body, CHECKSUM_DELIMITER, checksum(&body))
    }
}

/// XOR of every byte in `body`.
pub fn checksum(body: &str) -> u8 {
    body.bytes().fold(0, |acc, b| acc ^ b)
}

/// Frame one line. The line must not contain its terminator; a sentence
/// without `*hh` is accepted without checksum validation.
pub fn frame(line: &str) -> Result<RawSentence, FrameError> {
    let content = line.strip_prefix(START).ok_or(FrameError::MissingStart)?;

    let body = match content.find(CHECKSUM_DELIMITER) {
        Some(pos) => {
            let (body, stated) = (&content[..pos], &content[pos + 1..]);
            let expected = parse_checksum(stated)?;
            let actual = checksum(body);
            if expected != actual {
                return Err(FrameError::ChecksumMismatch { expected, actual });
            }
            body
        }
        None => content,
    };

    let mut parts = body.split(',');
    let code = parts.next().unwrap_or_default();
    if code.is_empty() {
        return Err(FrameError::EmptyCode);
    }

    Ok(RawSentence {
        code: code.to_owned(),
        fields: parts.map(str::to_owned).collect(),
    })
}

fn parse_checksum(stated: &str) -> Result<u8, FrameError> {
    if stated.len() != CHECKSUM_LENGTH || !stated.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(FrameError::MalformedChecksum(stated.to_owned()));
    }
    u8::from_str_radix(stated, 16).map_err(|_| FrameError::MalformedChecksum(stated.to_owned()))
}

#[cfg(test)]
mod tests {
    use super::*;

    const GGA: &str = "$GPGGA,123519,4807.038,N,01131.000,E,1,08,0.9,545.4,M,46.9,M,,*47";

    #[test]
    fn frames_valid_sentence() {
        let raw = frame(GGA).unwrap();
        assert_eq!(raw.code, "GPGGA");
        assert_eq!(raw.fields.len(), 14);
        assert_eq!(raw.fields[0], "123519");
        assert_eq!(raw.fields[12], "");
        assert_eq!(raw.fields[13], "");
    }

    #[test]
    fn display_reproduces_original_line() {
        assert_eq!(frame(GGA).unwrap().to_string(), GGA);
    }

    #[test]
    fn accepts_missing_checksum() {
        let raw = frame("$GPHDT,274.07,T").unwrap();
        assert_eq!(raw.code, "GPHDT");
        assert_eq!(raw.fields, vec!["274.07", "T"]);
    }

    #[test]
    fn lowercase_checksum_is_accepted() {
        let line = format!("$PGRMZ,246,f,3*{:02x}", checksum("PGRMZ,246,f,3"));
        assert!(frame(&line).is_ok());
    }

    #[test]
    fn rejects_missing_start() {
        assert_matches!(frame("GPGGA,1,2"), Err(FrameError::MissingStart));
        assert_matches!(frame(""), Err(FrameError::MissingStart));
    }

    #[test]
    fn rejects_wrong_checksum() {
        assert_matches!(
            frame("$GPXXX*00"),
            Err(FrameError::ChecksumMismatch {
                expected: 0x00,
                actual: 0x4F
            })
        );
    }

    #[test]
    fn rejects_malformed_checksum() {
        assert_matches!(frame("$GPHDT,1,T*4"), Err(FrameError::MalformedChecksum(_)));
        assert_matches!(frame("$GPHDT,1,T*ZZ"), Err(FrameError::MalformedChecksum(_)));
        assert_matches!(frame("$GPHDT,1,T*47\r"), Err(FrameError::MalformedChecksum(_)));
    }

    #[test]
    fn rejects_empty_code() {
        assert_matches!(frame("$,1,2"), Err(FrameError::EmptyCode));
        assert_matches!(frame("$"), Err(FrameError::EmptyCode));
    }

    #[test]
    fn code_without_fields() {
        let raw = frame("$GPXXX").unwrap();
        assert_eq!(raw.code, "GPXXX");
        assert!(raw.fields.is_empty());
    }

    #[test]
    fn keeps_internal_whitespace() {
        let raw = frame("$PGRMM, WGS 84 ").unwrap();
        assert_eq!(raw.fields, vec![" WGS 84 "]);
    }
}
