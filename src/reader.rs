//! Line splitting for transport adapters.
//!
//! Receivers terminate sentences with `\r\n`, but bytes arrive in arbitrary
//! chunks. [`LineAssembler`] buffers partial lines and hands out complete
//! ones; [`SentenceReader`] drives it from any `io::Read`.

use arrayvec::ArrayVec;

use std::io;
use std::str;

use crate::err::ReadError;
use crate::framer::{self, RawSentence};

/// Longest line kept in the buffer. NMEA limits sentences to 82 characters,
/// but proprietary sentences routinely exceed that.
pub const MAX_LINE_LENGTH: usize = 1024;

/// Buffers bytes until a `\n` completes a line.
#[derive(Debug, Default)]
pub struct LineAssembler {
    buf: ArrayVec<u8, MAX_LINE_LENGTH>,
    /// Set after an over-long line until its terminator has been skipped.
    discarding: bool,
}

impl LineAssembler {
    pub fn new() -> Self {
        LineAssembler::default()
    }

    /// Push one byte. Returns a line (without `\r\n`) when `byte` completes
    /// a non-empty one.
    pub fn push(&mut self, byte: u8) -> Option<Result<String, ReadError>> {
        if byte == b'\n' {
            if self.discarding {
                self.discarding = false;
                return None;
            }
            return self.take();
        }
        if self.discarding {
            return None;
        }
        if self.buf.try_push(byte).is_err() {
            self.buf.clear();
            self.discarding = true;
            return Some(Err(ReadError::LineTooLong(MAX_LINE_LENGTH)));
        }
        None
    }

    /// Frame every line completed by `bytes`. Unterminated trailing bytes
    /// stay buffered for the next call.
    pub fn feed(&mut self, bytes: &[u8]) -> Vec<Result<RawSentence, ReadError>> {
        bytes
            .iter()
            .filter_map(|&b| self.push(b))
            .map(|line| line.and_then(|l| framer::frame(&l).map_err(ReadError::from)))
            .collect()
    }

    /// Number of bytes waiting for a terminator.
    pub fn pending(&self) -> usize {
        self.buf.len()
    }

    /// Hand out whatever is buffered as a final, unterminated line.
    pub fn flush(&mut self) -> Option<Result<String, ReadError>> {
        self.discarding = false;
        self.take()
    }

    fn take(&mut self) -> Option<Result<String, ReadError>> {
        let mut line: &[u8] = &self.buf;
        if let Some(stripped) = line.strip_suffix(b"\r") {
            line = stripped;
        }
        let result = if line.is_empty() {
            None
        } else {
            Some(
                str::from_utf8(line)
                    .map(str::to_owned)
                    .map_err(|_| ReadError::InvalidUtf8),
            )
        };
        self.buf.clear();
        result
    }
}

/// Iterator over the framed sentences of a byte stream.
///
/// Framing failures are yielded as `ReadError::Frame` and iteration carries
/// on with the next line; an I/O error is yielded once and ends iteration.
/// Wrap unbuffered sources in an `io::BufReader`.
pub struct SentenceReader<R> {
    input: io::Bytes<R>,
    lines: LineAssembler,
    done: bool,
}

impl<R: io::Read> SentenceReader<R> {
    pub fn new(input: R) -> Self {
        SentenceReader {
            input: input.bytes(),
            lines: LineAssembler::new(),
            done: false,
        }
    }

    fn next_line(&mut self) -> Result<Option<String>, ReadError> {
        loop {
            let byte = match self.input.next() {
                None => {
                    self.done = true;
                    return self.lines.flush().transpose();
                }
                Some(Err(e)) => {
                    self.done = true;
                    return Err(e.into());
                }
                Some(Ok(b)) => b,
            };
            if let Some(line) = self.lines.push(byte) {
                return line.map(Some);
            }
        }
    }
}

impl<R: io::Read> Iterator for SentenceReader<R> {
    type Item = Result<RawSentence, ReadError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let line = try_some!(self.next_line())?;
        Some(framer::frame(&line).map_err(ReadError::from))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::err::FrameError;
    use std::io::Cursor;

    #[test]
    fn splits_and_trims_crlf() {
        let input = "$GPHDT,274.07,T*03\r\n$GPHDT,1.0,T\r\n\r\n$IIVLW,1,N,2,N";
        let sentences: Vec<_> = SentenceReader::new(Cursor::new(input))
            .collect::<Result<_, _>>()
            .unwrap();
        assert_eq!(sentences.len(), 3);
        assert_eq!(sentences[0].fields, vec!["274.07", "T"]);
        assert_eq!(sentences[2].code, "IIVLW");
    }

    #[test]
    fn frame_errors_do_not_stop_iteration() {
        let input = "garbage\n$GPXXX*00\n$GPHDT,1.0,T\n";
        let results: Vec<_> = SentenceReader::new(Cursor::new(input)).collect();
        assert_eq!(results.len(), 3);
        assert_matches!(results[0], Err(ReadError::Frame(FrameError::MissingStart)));
        assert_matches!(
            results[1],
            Err(ReadError::Frame(FrameError::ChecksumMismatch { .. }))
        );
        assert_matches!(results[2], Ok(ref s) if s.code == "GPHDT");
    }

    #[test]
    fn buffers_partial_lines_across_chunks() {
        let mut lines = LineAssembler::new();
        assert!(lines.feed(b"$GPHDT,27").is_empty());
        assert_eq!(lines.pending(), 9);
        let out = lines.feed(b"4.07,T\r\n$GPH");
        assert_eq!(out.len(), 1);
        assert_matches!(out[0], Ok(ref s) if s.fields[0] == "274.07");
        assert_eq!(lines.pending(), 4);
    }

    #[test]
    fn recovers_after_overlong_line() {
        let mut lines = LineAssembler::new();
        let mut input = vec![b'$'; MAX_LINE_LENGTH + 10];
        input.extend_from_slice(b"\n$GPHDT,1.0,T\n");
        let out = lines.feed(&input);
        assert_eq!(out.len(), 2);
        assert_matches!(out[0], Err(ReadError::LineTooLong(MAX_LINE_LENGTH)));
        assert_matches!(out[1], Ok(_));
    }

    #[test]
    fn rejects_invalid_utf8() {
        let mut lines = LineAssembler::new();
        let out = lines.feed(b"$GP\xff\xfe\n");
        assert_matches!(out[0], Err(ReadError::InvalidUtf8));
    }
}
