use std::io;

quick_error! {
    /// Failure to frame a single line as an NMEA sentence.
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub enum FrameError {
        MissingStart {
            display("Sentence does not start with '$'")
        }
        EmptyCode {
            display("Sentence has no code between '$' and the first field")
        }
        MalformedChecksum(found: String) {
            display("Checksum \"{}\" is not two hexadecimal digits", found)
        }
        ChecksumMismatch { expected: u8, actual: u8 } {
            display("Expected checksum \"{:02X}\", found checksum \"{:02X}\"", expected, actual)
        }
    }
}

quick_error! {
    /// A registered decode rule rejected the fields of a sentence.
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub enum DecodeError {
        InvalidField { code: String, index: usize, reason: String } {
            display("Invalid field {} in {} sentence: {}", index, code, reason)
        }
    }
}

impl DecodeError {
    pub(crate) fn invalid<R: Into<String>>(code: &str, index: usize, reason: R) -> Self {
        DecodeError::InvalidField {
            code: code.to_owned(),
            index,
            reason: reason.into(),
        }
    }
}

quick_error! {
    /// Framing or decoding failure for a single line.
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub enum ParseError {
        Frame(err: FrameError) {
            from()
            display("Could not frame sentence: {}", err)
            source(err)
        }
        Decode(err: DecodeError) {
            from()
            display("Could not decode sentence: {}", err)
            source(err)
        }
    }
}

quick_error! {
    /// Errors raised while splitting a byte stream into sentences.
    #[derive(Debug)]
    pub enum ReadError {
        Io(err: io::Error) {
            from()
            display("Encountered I/O error while reading sentences: {}", err)
            source(err)
        }
        LineTooLong(capacity: usize) {
            display("Tried to push more than {} characters into the line buffer", capacity)
        }
        InvalidUtf8 {
            display("Line is not valid UTF-8")
        }
        Frame(err: FrameError) {
            from()
            display("{}", err)
            source(err)
        }
    }
}

quick_error! {
    /// A single source-table record could not be decoded.
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub enum SourceTableError {
        TooFewFields { tag: String, expected: usize, actual: usize } {
            display("{} record needs at least {} fields, found {}", tag, expected, actual)
        }
        InvalidNumber { field: &'static str, value: String } {
            display("Could not parse {} from \"{}\"", field, value)
        }
    }
}

quick_error! {
    /// Failure talking to an NTRIP caster.
    #[derive(Debug)]
    pub enum NetworkError {
        Io(err: io::Error) {
            from()
            display("Encountered I/O error talking to caster: {}", err)
            source(err)
        }
        Unauthorized {
            display("Caster rejected the credentials")
        }
        Rejected(status: String) {
            display("Caster rejected the request: {}", status)
        }
        MalformedResponse(msg: String) {
            display("Malformed caster response: {}", msg)
        }
        AlreadyStreaming {
            display("Client is already streaming a mountpoint")
        }
    }
}
