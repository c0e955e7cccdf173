//! NMEA 0183 sentence parsing and GNSS fix fusion.
//!
//! Lines are framed by [`framer::frame`], decoded into typed sentences by
//! [`registry::decode`] and fed to a [`fusion::GnssMonitor`], which keeps the
//! best current picture of the receiver's fix. [`reader::SentenceReader`]
//! splits byte streams into lines, and [`ntrip::NtripClient`] fetches RTK
//! corrections from an NTRIP caster.
//!
//! ```
//! use sextant::{parse, FixEvent, GnssMonitor};
//!
//! let mut monitor = GnssMonitor::new();
//! let msg = parse("$GPGGA,123519,4807.038,N,01131.000,E,1,08,0.9,545.4,M,46.9,M,,*47").unwrap();
//! assert!(matches!(monitor.on_message(&msg), Some(FixEvent::Acquired { .. })));
//! assert!((monitor.state().latitude() - 48.1173).abs() < 1e-9);
//! ```

#[cfg(test)]
#[macro_use]
extern crate assert_matches;
#[macro_use]
extern crate quick_error;

#[macro_use]
mod macros;

pub mod err;
pub mod framer;
pub mod fusion;
pub mod ntrip;
pub mod reader;
pub mod registry;
pub mod sentences;
pub mod talker;

pub use err::{DecodeError, FrameError, NetworkError, ParseError, ReadError, SourceTableError};
pub use framer::{frame, RawSentence};
pub use fusion::{FixEvent, FixState, GnssMonitor};
pub use reader::{LineAssembler, SentenceReader};
pub use registry::{decode, parse, DecodedMessage, MessageData};
pub use talker::TalkerId;
