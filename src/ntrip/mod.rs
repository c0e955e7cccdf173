//! NTRIP correction-source client.
//!
//! [`NtripClient`] downloads a caster's source table and streams the raw
//! correction data of one mountpoint. The stream body is passed through
//! unparsed.

mod client;
mod config;
mod source_table;

pub use self::client::{ConnectionState, NtripClient};
pub use self::config::{Credentials, NtripConfig, DEFAULT_PORT};
pub use self::source_table::{
    parse_source_table, AuthenticationType, NtripCaster, NtripSourceEntry, NtripStream,
    END_MARKER,
};
