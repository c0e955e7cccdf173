#![no_main]
use libfuzzer_sys::fuzz_target;

use sextant::reader::SentenceReader;
use sextant::{decode, GnssMonitor};
use std::io::Cursor;

fuzz_target!(|data: &[u8]| {
    let mut monitor = GnssMonitor::new();
    for raw in SentenceReader::new(Cursor::new(data)).flatten() {
        if let Ok(msg) = decode(&raw) {
            monitor.on_message(&msg);
        }
    }
});
