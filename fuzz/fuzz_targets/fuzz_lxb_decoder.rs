#![no_main]

use libfuzzer_sys::fuzz_target;
use lxbread::fcs::FcsFile;
use lxbread::table::EventTable;

fuzz_target!(|data: &[u8]| {
    // Decoding must either succeed or fail with an error, never panic
    if let Ok(file) = FcsFile::from_bytes(data) {
        // Reshape and channel resolution must be equally total
        let _ = EventTable::from_source(&file, "A01");
    }
});
