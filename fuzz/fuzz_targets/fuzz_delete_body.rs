//! Fuzz target: JSON deserialization of `DeleteBody`.
//!
//! Verifies that arbitrary byte sequences fed to the delete request
//! parser never cause panics or UB.

#![no_main]

use gallery_gateway::routes::DeleteBody;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Errors are expected; panics are not.
    let _ = serde_json::from_slice::<DeleteBody>(data);
});
