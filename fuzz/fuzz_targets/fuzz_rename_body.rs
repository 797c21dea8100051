//! Fuzz target: JSON deserialization of `RenameBody`.

#![no_main]

use gallery_core::Pathname;
use gallery_gateway::routes::RenameBody;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(body) = serde_json::from_slice::<RenameBody>(data) else {
        return;
    };
    // Whatever parses must be safe to turn into a rename target.
    if let (Some(pathname), Some(new_name)) = (body.pathname, body.new_name) {
        if let Ok(source) = Pathname::new(pathname) {
            let _ = source.with_leaf(&new_name);
        }
    }
});
