//! Fuzz target: `Pathname::with_leaf` on arbitrary UTF-8 input.
//!
//! The first `\0` splits the input into the original pathname and the new
//! leaf name. The renamed pathname must end with the new name and keep
//! everything before the original's last `/`.

#![no_main]

use gallery_core::Pathname;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    let Some((original, new_name)) = text.split_once('\0') else {
        return;
    };
    let Ok(path) = Pathname::new(original) else {
        return;
    };
    let Ok(renamed) = path.with_leaf(new_name) else {
        assert!(new_name.is_empty(), "only an empty name may be rejected");
        return;
    };

    assert!(renamed.as_str().ends_with(new_name));
    if let Some(idx) = original.rfind('/') {
        assert!(renamed.as_str().starts_with(&original[..=idx]));
    } else {
        assert_eq!(renamed.as_str(), new_name);
    }
});
