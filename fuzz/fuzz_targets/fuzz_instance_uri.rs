#![no_main]

use libfuzzer_sys::fuzz_target;
use problemdetail::{ProblemUri, create_safe_uri};

fuzz_target!(|data: &[u8]| {
    // Limit input size to avoid OOM on pathological inputs
    if data.len() > 1024 {
        return;
    }
    if let Ok(s) = std::str::from_utf8(data) {
        // Every fallback tier must produce a syntactically valid URI
        let uri = create_safe_uri(s);
        assert!(
            ProblemUri::parse(uri.as_str()).is_ok(),
            "unsafe instance URI {uri} for input {s:?}"
        );
    }
});
