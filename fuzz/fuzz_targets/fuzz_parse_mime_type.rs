#![no_main]

use flavor_map::{DataFlavor, MimeType};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        // Anything that parses must survive a format/parse cycle unchanged
        if let Ok(mime) = MimeType::parse(s) {
            let reparsed = MimeType::parse(&mime.to_string()).expect("formatted MIME type must parse");
            assert_eq!(reparsed, mime);
        }
        let _ = DataFlavor::new(s);
    }
});
