#![no_main]
use libfuzzer_sys::fuzz_target;

// Whatever parses must serialize to XML that parses again
fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        if let Ok(doc) = richxml::from_xml(s) {
            let xml = richxml::to_xml(&doc);
            assert!(richxml::validate_xml_syntax(&xml).is_ok(), "{xml:?}");
        }
    }
});
