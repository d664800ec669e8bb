#![no_main]
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        if let Ok(doc) = richxml::from_json(s) {
            let xml = richxml::to_xml(&doc);
            let _ = richxml::from_xml(&xml);
        }
    }
});
