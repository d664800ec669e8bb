#![no_main]
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        let _ = richxml::validate_xml_syntax(s);
        let _ = richxml::from_xml(s);
    }
});
