#![no_main]

use libfuzzer_sys::fuzz_target;
use sqlcall::CallConfig;

fuzz_target!(|data: &[u8]| {
    // Fuzz call descriptor parsing
    if let Ok(s) = std::str::from_utf8(data) {
        if let Ok(config) = CallConfig::from_descriptor(s) {
            // Anything accepted must also pass validation on its own
            assert!(config.validate().is_ok());
            let _ = config.qualified_name();
        }
    }
});
