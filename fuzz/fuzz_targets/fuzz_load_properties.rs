#![no_main]

use flavor_map::FlavorMap;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        // Malformed configuration is skipped, never fatal
        let map = FlavorMap::builder().without_defaults().properties(s).build();
        for native in map.all_natives() {
            let _ = map.flavors_for_native(&native);
        }
    }
});
