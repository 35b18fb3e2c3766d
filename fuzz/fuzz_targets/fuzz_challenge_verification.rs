#![no_main]

use knizk::{Challenge, Proof, Verifier};
use libfuzzer_sys::fuzz_target;

// Input: a challenge record and a proof record separated by a NUL byte.
fuzz_target!(|data: &[u8]| {
    let Some(split) = data.iter().position(|&b| b == 0) else {
        return;
    };
    let (Ok(challenge), Ok(proof)) = (
        std::str::from_utf8(&data[..split]),
        std::str::from_utf8(&data[split + 1..]),
    ) else {
        return;
    };

    if let (Ok(challenge), Ok(proof)) = (Challenge::from_json(challenge), Proof::from_json(proof)) {
        let _ = Verifier::new(&challenge).verify(&proof);
    }
});
