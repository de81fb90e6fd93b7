#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Arbitrary bytes as PDF input: must not panic.
    let _ = facturx::zugferd::extract_invoice(data);
    let _ = facturx::zugferd::discover(data, facturx::zugferd::FACTURX_FILENAME);
});
