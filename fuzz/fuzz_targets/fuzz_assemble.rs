#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Arbitrary bytes as the base PDF: must fail cleanly, never panic.
    let options = facturx::zugferd::AssemblyOptions::default();
    let _ = facturx::zugferd::embed_in_pdf(
        data,
        b"<rsm:CrossIndustryInvoice/>",
        facturx::ZugferdProfile::Minimum,
        &options,
    );
});
