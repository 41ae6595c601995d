#![no_main]

use libfuzzer_sys::fuzz_target;
use lznt1_codec::{compress, decompress, decompress_with_length_check};

/// The decoder must return `Ok` or `Err` on arbitrary bytes and never
/// panic, in either length-checking mode.
fn check_decoder_robustness(data: &[u8]) {
    let mut output = Vec::new();
    let _ = decompress(data, &mut output);

    let mut lenient = Vec::new();
    let _ = decompress_with_length_check(data, &mut lenient, false);
}

/// `decompress(compress(data))` must reproduce `data` exactly. A failure
/// means the compressor lost information, encoded a token the decoder
/// reads differently, or produced a stream the decoder rejects.
fn check_round_trip(data: &[u8]) {
    let mut compressed = Vec::new();
    compress(data, &mut compressed);

    let mut decompressed = Vec::new();
    match decompress(&compressed, &mut decompressed) {
        Ok(()) => assert_eq!(
            decompressed,
            data,
            "round-trip mismatch (input {} bytes, compressed {} bytes)",
            data.len(),
            compressed.len()
        ),
        Err(e) => panic!(
            "decoder rejected our own output: {e:?} (input {} bytes)",
            data.len()
        ),
    }
}

fuzz_target!(|data: &[u8]| {
    check_decoder_robustness(data);
    check_round_trip(data);
});
