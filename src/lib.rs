//! # LZNT1 compression and decompression
//!
//! LZNT1 is the sliding-window Lempel–Ziv format the Windows NT kernel uses
//! for NTFS file compression and in-memory registry data. This crate
//! implements the "standard" engine of `RtlCompressBuffer` /
//! `RtlDecompressBuffer`: buffers are sliced into self-contained chunks of
//! at most 4096 bytes, and each chunk is stored either as a token stream of
//! literals and back-references or, when that would not shrink it, as its
//! raw bytes.
//!
//! Back-references may reach into bytes they themselves produce
//! (`length >= offset`), which turns short seed sequences into periodic
//! runs; the width of the offset and length fields shifts as a chunk fills,
//! so the same 16-bit word means different things at different positions.
//!
//! ## Example
//!
//! ```rust
//! extern crate alloc;
//! use alloc::vec::Vec;
//! use lznt1_codec::{compress, decompress};
//!
//! let report = b"error 0x17: retrying... error 0x17: retrying... error 0x17: giving up";
//!
//! let mut packed = Vec::new();
//! compress(report, &mut packed);
//! assert!(packed.len() < report.len());
//!
//! let mut unpacked = Vec::new();
//! decompress(&packed, &mut unpacked).expect("our own output is well-formed");
//! assert_eq!(unpacked, report);
//! ```

#![no_std]
#![forbid(unsafe_code)]

extern crate alloc;

pub mod compress;
pub mod decompress;
pub mod error;

mod format;
mod matcher;

pub use compress::{compress, compress_with_chunk_size};
pub use decompress::{decompress, decompress_with_length_check};
pub use error::DecompressError;

#[cfg(test)]
mod tests {
    use alloc::vec::Vec;

    use super::{compress, decompress};

    #[test]
    fn round_trip() {
        let original = b"chunk headers wrap token groups; token groups wrap tokens";
        let mut compressed = Vec::new();
        let mut decompressed = Vec::new();

        compress(original, &mut compressed);
        decompress(&compressed, &mut decompressed).unwrap();

        assert_eq!(decompressed, original);
    }

    #[test]
    fn runs_collapse_to_a_few_bytes() {
        let original = alloc::vec![b'A'; 100];
        let mut compressed = Vec::new();
        compress(&original, &mut compressed);

        // Header, flag byte, one literal, one run-length reference.
        assert_eq!(compressed.len(), 6);

        let mut decompressed = Vec::new();
        decompress(&compressed, &mut decompressed).unwrap();
        assert_eq!(decompressed, original);
    }

    #[test]
    fn incompressible_input_is_stored_verbatim() {
        let original: Vec<u8> = (0..200).map(|i| (i * 7) as u8).collect();
        let mut compressed = Vec::new();
        compress(&original, &mut compressed);

        // Two header bytes, then the input unchanged.
        assert_eq!(compressed.len(), 202);
        assert_eq!(&compressed[2..], original);

        let mut decompressed = Vec::new();
        decompress(&compressed, &mut decompressed).unwrap();
        assert_eq!(decompressed, original);
    }
}
