use thiserror::Error;

/// Errors surfaced while decompressing an LZNT1 stream.
///
/// Compression has no error cases; these all describe malformed or truncated
/// compressed input.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecompressError {
    /// Fewer than two bytes remain where a chunk header is expected.
    #[error("truncated chunk header")]
    TruncatedHeader,

    /// A chunk header declares a payload longer than the remaining input.
    ///
    /// Only raised while header length checking is enabled; see
    /// [`decompress_with_length_check`](crate::decompress_with_length_check).
    #[error("chunk header declares a payload longer than the remaining input")]
    InvalidChunkLength,

    /// A chunk payload ends in the middle of a back-reference word.
    #[error("chunk payload truncated inside a back-reference word")]
    TruncatedPayload,

    /// A back-reference offset reaches before the start of its chunk.
    ///
    /// Chunks are self-contained; a reference into an earlier chunk is a
    /// malformed encoding no conforming compressor produces.
    #[error("back-reference offset reaches before the start of the chunk")]
    InvalidBackReference,
}
