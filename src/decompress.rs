use alloc::vec::Vec;

use crate::error::DecompressError;
use crate::format::{
    GROUP_SIZE, HEADER_COMPRESSED_FLAG, HEADER_SIZE_MASK, decode_token, length_bits,
};

type Result<T> = core::result::Result<T, DecompressError>;

/// Expands a whole LZNT1 stream, appending the raw bytes to `output`.
///
/// Each chunk header is checked against the remaining input; a header
/// declaring more payload than remains fails with
/// [`DecompressError::InvalidChunkLength`]. Use
/// [`decompress_with_length_check`] to accept streams cut short by
/// fixed-size reads.
pub fn decompress(input: &[u8], output: &mut Vec<u8>) -> Result<()> {
    decompress_with_length_check(input, output, true)
}

/// Expands a whole LZNT1 stream with configurable header length checking.
///
/// With `length_check` disabled, a header declaring more payload than
/// remains consumes the remainder of the input as a silently truncated
/// final chunk instead of failing.
///
/// On error `output` is restored to its original length; no partial
/// expansion is exposed.
pub fn decompress_with_length_check(
    input: &[u8],
    output: &mut Vec<u8>,
    length_check: bool,
) -> Result<()> {
    let rollback = output.len();
    decompress_stream(input, output, length_check).inspect_err(|_| output.truncate(rollback))
}

fn decompress_stream(input: &[u8], output: &mut Vec<u8>, length_check: bool) -> Result<()> {
    output.reserve(input.len());

    let mut pos = 0;
    while pos < input.len() {
        // A lone zero byte at the end is destination-buffer padding, not a
        // truncated header.
        if pos + 1 == input.len() && input[pos] == 0 {
            break;
        }
        if pos + 2 > input.len() {
            return Err(DecompressError::TruncatedHeader);
        }
        let header = u16::from_le_bytes([input[pos], input[pos + 1]]);
        pos += 2;

        // RtlCompressBuffer terminates the stream with a zero header when
        // the destination has room for one.
        if header == 0 {
            break;
        }

        let mut len = ((header & HEADER_SIZE_MASK) + 1) as usize;
        if len > input.len() - pos {
            if length_check {
                return Err(DecompressError::InvalidChunkLength);
            }
            len = input.len() - pos;
        }

        let payload = &input[pos..pos + len];
        if header & HEADER_COMPRESSED_FLAG != 0 {
            decompress_chunk(payload, output)?;
        } else {
            output.extend_from_slice(payload);
        }
        pos += len;
    }

    Ok(())
}

/// Expands the token stream of one compressed chunk.
fn decompress_chunk(payload: &[u8], output: &mut Vec<u8>) -> Result<()> {
    let chunk_start = output.len();
    let mut pos = 0;

    while pos < payload.len() {
        let flags = payload[pos];
        pos += 1;

        // All-literal groups dominate barely-compressible data and need
        // none of the per-token bookkeeping.
        if flags == 0 && pos + GROUP_SIZE <= payload.len() {
            output.extend_from_slice(&payload[pos..pos + GROUP_SIZE]);
            pos += GROUP_SIZE;
            continue;
        }

        for bit in 0..GROUP_SIZE {
            // The group count is not stored: a payload ending at a token
            // boundary just stops, whatever the remaining flag bits say.
            if pos == payload.len() {
                return Ok(());
            }

            if flags >> bit & 1 == 0 {
                output.push(payload[pos]);
                pos += 1;
            } else {
                if pos + 2 > payload.len() {
                    return Err(DecompressError::TruncatedPayload);
                }
                let word = u16::from_le_bytes([payload[pos], payload[pos + 1]]);
                pos += 2;

                let emitted = output.len() - chunk_start;
                let (offset, length) = decode_token(word, length_bits(emitted));
                if offset > emitted {
                    return Err(DecompressError::InvalidBackReference);
                }
                copy_back_reference(output, offset, length);
            }
        }
    }

    Ok(())
}

/// Replays `length` bytes starting `offset` back from the end of `output`.
///
/// The copy runs byte by byte so that once it reaches its own starting
/// point (`length >= offset`) each push reads a byte the same reference
/// already produced, repeating the last `offset` bytes periodically.
fn copy_back_reference(output: &mut Vec<u8>, offset: usize, length: usize) {
    output.reserve(length);
    if offset == 1 {
        // Plain run of the last byte.
        let b = output[output.len() - 1];
        output.resize(output.len() + length, b);
    } else {
        let mut src = output.len() - offset;
        for _ in 0..length {
            let b = output[src];
            output.push(b);
            src += 1;
        }
    }
}
