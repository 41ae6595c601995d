use alloc::vec::Vec;

use crate::format::{
    GROUP_SIZE, HEADER_COMPRESSED, HEADER_RAW, MAX_CHUNK_SIZE, encode_header, encode_token,
    length_bits, max_match_length,
};
use crate::matcher::MatchFinder;

/// Compresses `input` into `output` using 4096-byte chunks, the size the
/// operating-system routines use.
///
/// Compression cannot fail: a chunk whose token stream would not shrink it
/// is stored verbatim under a raw-chunk header.
pub fn compress(input: &[u8], output: &mut Vec<u8>) {
    compress_with_chunk_size(input, output, MAX_CHUNK_SIZE);
}

/// Compresses `input` into `output`, slicing it into chunks of at most
/// `chunk_size` bytes.
///
/// `chunk_size` is clamped to `1..=4096`: the header size field cannot
/// describe a longer payload, and an empty chunk cannot be encoded.
pub fn compress_with_chunk_size(input: &[u8], output: &mut Vec<u8>, chunk_size: usize) {
    let chunk_size = chunk_size.clamp(1, MAX_CHUNK_SIZE);
    let mut finder = MatchFinder::new();

    // Worst case is two header bytes plus one flag byte per eight literals,
    // per chunk; raw fallback keeps the total under this hint.
    output.reserve(input.len() + input.len() / 8 + 4);

    for chunk in input.chunks(chunk_size) {
        let header_at = output.len();
        // Header placeholder, patched once the payload size is known.
        output.extend_from_slice(&[0, 0]);

        compress_chunk(chunk, output, &mut finder);
        let payload_len = output.len() - header_at - 2;

        let header = if payload_len < chunk.len() {
            encode_header(HEADER_COMPRESSED, payload_len)
        } else {
            // No savings; store the chunk verbatim.
            output.truncate(header_at + 2);
            output.extend_from_slice(chunk);
            encode_header(HEADER_RAW, chunk.len())
        };
        output[header_at..header_at + 2].copy_from_slice(&header.to_le_bytes());
    }
}

/// Tokenizes one raw chunk into flag-tagged literals and back-references.
fn compress_chunk(chunk: &[u8], output: &mut Vec<u8>, finder: &mut MatchFinder) {
    finder.reset();
    let mut group = TokenGroup::new();
    let mut pos = 0;

    while pos < chunk.len() {
        let split = length_bits(pos);
        let max_len = max_match_length(split);

        let found = finder.find(chunk, pos, max_len);
        finder.insert(chunk, pos);

        // One-byte lookahead: starting the match one byte later sometimes
        // reaches further. Give this position up as a literal whenever the
        // deferred match would be at least as long.
        let kept = found.filter(|m| {
            let deferred = finder.find(chunk, pos + 1, max_len).map_or(0, |n| n.length);
            m.length > deferred
        });

        match kept {
            Some(m) => {
                for covered in pos + 1..pos + m.length {
                    finder.insert(chunk, covered);
                }
                group.push_reference(encode_token(m.offset, m.length, split), output);
                pos += m.length;
            }
            None => {
                group.push_literal(chunk[pos], output);
                pos += 1;
            }
        }
    }

    group.flush(output);
}

/// One flag byte's worth of pending tokens.
///
/// Up to eight tokens accumulate alongside their flag bits, then leave as
/// one flag byte followed by the token bytes. A group cut short by the end
/// of the chunk keeps its unused flag bits zero.
struct TokenGroup {
    flags: u8,
    count: usize,
    tail: [u8; 2 * GROUP_SIZE],
    tail_len: usize,
}

impl TokenGroup {
    const fn new() -> Self {
        Self {
            flags: 0,
            count: 0,
            tail: [0; 2 * GROUP_SIZE],
            tail_len: 0,
        }
    }

    fn push_literal(&mut self, byte: u8, output: &mut Vec<u8>) {
        self.tail[self.tail_len] = byte;
        self.tail_len += 1;
        self.advance(output);
    }

    fn push_reference(&mut self, word: u16, output: &mut Vec<u8>) {
        self.flags |= 1 << self.count;
        self.tail[self.tail_len..self.tail_len + 2].copy_from_slice(&word.to_le_bytes());
        self.tail_len += 2;
        self.advance(output);
    }

    fn advance(&mut self, output: &mut Vec<u8>) {
        self.count += 1;
        if self.count == GROUP_SIZE {
            self.flush(output);
        }
    }

    fn flush(&mut self, output: &mut Vec<u8>) {
        if self.count > 0 {
            output.push(self.flags);
            output.extend_from_slice(&self.tail[..self.tail_len]);
            *self = Self::new();
        }
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec::Vec;

    use super::{TokenGroup, compress_chunk};
    use crate::matcher::MatchFinder;

    fn compress_chunk_to_vec(chunk: &[u8]) -> Vec<u8> {
        let mut out = Vec::new();
        compress_chunk(chunk, &mut out, &mut MatchFinder::new());
        out
    }

    #[test]
    fn groups_flush_after_eight_tokens() {
        let mut out = Vec::new();
        let mut group = TokenGroup::new();
        for b in 0..8 {
            group.push_literal(b, &mut out);
        }
        assert_eq!(out, [0x00, 0, 1, 2, 3, 4, 5, 6, 7]);

        group.push_literal(9, &mut out);
        group.push_reference(0xBEEF, &mut out);
        group.flush(&mut out);
        assert_eq!(&out[9..], [0x02, 9, 0xEF, 0xBE]);

        // Flushing an empty group emits nothing.
        group.flush(&mut out);
        assert_eq!(out.len(), 13);
    }

    #[test]
    fn lone_literal_chunk() {
        assert_eq!(compress_chunk_to_vec(b"A"), [0x00, b'A']);
    }

    #[test]
    fn periodic_chunk_uses_one_reference() {
        // Three literals, then offset 3 / length 9 covering the rest.
        assert_eq!(
            compress_chunk_to_vec(b"ABCABCABCABC"),
            [0x08, b'A', b'B', b'C', 0x06, 0x20]
        );
    }

    #[test]
    fn lookahead_defers_to_the_longer_match() {
        // At 'a' (position 9) a 3-byte match on "abc" is available, but the
        // match one byte later on "bcde" is longer; the tokenizer must emit
        // the 'a' as a literal and take the deferred match.
        let payload = compress_chunk_to_vec(b"abc_bcde_abcdef");
        assert_eq!(
            payload,
            [
                0x00, b'a', b'b', b'c', b'_', b'b', b'c', b'd', b'e', // literals
                0x04, b'_', b'a', 0x01, 0x50, b'f',
            ]
        );
    }

    #[test]
    fn zero_fill_chunk_is_a_literal_and_one_run() {
        // One literal zero, then a run-length reference with offset 1
        // covering the remaining 4095 bytes.
        let payload = compress_chunk_to_vec(&[0u8; 4096]);
        assert_eq!(payload, [0x02, 0x00, 0xFC, 0x0F]);
    }
}
