//! Longest-match search over the bytes a chunk has already tokenized.

use crate::format::{MAX_CHUNK_SIZE, MIN_MATCH};

/// Slots in the head table, one per 12-bit hash value.
const HASH_SLOTS: usize = 4096;

/// Sentinel for "no position" in the head and chain tables.
const NO_POS: u16 = u16::MAX;

/// A back-reference candidate: distance back from the search position, and
/// the number of bytes covered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Match {
    pub offset: usize,
    pub length: usize,
}

/// Hash-chain index over chunk positions.
///
/// `head` maps the hash of three bytes to the most recent position they were
/// seen at; `chain` threads each position to the previous one with the same
/// hash. Walking a chain therefore visits candidates from nearest to
/// farthest, so of several candidates sharing the best length the one with
/// the smallest offset wins.
pub(crate) struct MatchFinder {
    head: [u16; HASH_SLOTS],
    chain: [u16; MAX_CHUNK_SIZE],
}

impl MatchFinder {
    pub(crate) fn new() -> Self {
        Self {
            head: [NO_POS; HASH_SLOTS],
            chain: [NO_POS; MAX_CHUNK_SIZE],
        }
    }

    /// Forgets all recorded positions. Chunks are self-contained, so this
    /// must run before each new chunk.
    pub(crate) fn reset(&mut self) {
        self.head.fill(NO_POS);
    }

    /// Records `pos` as a candidate for later searches. Every position a
    /// literal or match advances over must be inserted, in order, or
    /// overlapping matches will be missed.
    pub(crate) fn insert(&mut self, chunk: &[u8], pos: usize) {
        if pos + MIN_MATCH <= chunk.len() {
            let h = hash3(&chunk[pos..]);
            self.chain[pos] = self.head[h];
            self.head[h] = pos as u16;
        }
    }

    /// Finds the longest back-reference for the bytes at `pos`, no longer
    /// than `max_len`.
    ///
    /// The whole chain is walked: the caller needs the true maximum, and
    /// with chunks capped at 4096 bytes the quadratic worst case stays
    /// cheap. Both sides of a candidate comparison read the raw chunk,
    /// which lets a match run past its own starting position: the bytes
    /// such a reference regenerates during decompression are exactly the
    /// chunk bytes compared here, so the run-length case needs no special
    /// handling.
    pub(crate) fn find(&self, chunk: &[u8], pos: usize, max_len: usize) -> Option<Match> {
        if pos + MIN_MATCH > chunk.len() {
            return None;
        }
        let max_len = max_len.min(chunk.len() - pos);
        if max_len < MIN_MATCH {
            return None;
        }

        let mut best: Option<Match> = None;
        // One below the shortest acceptable match, so only lengths >= 3 win.
        let mut best_len = MIN_MATCH - 1;

        let mut cand = self.head[hash3(&chunk[pos..])];
        while cand != NO_POS {
            let at = cand as usize;
            debug_assert!(at < pos);

            // A longer match must improve on the byte at `best_len`; checking
            // it first skips most candidates without a full comparison.
            if chunk[at + best_len] == chunk[pos + best_len] {
                let len = common_run(chunk, at, pos, max_len);
                if len > best_len {
                    best = Some(Match {
                        offset: pos - at,
                        length: len,
                    });
                    best_len = len;
                    if len == max_len {
                        break;
                    }
                }
            }

            cand = self.chain[at];
        }

        best
    }
}

/// Length of the common run between `chunk[at..]` and `chunk[pos..]`, up to
/// `max_len`. `at` may be closer than `max_len` behind `pos`; the run then
/// reads bytes it has itself matched, which is exactly the self-overlapping
/// copy the decompressor performs.
fn common_run(chunk: &[u8], at: usize, pos: usize, max_len: usize) -> usize {
    let mut len = 0;
    while len < max_len && chunk[at + len] == chunk[pos + len] {
        len += 1;
    }
    len
}

/// Multiplicative hash of three bytes, reduced to the head table's 12 bits.
fn hash3(bytes: &[u8]) -> usize {
    let v = u32::from(bytes[0]) | u32::from(bytes[1]) << 8 | u32::from(bytes[2]) << 16;
    (v.wrapping_mul(2654435761) >> 20) as usize
}
