// 2-bit packed DNA sequences with O(1) windowed random access.
//
// Bases are coded T=0, G=1, A=2, C=3 and packed 32 to a u64 block, low bits
// first. Any other symbol is coded as T so processing can continue; the first
// offending position is recorded and never overwritten.

/// Number of bases packed into one numeric block.
pub const BASES_PER_BLOCK: usize = 32;

// Symbol -> 2-bit code; 4 marks a symbol outside {A,C,G,T,a,c,g,t}.
const BASE_CODE: [u8; 128] = [
    4, 4, 4, 4, 4, 4, 4, 4, 4, 4, 4, 4, 4, 4, 4, 4, //   0- 15
    4, 4, 4, 4, 4, 4, 4, 4, 4, 4, 4, 4, 4, 4, 4, 4, //  16- 31
    4, 4, 4, 4, 4, 4, 4, 4, 4, 4, 4, 4, 4, 4, 4, 4, //  32- 47
    4, 4, 4, 4, 4, 4, 4, 4, 4, 4, 4, 4, 4, 4, 4, 4, //  48- 63
    4, 2, 4, 3, 4, 4, 4, 1, 4, 4, 4, 4, 4, 4, 4, 4, //  64- 79  A C G
    4, 4, 4, 4, 0, 4, 4, 4, 4, 4, 4, 4, 4, 4, 4, 4, //  80- 95  T
    4, 2, 4, 3, 4, 4, 4, 1, 4, 4, 4, 4, 4, 4, 4, 4, //  96-111  a c g
    4, 4, 4, 4, 0, 4, 4, 4, 4, 4, 4, 4, 4, 4, 4, 4, // 112-127  t
];

// 2-bit code -> uppercase symbol.
const CODE_BASE: [u8; 4] = [b'T', b'G', b'A', b'C'];

// Base complement, case preserving; everything else maps to 'N'.
const COMPLEMENT: [u8; 128] = [
    b'N', b'N', b'N', b'N', b'N', b'N', b'N', b'N', b'N', b'N', b'N', b'N', b'N', b'N', b'N', b'N',
    b'N', b'N', b'N', b'N', b'N', b'N', b'N', b'N', b'N', b'N', b'N', b'N', b'N', b'N', b'N', b'N',
    b'N', b'N', b'N', b'N', b'N', b'N', b'N', b'N', b'N', b'N', b'N', b'N', b'N', b'N', b'N', b'N',
    b'N', b'N', b'N', b'N', b'N', b'N', b'N', b'N', b'N', b'N', b'N', b'N', b'N', b'N', b'N', b'N',
    b'N', b'T', b'N', b'G', b'N', b'N', b'N', b'C', b'N', b'N', b'N', b'N', b'N', b'N', b'N', b'N',
    b'N', b'N', b'N', b'N', b'A', b'N', b'N', b'N', b'N', b'N', b'N', b'N', b'N', b'N', b'N', b'N',
    b'n', b't', b'n', b'g', b'n', b'n', b'n', b'c', b'n', b'n', b'n', b'n', b'n', b'n', b'n', b'n',
    b'n', b'n', b'n', b'n', b'a', b'n', b'n', b'n', b'n', b'n', b'n', b'n', b'n', b'n', b'n', b'n',
];

/// Reverse complement of a base string. Case is preserved; bytes outside the
/// complement table come back as 'N'.
pub fn reverse_complement(sequence: &[u8]) -> Vec<u8> {
    sequence
        .iter()
        .rev()
        .map(|&b| if b < 128 { COMPLEMENT[b as usize] } else { b'N' })
        .collect()
}

/// A DNA sequence packed at 2 bits per base.
///
/// The packing is not invertible for trailing T runs (code 0), so the
/// original length travels with the blocks.
#[derive(Debug, Clone)]
pub struct EncodedSequence {
    blocks: Vec<u64>,
    len: usize,
    error_pos: Option<usize>,
}

impl EncodedSequence {
    /// Pack a symbolic sequence. Symbols outside {A,C,G,T,a,c,g,t} are coded
    /// as T and the first such position is recorded.
    pub fn encode(symbols: &[u8]) -> Self {
        let len = symbols.len();
        // one spare zero block so a view starting in the last block can
        // always read its neighbour
        let mut blocks = vec![0u64; len / BASES_PER_BLOCK + 2];
        let mut error_pos = None;
        for (pos, &sym) in symbols.iter().enumerate() {
            let mut code = if sym < 128 { BASE_CODE[sym as usize] } else { 4 };
            if code > 3 {
                if error_pos.is_none() {
                    error_pos = Some(pos);
                }
                code = 0;
            }
            blocks[pos / BASES_PER_BLOCK] |= (code as u64) << ((pos % BASES_PER_BLOCK) * 2);
        }
        EncodedSequence {
            blocks,
            len,
            error_pos,
        }
    }

    /// Length of the original symbolic sequence in bases.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// 0-based position of the first symbol that could not be coded, if any.
    pub fn error_position(&self) -> Option<usize> {
        self.error_pos
    }

    /// Whether `[start, start + width)` covers the recorded encoding error.
    /// Windows for which this holds are unreliable as index keys.
    pub fn window_overlaps_error(&self, start: usize, width: usize) -> bool {
        matches!(self.error_pos, Some(e) if start <= e && e < start + width)
    }

    /// The `width`-base window starting at `start`, packed into one integer
    /// with the base at `start` in the low 2 bits. Windows spanning a block
    /// boundary are stitched together from both blocks.
    ///
    /// `width` above [`BASES_PER_BLOCK`] is a precondition violation and
    /// panics. A `start` at or past the end returns 0; the caller is
    /// expected to bound-check against [`len`](Self::len).
    pub fn view(&self, start: usize, width: usize) -> u64 {
        assert!(
            width <= BASES_PER_BLOCK,
            "view width {} exceeds the {}-base block span",
            width,
            BASES_PER_BLOCK
        );
        if start >= self.len || width == 0 {
            return 0;
        }
        let block = start / BASES_PER_BLOCK;
        let index = start % BASES_PER_BLOCK;
        let spill = (index + width) as isize - BASES_PER_BLOCK as isize;
        let mut value = self.blocks[block] >> (index * 2);
        if spill > 0 {
            value |= (self.blocks[block + 1] & ((1u64 << (spill * 2)) - 1))
                << ((BASES_PER_BLOCK - index) * 2);
        } else if width < BASES_PER_BLOCK {
            value &= (1u64 << (width * 2)) - 1;
        }
        value
    }
}

/// Unpack a fixed-length code back into an uppercase base string. Diagnostic
/// helper; alignment never goes through the symbolic form.
pub fn decode(value: u64, length: usize) -> String {
    assert!(
        length <= BASES_PER_BLOCK,
        "decode length {} exceeds the {}-base block span",
        length,
        BASES_PER_BLOCK
    );
    let mut out = String::with_capacity(length);
    for pos in 0..length {
        out.push(CODE_BASE[((value >> (pos * 2)) & 0x3) as usize] as char);
    }
    out
}

#[path = "codec_test.rs"]
mod codec_test;
