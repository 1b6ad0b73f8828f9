// Global alignment with full traceback.
//
// The read is padded with '+' filler on both ends and run through a
// minimum-cost Needleman-Wunsch recurrence against a reference window sized
// with an indel contingency on each side of the anchor. The filler lets the
// whole read take part in the recurrence even when the true match starts
// before or after the coarse anchor; filler and flanking-gap columns are
// trimmed from the final alignment and their cost charged back.

/// Placement and cost of one read against one reference region.
///
/// Offsets are 0-based and `end` is inclusive. Lower scores are better;
/// zero means a perfect match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Alignment {
    pub begin: usize,
    pub end: usize,
    pub score: u32,
    pub mismatches: u32,
    pub indels: u32,
}

// Bases compare case-insensitively. The '+' filler and '*' sentinel are not
// bases and therefore never match anything on the opposite side.
pub(crate) fn symbols_match(a: u8, b: u8) -> bool {
    a.eq_ignore_ascii_case(&b)
}

// Fill the (len1+1) x (len2+1) score matrix, row-major, and return the total
// at (len1, len2). Boundary cells charge one gap per skipped symbol.
pub(crate) fn score_matrix(
    seq1: &[u8],
    seq2: &[u8],
    gap_cost: u32,
    mis_cost: u32,
    matrix: &mut Vec<u32>,
) -> u32 {
    let rows = seq1.len();
    let cols = seq2.len();
    let width = cols + 1;
    matrix.clear();
    matrix.resize((rows + 1) * width, 0);

    for i in 0..=rows {
        matrix[i * width] = i as u32 * gap_cost;
    }
    for j in 0..=cols {
        matrix[j] = j as u32 * gap_cost;
    }

    for i in 1..=rows {
        for j in 1..=cols {
            let sub = matrix[(i - 1) * width + j - 1]
                + if symbols_match(seq1[i - 1], seq2[j - 1]) {
                    0
                } else {
                    mis_cost
                };
            let up = matrix[(i - 1) * width + j] + gap_cost;
            let left = matrix[i * width + j - 1] + gap_cost;
            matrix[i * width + j] = sub.min(up).min(left);
        }
    }
    matrix[rows * width + cols]
}

// Walk the score matrix back from (i0, j0) to the origin, preferring a
// substitution over a gap in seq2 over a gap in seq1, and return the aligned
// strings in forward order with '-' marking gaps.
pub(crate) fn traceback(
    seq1: &[u8],
    seq2: &[u8],
    matrix: &[u32],
    i0: usize,
    j0: usize,
    gap_cost: u32,
    mis_cost: u32,
) -> (Vec<u8>, Vec<u8>) {
    let width = seq2.len() + 1;
    let mut x = Vec::with_capacity(i0 + j0);
    let mut y = Vec::with_capacity(i0 + j0);

    let (mut i, mut j) = (i0, j0);
    while i != 0 && j != 0 {
        let here = matrix[i * width + j];
        let sub = if symbols_match(seq1[i - 1], seq2[j - 1]) {
            0
        } else {
            mis_cost
        };
        if here == matrix[(i - 1) * width + j - 1] + sub {
            x.push(seq1[i - 1]);
            y.push(seq2[j - 1]);
            i -= 1;
            j -= 1;
        } else if here == matrix[(i - 1) * width + j] + gap_cost {
            x.push(seq1[i - 1]);
            y.push(b'-');
            i -= 1;
        } else {
            x.push(b'-');
            y.push(seq2[j - 1]);
            j -= 1;
        }
    }
    while j > 0 {
        x.push(b'-');
        y.push(seq2[j - 1]);
        j -= 1;
    }
    while i > 0 {
        x.push(seq1[i - 1]);
        y.push(b'-');
        i -= 1;
    }

    x.reverse();
    y.reverse();
    (x, y)
}

/// Exact scorer: full dynamic programming with traceback.
///
/// Each instance owns its scratch matrix; concurrent mapping workers must
/// construct one aligner each rather than share a single instance.
#[derive(Debug)]
pub struct AccurateAligner {
    gap_cost: u32,
    mis_cost: u32,
    anchor_width: usize,
    matrix: Vec<u32>,
}

impl AccurateAligner {
    pub fn new(gap_cost: u32, mis_cost: u32, anchor_width: usize) -> Self {
        AccurateAligner {
            gap_cost,
            mis_cost,
            anchor_width,
            matrix: Vec::new(),
        }
    }

    /// Align `read` against `reference` assuming the read symbol at
    /// `read_pos` sits at or near `ref_pos`, which must lie inside the
    /// reference. A window that would run off either end of the reference
    /// is clipped and the shortfall surfaces as gap columns.
    pub fn align(
        &mut self,
        reference: &[u8],
        read: &[u8],
        ref_pos: usize,
        read_pos: usize,
    ) -> Alignment {
        debug_assert!(ref_pos < reference.len());
        let gap = self.gap_cost;
        let mis = self.mis_cost;

        if read.is_empty() || reference.is_empty() {
            return Alignment {
                begin: 0,
                end: 0,
                score: read.len() as u32 * gap,
                mismatches: 0,
                indels: read.len() as u32,
            };
        }

        // indel contingency on each side of the anchor
        let front = read_pos * mis as usize / gap as usize;
        let rear = read.len().saturating_sub(read_pos + self.anchor_width) * mis as usize
            / gap as usize;

        let start = ref_pos.saturating_sub(read_pos + front);
        let length = (read.len() + front + rear).min(reference.len() - start);
        let window = &reference[start..start + length];

        let mut padded = Vec::with_capacity(front + read.len() + rear);
        padded.resize(front, b'+');
        padded.extend_from_slice(read);
        padded.resize(padded.len() + rear, b'+');

        let total = score_matrix(&padded, window, gap, mis, &mut self.matrix);
        let (x, y) = traceback(
            &padded,
            window,
            &self.matrix,
            padded.len(),
            window.len(),
            gap,
            mis,
        );

        // Trim filler and flanking-gap columns off both ends, charging their
        // cost back. Columns holding a real read base stay, so a window
        // clipped at a chromosome boundary keeps its gap charge.
        let la = x.len();
        let mut score = total;
        let mut skip_front = 0;
        while skip_front < la && (x[skip_front] == b'-' || x[skip_front] == b'+') {
            score -= if x[skip_front] == b'-' || y[skip_front] == b'-' {
                gap
            } else {
                mis
            };
            skip_front += 1;
        }
        let mut skip_rear = 0;
        while skip_rear < la - skip_front && {
            let c = x[la - 1 - skip_rear];
            c == b'-' || c == b'+'
        } {
            score -= if x[la - 1 - skip_rear] == b'-' || y[la - 1 - skip_rear] == b'-' {
                gap
            } else {
                mis
            };
            skip_rear += 1;
        }

        let mut mismatches = 0;
        let mut indels = 0;
        for pos in skip_front..la - skip_rear {
            if x[pos] == b'-' || y[pos] == b'-' {
                indels += 1;
            } else if !symbols_match(x[pos], y[pos]) {
                mismatches += 1;
            }
        }

        // Mapped interval: window origin advanced by the reference bases
        // consumed inside the trimmed flanks.
        let front_ref = y[..skip_front].iter().filter(|&&c| c != b'-').count();
        let rear_ref = y[la - skip_rear..].iter().filter(|&&c| c != b'-').count();
        let begin = start + front_ref;
        let end = (start + window.len() - rear_ref).saturating_sub(1).max(begin);

        Alignment {
            begin,
            end,
            score,
            mismatches,
            indels,
        }
    }
}

#[path = "align_test.rs"]
mod align_test;
