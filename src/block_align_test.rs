// src/block_align_test.rs

#[cfg(test)]
mod tests {
    use crate::align::AccurateAligner;
    use crate::block_align::FastAligner;
    use crate::defaults::{
        ABORT_SCORE, GAP_COST, MAX_INDEL_BUDGET, MAX_MISMATCH_BUDGET, MIS_COST,
    };
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn random_bases(len: usize, seed: u64) -> Vec<u8> {
        let mut rng = StdRng::seed_from_u64(seed);
        (0..len).map(|_| b"ACGT"[rng.gen_range(0..4)]).collect()
    }

    fn substitute(base: u8) -> u8 {
        match base {
            b'A' => b'C',
            b'C' => b'G',
            b'G' => b'T',
            _ => b'A',
        }
    }

    fn aligner() -> FastAligner {
        FastAligner::new(
            GAP_COST,
            MIS_COST,
            30,
            MAX_MISMATCH_BUDGET,
            MAX_INDEL_BUDGET,
        )
    }

    #[test]
    fn test_exact_read_maps_exactly_from_any_anchor() {
        let reference = random_bases(300, 53);
        let read = reference[100..250].to_vec();
        let mut aligner = aligner();
        for (ref_pos, read_pos) in [(100, 0), (150, 50), (249, 149)] {
            let aln = aligner.align(&reference, &read, ref_pos, read_pos);
            assert_eq!(aln.score, 0, "anchor ({}, {})", ref_pos, read_pos);
            assert_eq!(aln.begin, 100);
            assert_eq!(aln.end, 249);
            assert_eq!(aln.mismatches, 0);
            assert_eq!(aln.indels, 0);
        }
    }

    #[test]
    fn test_substitutions_tallied_across_blocks() {
        let reference = random_bases(300, 59);
        let mut read = reference[100..250].to_vec();
        for pos in [10, 75, 140] {
            read[pos] = substitute(read[pos]);
        }
        let aln = aligner().align(&reference, &read, 100, 0);
        assert_eq!(aln.score, 3 * MIS_COST);
        assert_eq!(aln.mismatches, 3);
        assert_eq!(aln.indels, 0);
        assert_eq!(aln.begin, 100);
        assert_eq!(aln.end, 249);
    }

    #[test]
    fn test_deletion_shifts_later_blocks() {
        let reference = random_bases(300, 61);
        let mut read = reference[100..251].to_vec();
        read.remove(70);
        assert_eq!(read.len(), 150);
        let aln = aligner().align(&reference, &read, 100, 0);
        assert_eq!(aln.score, GAP_COST);
        assert_eq!(aln.indels, 1);
        assert_eq!(aln.mismatches, 0);
        assert_eq!(aln.begin, 100);
        // the skipped reference base keeps the span one wider than the read
        assert_eq!(aln.end, 250);
    }

    #[test]
    fn test_insertion_shrinks_reference_span() {
        let reference = random_bases(300, 67);
        let mut read = reference[100..249].to_vec();
        let inserted = substitute(read[70]);
        read.insert(70, inserted);
        assert_eq!(read.len(), 150);
        let aln = aligner().align(&reference, &read, 100, 0);
        assert_eq!(aln.score, GAP_COST);
        assert_eq!(aln.indels, 1);
        assert_eq!(aln.begin, 100);
        assert_eq!(aln.end, 248);
    }

    #[test]
    fn test_mismatch_and_indel_combine() {
        let reference = random_bases(300, 71);
        let mut read = reference[100..251].to_vec();
        read[20] = substitute(read[20]);
        read.remove(100);
        let aln = aligner().align(&reference, &read, 100, 0);
        assert_eq!(aln.score, MIS_COST + GAP_COST);
        assert_eq!(aln.mismatches, 1);
        assert_eq!(aln.indels, 1);
        assert_eq!(aln.begin, 100);
        assert_eq!(aln.end, 250);
    }

    #[test]
    fn test_zero_budget_aborts_on_first_mismatch() {
        let reference = random_bases(300, 73);
        let mut read = reference[100..250].to_vec();
        read[120] = substitute(read[120]);
        let mut strict = FastAligner::new(GAP_COST, MIS_COST, 30, 0, 0);
        let aln = strict.align(&reference, &read, 100, 0);
        assert_eq!(aln.score, ABORT_SCORE);
    }

    #[test]
    fn test_matching_prefix_does_not_mask_a_bad_tail() {
        let reference = random_bases(400, 79);
        let mut read = reference[100..130].to_vec();
        read.extend(random_bases(120, 83));
        let aln = aligner().align(&reference, &read, 100, 0);
        assert_eq!(aln.score, ABORT_SCORE);
    }

    #[test]
    fn test_abandoned_anchor_clamps_to_chromosome_start() {
        let reference = random_bases(300, 89);
        let read = random_bases(150, 97);
        let aln = aligner().align(&reference, &read, 0, 10);
        assert_eq!(aln.score, ABORT_SCORE);
        assert_eq!(aln.begin, 0);
    }

    #[test]
    fn test_lowercase_read_matches_uppercase_reference() {
        let reference = random_bases(300, 101);
        let read: Vec<u8> = reference[80..230]
            .iter()
            .map(|b| b.to_ascii_lowercase())
            .collect();
        let aln = aligner().align(&reference, &read, 80, 0);
        assert_eq!(aln.score, 0);
        assert_eq!(aln.begin, 80);
        assert_eq!(aln.end, 229);
    }

    #[test]
    fn test_agrees_with_exact_scorer_on_clean_reads() {
        let reference = random_bases(300, 103);
        let read = reference[60..210].to_vec();
        let fast = aligner().align(&reference, &read, 90, 30);
        let accurate = AccurateAligner::new(GAP_COST, MIS_COST, 30).align(&reference, &read, 90, 30);
        assert_eq!(fast.score, accurate.score);
        assert_eq!(fast.begin, accurate.begin);
        assert_eq!(fast.end, accurate.end);
    }
}
