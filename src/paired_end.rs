// Paired-read mapping orchestrator.
//
// Both mates of a pair come from the same genomic fragment but opposite
// strands, so the mapper tries two orientation hypotheses, probes the k-mer
// index at sliding read offsets for both mates at once, and only considers a
// chromosome where both mates hit within the insert-size window. Candidate
// alignments are memoized per pair so nearby k-mer hits that resolve to the
// same interval are scored once. The search stops dead on a perfect pair.

use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use rayon::prelude::*;

use crate::align::{AccurateAligner, Alignment};
use crate::block_align::FastAligner;
use crate::codec::{reverse_complement, EncodedSequence};
use crate::defaults::{ABORT_SCORE, UNMAPPED_CEILING};
use crate::genome::{Chromosome, ChromosomeId};
use crate::index::GenomeIndex;
use crate::map_opt::{AlignerStrategy, MapOpt};
use crate::probability::ProbabilityModel;

/// Mapping strand of one mate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strand {
    Forward,
    Reverse,
}

impl Strand {
    /// The conventional single-character strand tag.
    pub fn symbol(self) -> char {
        match self {
            Strand::Forward => '+',
            Strand::Reverse => '-',
        }
    }
}

// Which mate is taken as sequenced and which reverse-complemented.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Orientation {
    Forward = 0,
    Reverse = 1,
}

impl Orientation {
    // Strand reported per mate when this hypothesis wins. Mates always end
    // up on opposite strands.
    fn strands(self) -> (Strand, Strand) {
        match self {
            Orientation::Forward => (Strand::Forward, Strand::Reverse),
            Orientation::Reverse => (Strand::Reverse, Strand::Forward),
        }
    }
}

/// One mate's placement. Coordinates are 1-based and inclusive.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MateMapping {
    pub chromosome: ChromosomeId,
    pub begin: usize,
    pub end: usize,
    pub strand: Strand,
    pub score: u32,
    pub mismatches: u32,
    pub indels: u32,
    pub probability: f64,
}

/// Outcome of mapping one read pair.
#[derive(Debug, Clone, PartialEq)]
pub enum PairResult {
    /// Both mates placed on one chromosome, on opposite strands, within the
    /// insert-size window. Lower combined scores are better; zero is a
    /// perfect pair.
    Mapped {
        mate1: MateMapping,
        mate2: MateMapping,
        score: u32,
    },
    /// No consistent placement scored below the sanity ceiling. Distinct
    /// from a low-confidence mapping, which still reports coordinates.
    Unmapped,
}

impl PairResult {
    pub fn is_mapped(&self) -> bool {
        matches!(self, PairResult::Mapped { .. })
    }
}

/// A read pair as handed over by the read loader; the name is carried along
/// for logging and caller-side reporting.
#[derive(Debug, Clone)]
pub struct ReadPair {
    pub name: String,
    pub mate1: Vec<u8>,
    pub mate2: Vec<u8>,
}

/// Cooperative cancellation for long mapping runs. Clones share one flag;
/// a pair that observes the flag mid-search yields [`PairResult::Unmapped`].
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        CancelToken::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

// Per-pair alignment memo, keyed by alignment end offset. A probe hits when
// its reference position falls inside an already-resolved interval: the
// first cached end at or past the position must have begun at or before it.
#[derive(Debug, Default)]
struct MemoCache {
    by_chromosome: HashMap<ChromosomeId, BTreeMap<usize, Alignment>>,
}

impl MemoCache {
    fn probe(&self, chromosome: ChromosomeId, ref_pos: usize) -> Option<Alignment> {
        let cached = self.by_chromosome.get(&chromosome)?;
        let (_, alignment) = cached.range(ref_pos..).next()?;
        (alignment.begin <= ref_pos).then_some(*alignment)
    }

    fn insert(&mut self, chromosome: ChromosomeId, alignment: Alignment) {
        self.by_chromosome
            .entry(chromosome)
            .or_default()
            .insert(alignment.end, alignment);
    }
}

// Scoring engine behind one pair's mapping attempt.
enum Scorer {
    Fast(FastAligner),
    Accurate(AccurateAligner),
}

impl Scorer {
    fn new(opt: &MapOpt) -> Scorer {
        match opt.aligner {
            AlignerStrategy::Fast => Scorer::Fast(FastAligner::new(
                opt.gap_cost,
                opt.mis_cost,
                opt.kmer_width,
                opt.max_mismatch_budget,
                opt.max_indel_budget,
            )),
            AlignerStrategy::Accurate => Scorer::Accurate(AccurateAligner::new(
                opt.gap_cost,
                opt.mis_cost,
                opt.kmer_width,
            )),
        }
    }

    fn align(
        &mut self,
        reference: &[u8],
        read: &[u8],
        ref_pos: usize,
        read_pos: usize,
    ) -> Alignment {
        match self {
            Scorer::Fast(fast) => fast.align(reference, read, ref_pos, read_pos),
            Scorer::Accurate(accurate) => accurate.align(reference, read, ref_pos, read_pos),
        }
    }
}

// Memoized alignment of one mate anchored at one reference position.
// Abandoned candidates are not cached; their intervals are approximate and
// recomputing them is what the fast path is for.
fn resolve(
    scorer: &mut Scorer,
    cache: &mut MemoCache,
    chromosome: &Chromosome,
    id: ChromosomeId,
    ref_pos: usize,
    read_pos: usize,
    read: &[u8],
) -> Alignment {
    if let Some(hit) = cache.probe(id, ref_pos) {
        return hit;
    }
    let alignment = scorer.align(chromosome.bases(), read, ref_pos, read_pos);
    if alignment.score < ABORT_SCORE {
        cache.insert(id, alignment);
    }
    alignment
}

struct Candidate {
    orientation: Orientation,
    chromosome: ChromosomeId,
    // indexed by mate
    alignments: [Alignment; 2],
}

/// Maps read pairs against a built [`GenomeIndex`].
///
/// The mapper is immutable and freely shared across workers; every
/// [`map_pair`](Self::map_pair) call owns its scratch aligner and memo
/// caches, so pairs parallelize with no synchronization on the hot path.
pub struct PairMapper<'a> {
    index: &'a GenomeIndex,
    model: ProbabilityModel,
}

impl<'a> PairMapper<'a> {
    pub fn new(index: &'a GenomeIndex) -> Self {
        let opt = index.options();
        PairMapper {
            index,
            model: ProbabilityModel::new(opt.read_len, opt.substitution_rate, opt.indel_rate),
        }
    }

    /// Map one pair to its best consistent placement.
    pub fn map_pair(&self, mate1: &[u8], mate2: &[u8]) -> PairResult {
        self.map_pair_with(mate1, mate2, &CancelToken::new())
    }

    /// Map a batch of pairs in parallel. Results line up with the input
    /// order; cancelling `cancel` drains the remaining pairs as unmapped.
    pub fn map_pairs(&self, pairs: &[ReadPair], cancel: &CancelToken) -> Vec<PairResult> {
        pairs
            .par_iter()
            .map(|pair| {
                let result = self.map_pair_with(&pair.mate1, &pair.mate2, cancel);
                if !result.is_mapped() {
                    log::debug!("{}: unmapped", pair.name);
                }
                result
            })
            .collect()
    }

    /// [`map_pair`](Self::map_pair) under a cancellation token, checked once
    /// per cursor step.
    pub fn map_pair_with(&self, mate1: &[u8], mate2: &[u8], cancel: &CancelToken) -> PairResult {
        let opt = self.index.options();
        let k = opt.kmer_width;

        let rc1 = reverse_complement(mate1);
        let rc2 = reverse_complement(mate2);

        // symbolic and packed forms per orientation hypothesis, mate-indexed
        let seqs: [[&[u8]; 2]; 2] = [[mate1, &rc2], [&rc1, mate2]];
        let encoded = [
            [EncodedSequence::encode(mate1), EncodedSequence::encode(&rc2)],
            [EncodedSequence::encode(&rc1), EncodedSequence::encode(mate2)],
        ];

        let mut scorer = Scorer::new(opt);
        let mut caches = [
            [MemoCache::default(), MemoCache::default()],
            [MemoCache::default(), MemoCache::default()],
        ];
        let mut best: Option<Candidate> = None;
        let mut best_score = UNMAPPED_CEILING;

        let probe_limit = mate1.len().min(mate2.len());
        let cursor_step = (k / 2).max(1);
        let mut cursor = 0;

        'search: while cursor + k <= probe_limit {
            if cancel.is_cancelled() {
                log::debug!("pair mapping cancelled");
                return PairResult::Unmapped;
            }
            // sub-k-mer shifts absorb indels upstream of the anchor
            for shift in 0..=opt.seed_shift_budget {
                let probe = cursor + shift;
                if probe + k > probe_limit {
                    break;
                }
                for orientation in [Orientation::Forward, Orientation::Reverse] {
                    let o = orientation as usize;
                    if encoded[o][0].window_overlaps_error(probe, k)
                        || encoded[o][1].window_overlaps_error(probe, k)
                    {
                        continue;
                    }
                    let kmers = [encoded[o][0].view(probe, k), encoded[o][1].view(probe, k)];
                    for id in self.index.genome().ids() {
                        let kmer_index = self.index.kmer_index(id);
                        let hits = [kmer_index.lookup(kmers[0]), kmer_index.lookup(kmers[1])];
                        if hits[0].is_empty() || hits[1].is_empty() {
                            continue;
                        }
                        // oversized hit sets are low-complexity repeats and
                        // carry no placement information
                        if hits[0].len() > opt.max_kmer_hits
                            || hits[1].len() > opt.max_kmer_hits
                        {
                            continue;
                        }
                        // scan the shorter list, range-probe the longer one
                        let (anchor_mate, partner_mate) = if hits[0].len() <= hits[1].len() {
                            (0, 1)
                        } else {
                            (1, 0)
                        };
                        let chromosome = self.index.genome().chromosome(id);
                        for &anchor_pos in hits[anchor_mate] {
                            let partner_hits = hits[partner_mate];
                            let lo = partner_hits
                                .partition_point(|&p| p + opt.max_insert_size <= anchor_pos);
                            let hi = partner_hits
                                .partition_point(|&p| p < anchor_pos + opt.max_insert_size);
                            if lo == hi {
                                continue;
                            }
                            let anchor_aln = resolve(
                                &mut scorer,
                                &mut caches[o][anchor_mate],
                                chromosome,
                                id,
                                anchor_pos,
                                probe,
                                seqs[o][anchor_mate],
                            );
                            if anchor_aln.score >= ABORT_SCORE {
                                continue;
                            }
                            for &partner_pos in &partner_hits[lo..hi] {
                                let partner_aln = resolve(
                                    &mut scorer,
                                    &mut caches[o][partner_mate],
                                    chromosome,
                                    id,
                                    partner_pos,
                                    probe,
                                    seqs[o][partner_mate],
                                );
                                if partner_aln.score >= ABORT_SCORE {
                                    continue;
                                }
                                let combined = anchor_aln.score + partner_aln.score;
                                if combined < best_score {
                                    best_score = combined;
                                    let alignments = if anchor_mate == 0 {
                                        [anchor_aln, partner_aln]
                                    } else {
                                        [partner_aln, anchor_aln]
                                    };
                                    best = Some(Candidate {
                                        orientation,
                                        chromosome: id,
                                        alignments,
                                    });
                                    if combined == 0 {
                                        break 'search;
                                    }
                                }
                            }
                        }
                    }
                }
            }
            cursor += cursor_step;
        }

        match best {
            Some(candidate) => {
                let (strand1, strand2) = candidate.orientation.strands();
                log::debug!(
                    "pair mapped to {} with combined score {}",
                    self.index.genome().chromosome(candidate.chromosome).name(),
                    best_score
                );
                PairResult::Mapped {
                    mate1: self.mate_mapping(candidate.chromosome, candidate.alignments[0], strand1),
                    mate2: self.mate_mapping(candidate.chromosome, candidate.alignments[1], strand2),
                    score: best_score,
                }
            }
            None => PairResult::Unmapped,
        }
    }

    // 1-based coordinates for the caller-facing record.
    fn mate_mapping(
        &self,
        chromosome: ChromosomeId,
        alignment: Alignment,
        strand: Strand,
    ) -> MateMapping {
        MateMapping {
            chromosome,
            begin: alignment.begin + 1,
            end: alignment.end + 1,
            strand,
            score: alignment.score,
            mismatches: alignment.mismatches,
            indels: alignment.indels,
            probability: self.model.probability(alignment.mismatches, alignment.indels),
        }
    }
}
