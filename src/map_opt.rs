// src/map_opt.rs
//
// Mapping options. One struct carries the whole tuning surface; `Default`
// holds the values from `defaults.rs` and `validate` is called by every
// fallible construction path before the options are used.

use crate::codec::BASES_PER_BLOCK;
use crate::defaults;
use crate::error::MapError;

/// Which scorer the pair mapper runs per candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlignerStrategy {
    /// Block-wise heuristic with early abandonment (the default).
    Fast,
    /// Full dynamic programming with traceback.
    Accurate,
}

/// Tuning options for indexing and paired-read mapping.
#[derive(Debug, Clone)]
pub struct MapOpt {
    // Indexing parameters
    pub kmer_width: usize, // Width of indexed and queried k-mers (at most 32)
    pub index_step: usize, // Index build stride; 1 for full recall, kmer_width for lean memory
    pub max_kmer_hits: usize, // Hit sets larger than this are treated as uninformative repeats

    // Scoring parameters
    pub gap_cost: u32, // Penalty per gap column
    pub mis_cost: u32, // Penalty per substitution column

    // Fast-aligner budgets
    pub max_mismatch_budget: u32, // Abandon a candidate past this many mismatches
    pub max_indel_budget: u32,    // Abandon a candidate past this many indels

    // Paired-end parameters
    pub max_insert_size: usize, // Mates further apart than this never pair
    pub read_len: usize,        // Expected read length, drives the confidence model
    pub seed_shift_budget: usize, // Extra sub-k-mer probe offsets per cursor position

    // Confidence model rates
    pub substitution_rate: f64, // Per-base substitution channel error rate
    pub indel_rate: f64,        // Per-base indel channel error rate

    pub aligner: AlignerStrategy,
}

impl Default for MapOpt {
    fn default() -> Self {
        MapOpt {
            kmer_width: defaults::KMER_WIDTH,
            index_step: defaults::INDEX_STEP,
            max_kmer_hits: defaults::MAX_KMER_HITS,
            gap_cost: defaults::GAP_COST,
            mis_cost: defaults::MIS_COST,
            max_mismatch_budget: defaults::MAX_MISMATCH_BUDGET,
            max_indel_budget: defaults::MAX_INDEL_BUDGET,
            max_insert_size: defaults::MAX_INSERT_SIZE,
            read_len: defaults::READ_LEN,
            seed_shift_budget: defaults::SEED_SHIFT_BUDGET,
            substitution_rate: defaults::SUBSTITUTION_RATE,
            indel_rate: defaults::INDEL_RATE,
            aligner: AlignerStrategy::Fast,
        }
    }
}

impl MapOpt {
    pub fn validate(&self) -> Result<(), MapError> {
        if self.kmer_width == 0 || self.kmer_width > BASES_PER_BLOCK {
            return Err(MapError::InvalidOption(format!(
                "kmer_width must be in 1..={}, got {}",
                BASES_PER_BLOCK, self.kmer_width
            )));
        }
        if self.index_step == 0 {
            return Err(MapError::InvalidOption("index_step must be at least 1".into()));
        }
        if self.read_len < self.kmer_width {
            return Err(MapError::InvalidOption(format!(
                "read_len {} is shorter than kmer_width {}",
                self.read_len, self.kmer_width
            )));
        }
        if self.gap_cost == 0 || self.mis_cost == 0 {
            return Err(MapError::InvalidOption(
                "gap_cost and mis_cost must be positive".into(),
            ));
        }
        if self.max_insert_size == 0 {
            return Err(MapError::InvalidOption("max_insert_size must be positive".into()));
        }
        for (name, rate) in [
            ("substitution_rate", self.substitution_rate),
            ("indel_rate", self.indel_rate),
        ] {
            if !(rate > 0.0 && rate < 1.0) {
                return Err(MapError::InvalidOption(format!(
                    "{} must lie strictly between 0 and 1, got {}",
                    name, rate
                )));
            }
        }
        Ok(())
    }
}
