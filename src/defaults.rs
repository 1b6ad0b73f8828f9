// src/defaults.rs

// Indexing constants
pub const KMER_WIDTH: usize = 30;
pub const INDEX_STEP: usize = 1;
pub const MAX_KMER_HITS: usize = 2;

// Scoring constants
pub const GAP_COST: u32 = 25;
pub const MIS_COST: u32 = 13;

// Paired-end constants
pub const READ_LEN: usize = 150;
pub const MAX_INSERT_SIZE: usize = 700;
pub const SEED_SHIFT_BUDGET: usize = 2;

// Fast-aligner budgets
pub const MAX_MISMATCH_BUDGET: u32 = 12;
pub const MAX_INDEL_BUDGET: u32 = 4;
pub const ABORT_SCORE: u32 = 100_000;

// Pairs scoring at or above this ceiling are reported unmapped
pub const UNMAPPED_CEILING: u32 = 2_000_000;

// Per-base error rates for the confidence model
pub const SUBSTITUTION_RATE: f64 = 0.01;
pub const INDEL_RATE: f64 = 0.001;
