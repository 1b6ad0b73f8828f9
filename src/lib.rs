// Paired short-read mapping: a 2-bit sequence codec, a k-mer hit index,
// global and block-wise aligners, and the per-pair orchestrator that ties
// them together. Reference and read parsing live with the caller; this
// crate's contract is the in-memory mapping API.

pub mod align; // Global dynamic-programming aligner with traceback
pub mod block_align; // Block-wise heuristic aligner with early abandonment
pub mod codec; // 2-bit packed sequences and reverse complement
pub mod defaults;
pub mod error;
pub mod genome; // Reference model: chromosomes and validated ids
pub mod index; // K-mer hit index, built per chromosome
pub mod map_opt;
pub mod paired_end; // Pair mapping orchestration
pub mod probability; // Binomial confidence model
