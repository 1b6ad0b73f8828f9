// K-mer hit index over a packed reference.
//
// One index per chromosome: every k-mer window of the reference, taken at a
// configurable stride, maps to the ascending list of genomic offsets where it
// occurs. A stride of 1 indexes every position; a stride of the full k-mer
// width cuts memory by the same factor but leaves coverage gaps, so a query
// k-mer is only found when its genomic position lands on the stride grid.

use std::collections::HashMap;

use rayon::prelude::*;

use crate::codec::EncodedSequence;
use crate::error::MapError;
use crate::genome::{ChromosomeId, Genome};
use crate::map_opt::MapOpt;

/// Map from k-mer integer to the genomic start offsets carrying it.
///
/// Built once per chromosome, read-only afterwards; lookups need no locking
/// however many mapping workers share the index.
#[derive(Debug, Clone)]
pub struct KmerIndex {
    k_width: usize,
    hits: HashMap<u64, Vec<usize>>,
}

impl KmerIndex {
    /// Slide a `k_width` window by `step` across `reference` and record each
    /// window's packed value. Windows covering the recorded encoding error
    /// are unreliable keys and stay out of the index.
    pub fn build(reference: &EncodedSequence, k_width: usize, step: usize) -> KmerIndex {
        assert!(step > 0, "index step must be at least 1");
        let mut hits: HashMap<u64, Vec<usize>> = HashMap::new();
        let mut start = 0;
        while start + k_width <= reference.len() {
            if !reference.window_overlaps_error(start, k_width) {
                // ascending starts keep every hit list sorted
                hits.entry(reference.view(start, k_width))
                    .or_default()
                    .push(start);
            }
            start += step;
        }
        KmerIndex { k_width, hits }
    }

    pub fn k_width(&self) -> usize {
        self.k_width
    }

    /// Number of distinct k-mers held.
    pub fn len(&self) -> usize {
        self.hits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hits.is_empty()
    }

    /// Ascending genomic start offsets of `kmer`; empty on a miss, which is
    /// an ordinary no-candidate outcome rather than an error.
    pub fn lookup(&self, kmer: u64) -> &[usize] {
        self.hits.get(&kmer).map(Vec::as_slice).unwrap_or(&[])
    }
}

/// A genome together with one `KmerIndex` per chromosome and the options the
/// indexes were built under. Constructed once, then shared by reference
/// across all mapping workers.
#[derive(Debug, Clone)]
pub struct GenomeIndex {
    genome: Genome,
    opt: MapOpt,
    indexes: Vec<KmerIndex>,
}

impl GenomeIndex {
    /// Validate `opt` and index every chromosome of `genome`, in parallel.
    pub fn build(genome: Genome, opt: MapOpt) -> Result<GenomeIndex, MapError> {
        opt.validate()?;
        if genome.is_empty() {
            return Err(MapError::EmptyReference);
        }
        let indexes: Vec<KmerIndex> = genome
            .chromosomes()
            .par_iter()
            .map(|chromosome| {
                let index =
                    KmerIndex::build(chromosome.encoded(), opt.kmer_width, opt.index_step);
                log::info!(
                    "indexed {}: {} bases, {} distinct {}-mers",
                    chromosome.name(),
                    chromosome.len(),
                    index.len(),
                    opt.kmer_width
                );
                index
            })
            .collect();
        Ok(GenomeIndex {
            genome,
            opt,
            indexes,
        })
    }

    pub fn genome(&self) -> &Genome {
        &self.genome
    }

    pub fn options(&self) -> &MapOpt {
        &self.opt
    }

    pub fn kmer_index(&self, id: ChromosomeId) -> &KmerIndex {
        &self.indexes[id.index()]
    }
}
