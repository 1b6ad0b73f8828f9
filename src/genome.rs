// Reference genome model.
//
// A `Genome` owns one `Chromosome` per reference sequence; chromosomes are
// addressed through `ChromosomeId` handles minted when they are added, so
// downstream code never carries raw integer indexes around.

use crate::codec::EncodedSequence;

/// Bounds-checked handle to a chromosome within one `Genome`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChromosomeId(u32);

impl ChromosomeId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// One reference sequence, kept both symbolically (for alignment) and packed
/// (for k-mer extraction).
#[derive(Debug, Clone)]
pub struct Chromosome {
    name: String,
    bases: Vec<u8>,
    encoded: EncodedSequence,
}

impl Chromosome {
    pub fn new(name: impl Into<String>, bases: impl Into<Vec<u8>>) -> Self {
        let name = name.into();
        let bases = bases.into();
        let encoded = EncodedSequence::encode(&bases);
        if let Some(pos) = encoded.error_position() {
            log::warn!(
                "reference {}: non-ACGT symbol at offset {}; overlapping k-mers will not be indexed",
                name,
                pos
            );
        }
        Chromosome {
            name,
            bases,
            encoded,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn bases(&self) -> &[u8] {
        &self.bases
    }

    pub fn encoded(&self) -> &EncodedSequence {
        &self.encoded
    }

    pub fn len(&self) -> usize {
        self.bases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bases.is_empty()
    }
}

/// An immutable, ordered set of chromosomes. Built once before mapping
/// starts and shared read-only afterwards.
#[derive(Debug, Clone, Default)]
pub struct Genome {
    chromosomes: Vec<Chromosome>,
}

impl Genome {
    pub fn new() -> Self {
        Genome::default()
    }

    /// Append a chromosome and hand back its id.
    pub fn add(&mut self, chromosome: Chromosome) -> ChromosomeId {
        let id = ChromosomeId(self.chromosomes.len() as u32);
        self.chromosomes.push(chromosome);
        id
    }

    pub fn chromosome(&self, id: ChromosomeId) -> &Chromosome {
        &self.chromosomes[id.index()]
    }

    pub fn chromosomes(&self) -> &[Chromosome] {
        &self.chromosomes
    }

    pub fn ids(&self) -> impl Iterator<Item = ChromosomeId> {
        (0..self.chromosomes.len() as u32).map(ChromosomeId)
    }

    pub fn len(&self) -> usize {
        self.chromosomes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chromosomes.is_empty()
    }
}
