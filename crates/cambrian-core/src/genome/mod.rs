pub mod gene;
pub mod ops;

pub use gene::{BITS_PER_GENE, Gene, HEX_PER_GENE, SinkKind, SourceKind, WEIGHT_SCALE};

use crate::error::{CoreError, CoreResult};
use crate::params::SimParams;
use std::fmt::{Display, Formatter};
use std::hash::{BuildHasher, Hasher};

/// An ordered sequence of [`Gene`]s, the inheritable unit.
///
/// A genome has two equivalent representations: this structured form and the
/// DNA form, a hex string of [`HEX_PER_GENE`] characters per gene. The DNA
/// form is the canonical wire format and the substrate crossover splices at
/// nibble granularity.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Genome {
    genes: Vec<Gene>,
}

impl Genome {
    pub fn new(genes: Vec<Gene>) -> Genome {
        Genome { genes }
    }

    /// A fresh genome of `length` random genes drawn over the enabled
    /// domains of `params`.
    pub fn random(length: usize, params: &SimParams) -> Genome {
        (0..length).map(|_| Gene::random(params)).collect()
    }

    pub fn genes(&self) -> &[Gene] {
        &self.genes
    }

    pub fn genes_mut(&mut self) -> &mut [Gene] {
        &mut self.genes
    }

    pub fn len(&self) -> usize {
        self.genes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.genes.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Gene> {
        self.genes.iter()
    }

    pub fn push(&mut self, gene: Gene) {
        self.genes.push(gene);
    }

    pub fn remove(&mut self, index: usize) -> Gene {
        self.genes.remove(index)
    }

    /// The packed 32-bit words, one per gene.
    pub fn words(&self) -> Vec<u32> {
        self.genes.iter().map(Gene::pack).collect()
    }

    /// The DNA hex string: uppercase, no separators, length a multiple of
    /// [`HEX_PER_GENE`].
    pub fn to_hex(&self) -> String {
        let mut dna = String::with_capacity(self.genes.len() * HEX_PER_GENE);
        for gene in &self.genes {
            dna.push_str(&format!("{:08X}", gene.pack()));
        }
        dna
    }

    /// Parses a DNA hex string. Mixed case is accepted; a trailing partial
    /// window of fewer than [`HEX_PER_GENE`] characters is silently dropped.
    /// A non-hex character inside a full window is an error.
    pub fn from_hex(dna: &str) -> CoreResult<Genome> {
        let mut genes = Vec::with_capacity(dna.len() / HEX_PER_GENE);
        for window in dna.as_bytes().chunks_exact(HEX_PER_GENE) {
            let mut word = 0u32;
            for &c in window {
                let nibble = (c as char).to_digit(16).ok_or_else(|| {
                    CoreError::Dna(format!("invalid hex digit {:?}", c as char))
                })?;
                word = (word << 4) | nibble;
            }
            genes.push(Gene::unpack(word));
        }
        Ok(Genome { genes })
    }

    /// The DNA as nibble values, one per hex character. This is the numeric
    /// form the crossover splice points index into.
    pub fn to_nibbles(&self) -> Vec<u8> {
        let mut nibbles = Vec::with_capacity(self.genes.len() * HEX_PER_GENE);
        for gene in &self.genes {
            let word = gene.pack();
            for shift in (0..HEX_PER_GENE).rev() {
                nibbles.push(((word >> (shift * 4)) & 0xF) as u8);
            }
        }
        nibbles
    }

    /// Rebuilds a genome from nibble values, dropping a trailing partial
    /// gene. Total for any input.
    pub fn from_nibbles(nibbles: &[u8]) -> Genome {
        nibbles
            .chunks_exact(HEX_PER_GENE)
            .map(|window| {
                let word = window
                    .iter()
                    .fold(0u32, |word, &nibble| (word << 4) | (nibble & 0xF) as u32);
                Gene::unpack(word)
            })
            .collect()
    }

    /// The binary form, `'0'`/`'1'`, [`BITS_PER_GENE`] characters per gene.
    /// Primarily for Hamming comparisons and diagnostics.
    pub fn to_binary(&self) -> String {
        let mut bits = String::with_capacity(self.genes.len() * BITS_PER_GENE);
        for gene in &self.genes {
            bits.push_str(&format!("{:032b}", gene.pack()));
        }
        bits
    }

    /// A stable display color: a 32-bit hash of the `(source_index,
    /// sink_index)` sequence reduced mod 256³ and split into RGB. Equal
    /// genomes always map to the same color.
    pub fn color(&self) -> [u8; 3] {
        let mut hasher = foldhash::fast::FixedState::with_seed(0).build_hasher();
        for gene in &self.genes {
            hasher.write_u8(gene.source_index);
            hasher.write_u8(gene.sink_index);
        }
        let reduced = (hasher.finish() as u32) % (256 * 256 * 256);
        [
            (reduced % 256) as u8,
            ((reduced / 256) % 256) as u8,
            ((reduced / 65536) % 256) as u8,
        ]
    }
}

impl From<Vec<Gene>> for Genome {
    fn from(genes: Vec<Gene>) -> Genome {
        Genome { genes }
    }
}

impl FromIterator<Gene> for Genome {
    fn from_iter<I: IntoIterator<Item = Gene>>(iter: I) -> Genome {
        Genome {
            genes: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for Genome {
    type Item = Gene;
    type IntoIter = std::vec::IntoIter<Gene>;

    fn into_iter(self) -> Self::IntoIter {
        self.genes.into_iter()
    }
}

impl<'a> IntoIterator for &'a Genome {
    type Item = &'a Gene;
    type IntoIter = std::slice::Iter<'a, Gene>;

    fn into_iter(self) -> Self::IntoIter {
        self.genes.iter()
    }
}

impl Display for Genome {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_gene_genome() -> Genome {
        Genome::new(vec![
            Gene {
                source_kind: SourceKind::Sensor,
                source_index: 3,
                sink_kind: SinkKind::Neuron,
                sink_index: 5,
                weight: 1.0,
            },
            Gene {
                source_kind: SourceKind::Neuron,
                source_index: 5,
                sink_kind: SinkKind::Action,
                sink_index: 0,
                weight: -2.0,
            },
        ])
    }

    #[test]
    fn hex_encoding_is_uppercase_and_exact() {
        assert_eq!(two_gene_genome().to_hex(), "830520000580C000");
    }

    #[test]
    fn hex_decoding_accepts_mixed_case() {
        let upper = Genome::from_hex("830520000580C000").unwrap();
        let lower = Genome::from_hex("830520000580c000").unwrap();
        assert_eq!(upper, lower);
        assert_eq!(upper, two_gene_genome());
    }

    #[test]
    fn hex_decoding_drops_a_trailing_partial_window() {
        let genome = Genome::from_hex("830520000580C").unwrap();
        assert_eq!(genome.len(), 1);
        assert_eq!(genome.to_hex(), "83052000");
    }

    #[test]
    fn hex_decoding_rejects_garbage() {
        assert!(Genome::from_hex("8305200G").is_err());
    }

    #[test]
    fn nibble_form_round_trips() {
        let genome = two_gene_genome();
        assert_eq!(Genome::from_nibbles(&genome.to_nibbles()), genome);
    }

    #[test]
    fn binary_form_is_32_bits_per_gene() {
        let genome = two_gene_genome();
        let bits = genome.to_binary();
        assert_eq!(bits.len(), 64);
        assert_eq!(&bits[..32], "10000011000001010010000000000000");
    }

    #[test]
    fn color_is_stable_under_equality() {
        let genome = two_gene_genome();
        assert_eq!(genome.color(), genome.clone().color());
    }
}
