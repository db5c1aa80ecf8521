//! Recombination and mutation over genomes.
//!
//! Crossover splices the parents' DNA at nibble granularity; a pivot that
//! lands inside a gene fuses two half-genes into one new word, which still
//! decodes (see [`Gene`](super::Gene)). The deterministic splice primitives
//! are exposed alongside the randomized operators.

use crate::genome::gene::{random_sink_index, random_source_index};
use crate::genome::{Gene, Genome, SinkKind, SourceKind};
use crate::params::SimParams;
use crate::random_provider;

/// Mutates `genome` in place.
///
/// Each gene independently mutates with probability `mutation_rate`; a
/// mutating gene changes exactly one of five traits, picked uniformly: flip
/// the source kind, resample the source index, flip the sink kind, resample
/// the sink index, or nudge the weight by a uniform draw on `[-1, +1]`.
/// Index resampling draws from the domain of the gene's current kind.
///
/// After the per-gene pass the genome may shrink by one random gene (with
/// probability `deletion_rate`, never below one gene) and may grow by one
/// fresh random gene (with probability `insertion_rate`).
pub fn mutate(genome: &mut Genome, params: &SimParams) {
    for gene in genome.genes_mut() {
        if !random_provider::bool(params.mutation_rate) {
            continue;
        }
        match random_provider::range(0..5u8) {
            0 => {
                gene.source_kind = match gene.source_kind {
                    SourceKind::Neuron => SourceKind::Sensor,
                    SourceKind::Sensor => SourceKind::Neuron,
                };
            }
            1 => gene.source_index = random_source_index(gene.source_kind, params),
            2 => {
                gene.sink_kind = match gene.sink_kind {
                    SinkKind::Neuron => SinkKind::Action,
                    SinkKind::Action => SinkKind::Neuron,
                };
            }
            3 => gene.sink_index = random_sink_index(gene.sink_kind, params),
            _ => gene.weight += random_provider::range(-1.0f32..1.0),
        }
    }

    if genome.len() > 1 && random_provider::bool(params.deletion_rate) {
        let index = random_provider::range(0..genome.len());
        genome.remove(index);
    }
    if random_provider::bool(params.insertion_rate) {
        genome.push(Gene::random(params));
    }
}

/// Produces a child genome from two parents.
///
/// With probability `unequal_rate` the unequal mode runs: a pivot anywhere
/// in the first parent's DNA, matched against a jittered pivot (±16
/// nibbles) in the second. Otherwise the equal mode splices both parents at
/// the same pivot, drawn strictly inside the shorter DNA. An empty parent
/// yields a copy of the other; two empty parents yield an empty child.
pub fn crossover(one: &Genome, two: &Genome, params: &SimParams) -> Genome {
    if one.is_empty() && two.is_empty() {
        return Genome::default();
    }
    if one.is_empty() {
        return two.clone();
    }
    if two.is_empty() {
        return one.clone();
    }

    let dna_one = one.to_nibbles();
    let dna_two = two.to_nibbles();

    if random_provider::bool(params.unequal_rate) {
        let pivot_one = random_provider::range(0..dna_one.len() + 1);
        let jitter = random_provider::range(-16i64..17);
        let pivot_two = (pivot_one as i64 + jitter).clamp(0, dna_two.len() as i64) as usize;
        splice_unequal(&dna_one, &dna_two, pivot_one, pivot_two)
    } else {
        let pivot = random_provider::range(1..dna_one.len().min(dna_two.len()));
        splice_equal(&dna_one, &dna_two, pivot)
    }
}

/// `one[..pivot] ⧺ two[pivot..]`, reparsed. The pivot must satisfy
/// `1 <= pivot < min(|one|, |two|)`.
pub fn splice_equal(one: &[u8], two: &[u8], pivot: usize) -> Genome {
    let mut child = Vec::with_capacity(one.len().max(two.len()));
    child.extend_from_slice(&one[..pivot]);
    child.extend_from_slice(&two[pivot..]);
    Genome::from_nibbles(&child)
}

/// `one[..pivot_one] ⧺ two[pivot_two..]`, reparsed; a trailing fractional
/// gene is dropped. Pivots must be within the respective DNA lengths.
pub fn splice_unequal(one: &[u8], two: &[u8], pivot_one: usize, pivot_two: usize) -> Genome {
    let mut child = Vec::with_capacity(pivot_one + (two.len() - pivot_two));
    child.extend_from_slice(&one[..pivot_one]);
    child.extend_from_slice(&two[pivot_two..]);
    Genome::from_nibbles(&child)
}
