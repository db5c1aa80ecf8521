use crate::sensors::{Action, Sensor};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// The parameter block consumed by the engine each generation.
///
/// The enabled sets restrict the *sampling domain* for fresh random genes
/// and index mutations; they do not restrict decoding. A genome wired into a
/// disabled index is still valid, the index simply never fires.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SimParams {
    /// Side of the square grid.
    pub grid_size: i32,
    /// Target number of agents per generation.
    pub pop_size: usize,
    /// Gene count for fresh random genomes.
    pub genome_len: usize,
    /// Ticks between generation boundaries.
    pub steps_per_gen: u32,
    /// Per-gene mutation probability.
    pub mutation_rate: f32,
    /// Per-genome append probability.
    pub insertion_rate: f32,
    /// Per-genome delete probability.
    pub deletion_rate: f32,
    /// Probability of the unequal crossover mode.
    pub unequal_rate: f32,
    pub enabled_sensors: Vec<Sensor>,
    pub enabled_actions: Vec<Action>,
    /// When set, fresh spawns must land outside the dilated safe zone.
    pub spawn_away: bool,
    /// Chebyshev margin of the dilation when `spawn_away` is set.
    pub spawn_margin: i32,
    /// Number of hidden neurons per brain.
    pub max_neurons: usize,
}

impl Default for SimParams {
    fn default() -> Self {
        SimParams {
            grid_size: 128,
            pop_size: 1000,
            genome_len: 12,
            steps_per_gen: 300,
            mutation_rate: 0.01,
            insertion_rate: 0.01,
            deletion_rate: 0.01,
            unequal_rate: 0.0,
            enabled_sensors: Sensor::ALL.to_vec(),
            enabled_actions: Action::ALL.to_vec(),
            spawn_away: false,
            spawn_margin: 5,
            max_neurons: 10,
        }
    }
}

impl SimParams {
    /// Clamp and backfill out-of-range fields. Probabilities land in
    /// `[0, 1]`, empty enabled sets fall back to the full sets (random gene
    /// sampling needs a non-empty domain), `max_neurons` stays within the
    /// 7-bit index space. `grid_size` is left alone here; the grid rejects
    /// it at construction.
    pub fn normalized(mut self) -> SimParams {
        self.mutation_rate = self.mutation_rate.clamp(0.0, 1.0);
        self.insertion_rate = self.insertion_rate.clamp(0.0, 1.0);
        self.deletion_rate = self.deletion_rate.clamp(0.0, 1.0);
        self.unequal_rate = self.unequal_rate.clamp(0.0, 1.0);
        self.spawn_margin = self.spawn_margin.max(0);
        self.max_neurons = self.max_neurons.clamp(1, 128);
        if self.enabled_sensors.is_empty() {
            self.enabled_sensors = Sensor::ALL.to_vec();
        }
        if self.enabled_actions.is_empty() {
            self.enabled_actions = Action::ALL.to_vec();
        }
        self
    }
}
