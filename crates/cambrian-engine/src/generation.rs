//! The generation boundary: selection by survival, reproduction, respawn.

use crate::genomics;
use crate::simulation::Simulation;
use crate::stats::GenerationSummary;
use cambrian_core::{Agent, Genome, crossover, mutate};
use tracing::info;

impl Simulation {
    /// Runs the boundary between two generations: records the analytics
    /// summary and the species count, resets the world, and builds the next
    /// population — children of the survivors, or a fresh random population
    /// after an extinction.
    ///
    /// Parents are drawn uniformly with replacement, so a survivor may cross
    /// with itself and produce a near-clone. Agents that find no spawn cell
    /// within the search budget are dropped; ids are assigned contiguously
    /// over the agents actually placed.
    pub(crate) fn turn_generation(&mut self) {
        let survivor_genomes = self
            .agents
            .iter()
            .filter(|agent| {
                let (x, y) = agent.position();
                agent.alive() && self.grid.is_safe(x, y)
            })
            .map(|agent| agent.genome().clone())
            .collect::<Vec<Genome>>();

        let live = self
            .agents
            .iter()
            .filter(|agent| agent.alive())
            .collect::<Vec<&Agent>>();
        let mean_genome_len = live
            .iter()
            .map(|agent| agent.genome().len())
            .sum::<usize>() as f32
            / live.len().max(1) as f32;

        self.species = genomics::species_count(&survivor_genomes);

        let summary = GenerationSummary {
            generation: self.generation,
            survivors: survivor_genomes.len(),
            kills: self.kills_this_gen,
            mean_genome_len,
            species: self.species,
        };
        info!(
            generation = summary.generation,
            survivors = summary.survivors,
            kills = summary.kills,
            mean_genome_len = summary.mean_genome_len,
            species = summary.species,
            "generation complete"
        );
        self.history.push(summary);

        self.grid.clear_occupancy();
        self.grid.clear_pheromones();
        self.agents.clear();

        if survivor_genomes.is_empty() {
            self.spawn_random_population();
        } else {
            for _ in 0..self.params.pop_size {
                let one = cambrian_core::random_provider::choose(&survivor_genomes);
                let two = cambrian_core::random_provider::choose(&survivor_genomes);
                let mut child = crossover(one, two, &self.params);
                mutate(&mut child, &self.params);
                self.place_new_agent(child);
            }
        }

        self.kills_this_gen = 0;
    }

    /// Fills the world with `pop_size` fresh random genomes.
    pub(crate) fn spawn_random_population(&mut self) {
        for _ in 0..self.params.pop_size {
            let genome = Genome::random(self.params.genome_len, &self.params);
            self.place_new_agent(genome);
        }
    }

    /// Finds a spawn cell for one new agent and writes it into the arena
    /// and the occupancy layer. A failed search drops the agent silently.
    fn place_new_agent(&mut self, genome: Genome) {
        let location = self
            .grid
            .find_empty_cell(self.params.spawn_away, self.params.spawn_margin);
        if let Some((x, y)) = location {
            let id = self.agents.len() as u32 + 1;
            self.grid.set_agent(x, y, id);
            self.agents
                .push(Agent::new(id, x, y, genome, self.params.max_neurons));
        }
    }
}
