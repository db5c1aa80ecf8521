//! Core types of the cambrian simulation: the bit-packed gene codec, genome
//! recombination, brain compilation and evaluation, the grid substrate, and
//! the agents that tie them together.

pub mod agent;
pub mod brain;
pub mod error;
pub mod genome;
pub mod grid;
pub mod params;
pub mod random_provider;
pub mod sensors;

pub use agent::{Agent, Decision};
pub use brain::{Brain, Connection, PrunedWiring};
pub use error::{CoreError, CoreResult};
pub use genome::ops::{crossover, mutate};
pub use genome::{BITS_PER_GENE, Gene, Genome, HEX_PER_GENE, SinkKind, SourceKind, WEIGHT_SCALE};
pub use grid::{BARRIER, EMPTY, Grid, PHEROMONE_DECAY, PHEROMONE_DIFFUSION};
pub use params::SimParams;
pub use sensors::{Action, Sensor};
