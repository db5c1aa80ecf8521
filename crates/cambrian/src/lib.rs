//! A generational neuro-evolution sandbox.
//!
//! Small recurrent neural networks, encoded as bit-packed genomes, are
//! selected by survival on a 2D grid and reproduced with crossover and
//! mutation. This crate re-exports the core types and the engine.

pub use cambrian_core::*;
pub use cambrian_engine::*;
