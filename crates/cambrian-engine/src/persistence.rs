//! Snapshot persistence: the world layout, the population and the
//! parameter block as JSON.
//!
//! Pheromones, counters and history are run state, not snapshot state; a
//! restored simulation starts at generation 1 with a zero field. Loading
//! never partially mutates anything: it either returns a whole new
//! [`Simulation`] or an error.

use crate::simulation::Simulation;
use crate::stats::RunHistory;
use cambrian_core::{Agent, CoreError, Genome, Grid, SimParams};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

pub type SnapshotResult<T> = Result<T, SnapshotError>;

#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("snapshot io: {0}")]
    Io(#[from] std::io::Error),

    #[error("snapshot format: {0}")]
    Format(#[from] serde_json::Error),
}

#[derive(Clone, Debug, Serialize, Deserialize)]
struct GridSnapshot {
    size: i32,
    barriers: Vec<(i32, i32)>,
    safe_zones: Vec<(i32, i32)>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
struct AgentSnapshot {
    id: u32,
    x: i32,
    y: i32,
    genome: String,
}

/// The serializable image of a simulation: parameters, world layout, and
/// the live population with hex genomes.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Snapshot {
    params: SimParams,
    grid: GridSnapshot,
    agents: Vec<AgentSnapshot>,
}

impl Snapshot {
    /// Captures the current state. Dead agents hold no grid cell and are
    /// not part of the image.
    pub fn capture(sim: &Simulation) -> Snapshot {
        let grid = sim.grid();
        let mut barriers = Vec::new();
        let mut safe_zones = Vec::new();
        for x in 0..grid.size() {
            for y in 0..grid.size() {
                if grid.is_barrier(x, y) {
                    barriers.push((x, y));
                }
                if grid.is_safe(x, y) {
                    safe_zones.push((x, y));
                }
            }
        }

        let agents = sim
            .agents()
            .iter()
            .filter(|agent| agent.alive())
            .map(|agent| {
                let (x, y) = agent.position();
                AgentSnapshot {
                    id: agent.id(),
                    x,
                    y,
                    genome: agent.genome().to_hex(),
                }
            })
            .collect();

        Snapshot {
            params: sim.params().clone(),
            grid: GridSnapshot {
                size: grid.size(),
                barriers,
                safe_zones,
            },
            agents,
        }
    }

    /// Rebuilds a simulation from the image.
    ///
    /// Agents whose cell is a barrier, out of bounds, or already claimed
    /// are silently dropped — the occupancy layer stays consistent with
    /// the arena. Ids are reassigned contiguously over the agents kept;
    /// the saved ids are informational.
    pub fn restore(&self) -> SnapshotResult<Simulation> {
        let mut params = self.params.clone().normalized();
        params.grid_size = self.grid.size;

        let mut grid = Grid::new(self.grid.size)?;
        for &(x, y) in &self.grid.barriers {
            grid.set_barrier(x, y);
        }
        for &(x, y) in &self.grid.safe_zones {
            grid.set_safe(x, y, true);
        }

        let mut agents = Vec::with_capacity(self.agents.len());
        for snapshot in &self.agents {
            let genome = Genome::from_hex(&snapshot.genome)?;
            if grid.is_empty(snapshot.x, snapshot.y) {
                let id = agents.len() as u32 + 1;
                grid.set_agent(snapshot.x, snapshot.y, id);
                agents.push(Agent::new(
                    id,
                    snapshot.x,
                    snapshot.y,
                    genome,
                    params.max_neurons,
                ));
            }
        }

        Ok(Simulation {
            grid,
            agents,
            params,
            generation: 1,
            step_in_gen: 0,
            kills_this_gen: 0,
            species: 0,
            history: RunHistory::default(),
        })
    }

    pub fn to_json(&self) -> SnapshotResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> SnapshotResult<Snapshot> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Writes the simulation image to a file.
pub fn save(sim: &Simulation, path: impl AsRef<Path>) -> SnapshotResult<()> {
    let json = Snapshot::capture(sim).to_json()?;
    fs::write(path, json)?;
    Ok(())
}

/// Reads a simulation image back from a file.
pub fn load(path: impl AsRef<Path>) -> SnapshotResult<Simulation> {
    let json = fs::read_to_string(path)?;
    Snapshot::from_json(&json)?.restore()
}
