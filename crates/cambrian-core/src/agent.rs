use crate::brain::Brain;
use crate::genome::Genome;
use crate::grid::Grid;
use crate::random_provider;
use crate::sensors::{Action, Sensor};

/// Length of the forward probe used by the vision sensors.
const PROBE_DISTANCE: i32 = 10;

/// What an agent wants to do this step, decoded from its action levels.
/// The scheduler owns applying it to the world.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Decision {
    pub dx: i32,
    pub dy: i32,
    /// Positive emission level; the scheduler deposits `0.5 * emit`.
    pub emit: f32,
    /// Kill requested on the forward neighbor cell.
    pub kill: bool,
}

/// One individual: a position, an inherited genome, and the brain compiled
/// from it. Agents live in an arena indexed by `id - 1`; the grid's
/// occupancy layer refers to them by id only.
#[derive(Clone, Debug)]
pub struct Agent {
    id: u32,
    x: i32,
    y: i32,
    genome: Genome,
    brain: Brain,
    last_move: (i32, i32),
    alive: bool,
    color: [u8; 3],
}

impl Agent {
    pub fn new(id: u32, x: i32, y: i32, genome: Genome, max_neurons: usize) -> Agent {
        let brain = Brain::compile(&genome, max_neurons);
        let color = genome.color();
        Agent {
            id,
            x,
            y,
            genome,
            brain,
            last_move: (0, 0),
            alive: true,
            color,
        }
    }

    pub fn id(&self) -> u32 {
        self.id
    }

    pub fn position(&self) -> (i32, i32) {
        (self.x, self.y)
    }

    pub fn genome(&self) -> &Genome {
        &self.genome
    }

    pub fn brain(&self) -> &Brain {
        &self.brain
    }

    pub fn last_move(&self) -> (i32, i32) {
        self.last_move
    }

    pub fn alive(&self) -> bool {
        self.alive
    }

    pub fn color(&self) -> [u8; 3] {
        self.color
    }

    pub fn mark_dead(&mut self) {
        self.alive = false;
    }

    /// The facing direction: the last move, or `(1, 0)` if the agent has
    /// not moved yet.
    pub fn forward(&self) -> (i32, i32) {
        match self.last_move {
            (0, 0) => (1, 0),
            direction => direction,
        }
    }

    /// Commits a successful move: shifts the position and remembers the
    /// direction. The caller has already updated the occupancy layer.
    pub fn apply_move(&mut self, dx: i32, dy: i32) {
        self.x += dx;
        self.y += dy;
        self.last_move = (dx, dy);
    }

    /// Senses, thinks, and decodes this step's intent against the current
    /// grid. Only the sensors the brain actually reads are evaluated.
    pub fn decide(&mut self, grid: &Grid, step: u32) -> Decision {
        let mut sensors = [0.0f32; Sensor::COUNT];
        for &index in self.brain.used_sensors() {
            sensors[index as usize] = self.sense(Sensor::ALL[index as usize], grid, step);
        }

        let levels = self.brain.step(&sensors);

        let move_x = levels[Action::MoveX as usize].tanh();
        let move_y = levels[Action::MoveY as usize].tanh();
        let mut dx = 0;
        let mut dy = 0;
        if random_provider::bool(move_x.abs()) {
            dx = if move_x > 0.0 { 1 } else { -1 };
        }
        if random_provider::bool(move_y.abs()) {
            dy = if move_y > 0.0 { 1 } else { -1 };
        }

        Decision {
            dx,
            dy,
            emit: levels[Action::Emit as usize].tanh(),
            kill: levels[Action::Kill as usize].tanh() > 0.5,
        }
    }

    fn sense(&self, sensor: Sensor, grid: &Grid, step: u32) -> f32 {
        let (fdx, fdy) = self.forward();
        match sensor {
            Sensor::LocX => self.x as f32 / grid.size() as f32,
            Sensor::LocY => self.y as f32 / grid.size() as f32,
            Sensor::Rnd => random_provider::random(),
            Sensor::LmvX => (self.last_move.0 + 1) as f32 / 2.0,
            Sensor::LmvY => (self.last_move.1 + 1) as f32 / 2.0,
            Sensor::Osc => ((step as f32 * 0.1).sin() + 1.0) / 2.0,
            Sensor::DstBarrier => {
                for d in 1..=PROBE_DISTANCE {
                    let (nx, ny) = (self.x + fdx * d, self.y + fdy * d);
                    if !grid.in_bounds(nx, ny) || grid.is_barrier(nx, ny) {
                        return (PROBE_DISTANCE - d) as f32 / PROBE_DISTANCE as f32;
                    }
                }
                0.0
            }
            Sensor::DstSafe => {
                for d in 1..=PROBE_DISTANCE {
                    let (nx, ny) = (self.x + fdx * d, self.y + fdy * d);
                    if grid.is_safe(nx, ny) {
                        return (PROBE_DISTANCE - d) as f32 / PROBE_DISTANCE as f32;
                    }
                }
                0.0
            }
            Sensor::DensAgents => {
                let mut count = 0;
                for d in 1..=PROBE_DISTANCE {
                    if grid.is_agent(self.x + fdx * d, self.y + fdy * d) {
                        count += 1;
                    }
                }
                count as f32 / PROBE_DISTANCE as f32
            }
            Sensor::Smell => grid.pheromone(self.x, self.y),
            Sensor::SmellFwd => grid.pheromone(self.x + fdx, self.y + fdy),
            Sensor::SmellLR => {
                // Antennae: sample beside the forward cell, 90 degrees
                // either way; 0.5 is neutral, above means stronger left.
                let left = grid.pheromone(self.x + fdx - fdy, self.y + fdy + fdx);
                let right = grid.pheromone(self.x + fdx + fdy, self.y + fdy - fdx);
                0.5 + (left - right)
            }
            Sensor::Danger => 0.0,
        }
    }
}
