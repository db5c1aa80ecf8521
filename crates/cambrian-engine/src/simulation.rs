use crate::stats::RunHistory;
use cambrian_core::{Agent, CoreResult, Genome, Grid, SimParams, random_provider};

/// The whole simulation state: the grid, the agent arena, the counters and
/// the parameter block.
///
/// Agents are arena-resident and contiguously numbered: the agent with id
/// `k` lives at index `k - 1`, and the grid's occupancy layer refers to
/// agents by id only. The scheduler is single-threaded and cooperative;
/// callers observe the state between complete steps.
#[derive(Clone, Debug)]
pub struct Simulation {
    pub(crate) grid: Grid,
    pub(crate) agents: Vec<Agent>,
    pub(crate) params: SimParams,
    pub(crate) generation: u32,
    pub(crate) step_in_gen: u32,
    pub(crate) kills_this_gen: u32,
    pub(crate) species: usize,
    pub(crate) history: RunHistory,
}

impl Simulation {
    /// Builds an empty world from a parameter block. Probabilities and
    /// domains are normalized here; a degenerate `grid_size` is rejected.
    pub fn new(params: SimParams) -> CoreResult<Simulation> {
        let params = params.normalized();
        let grid = Grid::new(params.grid_size)?;
        Ok(Simulation {
            grid,
            agents: Vec::new(),
            params,
            generation: 1,
            step_in_gen: 0,
            kills_this_gen: 0,
            species: 0,
            history: RunHistory::default(),
        })
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Mutable access to the grid for edit-time work: painting barriers and
    /// safe zones before a run. Editing occupancy mid-run is on the caller.
    pub fn grid_mut(&mut self) -> &mut Grid {
        &mut self.grid
    }

    pub fn agents(&self) -> &[Agent] {
        &self.agents
    }

    /// The agent with the given id, if it is in the arena.
    pub fn agent(&self, id: u32) -> Option<&Agent> {
        (id >= 1).then(|| self.agents.get(id as usize - 1)).flatten()
    }

    pub fn params(&self) -> &SimParams {
        &self.params
    }

    pub fn generation(&self) -> u32 {
        self.generation
    }

    pub fn step_in_gen(&self) -> u32 {
        self.step_in_gen
    }

    pub fn kills_this_gen(&self) -> u32 {
        self.kills_this_gen
    }

    /// The species estimate recorded at the last generation boundary.
    pub fn species(&self) -> usize {
        self.species
    }

    pub fn history(&self) -> &RunHistory {
        &self.history
    }

    pub fn live_count(&self) -> usize {
        self.agents.iter().filter(|agent| agent.alive()).count()
    }

    /// Starts a run: resets the counters, the pheromone field, the
    /// occupancy layer and the history, then spawns a fresh random
    /// population. Barriers and safe zones persist.
    pub fn populate(&mut self) {
        self.generation = 1;
        self.step_in_gen = 0;
        self.kills_this_gen = 0;
        self.species = 0;
        self.history.clear();
        self.grid.clear_occupancy();
        self.grid.clear_pheromones();
        self.agents.clear();
        self.spawn_random_population();
    }

    /// Places one agent with the given genome, if the cell is free. Returns
    /// the assigned id.
    pub fn spawn_at(&mut self, x: i32, y: i32, genome: Genome) -> Option<u32> {
        if !self.grid.is_empty(x, y) {
            return None;
        }
        let id = self.agents.len() as u32 + 1;
        self.grid.set_agent(x, y, id);
        self.agents
            .push(Agent::new(id, x, y, genome, self.params.max_neurons));
        Some(id)
    }

    /// Advances the world by one step.
    ///
    /// The pheromone field updates once, before anyone senses. Agents then
    /// act in a fresh shuffled order; each one senses the grid as earlier
    /// agents left it, so a kill or a vacated cell is visible immediately.
    /// When `steps_per_gen` is reached the generation turns over.
    pub fn step(&mut self) {
        self.grid.update_pheromones();

        for index in random_provider::visit_order(self.agents.len()) {
            if !self.agents[index].alive() {
                continue;
            }

            let decision = self.agents[index].decide(&self.grid, self.step_in_gen);
            let (x, y) = self.agents[index].position();

            if decision.emit > 0.0 {
                self.grid.add_pheromone(x, y, 0.5 * decision.emit);
            }
            if decision.kill {
                self.resolve_kill(index);
            }
            if (decision.dx, decision.dy) != (0, 0) {
                self.resolve_move(index, decision.dx, decision.dy);
            }
        }

        self.step_in_gen += 1;
        if self.step_in_gen >= self.params.steps_per_gen {
            self.turn_generation();
            self.step_in_gen = 0;
            self.generation += 1;
        }
    }

    /// Steps until the generation counter advances.
    pub fn run_generation(&mut self) {
        let current = self.generation;
        while self.generation == current {
            self.step();
        }
    }

    /// A kill lands on the forward neighbor; anything else (empty cell,
    /// barrier, out of bounds) is a no-op. The victim's cell clears
    /// immediately, so it neither blocks movement nor acts later this step.
    fn resolve_kill(&mut self, index: usize) {
        let (fdx, fdy) = self.agents[index].forward();
        let (x, y) = self.agents[index].position();
        let (tx, ty) = (x + fdx, y + fdy);

        if let Some(victim_id) = self.grid.agent_at(tx, ty) {
            if let Some(victim) = self.agents.get_mut(victim_id as usize - 1) {
                if victim.alive() {
                    victim.mark_dead();
                    self.grid.clear_cell(tx, ty);
                    self.kills_this_gen += 1;
                }
            }
        }
    }

    /// Movement succeeds only into an in-bounds empty cell; barriers and
    /// other agents block, safe zones do not. A blocked move leaves
    /// `last_move` unchanged.
    fn resolve_move(&mut self, index: usize, dx: i32, dy: i32) {
        let (x, y) = self.agents[index].position();
        let (nx, ny) = (x + dx, y + dy);

        if self.grid.is_empty(nx, ny) {
            let id = self.agents[index].id();
            self.grid.clear_cell(x, y);
            self.grid.set_agent(nx, ny, id);
            self.agents[index].apply_move(dx, dy);
        }
    }
}
