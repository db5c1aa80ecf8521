use crate::error::{CoreError, CoreResult};
use crate::random_provider;

/// Occupancy value of an empty cell.
pub const EMPTY: i32 = 0;
/// Occupancy value of a barrier cell.
pub const BARRIER: i32 = -1;

/// Multiplicative pheromone decay applied once per step.
pub const PHEROMONE_DECAY: f32 = 0.98;
/// Box-kernel diffusion weight applied to interior cells.
pub const PHEROMONE_DIFFUSION: f32 = 0.1;

/// Sample budget of an unrestricted empty-cell search.
const SEARCH_BUDGET: usize = 100;
/// Sample budget when the search must avoid the dilated safe zone.
const RESTRICTED_SEARCH_BUDGET: usize = 1000;

/// The world substrate: a square of side `size` with three coplanar layers.
///
/// * occupancy — `0` empty, `-1` barrier, `k > 0` the id of the agent
///   standing there (at most one per cell);
/// * safe zones — a boolean per cell, granting survival at the generation
///   boundary;
/// * pheromones — a scalar in `[0, 1]` per cell with decay and diffusion.
///
/// Read accessors are bounds-forgiving: out-of-bounds coordinates read as
/// not-empty, not-barrier, not-safe, zero pheromone. Writes outside the
/// grid are ignored.
#[derive(Clone, Debug)]
pub struct Grid {
    size: i32,
    occupancy: Vec<i32>,
    safe: Vec<bool>,
    pheromones: Vec<f32>,
}

impl Grid {
    pub fn new(size: i32) -> CoreResult<Grid> {
        if size < 1 {
            return Err(CoreError::InvalidConfig(format!(
                "grid size must be at least 1, got {size}"
            )));
        }
        let cells = (size * size) as usize;
        Ok(Grid {
            size,
            occupancy: vec![EMPTY; cells],
            safe: vec![false; cells],
            pheromones: vec![0.0; cells],
        })
    }

    pub fn size(&self) -> i32 {
        self.size
    }

    pub fn in_bounds(&self, x: i32, y: i32) -> bool {
        (0..self.size).contains(&x) && (0..self.size).contains(&y)
    }

    fn index(&self, x: i32, y: i32) -> usize {
        (x * self.size + y) as usize
    }

    pub fn is_empty(&self, x: i32, y: i32) -> bool {
        self.in_bounds(x, y) && self.occupancy[self.index(x, y)] == EMPTY
    }

    pub fn is_barrier(&self, x: i32, y: i32) -> bool {
        self.in_bounds(x, y) && self.occupancy[self.index(x, y)] == BARRIER
    }

    pub fn is_safe(&self, x: i32, y: i32) -> bool {
        self.in_bounds(x, y) && self.safe[self.index(x, y)]
    }

    pub fn is_agent(&self, x: i32, y: i32) -> bool {
        self.in_bounds(x, y) && self.occupancy[self.index(x, y)] > 0
    }

    /// The id occupying the cell, if any.
    pub fn agent_at(&self, x: i32, y: i32) -> Option<u32> {
        if !self.in_bounds(x, y) {
            return None;
        }
        match self.occupancy[self.index(x, y)] {
            id if id > 0 => Some(id as u32),
            _ => None,
        }
    }

    pub fn set_agent(&mut self, x: i32, y: i32, id: u32) {
        if self.in_bounds(x, y) {
            let index = self.index(x, y);
            self.occupancy[index] = id as i32;
        }
    }

    pub fn set_barrier(&mut self, x: i32, y: i32) {
        if self.in_bounds(x, y) {
            let index = self.index(x, y);
            self.occupancy[index] = BARRIER;
        }
    }

    pub fn clear_cell(&mut self, x: i32, y: i32) {
        if self.in_bounds(x, y) {
            let index = self.index(x, y);
            self.occupancy[index] = EMPTY;
        }
    }

    pub fn set_safe(&mut self, x: i32, y: i32, safe: bool) {
        if self.in_bounds(x, y) {
            let index = self.index(x, y);
            self.safe[index] = safe;
        }
    }

    pub fn pheromone(&self, x: i32, y: i32) -> f32 {
        if self.in_bounds(x, y) {
            self.pheromones[self.index(x, y)]
        } else {
            0.0
        }
    }

    /// Deposits pheromone, saturating at `1.0`.
    pub fn add_pheromone(&mut self, x: i32, y: i32, amount: f32) {
        if self.in_bounds(x, y) {
            let index = self.index(x, y);
            self.pheromones[index] = (self.pheromones[index] + amount).min(1.0);
        }
    }

    /// One pheromone tick: decay everywhere, then diffuse interior cells
    /// against their eight neighbors with a box kernel. Edge cells keep the
    /// decayed value. The field stays clipped to `[0, 1]`.
    pub fn update_pheromones(&mut self) {
        for value in &mut self.pheromones {
            *value *= PHEROMONE_DECAY;
        }

        let size = self.size as usize;
        if size >= 3 {
            let decayed = self.pheromones.clone();
            for x in 1..size - 1 {
                for y in 1..size - 1 {
                    let neighbor_sum = decayed[(x - 1) * size + (y - 1)]
                        + decayed[(x - 1) * size + y]
                        + decayed[(x - 1) * size + (y + 1)]
                        + decayed[x * size + (y - 1)]
                        + decayed[x * size + (y + 1)]
                        + decayed[(x + 1) * size + (y - 1)]
                        + decayed[(x + 1) * size + y]
                        + decayed[(x + 1) * size + (y + 1)];
                    self.pheromones[x * size + y] = (1.0 - PHEROMONE_DIFFUSION)
                        * decayed[x * size + y]
                        + PHEROMONE_DIFFUSION * (neighbor_sum / 8.0);
                }
            }
        }

        for value in &mut self.pheromones {
            *value = value.clamp(0.0, 1.0);
        }
    }

    /// Empties every non-barrier cell of the occupancy layer.
    pub fn clear_occupancy(&mut self) {
        for cell in &mut self.occupancy {
            if *cell != BARRIER {
                *cell = EMPTY;
            }
        }
    }

    pub fn clear_pheromones(&mut self) {
        self.pheromones.fill(0.0);
    }

    /// Samples up to the attempt budget of uniform cells, returning the
    /// first empty one — and, when `avoid_safe` is set, one with no safe
    /// zone within Chebyshev distance `margin`. The restricted search gets a
    /// larger budget; both may come up empty on a crowded grid.
    pub fn find_empty_cell(&self, avoid_safe: bool, margin: i32) -> Option<(i32, i32)> {
        let budget = if avoid_safe {
            RESTRICTED_SEARCH_BUDGET
        } else {
            SEARCH_BUDGET
        };

        for _ in 0..budget {
            let x = random_provider::range(0..self.size);
            let y = random_provider::range(0..self.size);
            if !self.is_empty(x, y) {
                continue;
            }
            if avoid_safe && self.near_safe(x, y, margin) {
                continue;
            }
            return Some((x, y));
        }
        None
    }

    fn near_safe(&self, x: i32, y: i32, margin: i32) -> bool {
        for dx in -margin..=margin {
            for dy in -margin..=margin {
                if self.is_safe(x + dx, y + dy) {
                    return true;
                }
            }
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random_provider::scoped_seed;

    #[test]
    fn construction_rejects_degenerate_sizes() {
        assert!(Grid::new(0).is_err());
        assert!(Grid::new(-3).is_err());
        assert!(Grid::new(1).is_ok());
    }

    #[test]
    fn out_of_bounds_reads_are_inert() {
        let grid = Grid::new(4).unwrap();
        assert!(!grid.is_empty(-1, 0));
        assert!(!grid.is_barrier(4, 0));
        assert!(!grid.is_safe(0, 4));
        assert_eq!(grid.pheromone(-1, -1), 0.0);
        assert_eq!(grid.agent_at(99, 99), None);
    }

    #[test]
    fn occupancy_layers_are_independent() {
        let mut grid = Grid::new(8).unwrap();
        grid.set_agent(2, 3, 7);
        grid.set_safe(2, 3, true);
        grid.add_pheromone(2, 3, 0.4);

        assert_eq!(grid.agent_at(2, 3), Some(7));
        assert!(grid.is_safe(2, 3));
        assert!((grid.pheromone(2, 3) - 0.4).abs() < 1e-6);

        grid.clear_cell(2, 3);
        assert!(grid.is_empty(2, 3));
        assert!(grid.is_safe(2, 3));
    }

    #[test]
    fn clear_occupancy_preserves_barriers() {
        let mut grid = Grid::new(8).unwrap();
        grid.set_barrier(1, 1);
        grid.set_agent(2, 2, 5);
        grid.clear_occupancy();

        assert!(grid.is_barrier(1, 1));
        assert!(grid.is_empty(2, 2));
    }

    #[test]
    fn pheromones_saturate_at_one() {
        let mut grid = Grid::new(4).unwrap();
        for _ in 0..10 {
            grid.add_pheromone(1, 1, 0.3);
        }
        assert_eq!(grid.pheromone(1, 1), 1.0);
    }

    #[test]
    fn isolated_interior_cell_decays_geometrically() {
        let mut grid = Grid::new(33).unwrap();
        grid.add_pheromone(16, 16, 1.0);

        // With all-zero neighbors one tick is exactly (1 - diff) * decay.
        let per_step = (1.0 - PHEROMONE_DIFFUSION) * PHEROMONE_DECAY;
        grid.update_pheromones();
        assert!((grid.pheromone(16, 16) - per_step).abs() < 1e-5);

        // Later ticks pick up backflow from the now-nonzero neighbors, so
        // the pure geometric series is only an envelope from below.
        let mut previous = grid.pheromone(16, 16);
        for k in 2..=8 {
            grid.update_pheromones();
            let value = grid.pheromone(16, 16);
            assert!(value < previous);
            assert!(value >= per_step.powi(k));
            previous = value;
        }
    }

    #[test]
    fn a_saturated_field_decays_to_nothing() {
        let mut grid = Grid::new(16).unwrap();
        for x in 0..16 {
            for y in 0..16 {
                grid.add_pheromone(x, y, 1.0);
            }
        }

        for _ in 0..600 {
            grid.update_pheromones();
        }
        for x in 0..16 {
            for y in 0..16 {
                assert!(grid.pheromone(x, y) < 1e-4);
            }
        }
    }

    #[test]
    fn edge_cells_skip_diffusion() {
        let mut grid = Grid::new(8).unwrap();
        grid.add_pheromone(0, 0, 1.0);
        grid.update_pheromones();
        assert!((grid.pheromone(0, 0) - PHEROMONE_DECAY).abs() < 1e-6);
    }

    #[test]
    fn diffusion_spreads_to_neighbors() {
        let mut grid = Grid::new(9).unwrap();
        grid.add_pheromone(4, 4, 1.0);
        grid.update_pheromones();

        let expected = PHEROMONE_DIFFUSION * PHEROMONE_DECAY / 8.0;
        assert!((grid.pheromone(4, 5) - expected).abs() < 1e-6);
        assert!((grid.pheromone(3, 3) - expected).abs() < 1e-6);
    }

    #[test]
    fn empty_cell_search_respects_the_margin() {
        scoped_seed(41, || {
            let mut grid = Grid::new(16).unwrap();
            for y in 0..16 {
                grid.set_safe(0, y, true);
            }

            for _ in 0..20 {
                let (x, _) = grid.find_empty_cell(true, 3).unwrap();
                assert!(x > 3);
            }
        });
    }

    #[test]
    fn empty_cell_search_fails_on_a_full_grid() {
        scoped_seed(43, || {
            let mut grid = Grid::new(2).unwrap();
            for x in 0..2 {
                for y in 0..2 {
                    grid.set_agent(x, y, (x * 2 + y + 1) as u32);
                }
            }
            assert_eq!(grid.find_empty_cell(false, 0), None);
        });
    }
}
