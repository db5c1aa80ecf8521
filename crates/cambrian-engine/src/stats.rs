use serde::{Deserialize, Serialize};

/// The analytics row emitted at each generation boundary.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct GenerationSummary {
    pub generation: u32,
    /// Agents alive on a safe zone when the generation ended.
    pub survivors: usize,
    /// Kills resolved during the generation.
    pub kills: u32,
    /// Mean genome length over agents alive at the boundary.
    pub mean_genome_len: f32,
    /// Single-link cluster count over the survivor genomes.
    pub species: usize,
}

/// The per-generation series of a run: survivors, kills, genome length and
/// species count over time. Plotting is a caller concern.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RunHistory {
    summaries: Vec<GenerationSummary>,
}

impl RunHistory {
    pub fn push(&mut self, summary: GenerationSummary) {
        self.summaries.push(summary);
    }

    pub fn summaries(&self) -> &[GenerationSummary] {
        &self.summaries
    }

    pub fn latest(&self) -> Option<&GenerationSummary> {
        self.summaries.last()
    }

    pub fn len(&self) -> usize {
        self.summaries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.summaries.is_empty()
    }

    pub fn clear(&mut self) {
        self.summaries.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn history_accumulates_in_order() {
        let mut history = RunHistory::default();
        for generation in 1..=3 {
            history.push(GenerationSummary {
                generation,
                survivors: 10 * generation as usize,
                kills: 0,
                mean_genome_len: 12.0,
                species: 1,
            });
        }

        assert_eq!(history.len(), 3);
        assert_eq!(history.latest().unwrap().generation, 3);
        assert_eq!(history.summaries()[0].survivors, 10);
    }
}
