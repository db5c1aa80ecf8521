use crate::genome::{Genome, SinkKind, SourceKind};
use crate::sensors::{Action, Sensor};
use std::collections::BTreeMap;

/// One compiled connection. Indices are already remapped into their
/// domains: sensor indices below [`Sensor::COUNT`], action indices below
/// [`Action::COUNT`], neuron indices below the brain's hidden size.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Connection {
    pub source_kind: SourceKind,
    pub source_index: u8,
    pub sink_kind: SinkKind,
    pub sink_index: u8,
    pub weight: f32,
}

/// A recurrent net compiled from a genome: the connection list plus the
/// hidden-state vector that carries across steps within a generation.
///
/// Compilation is stateless and keeps duplicate connections; parallel edges
/// between the same endpoints simply sum. The hidden state starts at zero
/// and is only ever reset by building a new brain.
#[derive(Clone, Debug)]
pub struct Brain {
    connections: Vec<Connection>,
    hidden: Vec<f32>,
    scratch: Vec<f32>,
    used_sensors: Vec<u8>,
}

impl Brain {
    pub fn compile(genome: &Genome, max_neurons: usize) -> Brain {
        let max_neurons = max_neurons.max(1);

        let connections = genome
            .iter()
            .map(|gene| {
                let source_index = match gene.source_kind {
                    SourceKind::Neuron => gene.source_index as usize % max_neurons,
                    SourceKind::Sensor => gene.source_index as usize % Sensor::COUNT,
                } as u8;
                let sink_index = match gene.sink_kind {
                    SinkKind::Neuron => gene.sink_index as usize % max_neurons,
                    SinkKind::Action => gene.sink_index as usize % Action::COUNT,
                } as u8;
                Connection {
                    source_kind: gene.source_kind,
                    source_index,
                    sink_kind: gene.sink_kind,
                    sink_index,
                    weight: gene.weight,
                }
            })
            .collect::<Vec<Connection>>();

        let mut used_sensors = connections
            .iter()
            .filter(|c| c.source_kind == SourceKind::Sensor)
            .map(|c| c.source_index)
            .collect::<Vec<u8>>();
        used_sensors.sort();
        used_sensors.dedup();

        Brain {
            connections,
            hidden: vec![0.0; max_neurons],
            scratch: vec![0.0; max_neurons],
            used_sensors,
        }
    }

    pub fn connections(&self) -> &[Connection] {
        &self.connections
    }

    pub fn hidden(&self) -> &[f32] {
        &self.hidden
    }

    /// The distinct sensor indices this net reads, sorted. Callers only need
    /// to fill these slots of the sensor vector before a step.
    pub fn used_sensors(&self) -> &[u8] {
        &self.used_sensors
    }

    /// One forward step. Accumulates each connection's weighted source value
    /// into its action or next-hidden slot, squashes the hidden vector
    /// through `tanh`, and returns the raw action levels (activation is the
    /// decoder's business).
    ///
    /// Pure in `(sensors, hidden state, connections)`.
    pub fn step(&mut self, sensors: &[f32]) -> [f32; Action::COUNT] {
        let mut actions = [0.0f32; Action::COUNT];
        let Brain {
            connections,
            hidden,
            scratch,
            ..
        } = self;

        scratch.fill(0.0);
        for connection in connections.iter() {
            let value = match connection.source_kind {
                SourceKind::Sensor => sensors[connection.source_index as usize],
                SourceKind::Neuron => hidden[connection.source_index as usize],
            };
            let output = connection.weight * value;
            match connection.sink_kind {
                SinkKind::Action => actions[connection.sink_index as usize] += output,
                SinkKind::Neuron => scratch[connection.sink_index as usize] += output,
            }
        }
        for (state, accumulated) in hidden.iter_mut().zip(scratch.iter()) {
            *state = accumulated.tanh();
        }

        actions
    }

    /// The wiring with dead hidden neurons culled and the survivors
    /// renumbered densely: a neuron whose outputs all feed itself (or that
    /// has no outputs at all) can never influence an action, so it is
    /// removed along with its input connections, repeatedly until stable.
    ///
    /// This is a diagnostic view for inspection tools; evaluation always
    /// runs the full connection list.
    pub fn pruned(&self) -> PrunedWiring {
        #[derive(Default)]
        struct NodeInfo {
            outputs: usize,
            self_inputs: usize,
        }

        let mut connections = self.connections.clone();
        let mut nodes: BTreeMap<u8, NodeInfo> = BTreeMap::new();

        for c in &connections {
            if c.sink_kind == SinkKind::Neuron {
                let node = nodes.entry(c.sink_index).or_default();
                if c.source_kind == SourceKind::Neuron && c.source_index == c.sink_index {
                    node.self_inputs += 1;
                }
            }
            if c.source_kind == SourceKind::Neuron {
                nodes.entry(c.source_index).or_default().outputs += 1;
            }
        }

        loop {
            let dead = nodes
                .iter()
                .filter(|(_, node)| node.outputs == node.self_inputs)
                .map(|(&id, _)| id)
                .collect::<Vec<u8>>();
            if dead.is_empty() {
                break;
            }
            for id in dead {
                nodes.remove(&id);
                connections.retain(|c| {
                    let feeds_dead = c.sink_kind == SinkKind::Neuron && c.sink_index == id;
                    if feeds_dead && c.source_kind == SourceKind::Neuron {
                        if let Some(source) = nodes.get_mut(&c.source_index) {
                            source.outputs -= 1;
                        }
                    }
                    !feeds_dead
                });
            }
        }

        let remap = nodes
            .keys()
            .enumerate()
            .map(|(new, &old)| (old, new as u8))
            .collect::<BTreeMap<u8, u8>>();

        let mut wiring = Vec::with_capacity(connections.len());
        // Neuron sinks first, then action sinks; surviving sources always
        // have a remapped number.
        for c in connections.iter().filter(|c| c.sink_kind == SinkKind::Neuron) {
            let mut c = *c;
            c.sink_index = remap[&c.sink_index];
            if c.source_kind == SourceKind::Neuron {
                c.source_index = remap[&c.source_index];
            }
            wiring.push(c);
        }
        for c in connections.iter().filter(|c| c.sink_kind == SinkKind::Action) {
            let mut c = *c;
            if c.source_kind == SourceKind::Neuron {
                c.source_index = remap[&c.source_index];
            }
            wiring.push(c);
        }

        PrunedWiring {
            connections: wiring,
            hidden_count: remap.len(),
        }
    }
}

/// The culled, densely renumbered wiring of a [`Brain`].
#[derive(Clone, Debug, PartialEq)]
pub struct PrunedWiring {
    pub connections: Vec<Connection>,
    pub hidden_count: usize,
}
