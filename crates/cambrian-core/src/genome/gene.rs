use crate::params::SimParams;
use crate::random_provider;

/// Fixed-point scale of the weight field: a stored `+8192` is a weight of `1.0`.
pub const WEIGHT_SCALE: f32 = 8192.0;

/// Hex characters per encoded gene.
pub const HEX_PER_GENE: usize = 8;

/// Bits per encoded gene.
pub const BITS_PER_GENE: usize = 32;

/// What a connection reads from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SourceKind {
    Neuron,
    Sensor,
}

/// What a connection feeds into.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SinkKind {
    Neuron,
    Action,
}

/// One directed weighted connection of the neural graph, the unit of
/// inheritance. Genes have no identity, only value.
///
/// The packed form is a 32-bit word, MSB first:
///
/// ```text
/// bit 31      source kind (0 = neuron, 1 = sensor)
/// bits 30..24 source index (7 bits)
/// bit 23      sink kind   (0 = neuron, 1 = action)
/// bits 22..16 sink index  (7 bits)
/// bits 15..0  weight, two's-complement i16 at scale 1/8192
/// ```
///
/// Every 32-bit pattern unpacks to a usable gene: the 7-bit indices are
/// remapped modulo their domain when a brain is compiled, so DNA spliced at
/// any nibble boundary still decodes without validation failure.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Gene {
    pub source_kind: SourceKind,
    pub source_index: u8,
    pub sink_kind: SinkKind,
    pub sink_index: u8,
    pub weight: f32,
}

impl Gene {
    /// A fresh random gene. Kinds are fair coin flips; indices are sampled
    /// from the enabled sensor/action sets or the hidden-neuron range as the
    /// kind demands; the weight is uniform on `[-4, +4]`.
    pub fn random(params: &SimParams) -> Gene {
        let source_kind = if random_provider::bool(0.5) {
            SourceKind::Sensor
        } else {
            SourceKind::Neuron
        };
        let sink_kind = if random_provider::bool(0.5) {
            SinkKind::Action
        } else {
            SinkKind::Neuron
        };

        Gene {
            source_kind,
            source_index: random_source_index(source_kind, params),
            sink_kind,
            sink_index: random_sink_index(sink_kind, params),
            weight: random_provider::range(-4.0f32..4.0),
        }
    }

    /// Packs the gene into its 32-bit wire word. The weight saturates at the
    /// i16 range.
    pub fn pack(&self) -> u32 {
        let mut word = 0u32;
        if self.source_kind == SourceKind::Sensor {
            word |= 1 << 31;
        }
        word |= ((self.source_index & 0x7F) as u32) << 24;
        if self.sink_kind == SinkKind::Action {
            word |= 1 << 23;
        }
        word |= ((self.sink_index & 0x7F) as u32) << 16;

        let weight = (self.weight * WEIGHT_SCALE)
            .round()
            .clamp(i16::MIN as f32, i16::MAX as f32) as i32;
        word |= (weight as u32) & 0xFFFF;

        word
    }

    /// Inverts [`Gene::pack`]; total over all 32-bit patterns.
    pub fn unpack(word: u32) -> Gene {
        let source_kind = if word & (1 << 31) != 0 {
            SourceKind::Sensor
        } else {
            SourceKind::Neuron
        };
        let sink_kind = if word & (1 << 23) != 0 {
            SinkKind::Action
        } else {
            SinkKind::Neuron
        };

        Gene {
            source_kind,
            source_index: ((word >> 24) & 0x7F) as u8,
            sink_kind,
            sink_index: ((word >> 16) & 0x7F) as u8,
            weight: (word & 0xFFFF) as u16 as i16 as f32 / WEIGHT_SCALE,
        }
    }
}

/// Uniform source index in the domain of `kind`.
pub(crate) fn random_source_index(kind: SourceKind, params: &SimParams) -> u8 {
    match kind {
        SourceKind::Sensor => random_provider::choose(&params.enabled_sensors).index(),
        SourceKind::Neuron => random_provider::range(0..params.max_neurons) as u8,
    }
}

/// Uniform sink index in the domain of `kind`.
pub(crate) fn random_sink_index(kind: SinkKind, params: &SimParams) -> u8 {
    match kind {
        SinkKind::Action => random_provider::choose(&params.enabled_actions).index(),
        SinkKind::Neuron => random_provider::range(0..params.max_neurons) as u8,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sensors::{Action, Sensor};

    #[test]
    fn pack_layout_matches_the_wire_format() {
        let gene = Gene {
            source_kind: SourceKind::Sensor,
            source_index: 3,
            sink_kind: SinkKind::Neuron,
            sink_index: 5,
            weight: 1.0,
        };
        assert_eq!(gene.pack(), 0x8305_2000);

        let gene = Gene {
            source_kind: SourceKind::Neuron,
            source_index: 5,
            sink_kind: SinkKind::Action,
            sink_index: 0,
            weight: -2.0,
        };
        assert_eq!(gene.pack(), 0x0580_C000);
    }

    #[test]
    fn unpack_inverts_pack_within_weight_rounding() {
        let samples = [
            0x0000_0000u32,
            0xFFFF_FFFF,
            0x8305_2000,
            0x0580_C000,
            0x7F7F_8000,
            0xDEAD_BEEF,
        ];
        for word in samples {
            assert_eq!(Gene::unpack(word).pack(), word);
        }
    }

    #[test]
    fn weight_round_trips_within_half_a_step() {
        for weight in [-4.0f32, -1.37, -0.0001, 0.0, 0.5, 3.9999] {
            let gene = Gene {
                source_kind: SourceKind::Neuron,
                source_index: 0,
                sink_kind: SinkKind::Neuron,
                sink_index: 0,
                weight,
            };
            let back = Gene::unpack(gene.pack());
            assert!((back.weight - weight).abs() <= 1.0 / 16384.0);
        }
    }

    #[test]
    fn weight_saturates_outside_the_i16_range() {
        let gene = Gene {
            source_kind: SourceKind::Neuron,
            source_index: 0,
            sink_kind: SinkKind::Neuron,
            sink_index: 0,
            weight: 100.0,
        };
        assert_eq!(gene.pack() & 0xFFFF, 0x7FFF);

        let gene = Gene { weight: -100.0, ..gene };
        assert_eq!(gene.pack() & 0xFFFF, 0x8000);
    }

    #[test]
    fn random_genes_respect_enabled_domains() {
        let params = SimParams {
            enabled_sensors: vec![Sensor::Smell],
            enabled_actions: vec![Action::Emit, Action::Kill],
            max_neurons: 4,
            ..SimParams::default()
        };

        for _ in 0..200 {
            let gene = Gene::random(&params);
            match gene.source_kind {
                SourceKind::Sensor => assert_eq!(gene.source_index, Sensor::Smell.index()),
                SourceKind::Neuron => assert!(gene.source_index < 4),
            }
            match gene.sink_kind {
                SinkKind::Action => assert!(
                    gene.sink_index == Action::Emit.index()
                        || gene.sink_index == Action::Kill.index()
                ),
                SinkKind::Neuron => assert!(gene.sink_index < 4),
            }
            assert!((-4.0..4.0).contains(&gene.weight));
        }
    }
}
