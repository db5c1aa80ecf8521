use crate::error::CoreError;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Input functions from world state to `[0, 1]`. The discriminant is the
/// wire id: it is what a gene's remapped source index selects and what the
/// parameter block serializes.
///
/// `Danger` is a reserved slot. It decodes and remaps like any other sensor
/// but always reads `0.0`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "u8", into = "u8"))]
#[repr(u8)]
pub enum Sensor {
    LocX = 0,
    LocY = 1,
    Rnd = 2,
    LmvX = 3,
    LmvY = 4,
    Osc = 5,
    DstBarrier = 6,
    DstSafe = 7,
    DensAgents = 8,
    Smell = 9,
    SmellFwd = 10,
    SmellLR = 11,
    Danger = 12,
}

impl Sensor {
    pub const COUNT: usize = 13;

    pub const ALL: [Sensor; Sensor::COUNT] = [
        Sensor::LocX,
        Sensor::LocY,
        Sensor::Rnd,
        Sensor::LmvX,
        Sensor::LmvY,
        Sensor::Osc,
        Sensor::DstBarrier,
        Sensor::DstSafe,
        Sensor::DensAgents,
        Sensor::Smell,
        Sensor::SmellFwd,
        Sensor::SmellLR,
        Sensor::Danger,
    ];

    pub fn index(self) -> u8 {
        self as u8
    }

    /// Short label for panels and traces.
    pub fn name(self) -> &'static str {
        match self {
            Sensor::LocX => "LocX",
            Sensor::LocY => "LocY",
            Sensor::Rnd => "Rnd",
            Sensor::LmvX => "LmvX",
            Sensor::LmvY => "LmvY",
            Sensor::Osc => "Osc",
            Sensor::DstBarrier => "DstBar",
            Sensor::DstSafe => "DstSafe",
            Sensor::DensAgents => "DensAg",
            Sensor::Smell => "Smell",
            Sensor::SmellFwd => "SmlFwd",
            Sensor::SmellLR => "SmlLR",
            Sensor::Danger => "Danger",
        }
    }
}

impl TryFrom<u8> for Sensor {
    type Error = CoreError;

    fn try_from(id: u8) -> Result<Self, Self::Error> {
        Sensor::ALL
            .get(id as usize)
            .copied()
            .ok_or_else(|| CoreError::InvalidConfig(format!("unknown sensor id {id}")))
    }
}

impl From<Sensor> for u8 {
    fn from(sensor: Sensor) -> u8 {
        sensor as u8
    }
}

/// Output accumulators consumed by motion, emission and kill resolution.
/// `MoveFwd` is a reserved slot: genes may wire into it but nothing decodes
/// its level.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "u8", into = "u8"))]
#[repr(u8)]
pub enum Action {
    MoveX = 0,
    MoveY = 1,
    MoveFwd = 2,
    Emit = 3,
    Kill = 4,
}

impl Action {
    pub const COUNT: usize = 5;

    pub const ALL: [Action; Action::COUNT] = [
        Action::MoveX,
        Action::MoveY,
        Action::MoveFwd,
        Action::Emit,
        Action::Kill,
    ];

    pub fn index(self) -> u8 {
        self as u8
    }

    pub fn name(self) -> &'static str {
        match self {
            Action::MoveX => "MvX",
            Action::MoveY => "MvY",
            Action::MoveFwd => "MvFwd",
            Action::Emit => "Emit",
            Action::Kill => "Kill",
        }
    }
}

impl TryFrom<u8> for Action {
    type Error = CoreError;

    fn try_from(id: u8) -> Result<Self, Self::Error> {
        Action::ALL
            .get(id as usize)
            .copied()
            .ok_or_else(|| CoreError::InvalidConfig(format!("unknown action id {id}")))
    }
}

impl From<Action> for u8 {
    fn from(action: Action) -> u8 {
        action as u8
    }
}
