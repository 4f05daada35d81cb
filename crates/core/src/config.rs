use crate::state::{Offset, Position};

/// Whether additive resource changes stop at the meter maximum.
///
/// Unclamped is the default (a lucky potion can push hp past max_hp);
/// hosts that want classic clamping opt in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ClampPolicy {
    #[default]
    Unclamped,
    ClampToMax,
}

impl ClampPolicy {
    pub fn apply(self, value: u32, maximum: u32) -> u32 {
        match self {
            ClampPolicy::Unclamped => value,
            ClampPolicy::ClampToMax => value.min(maximum),
        }
    }
}

/// Game configuration constants and tunable policy.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GameConfig {
    /// Clamping policy for heal / restore_ammo effects.
    pub clamp_policy: ClampPolicy,

    /// Where a non-combat collision participant is displaced to.
    pub fallback_tile: Position,

    /// Step an AI actor takes when no enemy is adjacent.
    pub ai_drift: Offset,
}

impl GameConfig {
    // ===== compile-time constants used as type parameters =====
    /// Maximum inventory slots any single entity can have.
    pub const MAX_INVENTORY_SLOTS: usize = 10;

    // ===== runtime-tunable defaults =====
    /// Percent chance an item inside a blast footprint is destroyed.
    /// Ground-zero items bypass the roll and are always destroyed.
    pub const ITEM_BLAST_DESTRUCTION_PERCENT: u32 = 50;

    pub const DEFAULT_FALLBACK_TILE: Position = Position::new(1, 1);
    pub const DEFAULT_AI_DRIFT: Offset = Offset::new(1, 1);

    pub fn new() -> Self {
        Self {
            clamp_policy: ClampPolicy::default(),
            fallback_tile: Self::DEFAULT_FALLBACK_TILE,
            ai_drift: Self::DEFAULT_AI_DRIFT,
        }
    }

    pub fn with_clamp_policy(mut self, clamp_policy: ClampPolicy) -> Self {
        self.clamp_policy = clamp_policy;
        self
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::new()
    }
}
