// src/pools.rs

use ethers::prelude::Address;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Pool record as served by a [`PoolRepository`](crate::pool_repository::PoolRepository).
///
/// Balances are human-readable decimal strings, the way pool indexers serve them.
/// The pool's own BPT may appear inside `tokens` (phantom BPT); its position is
/// derived from `address` rather than stored.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PoolRecord {
    pub id: String,
    pub address: Address,
    /// Raw category string, e.g. "Weighted", "ComposableStable", "AaveLinear".
    pub pool_type: String,
    #[serde(default = "default_pool_type_version")]
    pub pool_type_version: u32,
    pub tokens: Vec<PoolToken>,
    /// Slot of the underlying token (linear pools only).
    #[serde(default)]
    pub main_index: Option<usize>,
    /// Slot of the wrapped token (linear pools only).
    #[serde(default)]
    pub wrapped_index: Option<usize>,
}

fn default_pool_type_version() -> u32 {
    1
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PoolToken {
    pub address: Address,
    pub balance: String,
    #[serde(default)]
    pub decimals: Option<u8>,
}

/// Decimals assumed when a record does not carry them.
pub const DEFAULT_DECIMALS: u8 = 18;

impl PoolRecord {
    /// Position of the pool's own token in `tokens`, if it is listed there.
    pub fn bpt_index(&self) -> Option<usize> {
        self.tokens.iter().position(|t| t.address == self.address)
    }

    /// Tokens in declared order, skipping the pool's own BPT.
    pub fn non_bpt_tokens(&self) -> impl Iterator<Item = &PoolToken> + '_ {
        self.tokens.iter().filter(move |t| t.address != self.address)
    }

    pub fn token(&self, address: Address) -> Option<&PoolToken> {
        self.tokens.iter().find(|t| t.address == address)
    }

    /// Decimals of `address` in this pool, falling back to [`DEFAULT_DECIMALS`].
    pub fn token_decimals(&self, address: Address) -> u8 {
        self.token(address)
            .and_then(|t| t.decimals)
            .unwrap_or(DEFAULT_DECIMALS)
    }

    pub fn main_token(&self) -> Option<&PoolToken> {
        self.main_index.and_then(|i| self.tokens.get(i))
    }

    pub fn wrapped_token(&self) -> Option<&PoolToken> {
        self.wrapped_index.and_then(|i| self.tokens.get(i))
    }

    /// Linear pools are recognised by name, so unknown linear variants still route
    /// through linear expansion once they are added to [`PoolType`].
    pub fn is_linear(&self) -> bool {
        self.pool_type.contains("Linear")
    }
}

/// Pool categories the graph knows about.
///
/// A category listed here may still be unsupported: support is decided by the
/// join/exit action tables in [`crate::pool_graph::actions`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PoolType {
    Weighted,
    Investment,
    Stable,
    StablePhantom,
    MetaStable,
    ComposableStable,
    LiquidityBootstrapping,
    Element,
    AaveLinear,
    Linear,
    ERC4626Linear,
    BeefyLinear,
    EulerLinear,
    GearboxLinear,
    MidasLinear,
    ReaperLinear,
    SiloLinear,
    TetuLinear,
    YearnLinear,
    Gyro2,
    Gyro3,
    GyroE,
    FX,
    Managed,
}

impl PoolType {
    pub const ALL: [PoolType; 24] = [
        PoolType::Weighted,
        PoolType::Investment,
        PoolType::Stable,
        PoolType::StablePhantom,
        PoolType::MetaStable,
        PoolType::ComposableStable,
        PoolType::LiquidityBootstrapping,
        PoolType::Element,
        PoolType::AaveLinear,
        PoolType::Linear,
        PoolType::ERC4626Linear,
        PoolType::BeefyLinear,
        PoolType::EulerLinear,
        PoolType::GearboxLinear,
        PoolType::MidasLinear,
        PoolType::ReaperLinear,
        PoolType::SiloLinear,
        PoolType::TetuLinear,
        PoolType::YearnLinear,
        PoolType::Gyro2,
        PoolType::Gyro3,
        PoolType::GyroE,
        PoolType::FX,
        PoolType::Managed,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PoolType::Weighted => "Weighted",
            PoolType::Investment => "Investment",
            PoolType::Stable => "Stable",
            PoolType::StablePhantom => "StablePhantom",
            PoolType::MetaStable => "MetaStable",
            PoolType::ComposableStable => "ComposableStable",
            PoolType::LiquidityBootstrapping => "LiquidityBootstrapping",
            PoolType::Element => "Element",
            PoolType::AaveLinear => "AaveLinear",
            PoolType::Linear => "Linear",
            PoolType::ERC4626Linear => "ERC4626Linear",
            PoolType::BeefyLinear => "BeefyLinear",
            PoolType::EulerLinear => "EulerLinear",
            PoolType::GearboxLinear => "GearboxLinear",
            PoolType::MidasLinear => "MidasLinear",
            PoolType::ReaperLinear => "ReaperLinear",
            PoolType::SiloLinear => "SiloLinear",
            PoolType::TetuLinear => "TetuLinear",
            PoolType::YearnLinear => "YearnLinear",
            PoolType::Gyro2 => "Gyro2",
            PoolType::Gyro3 => "Gyro3",
            PoolType::GyroE => "GyroE",
            PoolType::FX => "FX",
            PoolType::Managed => "Managed",
        }
    }

    pub fn is_linear(&self) -> bool {
        self.as_str().contains("Linear")
    }
}

impl fmt::Display for PoolType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown pool type: {0}")]
pub struct UnknownPoolType(pub String);

impl FromStr for PoolType {
    type Err = UnknownPoolType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PoolType::ALL
            .iter()
            .find(|t| t.as_str() == s)
            .copied()
            .ok_or_else(|| UnknownPoolType(s.to_string()))
    }
}
