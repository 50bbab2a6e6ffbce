//! Join/exit action tables.
//!
//! Every pool node moves value in and out of its parent through one action per
//! direction, decided only by the pool's category. A category missing from either table
//! is unsupported.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::pools::PoolType;

/// How value enters a node from its parent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum JoinAction {
    Input,
    BatchSwap,
    Wrap,
    JoinPool,
    WrapAaveDynamicToken,
    #[serde(rename = "wrapERC4626")]
    WrapErc4626,
}

/// How value leaves a node towards its parent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ExitAction {
    Output,
    BatchSwap,
    Unwrap,
    ExitPool,
    UnwrapAaveStaticToken,
    #[serde(rename = "unwrapERC4626")]
    UnwrapErc4626,
}

static JOIN_ACTIONS: Lazy<HashMap<PoolType, JoinAction>> = Lazy::new(|| {
    let mut actions: HashMap<PoolType, JoinAction> = PoolType::ALL
        .iter()
        .filter(|t| t.is_linear())
        .map(|t| (*t, JoinAction::BatchSwap))
        .collect();
    actions.insert(PoolType::Element, JoinAction::BatchSwap);
    actions.insert(PoolType::Investment, JoinAction::JoinPool);
    actions.insert(PoolType::LiquidityBootstrapping, JoinAction::JoinPool);
    actions.insert(PoolType::MetaStable, JoinAction::JoinPool);
    actions.insert(PoolType::Stable, JoinAction::JoinPool);
    actions.insert(PoolType::StablePhantom, JoinAction::BatchSwap);
    actions.insert(PoolType::Weighted, JoinAction::JoinPool);
    actions.insert(PoolType::ComposableStable, JoinAction::JoinPool);
    actions
});

static EXIT_ACTIONS: Lazy<HashMap<PoolType, ExitAction>> = Lazy::new(|| {
    let mut actions: HashMap<PoolType, ExitAction> = PoolType::ALL
        .iter()
        .filter(|t| t.is_linear())
        .map(|t| (*t, ExitAction::BatchSwap))
        .collect();
    actions.insert(PoolType::Element, ExitAction::BatchSwap);
    actions.insert(PoolType::Investment, ExitAction::ExitPool);
    actions.insert(PoolType::LiquidityBootstrapping, ExitAction::ExitPool);
    actions.insert(PoolType::MetaStable, ExitAction::ExitPool);
    actions.insert(PoolType::Stable, ExitAction::ExitPool);
    actions.insert(PoolType::StablePhantom, ExitAction::BatchSwap);
    actions.insert(PoolType::Weighted, ExitAction::ExitPool);
    actions.insert(PoolType::ComposableStable, ExitAction::ExitPool);
    actions
});

pub fn join_action(pool_type: PoolType) -> Option<JoinAction> {
    JOIN_ACTIONS.get(&pool_type).copied()
}

pub fn exit_action(pool_type: PoolType) -> Option<ExitAction> {
    EXIT_ACTIONS.get(&pool_type).copied()
}

/// Resolves a raw category string to its type and action pair, or `None` when the
/// category is unknown or has no entry in either table.
pub fn resolve(pool_type: &str) -> Option<(PoolType, JoinAction, ExitAction)> {
    let pool_type: PoolType = pool_type.parse().ok()?;
    Some((pool_type, join_action(pool_type)?, exit_action(pool_type)?))
}

/// Wrap/unwrap pair for the wrapped token sitting under a linear pool.
pub fn wrap_actions(linear_type: PoolType) -> (JoinAction, ExitAction) {
    match linear_type {
        PoolType::ERC4626Linear => (JoinAction::WrapErc4626, ExitAction::UnwrapErc4626),
        _ => (JoinAction::WrapAaveDynamicToken, ExitAction::UnwrapAaveStaticToken),
    }
}

/// Whether the pool can be exited proportionally (exact BPT in, all tokens out).
/// ComposableStable only gained it in version 3.
pub fn supports_proportional_exit(pool_type: PoolType, version: u32) -> bool {
    match pool_type {
        PoolType::Weighted
        | PoolType::Investment
        | PoolType::LiquidityBootstrapping
        | PoolType::Stable
        | PoolType::MetaStable => true,
        PoolType::ComposableStable => version > 2,
        _ => false,
    }
}
