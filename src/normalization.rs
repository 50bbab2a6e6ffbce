// src/normalization.rs
//
// Fixed-point helpers for proportion arithmetic. Every proportion in the pool graph is a
// fraction scaled by SCALE (1e18 == 100%).

use ethers::types::U256;
use ethers::utils::{parse_units, ParseUnits};

/// Fixed-point scale (1e18) for preserving precision in integer arithmetic
pub const SCALE: u128 = 1_000_000_000_000_000_000u128;

/// Decimals balances are normalized to before proportions are computed.
pub const EVM_DECIMALS: u32 = 18;

/// 100% in fixed point.
#[inline]
pub fn one() -> U256 {
    U256::from(SCALE)
}

/// (a * b) / denom, multiplying first. Returns None on a zero denominator or overflow.
#[inline]
pub fn mul_div_floor(a: U256, b: U256, denom: U256) -> Option<U256> {
    if denom.is_zero() {
        return None;
    }
    a.checked_mul(b).map(|prod| prod / denom)
}

/// Share of `part` in `total`, scaled by 1e18.
#[inline]
pub fn proportion_of(part: U256, total: U256) -> Option<U256> {
    mul_div_floor(part, one(), total)
}

/// Apply a fixed-point fraction to another fixed-point fraction: `a * b / 1e18`.
/// Saturates on overflow.
#[inline]
pub fn mul_down(a: U256, b: U256) -> U256 {
    a.saturating_mul(b) / one()
}

/// Parse a human balance string ("1234.5678") into base units at 18 decimals.
/// Returns None for malformed or negative balances.
pub fn parse_balance(balance: &str) -> Option<U256> {
    match parse_units(balance.trim(), EVM_DECIMALS).ok()? {
        ParseUnits::U256(value) => Some(value),
        ParseUnits::I256(_) => None,
    }
}
