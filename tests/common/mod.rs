#![allow(dead_code)]

use ethers::types::Address;
use pool_graph_sdk::cache::{InMemoryPoolRepository, StaticSpotPrices};
use pool_graph_sdk::pool_graph::GraphBuilder;
use pool_graph_sdk::pools::{PoolRecord, PoolToken};

pub const ROOT_ID: &str = "0x00000000000000000000000000000000000000000000000000000000000000aa";
pub const NESTED_ID: &str = "0x00000000000000000000000000000000000000000000000000000000000000bb";
pub const LINEAR_ID: &str = "0x00000000000000000000000000000000000000000000000000000000000000cc";

pub fn addr(byte: u8) -> Address {
    Address::from([byte; 20])
}

/// Address string with upper-case hex digits.
pub fn shouty(address: Address) -> String {
    let hex = format!("{:?}", address);
    format!("0x{}", hex.trim_start_matches("0x").to_uppercase())
}

pub fn token(byte: u8, balance: &str, decimals: Option<u8>) -> PoolToken {
    PoolToken {
        address: addr(byte),
        balance: balance.to_string(),
        decimals,
    }
}

pub fn pool(id: &str, byte: u8, pool_type: &str, tokens: Vec<PoolToken>) -> PoolRecord {
    PoolRecord {
        id: id.to_string(),
        address: addr(byte),
        pool_type: pool_type.to_string(),
        pool_type_version: 1,
        tokens,
        main_index: None,
        wrapped_index: None,
    }
}

pub fn builder(pools: Vec<PoolRecord>) -> GraphBuilder<InMemoryPoolRepository, StaticSpotPrices> {
    GraphBuilder::new(
        InMemoryPoolRepository::from_pools(pools),
        StaticSpotPrices::with_fallback("1"),
    )
}

/// ComposableStable root (phantom BPT 0xaa) holding one linear pool (0xcc) over
/// main token 0x01 and wrapped token 0x02.
pub fn linear_fixture() -> Vec<PoolRecord> {
    let root = pool(
        ROOT_ID,
        0xaa,
        "ComposableStable",
        vec![token(0xaa, "2596148429267413.8", Some(18)), token(0xcc, "1000", Some(18))],
    );
    let mut linear = pool(
        LINEAR_ID,
        0xcc,
        "AaveLinear",
        vec![
            token(0x01, "600", Some(6)),
            token(0x02, "380", Some(6)),
            token(0xcc, "5192296858534827.6", Some(18)),
        ],
    );
    linear.main_index = Some(0);
    linear.wrapped_index = Some(1);
    vec![root, linear]
}

/// Weighted root 0xaa over [nested pool 0xbb, leaf 0x03] with balances 1:2, where the
/// nested Stable pool 0xbb holds leaves [0x01, 0x02] at 1:1:1 with 0x04.
pub fn nested_fixture() -> Vec<PoolRecord> {
    let root = pool(
        ROOT_ID,
        0xaa,
        "Weighted",
        vec![token(0xbb, "100", Some(18)), token(0x03, "200", Some(6))],
    );
    let nested = pool(
        NESTED_ID,
        0xbb,
        "Stable",
        vec![
            token(0x01, "10", Some(18)),
            token(0x02, "10", Some(8)),
            token(0x04, "10", None),
        ],
    );
    vec![root, nested]
}
