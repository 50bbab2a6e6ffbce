use ethers::types::Address;

/// Failures of graph construction and path extraction. All of them abort the operation;
/// no partial graph or path is ever returned.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PoolGraphError {
    /// Root id has no record, or a leaf's parent pool vanished during the build.
    #[error("Pool not found: {0}")]
    PoolNotFound(String),

    #[error("Unsupported pool type {pool_type} for pool {pool_id}")]
    UnsupportedPoolType { pool_id: String, pool_type: String },

    #[error("Malformed linear pool {pool_id}: missing {missing} token index")]
    MalformedLinearPool {
        pool_id: String,
        missing: &'static str,
    },

    /// Input is the root's own token, is not an address, or is not in the graph.
    #[error("Invalid input token: {0}")]
    InvalidInputToken(String),

    #[error("Pool {pool_id} has zero total balance")]
    ZeroLiquidity { pool_id: String },

    #[error("Invalid balance {balance:?} for token {token:?} in pool {pool_id}")]
    InvalidBalance {
        pool_id: String,
        token: Address,
        balance: String,
    },

    #[error("Spot price of {token:?} in pool {pool_id} unavailable: {reason}")]
    SpotPrice {
        pool_id: String,
        token: Address,
        reason: String,
    },
}
