//! # Pool Graph SDK
//!
//! A Rust library for decomposing joins and exits on nested liquidity pools. A nested
//! pool holds tokens that are themselves pools (or wrapped tokens under linear pools);
//! this crate maps such a pool into a tree and derives the ordered actions a join or
//! exit needs against every layer.
//!
//! ## Overview
//!
//! - **Graph Building**: recursive expansion of a root pool through a pool repository,
//!   with fixed-point (1e18) proportions split by pool balances
//! - **Linear Pools**: optional wrapped-token layer between a linear pool and its main
//!   token
//! - **Traversal**: breadth-first ordering of a built graph
//! - **Path Extraction**: the minimal chain from any token in the graph up to the root
//!
//! ## Architecture
//!
//! ### Data Layer
//! Pool records come from a [`PoolRepository`] and spot prices from a
//! [`SpotPriceSource`]. The crate ships an in-memory repository and a fallback
//! repository chaining several sources with timeouts.
//!
//! ### Graph Layer
//! [`pool_graph`] holds the arena-backed tree, its builder, traversal and path
//! extraction.

// Core Types
/// Pool records and categories
pub mod pools;
/// Collaborator traits for pool lookup and pricing
pub mod pool_repository;

// Repositories
/// In-memory pool repository and static spot prices
pub mod cache;
/// Repository chaining several sources with per-source timeouts
pub mod fallback_repository;

// Graph
/// Nested pool graph: builder, traversal, path extraction
pub mod pool_graph;

// Utilities
/// Fixed-point helpers
pub mod normalization;

// Settings & Configuration
/// Configuration management
pub mod settings;

// Re-exports for convenience
pub use pool_graph::{GraphBuilder, Node, NodeId, NodePath, PoolGraph, PoolGraphError};
pub use pool_repository::{PoolRepository, SpotPriceSource};
pub use pools::PoolRecord;
pub use settings::Settings;
