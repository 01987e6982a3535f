//! Tradedash Core: trade-metrics derivation and aggregation.
//!
//! This crate turns an options trade-report snapshot into dashboard data:
//! - Snapshot sources and CSV decoding (file, HTTP)
//! - Row normalization into canonical trade records (fixed ×100 scaling)
//! - Per-record derived metrics against an injected date
//! - Open / closed / all view selection ordered by days to expiration
//! - Portfolio summary, per-symbol winner shares, profit-percent distribution
//!
//! The pipeline is synchronous and stateless: each run recomputes everything
//! from the snapshot it is given.

pub mod aggregate;
pub mod data;
pub mod derive;
pub mod domain;
pub mod filter;
pub mod format;
pub mod normalize;
pub mod pipeline;

pub use aggregate::UnrealizedSource;
pub use filter::{FilterError, View};
pub use normalize::NormalizeError;
pub use pipeline::{Dashboard, PipelineError, PipelineOptions};
