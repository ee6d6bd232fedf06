//! Error types for sol-core

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Block granularity too fine: {blockbits} extra bits on {prefix} leaves only {available} bits")]
    GranularityTooFine {
        prefix: String,
        blockbits: u8,
        available: u8,
    },

    #[error("Too many blocks: blockbits {blockbits} exceeds the limit of {max}")]
    TooManyBlocks { blockbits: u8, max: u8 },

    #[error("Address family mismatch: source {src}, destination {dst}")]
    FamilyMismatch { src: String, dst: String },

    #[error("Demand exceeds path capacity for {class}: {remaining} of {total} blocks left after the last path")]
    CapacityExceeded {
        class: String,
        remaining: usize,
        total: usize,
    },

    #[error("No candidate paths for traffic class {0}")]
    NoPaths(String),

    #[error("Aggregation mismatch on path {path}: prefixes cover {covered} blocks, {assigned} were assigned")]
    AggregationMismatch {
        path: usize,
        covered: u64,
        assigned: u64,
    },

    #[error("Split policy not supported: {0}")]
    UnsupportedPolicy(String),
}
