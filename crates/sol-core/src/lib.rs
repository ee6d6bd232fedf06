//! sol-core: Traffic splitting for multipath forwarding
//!
//! A traffic class is an aggregate demand between a source and a destination
//! prefix. When an optimizer hands us several candidate paths for one class,
//! the class address space is cut into equal blocks and the blocks are dealt
//! out to the paths so each path carries its requested share:
//!
//! ```text
//! TrafficClass + ranked Paths
//!     -> BlockPartition   (src sub-subnets x dst sub-subnets)
//!     -> Assignment       (greedy fill, path by path)
//!     -> Subflows         (per-path minimal covering prefixes)
//! ```
//!
//! ## Weighting
//!
//! Every block carries the same weight, `1 / block_count`. The split is
//! uniform over address space and knows nothing about per-prefix volume.
//!
//! ## Determinism
//!
//! Blocks are enumerated with source sub-subnets in ascending order on the
//! outer loop and destination sub-subnets ascending on the inner loop. The
//! same inputs always place the same sub-prefixes on the same paths.

mod aggregate;
mod assign;
mod class;
mod config;
mod error;
mod partition;
mod path;
mod planner;

pub use aggregate::{aggregate, aggregate_path, Subflow};
pub use assign::{assign, Assignment, PathAssignment};
pub use class::TrafficClass;
pub use config::{SplitConfig, SplitPolicy};
pub use error::Error;
pub use partition::{partition, Block, BlockPartition};
pub use path::{NodeId, Path};
pub use planner::SubflowPlanner;

pub type Result<T> = std::result::Result<T, Error>;

/// Constants shared by the split pipeline
pub mod constants {
    /// Default number of extra prefix bits used to cut a class into blocks
    pub const DEFAULT_BLOCKBITS: u8 = 5;

    /// Upper bound on blockbits; a partition holds `4^blockbits` blocks
    ///
    /// At the cap a class has 2^20 blocks. A `Block` is about 36 bytes, so
    /// the partition alone is about 36 MiB and the assignment holds a second copy.
    pub const MAX_BLOCKBITS: u8 = 10;
}
