//! Block-to-path assignment

use crate::{Block, BlockPartition, Error, Path, Result, SplitPolicy, TrafficClass};

/// Blocks handed to one path, in enumeration order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PathAssignment {
    pub blocks: Vec<Block>,
}

impl PathAssignment {
    /// Fraction of the class carried by these blocks
    pub fn weight(&self, block_weight: f64) -> f64 {
        self.blocks.len() as f64 * block_weight
    }
}

/// Mapping from each candidate path (by rank) to its blocks
///
/// Every block of the partition lands in exactly one bucket.
#[derive(Debug, Clone, PartialEq)]
pub struct Assignment {
    buckets: Vec<PathAssignment>,
}

impl Assignment {
    /// Blocks assigned to the path at `index`
    pub fn blocks_for(&self, index: usize) -> &[Block] {
        self.buckets
            .get(index)
            .map(|b| b.blocks.as_slice())
            .unwrap_or(&[])
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, &PathAssignment)> {
        self.buckets.iter().enumerate()
    }

    /// Number of paths covered, including ones left empty
    pub fn path_count(&self) -> usize {
        self.buckets.len()
    }

    pub fn total_blocks(&self) -> usize {
        self.buckets.iter().map(|b| b.blocks.len()).sum()
    }
}

/// Assign a class's blocks to its ranked paths under `policy`
pub fn assign(
    class: &TrafficClass,
    paths: &[Path],
    partition: &BlockPartition,
    policy: SplitPolicy,
) -> Result<Assignment> {
    match policy {
        SplitPolicy::Greedy => greedy_fill(class, paths, partition),
        // Needs each path's previous assignment, which nothing supplies yet.
        SplitPolicy::MinDiff => Err(Error::UnsupportedPolicy(policy.to_string())),
    }
}

/// Walk the blocks in order, filling one path until its share is reached
/// before moving on to the next
fn greedy_fill(
    class: &TrafficClass,
    paths: &[Path],
    partition: &BlockPartition,
) -> Result<Assignment> {
    if paths.is_empty() {
        return Err(Error::NoPaths(class.name.clone()));
    }

    let total = partition.len();
    let mut buckets = vec![PathAssignment::default(); paths.len()];
    let mut cursor = 0;
    let mut filled = 0usize;

    for (i, block) in partition.iter().enumerate() {
        if cursor >= paths.len() {
            return Err(Error::CapacityExceeded {
                class: class.name.clone(),
                remaining: total - i,
                total,
            });
        }

        buckets[cursor].blocks.push(*block);
        filled += 1;

        // filled / total >= share, kept in block counts to avoid float drift
        if filled as f64 >= paths[cursor].share() * total as f64 {
            tracing::trace!(
                class = %class.name,
                path = cursor,
                blocks = filled,
                "Path share satisfied"
            );
            filled = 0;
            cursor += 1;
        }
    }

    Ok(Assignment { buckets })
}
