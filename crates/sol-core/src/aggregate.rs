//! Merging a path's blocks back into covering prefixes

use ipnet::IpNet;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::{Assignment, Block, BlockPartition, Error, Path, Result, TrafficClass};

/// A path together with one source/destination prefix pair it carries
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Subflow {
    pub path: Path,
    pub src: IpNet,
    pub dst: IpNet,
}

impl Subflow {
    pub fn new(path: Path, src: IpNet, dst: IpNet) -> Self {
        Self { path, src, dst }
    }

    /// The whole class on a single path
    pub fn whole_class(class: &TrafficClass, path: Path) -> Self {
        Self::new(path, class.src, class.dst)
    }
}

/// Aggregate every path of an assignment into subflows, in path rank order
pub fn aggregate(
    paths: &[Path],
    assignment: &Assignment,
    partition: &BlockPartition,
) -> Result<Vec<Subflow>> {
    let mut subflows = Vec::new();
    for (index, bucket) in assignment.iter() {
        let Some(path) = paths.get(index) else {
            continue;
        };
        let pairs = aggregate_path(index, &bucket.blocks, partition)?;
        subflows.extend(
            pairs
                .into_iter()
                .map(|(src, dst)| Subflow::new(path.clone(), src, dst)),
        );
    }
    Ok(subflows)
}

/// Merge one path's blocks into the fewest prefix pairs that cover them exactly
///
/// Blocks are grouped by source subnet and each group's destination subnets are
/// merged. Source subnets whose merged destination lists match are merged in
/// turn, and each merged source prefix is paired with every destination prefix
/// of its group. The covered block count is checked against `blocks`.
pub fn aggregate_path(
    path_index: usize,
    blocks: &[Block],
    partition: &BlockPartition,
) -> Result<Vec<(IpNet, IpNet)>> {
    if blocks.is_empty() {
        return Ok(Vec::new());
    }

    let mut by_src: BTreeMap<IpNet, Vec<IpNet>> = BTreeMap::new();
    for block in blocks {
        by_src.entry(block.src).or_default().push(block.dst);
    }

    // (merged destinations, sources sharing them), ordered by first source
    let mut groups: Vec<(Vec<IpNet>, Vec<IpNet>)> = Vec::new();
    for (src, dsts) in by_src {
        let merged = IpNet::aggregate(&dsts);
        match groups.iter_mut().find(|(d, _)| *d == merged) {
            Some((_, srcs)) => srcs.push(src),
            None => groups.push((merged, vec![src])),
        }
    }

    let mut pairs = Vec::new();
    for (dsts, srcs) in &groups {
        for src in IpNet::aggregate(srcs) {
            for dst in dsts {
                pairs.push((src, *dst));
            }
        }
    }

    let covered: u64 = pairs
        .iter()
        .map(|(src, dst)| {
            let src_blocks = 1u64 << partition.src_mask().saturating_sub(src.prefix_len());
            let dst_blocks = 1u64 << partition.dst_mask().saturating_sub(dst.prefix_len());
            src_blocks * dst_blocks
        })
        .sum();
    let assigned = blocks.len() as u64;
    if covered != assigned {
        return Err(Error::AggregationMismatch {
            path: path_index,
            covered,
            assigned,
        });
    }

    tracing::debug!(
        path = path_index,
        blocks = assigned,
        prefixes = pairs.len(),
        "Aggregated path blocks"
    );

    Ok(pairs)
}
