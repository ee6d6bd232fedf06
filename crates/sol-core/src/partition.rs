//! Block partitioning of a traffic class's address space

use ipnet::IpNet;
use serde::{Deserialize, Serialize};

use crate::constants::MAX_BLOCKBITS;
use crate::{Error, Result, TrafficClass};

/// Smallest unit of assignment: a source sub-subnet paired with a destination sub-subnet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Block {
    pub src: IpNet,
    pub dst: IpNet,
}

impl Block {
    pub fn new(src: IpNet, dst: IpNet) -> Self {
        Self { src, dst }
    }
}

/// Every block of one traffic class, in enumeration order
#[derive(Debug, Clone)]
pub struct BlockPartition {
    blocks: Vec<Block>,
    blockbits: u8,
    src_mask: u8,
    dst_mask: u8,
}

impl BlockPartition {
    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Block> {
        self.blocks.iter()
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    pub fn blockbits(&self) -> u8 {
        self.blockbits
    }

    /// Prefix length of every source sub-subnet
    pub fn src_mask(&self) -> u8 {
        self.src_mask
    }

    /// Prefix length of every destination sub-subnet
    pub fn dst_mask(&self) -> u8 {
        self.dst_mask
    }

    /// Uniform weight of a single block
    pub fn block_weight(&self) -> f64 {
        1.0 / self.blocks.len() as f64
    }
}

/// Cut a traffic class into `2^blockbits x 2^blockbits` blocks
///
/// Source sub-subnets form the outer loop and destination sub-subnets the
/// inner loop, both in ascending address order.
pub fn partition(class: &TrafficClass, blockbits: u8) -> Result<BlockPartition> {
    if class.src.max_prefix_len() != class.dst.max_prefix_len() {
        return Err(Error::FamilyMismatch {
            src: class.src.to_string(),
            dst: class.dst.to_string(),
        });
    }
    if blockbits > MAX_BLOCKBITS {
        return Err(Error::TooManyBlocks {
            blockbits,
            max: MAX_BLOCKBITS,
        });
    }

    let src_mask = new_mask(&class.src, blockbits)?;
    let dst_mask = new_mask(&class.dst, blockbits)?;

    let src_subnets = sub_subnets(&class.src, src_mask, blockbits)?;
    let dst_subnets = sub_subnets(&class.dst, dst_mask, blockbits)?;

    let mut blocks = Vec::with_capacity(src_subnets.len() * dst_subnets.len());
    for src in &src_subnets {
        for dst in &dst_subnets {
            blocks.push(Block::new(*src, *dst));
        }
    }

    tracing::debug!(
        class = %class.name,
        blockbits,
        blocks = blocks.len(),
        "Partitioned traffic class"
    );

    Ok(BlockPartition {
        blocks,
        blockbits,
        src_mask,
        dst_mask,
    })
}

fn new_mask(prefix: &IpNet, blockbits: u8) -> Result<u8> {
    let available = prefix.max_prefix_len() - prefix.prefix_len();
    if blockbits > available {
        return Err(Error::GranularityTooFine {
            prefix: prefix.to_string(),
            blockbits,
            available,
        });
    }
    Ok(prefix.prefix_len() + blockbits)
}

fn sub_subnets(prefix: &IpNet, mask: u8, blockbits: u8) -> Result<Vec<IpNet>> {
    let subnets = prefix.subnets(mask).map_err(|_| Error::GranularityTooFine {
        prefix: prefix.to_string(),
        blockbits,
        available: prefix.max_prefix_len() - prefix.prefix_len(),
    })?;
    Ok(subnets.collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn class(src: &str, dst: &str) -> TrafficClass {
        TrafficClass::new("tc", src.parse().unwrap(), dst.parse().unwrap(), 100)
    }

    #[test]
    fn test_block_count_and_weight() {
        let p = partition(&class("10.0.0.0/24", "20.0.0.0/24"), 2).unwrap();
        assert_eq!(p.len(), 16);
        assert_eq!(p.src_mask(), 26);
        assert_eq!(p.dst_mask(), 26);
        assert!((p.block_weight() - 1.0 / 16.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_masks_follow_each_side() {
        let p = partition(&class("10.0.0.0/24", "20.0.0.0/16"), 3).unwrap();
        assert_eq!(p.src_mask(), 27);
        assert_eq!(p.dst_mask(), 19);
        assert_eq!(p.len(), 64);
    }

    #[test]
    fn test_enumeration_order() {
        let p = partition(&class("10.0.0.0/24", "20.0.0.0/24"), 1).unwrap();
        let got: Vec<(String, String)> = p
            .iter()
            .map(|b| (b.src.to_string(), b.dst.to_string()))
            .collect();
        let want = [
            ("10.0.0.0/25", "20.0.0.0/25"),
            ("10.0.0.0/25", "20.0.0.128/25"),
            ("10.0.0.128/25", "20.0.0.0/25"),
            ("10.0.0.128/25", "20.0.0.128/25"),
        ];
        assert_eq!(got.len(), want.len());
        for (g, w) in got.iter().zip(want.iter()) {
            assert_eq!((g.0.as_str(), g.1.as_str()), *w);
        }
    }

    #[test]
    fn test_zero_blockbits_is_single_block() {
        let p = partition(&class("10.0.0.0/24", "20.0.0.0/24"), 0).unwrap();
        assert_eq!(p.len(), 1);
        assert_eq!(p.blocks()[0].src.to_string(), "10.0.0.0/24");
    }

    #[test]
    fn test_granularity_too_fine() {
        let err = partition(&class("10.0.0.0/30", "20.0.0.0/24"), 3).unwrap_err();
        assert!(matches!(err, Error::GranularityTooFine { available: 2, .. }));

        let err = partition(&class("10.0.0.0/24", "20.0.0.0/31"), 2).unwrap_err();
        assert!(matches!(err, Error::GranularityTooFine { available: 1, .. }));
    }

    #[test]
    fn test_ipv6_partition() {
        let p = partition(&class("2001:db8::/120", "2001:db9::/124"), 2).unwrap();
        assert_eq!(p.len(), 16);
        assert_eq!(p.src_mask(), 122);
        assert_eq!(p.dst_mask(), 126);
    }

    #[test]
    fn test_family_mismatch() {
        let err = partition(&class("10.0.0.0/24", "2001:db8::/64"), 1).unwrap_err();
        assert!(matches!(err, Error::FamilyMismatch { .. }));
    }

    #[test]
    fn test_blockbits_cap() {
        let err = partition(&class("10.0.0.0/8", "11.0.0.0/8"), MAX_BLOCKBITS + 1).unwrap_err();
        assert!(matches!(err, Error::TooManyBlocks { .. }));
    }
}
