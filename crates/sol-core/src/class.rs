//! Traffic class: one aggregate demand between two prefixes

use ipnet::IpNet;
use serde::{Deserialize, Serialize};
use std::fmt;

/// An aggregate demand between a source and a destination prefix
///
/// Prefixes are stored truncated to their network address.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TrafficClass {
    /// Identifier used to look up the class's candidate paths
    pub name: String,
    /// Source prefix
    pub src: IpNet,
    /// Destination prefix
    pub dst: IpNet,
    /// Total number of flows in this class
    pub demand: u64,
}

impl TrafficClass {
    pub fn new(name: impl Into<String>, src: IpNet, dst: IpNet, demand: u64) -> Self {
        Self {
            name: name.into(),
            src: src.trunc(),
            dst: dst.trunc(),
            demand,
        }
    }

    /// Address width of the class's family (32 or 128)
    pub fn address_bits(&self) -> u8 {
        self.src.max_prefix_len()
    }

    pub fn is_ipv4(&self) -> bool {
        matches!(self.src, IpNet::V4(_))
    }
}

impl fmt::Display for TrafficClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({} -> {})", self.name, self.src, self.dst)
    }
}
