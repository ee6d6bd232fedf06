//! Candidate paths through the topology

use serde::{Deserialize, Serialize};
use std::fmt;

/// Topology node identifier
pub type NodeId = String;

/// An ordered route from an ingress to an egress node
///
/// `share` is the fraction of the owning traffic class this path should carry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Path {
    nodes: Vec<NodeId>,
    share: f64,
}

impl Path {
    pub fn new<I, S>(nodes: I, share: f64) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<NodeId>,
    {
        Self {
            nodes: nodes.into_iter().map(Into::into).collect(),
            share,
        }
    }

    /// Build a path from an absolute flow count out of the class demand
    pub fn with_flows<I, S>(nodes: I, flows: u64, demand: u64) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<NodeId>,
    {
        let share = if demand == 0 {
            0.0
        } else {
            flows as f64 / demand as f64
        };
        Self::new(nodes, share)
    }

    pub fn nodes(&self) -> &[NodeId] {
        &self.nodes
    }

    pub fn share(&self) -> f64 {
        self.share
    }

    pub fn ingress(&self) -> Option<&NodeId> {
        self.nodes.first()
    }

    pub fn egress(&self) -> Option<&NodeId> {
        self.nodes.last()
    }

    /// Number of nodes (hops) on the path
    pub fn hops(&self) -> usize {
        self.nodes.len()
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} @ {:.3}", self.nodes.join("->"), self.share)
    }
}
