//! Topology adjacency lookups used during rule synthesis

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use sol_core::NodeId;

/// End host attached to a switch port
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Host {
    pub mac: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ip: Option<String>,
}

impl Host {
    pub fn new(mac: impl Into<String>) -> Self {
        Self {
            mac: mac.into(),
            ip: None,
        }
    }
}

/// Metadata of one directed link `from -> to`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopologyEdge {
    /// Controller device id of the `from` node
    pub device: String,
    /// Port on `from` that leads to `to`
    pub src_port: u32,
    /// Port on `to` that the link arrives at
    pub dst_port: u32,
    /// Hosts attached to `from`
    #[serde(default)]
    pub src_hosts: Vec<Host>,
    /// Hosts attached to `to`
    #[serde(default)]
    pub dst_hosts: Vec<Host>,
}

/// Read-only adjacency lookups
pub trait Topology {
    /// The directed edge from `from` to `to`, if one exists
    fn edge_between(&self, from: &str, to: &str) -> Option<&TopologyEdge>;
}

impl<T: Topology + ?Sized> Topology for &T {
    fn edge_between(&self, from: &str, to: &str) -> Option<&TopologyEdge> {
        (**self).edge_between(from, to)
    }
}

/// Topology held as a map of directed edges
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InMemoryTopology {
    edges: HashMap<NodeId, HashMap<NodeId, TopologyEdge>>,
}

impl InMemoryTopology {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace the directed edge `from -> to`
    pub fn insert(&mut self, from: impl Into<NodeId>, to: impl Into<NodeId>, edge: TopologyEdge) {
        self.edges
            .entry(from.into())
            .or_default()
            .insert(to.into(), edge);
    }

    pub fn edge_count(&self) -> usize {
        self.edges.values().map(HashMap::len).sum()
    }

    /// Load a topology from a JSON file
    pub fn load(path: impl AsRef<std::path::Path>) -> crate::Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Ok(serde_json::from_str(&content)?)
    }
}

impl Topology for InMemoryTopology {
    fn edge_between(&self, from: &str, to: &str) -> Option<&TopologyEdge> {
        self.edges.get(from)?.get(to)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn edge(device: &str) -> TopologyEdge {
        TopologyEdge {
            device: device.into(),
            src_port: 2,
            dst_port: 3,
            src_hosts: vec![Host::new("00:00:00:00:00:01")],
            dst_hosts: Vec::new(),
        }
    }

    #[test]
    fn test_directed_lookup() {
        let mut topo = InMemoryTopology::new();
        topo.insert("s1", "s2", edge("openflow:1"));

        assert_eq!(topo.edge_between("s1", "s2").unwrap().device, "openflow:1");
        assert!(topo.edge_between("s2", "s1").is_none());
        assert!(topo.edge_between("s9", "s1").is_none());
        assert_eq!(topo.edge_count(), 1);
    }

    #[test]
    fn test_load_from_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("topology.json");
        std::fs::write(
            &path,
            r#"{"edges":{"s1":{"s2":{"device":"openflow:1","src_port":2,"dst_port":3,
                "src_hosts":[{"mac":"00:00:00:00:00:01"}]}}}}"#,
        )
        .unwrap();

        let topo = InMemoryTopology::load(&path).unwrap();
        let e = topo.edge_between("s1", "s2").unwrap();
        assert_eq!(e.src_port, 2);
        assert_eq!(e.src_hosts[0].mac, "00:00:00:00:00:01");
        assert!(e.dst_hosts.is_empty());
    }
}
