//! Rule synthesis: one rule per hop per host MAC pair

use ipnet::{IpNet, Ipv4Net};
use tracing::debug;

use sol_core::Subflow;

use crate::error::{ControllerError, Result};
use crate::rule::{FlowMatch, FlowRule, IPV4_ETHER_TYPE};
use crate::topology::{Topology, TopologyEdge};

/// Port facing a directly attached host
const HOST_PORT: u32 = 1;

/// Flow table every rule is written to
const TABLE_ID: u8 = 0;

/// Run-scoped flow id generator
///
/// One sequence is owned by one run; ids are handed out in increasing order
/// and never repeat. Once `u64::MAX` has been issued the sequence is spent.
#[derive(Debug, Clone)]
pub struct FlowIdSequence {
    next: Option<u64>,
}

impl Default for FlowIdSequence {
    fn default() -> Self {
        Self::starting_at(0)
    }
}

impl FlowIdSequence {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn starting_at(first: u64) -> Self {
        Self { next: Some(first) }
    }

    pub fn next_id(&mut self) -> Result<u64> {
        let id = self.next.ok_or(ControllerError::FlowIdsExhausted)?;
        self.next = id.checked_add(1);
        Ok(id)
    }

    /// The id the next call to `next_id` will return, if any remain
    pub fn peek(&self) -> Option<u64> {
        self.next
    }
}

/// Expands subflows into per-device rules using topology adjacency
pub struct RuleSynthesizer<T> {
    topology: T,
    priority: u16,
    install_hw: bool,
}

impl<T: Topology> RuleSynthesizer<T> {
    pub fn new(topology: T, priority: u16, install_hw: bool) -> Self {
        Self {
            topology,
            priority,
            install_hw,
        }
    }

    pub fn topology(&self) -> &T {
        &self.topology
    }

    /// Synthesize every rule for one subflow
    ///
    /// A path of H nodes with Ms source and Md destination hosts yields
    /// H x Ms x Md rules, hop by hop.
    pub fn synthesize(&self, subflow: &Subflow, ids: &mut FlowIdSequence) -> Result<Vec<FlowRule>> {
        let nodes = subflow.path.nodes();
        let hops = nodes.len();
        if hops < 2 {
            return Err(ControllerError::PathTooShort { hops });
        }
        let (ipv4_src, ipv4_dst) = ipv4_pair(subflow)?;

        let src_macs: Vec<&str> = self
            .edge(&nodes[0], &nodes[1])?
            .src_hosts
            .iter()
            .map(|h| h.mac.as_str())
            .collect();
        let dst_macs: Vec<&str> = self
            .edge(&nodes[hops - 2], &nodes[hops - 1])?
            .dst_hosts
            .iter()
            .map(|h| h.mac.as_str())
            .collect();

        let mut rules = Vec::with_capacity(hops * src_macs.len() * dst_macs.len());

        for (i, node) in nodes.iter().enumerate() {
            let (in_port, device) = if i == 0 {
                (HOST_PORT, &self.edge(node, &nodes[1])?.device)
            } else {
                (
                    self.edge(&nodes[i - 1], node)?.dst_port,
                    &self.edge(node, &nodes[i - 1])?.device,
                )
            };
            let output_port = if i == hops - 1 {
                HOST_PORT
            } else {
                self.edge(node, &nodes[i + 1])?.src_port
            };

            for eth_src in &src_macs {
                for eth_dst in &dst_macs {
                    let flow_id = ids.next_id()?;
                    rules.push(FlowRule {
                        device: device.clone(),
                        table_id: TABLE_ID,
                        flow_id,
                        name: format!("Path{}", flow_id),
                        priority: self.priority,
                        install_hw: self.install_hw,
                        matches: FlowMatch {
                            in_port,
                            eth_src: (*eth_src).to_string(),
                            eth_dst: (*eth_dst).to_string(),
                            ipv4_src,
                            ipv4_dst,
                            ether_type: IPV4_ETHER_TYPE,
                        },
                        output_port,
                    });
                }
            }
        }

        debug!(
            src = %subflow.src,
            dst = %subflow.dst,
            hops,
            rules = rules.len(),
            "Synthesized subflow rules"
        );

        Ok(rules)
    }

    /// Synthesize rules for every subflow, sharing one id sequence
    pub fn synthesize_all(&self, subflows: &[Subflow], ids: &mut FlowIdSequence) -> Result<Vec<FlowRule>> {
        let mut rules = Vec::new();
        for subflow in subflows {
            rules.extend(self.synthesize(subflow, ids)?);
        }
        Ok(rules)
    }

    fn edge(&self, from: &str, to: &str) -> Result<&TopologyEdge> {
        self.topology
            .edge_between(from, to)
            .ok_or_else(|| ControllerError::MissingEdge {
                from: from.to_string(),
                to: to.to_string(),
            })
    }
}

fn ipv4_pair(subflow: &Subflow) -> Result<(Ipv4Net, Ipv4Net)> {
    match (subflow.src, subflow.dst) {
        (IpNet::V4(src), IpNet::V4(dst)) => Ok((src, dst)),
        _ => Err(ControllerError::NotIpv4 {
            src: subflow.src.to_string(),
            dst: subflow.dst.to_string(),
        }),
    }
}
