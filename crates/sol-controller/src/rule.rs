//! Forwarding rules and their RESTCONF encoding

use ipnet::Ipv4Net;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Ethertype matched by every synthesized rule (IPv4)
pub const IPV4_ETHER_TYPE: u16 = 0x0800;

/// Unique identity of a rule on the controller
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FlowKey {
    pub device: String,
    pub table_id: u8,
    pub flow_id: u64,
}

impl fmt::Display for FlowKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/table/{}/flow/{}", self.device, self.table_id, self.flow_id)
    }
}

/// Match fields of a rule
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlowMatch {
    pub in_port: u32,
    pub eth_src: String,
    pub eth_dst: String,
    pub ipv4_src: Ipv4Net,
    pub ipv4_dst: Ipv4Net,
    pub ether_type: u16,
}

/// One forwarding rule for one device
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlowRule {
    pub device: String,
    pub table_id: u8,
    pub flow_id: u64,
    pub name: String,
    pub priority: u16,
    pub install_hw: bool,
    pub matches: FlowMatch,
    pub output_port: u32,
}

impl FlowRule {
    pub fn key(&self) -> FlowKey {
        FlowKey {
            device: self.device.clone(),
            table_id: self.table_id,
            flow_id: self.flow_id,
        }
    }

    /// RESTCONF resource path of this rule, relative to the `/restconf` base
    pub fn resource_path(&self) -> String {
        format!(
            "/config/opendaylight-inventory:nodes/node/{}/table/{}/flow/{}",
            self.device, self.table_id, self.flow_id
        )
    }

    /// Encode as the controller's flow body
    pub fn to_wire(&self) -> FlowEnvelope {
        let m = &self.matches;
        FlowEnvelope {
            flow: vec![WireFlow {
                flow_name: self.name.clone(),
                install_hw: self.install_hw.to_string(),
                priority: self.priority,
                table_id: self.table_id.to_string(),
                id: self.flow_id.to_string(),
                strict: "false".into(),
                cookie_mask: "255".into(),
                cookie: "5".into(),
                barrier: "false".into(),
                matches: WireMatch {
                    ethernet_match: EthernetMatch {
                        ethernet_type: EthernetType {
                            kind: m.ether_type.to_string(),
                        },
                        ethernet_destination: MacAddress {
                            address: m.eth_dst.clone(),
                        },
                        ethernet_source: MacAddress {
                            address: m.eth_src.clone(),
                        },
                    },
                    in_port: m.in_port.to_string(),
                    ipv4_source: m.ipv4_src.to_string(),
                    ipv4_destination: m.ipv4_dst.to_string(),
                },
                instructions: WireInstructions {
                    instruction: vec![WireInstruction {
                        order: "0".into(),
                        apply_actions: ApplyActions {
                            action: vec![WireAction {
                                order: "0".into(),
                                output_action: OutputAction {
                                    output_node_connector: self.output_port.to_string(),
                                },
                            }],
                        },
                    }],
                },
            }],
        }
    }
}

/// Top-level flow body: `{"flow": [...]}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlowEnvelope {
    pub flow: Vec<WireFlow>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WireFlow {
    #[serde(rename = "flow-name")]
    pub flow_name: String,
    #[serde(rename = "installHw")]
    pub install_hw: String,
    pub priority: u16,
    pub table_id: String,
    pub id: String,
    pub strict: String,
    pub cookie_mask: String,
    pub cookie: String,
    pub barrier: String,
    #[serde(rename = "match")]
    pub matches: WireMatch,
    pub instructions: WireInstructions,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct WireMatch {
    pub ethernet_match: EthernetMatch,
    pub in_port: String,
    pub ipv4_source: String,
    pub ipv4_destination: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct EthernetMatch {
    pub ethernet_type: EthernetType,
    pub ethernet_destination: MacAddress,
    pub ethernet_source: MacAddress,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EthernetType {
    #[serde(rename = "type")]
    pub kind: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MacAddress {
    pub address: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WireInstructions {
    pub instruction: Vec<WireInstruction>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct WireInstruction {
    pub order: String,
    pub apply_actions: ApplyActions,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApplyActions {
    pub action: Vec<WireAction>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct WireAction {
    pub order: String,
    pub output_action: OutputAction,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct OutputAction {
    pub output_node_connector: String,
}
