//! sol-controller: Forwarding rule synthesis and installation
//!
//! Expands planned subflows into per-device match/action rules and pushes
//! them to an OpenDaylight controller over its RESTCONF northbound API.
//!
//! ```no_run
//! use std::collections::HashMap;
//! use sol_controller::{ControllerConfig, FlowPusher, InMemoryTopology};
//! use sol_core::SplitConfig;
//!
//! # async fn run() -> sol_controller::Result<()> {
//! let topology = InMemoryTopology::new();
//! let pusher = FlowPusher::new(ControllerConfig::default(), SplitConfig::default(), topology)?;
//! let report = pusher.push_paths(&[], &HashMap::new()).await?;
//! println!("installed {} rules", report.installed);
//! # Ok(())
//! # }
//! ```
//!
//! Rules for one run are fully built, flow ids included, before any request
//! is sent. A rejected rule is logged and counted; the run carries on and
//! nothing is rolled back.

mod client;
mod config;
mod error;
mod installer;
pub mod metrics;
mod pipeline;
mod rule;
mod synth;
mod topology;

pub use client::NorthboundClient;
pub use config::{ControllerConfig, Credentials, InstallMode};
pub use error::{ControllerError, Result};
pub use installer::{InstallFailure, InstallReport, RuleInstaller};
pub use pipeline::FlowPusher;
pub use rule::{FlowKey, FlowMatch, FlowRule, IPV4_ETHER_TYPE};
pub use synth::{FlowIdSequence, RuleSynthesizer};
pub use topology::{Host, InMemoryTopology, Topology, TopologyEdge};

/// JSON bodies exchanged with the controller
pub mod wire {
    pub use crate::rule::{
        ApplyActions, EthernetMatch, EthernetType, FlowEnvelope, MacAddress, OutputAction,
        WireAction, WireFlow, WireInstruction, WireInstructions, WireMatch,
    };
}
