//! sol-sdn: Multipath traffic splitting for SDN controllers
//!
//! Splits traffic classes across optimizer-chosen paths and installs the
//! resulting forwarding rules through an OpenDaylight northbound API.
//!
//! - [`sol_core`]: partitioning, assignment and prefix aggregation
//! - [`sol_controller`]: rule synthesis and installation

pub use sol_controller;
pub use sol_core;

pub use sol_controller::{
    ControllerConfig, ControllerError, FlowPusher, FlowRule, InMemoryTopology, InstallMode,
    InstallReport, RuleInstaller, RuleSynthesizer, Topology, TopologyEdge,
};
pub use sol_core::{Path, SplitConfig, SplitPolicy, Subflow, SubflowPlanner, TrafficClass};
