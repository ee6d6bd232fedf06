//! End-to-end push: plan subflows, synthesize rules, install them

use std::collections::HashMap;

use tracing::info;

use sol_core::{Path, SplitConfig, SubflowPlanner, TrafficClass};

use crate::config::ControllerConfig;
use crate::error::Result;
use crate::installer::{InstallReport, RuleInstaller};
use crate::rule::FlowRule;
use crate::synth::{FlowIdSequence, RuleSynthesizer};
use crate::topology::Topology;

/// Drives one split-and-install run per call
pub struct FlowPusher<T> {
    planner: SubflowPlanner,
    synthesizer: RuleSynthesizer<T>,
    installer: RuleInstaller,
}

impl<T: Topology> FlowPusher<T> {
    pub fn new(controller: ControllerConfig, split: SplitConfig, topology: T) -> Result<Self> {
        split.validate()?;
        let installer = RuleInstaller::from_config(&controller)?;
        Ok(Self::with_installer(split, topology, &controller, installer))
    }

    pub fn with_installer(
        split: SplitConfig,
        topology: T,
        controller: &ControllerConfig,
        installer: RuleInstaller,
    ) -> Self {
        Self {
            planner: SubflowPlanner::new(split),
            synthesizer: RuleSynthesizer::new(topology, controller.priority, controller.install_hw),
            installer,
        }
    }

    /// Plan and synthesize every rule of a run without installing anything
    ///
    /// Flow ids start at zero for each run.
    pub fn build_rules(
        &self,
        classes: &[TrafficClass],
        paths: &HashMap<String, Vec<Path>>,
    ) -> Result<Vec<FlowRule>> {
        let subflows = self.planner.plan(classes, paths)?;
        let mut ids = FlowIdSequence::new();
        let rules = self.synthesizer.synthesize_all(&subflows, &mut ids)?;
        info!(
            subflows = subflows.len(),
            rules = rules.len(),
            "Synthesized forwarding rules"
        );
        Ok(rules)
    }

    /// Split every class across its paths and install the resulting rules
    ///
    /// Split and synthesis errors abort before anything is sent. Rejected
    /// rules are reported, not raised.
    pub async fn push_paths(
        &self,
        classes: &[TrafficClass],
        paths: &HashMap<String, Vec<Path>>,
    ) -> Result<InstallReport> {
        let rules = self.build_rules(classes, paths)?;
        self.installer.install(rules).await
    }
}
