//! Subflow planning across traffic classes

use std::collections::HashMap;

use tracing::{debug, info};

use crate::{aggregate, assign, partition, Path, Result, SplitConfig, Subflow, TrafficClass};

/// Turns traffic classes and their ranked paths into subflows
#[derive(Debug, Clone, Default)]
pub struct SubflowPlanner {
    config: SplitConfig,
}

impl SubflowPlanner {
    pub fn new(config: SplitConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SplitConfig {
        &self.config
    }

    /// Split one class across its paths
    ///
    /// A class with a single path is carried whole, without partitioning.
    pub fn plan_class(&self, class: &TrafficClass, paths: &[Path]) -> Result<Vec<Subflow>> {
        match paths {
            [] => Err(crate::Error::NoPaths(class.name.clone())),
            [only] => Ok(vec![Subflow::whole_class(class, only.clone())]),
            _ => {
                let blocks = partition(class, self.config.blockbits)?;
                let assignment = assign(class, paths, &blocks, self.config.policy)?;
                aggregate(paths, &assignment, &blocks)
            }
        }
    }

    /// Plan every class that has an optimized path list, in class order
    ///
    /// Classes missing from `paths` are skipped. Any fatal split error aborts
    /// the whole plan.
    pub fn plan(
        &self,
        classes: &[TrafficClass],
        paths: &HashMap<String, Vec<Path>>,
    ) -> Result<Vec<Subflow>> {
        let mut subflows = Vec::new();

        for class in classes {
            let Some(class_paths) = paths.get(&class.name) else {
                debug!(class = %class.name, "No optimized paths, skipping");
                continue;
            };

            let planned = self.plan_class(class, class_paths)?;
            debug!(
                class = %class,
                paths = class_paths.len(),
                subflows = planned.len(),
                "Planned traffic class"
            );
            subflows.extend(planned);
        }

        info!(
            classes = classes.len(),
            subflows = subflows.len(),
            blockbits = self.config.blockbits,
            "Subflow plan complete"
        );

        Ok(subflows)
    }
}
