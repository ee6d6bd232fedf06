//! Split configuration

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::constants::{DEFAULT_BLOCKBITS, MAX_BLOCKBITS};
use crate::{Error, Result};

/// How blocks are handed out to paths
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SplitPolicy {
    /// Fill paths in rank order until each reaches its share
    #[default]
    Greedy,
    /// Move only the delta between a previous and a new split
    MinDiff,
}

impl fmt::Display for SplitPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SplitPolicy::Greedy => write!(f, "greedy"),
            SplitPolicy::MinDiff => write!(f, "min_diff"),
        }
    }
}

/// Configuration for splitting traffic classes across paths
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SplitConfig {
    /// Extra prefix bits below each class prefix used to cut blocks
    #[serde(default = "default_blockbits")]
    pub blockbits: u8,
    /// Assignment policy
    #[serde(default)]
    pub policy: SplitPolicy,
}

fn default_blockbits() -> u8 {
    DEFAULT_BLOCKBITS
}

impl SplitConfig {
    pub fn with_blockbits(mut self, blockbits: u8) -> Self {
        self.blockbits = blockbits;
        self
    }

    pub fn with_policy(mut self, policy: SplitPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Reject settings that can never produce a partition
    pub fn validate(&self) -> Result<()> {
        if self.blockbits > MAX_BLOCKBITS {
            return Err(Error::TooManyBlocks {
                blockbits: self.blockbits,
                max: MAX_BLOCKBITS,
            });
        }
        Ok(())
    }

    /// Load configuration from a JSON file
    pub fn load(path: impl AsRef<std::path::Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let config: Self = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a JSON file
    pub fn save(&self, path: impl AsRef<std::path::Path>) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path.as_ref(), content)?;
        Ok(())
    }
}

impl Default for SplitConfig {
    fn default() -> Self {
        Self {
            blockbits: DEFAULT_BLOCKBITS,
            policy: SplitPolicy::Greedy,
        }
    }
}
