//! Rule installation, sequential or through a bounded worker pool

use std::sync::Arc;
use std::time::Instant;

use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{error, info, warn};

use crate::client::NorthboundClient;
use crate::config::{ControllerConfig, InstallMode};
use crate::error::{ControllerError, Result};
use crate::metrics;
use crate::rule::{FlowKey, FlowRule};

/// A rule the controller did not accept
#[derive(Debug, Clone)]
pub struct InstallFailure {
    pub key: FlowKey,
    pub reason: String,
}

/// Outcome of one installation run
#[derive(Debug, Clone, Default)]
pub struct InstallReport {
    /// Rules submitted
    pub attempted: usize,
    /// Rules the controller acknowledged with 200
    pub installed: usize,
    /// Rejected or unreachable rules; left unapplied
    pub failures: Vec<InstallFailure>,
    /// Workers that panicked before reporting
    pub aborted: usize,
}

impl InstallReport {
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty() && self.aborted == 0 && self.installed == self.attempted
    }

    fn record(&mut self, key: FlowKey, result: Result<()>) {
        match result {
            Ok(()) => self.installed += 1,
            Err(e) => {
                warn!(flow = %key, error = %e, "Flow install failed");
                self.failures.push(InstallFailure {
                    key,
                    reason: e.to_string(),
                });
            }
        }
    }
}

/// Submits synthesized rules to the controller
///
/// Failed submissions are logged and reported; they are neither retried nor
/// rolled back.
#[derive(Debug, Clone)]
pub struct RuleInstaller {
    client: Arc<NorthboundClient>,
    mode: InstallMode,
    max_in_flight: usize,
}

impl RuleInstaller {
    pub fn new(client: NorthboundClient, mode: InstallMode, max_in_flight: usize) -> Self {
        Self {
            client: Arc::new(client),
            mode,
            max_in_flight: max_in_flight.max(1),
        }
    }

    pub fn from_config(config: &ControllerConfig) -> Result<Self> {
        Ok(Self::new(
            NorthboundClient::new(config)?,
            config.install_mode,
            config.max_in_flight,
        ))
    }

    pub fn mode(&self) -> InstallMode {
        self.mode
    }

    /// Install every rule and wait for all submissions to finish
    pub async fn install(&self, rules: Vec<FlowRule>) -> Result<InstallReport> {
        let start = Instant::now();
        let count = rules.len();

        let report = match self.mode {
            InstallMode::Sequential => self.install_sequential(rules).await,
            InstallMode::Concurrent => self.install_concurrent(rules).await?,
        };

        metrics::record_run(self.mode, count, start.elapsed());
        info!(
            mode = metrics::mode_label(self.mode),
            attempted = report.attempted,
            installed = report.installed,
            failed = report.failures.len(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Installed {} flows",
            report.installed
        );

        Ok(report)
    }

    async fn install_sequential(&self, rules: Vec<FlowRule>) -> InstallReport {
        let mut report = InstallReport {
            attempted: rules.len(),
            ..Default::default()
        };
        for rule in rules {
            let result = submit(&self.client, &rule).await;
            report.record(rule.key(), result);
        }
        report
    }

    async fn install_concurrent(&self, rules: Vec<FlowRule>) -> Result<InstallReport> {
        let mut report = InstallReport {
            attempted: rules.len(),
            ..Default::default()
        };
        let semaphore = Arc::new(Semaphore::new(self.max_in_flight));
        let mut tasks = JoinSet::new();

        for rule in rules {
            // Wait for a free slot before spawning so at most max_in_flight workers exist
            let permit = Arc::clone(&semaphore)
                .acquire_owned()
                .await
                .map_err(|e| ControllerError::Internal(e.to_string()))?;
            let client = Arc::clone(&self.client);

            tasks.spawn(async move {
                let result = submit(&client, &rule).await;
                drop(permit);
                (rule.key(), result)
            });

            // Reap finished workers as we go
            while let Some(joined) = tasks.try_join_next() {
                collect(&mut report, joined);
            }
        }

        while let Some(joined) = tasks.join_next().await {
            collect(&mut report, joined);
        }

        Ok(report)
    }
}

fn collect(
    report: &mut InstallReport,
    joined: std::result::Result<(FlowKey, Result<()>), tokio::task::JoinError>,
) {
    match joined {
        Ok((key, result)) => report.record(key, result),
        Err(e) => {
            error!(error = %e, "Install worker aborted");
            report.aborted += 1;
        }
    }
}

async fn submit(client: &NorthboundClient, rule: &FlowRule) -> Result<()> {
    let start = Instant::now();
    metrics::record_install_start();
    let result = client.put_flow(rule).await;
    metrics::record_install_end();

    let outcome = match &result {
        Ok(()) => metrics::OUTCOME_INSTALLED,
        Err(ControllerError::Rejected { .. }) => metrics::OUTCOME_REJECTED,
        Err(_) => metrics::OUTCOME_TRANSPORT_ERROR,
    };
    metrics::record_flow_install(outcome, start.elapsed());

    result
}
