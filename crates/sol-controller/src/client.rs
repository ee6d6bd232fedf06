//! RESTCONF client for the controller's flow inventory

use reqwest::StatusCode;

use crate::config::{ControllerConfig, Credentials};
use crate::error::{ControllerError, Result};
use crate::rule::FlowRule;

#[derive(Debug, Clone)]
pub struct NorthboundClient {
    client: reqwest::Client,
    base_url: String,
    credentials: Option<Credentials>,
}

impl NorthboundClient {
    pub fn new(config: &ControllerConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url(),
            credentials: config.credentials.clone(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn flow_url(&self, rule: &FlowRule) -> String {
        format!("{}{}", self.base_url, rule.resource_path())
    }

    /// PUT one rule; anything but `200 OK` is a rejection
    pub async fn put_flow(&self, rule: &FlowRule) -> Result<()> {
        let mut request = self.client.put(self.flow_url(rule)).json(&rule.to_wire());
        if let Some(creds) = &self.credentials {
            request = request.basic_auth(&creds.username, Some(&creds.password));
        }

        let response = request.send().await?;
        let status = response.status();
        if status != StatusCode::OK {
            let body = response.text().await.unwrap_or_default();
            return Err(ControllerError::Rejected {
                device: rule.device.clone(),
                flow_id: rule.flow_id,
                status: status.as_u16(),
                body,
            });
        }

        Ok(())
    }
}
