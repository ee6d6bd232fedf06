use serde::{Deserialize, Serialize};
use std::time::Duration;

/// How synthesized rules are submitted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InstallMode {
    /// One PUT at a time, in rule order
    Sequential,
    /// Up to `max_in_flight` PUTs at once, unordered
    Concurrent,
}

/// Basic-auth credentials for the northbound API
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ControllerConfig {
    /// URL scheme of the controller (http/https)
    #[serde(default = "default_scheme")]
    pub scheme: String,
    /// Controller host
    #[serde(default = "default_host")]
    pub host: String,
    /// RESTCONF port
    #[serde(default = "default_port")]
    pub port: u16,
    /// Optional basic-auth credentials
    #[serde(default)]
    pub credentials: Option<Credentials>,
    /// Priority of installed rules
    #[serde(default = "default_priority")]
    pub priority: u16,
    /// Ask the controller to push rules to hardware
    #[serde(default = "default_install_hw")]
    pub install_hw: bool,
    /// Submission mode
    #[serde(default = "default_install_mode")]
    pub install_mode: InstallMode,
    /// Concurrent submission cap
    #[serde(default = "default_max_in_flight")]
    pub max_in_flight: usize,
    /// Per-request HTTP timeout
    #[serde(default = "default_request_timeout", with = "duration_secs")]
    pub request_timeout: Duration,
}

fn default_scheme() -> String {
    "http".into()
}

fn default_host() -> String {
    "localhost".into()
}

fn default_port() -> u16 {
    8181
}

fn default_priority() -> u16 {
    500
}

fn default_install_hw() -> bool {
    true
}

fn default_install_mode() -> InstallMode {
    InstallMode::Sequential
}

fn default_max_in_flight() -> usize {
    16
}

fn default_request_timeout() -> Duration {
    Duration::from_secs(30)
}

mod duration_secs {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_u64(d.as_secs())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Duration, D::Error> {
        Ok(Duration::from_secs(u64::deserialize(d)?))
    }
}

impl ControllerConfig {
    /// Config for a controller at `host:port`, everything else default
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            ..Self::default()
        }
    }

    /// RESTCONF base: `<scheme>://<host>:<port>/restconf`
    pub fn base_url(&self) -> String {
        format!("{}://{}:{}/restconf", self.scheme, self.host, self.port)
    }

    pub fn with_credentials(mut self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.credentials = Some(Credentials {
            username: username.into(),
            password: password.into(),
        });
        self
    }

    pub fn with_install_mode(mut self, mode: InstallMode) -> Self {
        self.install_mode = mode;
        self
    }

    pub fn with_max_in_flight(mut self, max_in_flight: usize) -> Self {
        self.max_in_flight = max_in_flight;
        self
    }

    pub fn with_priority(mut self, priority: u16) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_install_hw(mut self, install_hw: bool) -> Self {
        self.install_hw = install_hw;
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Load configuration from a JSON file
    pub fn load(path: impl AsRef<std::path::Path>) -> crate::Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Save configuration to a JSON file
    pub fn save(&self, path: impl AsRef<std::path::Path>) -> crate::Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path.as_ref(), content)?;
        Ok(())
    }
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            scheme: default_scheme(),
            host: default_host(),
            port: default_port(),
            credentials: None,
            priority: default_priority(),
            install_hw: default_install_hw(),
            install_mode: default_install_mode(),
            max_in_flight: default_max_in_flight(),
            request_timeout: default_request_timeout(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url() {
        assert_eq!(ControllerConfig::default().base_url(), "http://localhost:8181/restconf");
        assert_eq!(
            ControllerConfig::new("10.1.1.1", 8080).base_url(),
            "http://10.1.1.1:8080/restconf"
        );
    }

    #[test]
    fn test_minimal_json() {
        let config: ControllerConfig =
            serde_json::from_str(r#"{"host":"odl","install_mode":"concurrent","request_timeout":5}"#).unwrap();
        assert_eq!(config.host, "odl");
        assert_eq!(config.port, 8181);
        assert_eq!(config.install_mode, InstallMode::Concurrent);
        assert_eq!(config.request_timeout, Duration::from_secs(5));
        assert!(config.credentials.is_none());
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("controller.json");
        let config = ControllerConfig::new("odl", 8181)
            .with_credentials("admin", "admin")
            .with_install_mode(InstallMode::Concurrent)
            .with_max_in_flight(4);
        config.save(&path).unwrap();
        assert_eq!(ControllerConfig::load(&path).unwrap(), config);
    }
}
