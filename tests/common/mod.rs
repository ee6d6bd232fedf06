//! Mock OpenDaylight controller for integration tests
//!
//! Accepts RESTCONF flow PUTs, records them, and answers 200 unless the flow
//! id is on the reject list.

#![allow(dead_code)]

use std::collections::HashSet;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::{
    body::Bytes,
    extract::State,
    http::{header, HeaderMap, Method, StatusCode, Uri},
    Router,
};
use sol_sdn::sol_controller::wire::FlowEnvelope;
use sol_sdn::{ControllerConfig, InMemoryTopology, TopologyEdge};
use sol_sdn::sol_controller::Host;
use tokio::net::TcpListener;
use tracing::{debug, warn};

/// One PUT seen by the mock
#[derive(Debug, Clone)]
pub struct RecordedPut {
    pub path: String,
    pub flow_id: u64,
    pub body: FlowEnvelope,
    pub authorization: Option<String>,
}

#[derive(Clone, Default)]
struct MockState {
    requests: Arc<Mutex<Vec<RecordedPut>>>,
    reject: Arc<HashSet<u64>>,
    delay: Duration,
    in_flight: Arc<AtomicUsize>,
    peak: Arc<AtomicUsize>,
}

pub struct MockController {
    pub addr: SocketAddr,
    state: MockState,
    _shutdown: tokio::sync::oneshot::Sender<()>,
}

impl MockController {
    pub async fn start() -> Self {
        Self::with_options(HashSet::new(), Duration::ZERO).await
    }

    pub async fn rejecting(ids: impl IntoIterator<Item = u64>) -> Self {
        Self::with_options(ids.into_iter().collect(), Duration::ZERO).await
    }

    pub async fn with_delay(delay: Duration) -> Self {
        Self::with_options(HashSet::new(), delay).await
    }

    async fn with_options(reject: HashSet<u64>, delay: Duration) -> Self {
        let state = MockState {
            reject: Arc::new(reject),
            delay,
            ..Default::default()
        };

        let router = Router::new().fallback(handle).with_state(state.clone());
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Bind should succeed");
        let addr = listener.local_addr().expect("Listener has an address");

        let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel();
        tokio::spawn(async move {
            axum::serve(listener, router)
                .with_graceful_shutdown(async {
                    let _ = shutdown_rx.await;
                })
                .await
                .ok();
        });

        Self {
            addr,
            state,
            _shutdown: shutdown_tx,
        }
    }

    pub fn config(&self) -> ControllerConfig {
        ControllerConfig::new(self.addr.ip().to_string(), self.addr.port())
    }

    pub fn requests(&self) -> Vec<RecordedPut> {
        self.state.requests.lock().unwrap().clone()
    }

    /// Highest number of PUTs handled at the same time
    pub fn peak_in_flight(&self) -> usize {
        self.state.peak.load(Ordering::SeqCst)
    }
}

async fn handle(
    State(state): State<MockState>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> StatusCode {
    if method != Method::PUT {
        warn!(%method, path = %uri.path(), "Mock controller got a non-PUT request");
        return StatusCode::METHOD_NOT_ALLOWED;
    }
    let path = uri.path().to_string();
    let Some(flow_id) = path.rsplit('/').next().and_then(|id| id.parse::<u64>().ok()) else {
        return StatusCode::NOT_FOUND;
    };
    let Ok(body) = serde_json::from_slice::<FlowEnvelope>(&body) else {
        return StatusCode::BAD_REQUEST;
    };

    let now = state.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
    state.peak.fetch_max(now, Ordering::SeqCst);
    if !state.delay.is_zero() {
        tokio::time::sleep(state.delay).await;
    }
    state.in_flight.fetch_sub(1, Ordering::SeqCst);

    let authorization = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    state.requests.lock().unwrap().push(RecordedPut {
        path,
        flow_id,
        body,
        authorization,
    });

    if state.reject.contains(&flow_id) {
        debug!(flow_id, "Mock controller rejecting flow");
        StatusCode::INTERNAL_SERVER_ERROR
    } else {
        debug!(flow_id, "Mock controller accepted flow");
        StatusCode::OK
    }
}

fn link(device: &str, src_port: u32, dst_port: u32, src_hosts: &[&str], dst_hosts: &[&str]) -> TopologyEdge {
    TopologyEdge {
        device: device.into(),
        src_port,
        dst_port,
        src_hosts: src_hosts.iter().map(|m| Host::new(*m)).collect(),
        dst_hosts: dst_hosts.iter().map(|m| Host::new(*m)).collect(),
    }
}

/// Diamond topology: s1 -> {s2, s4} -> s3
///
/// h1 (one MAC) hangs off s1 and h3 (two MACs) off s3.
pub fn diamond() -> InMemoryTopology {
    let h1 = ["00:00:00:00:00:01"];
    let h3 = ["00:00:00:00:00:03", "00:00:00:00:00:33"];
    let mut topo = InMemoryTopology::new();

    topo.insert("s1", "s2", link("openflow:1", 2, 2, &h1, &[]));
    topo.insert("s2", "s1", link("openflow:2", 2, 2, &[], &h1));
    topo.insert("s2", "s3", link("openflow:2", 3, 2, &[], &h3));
    topo.insert("s3", "s2", link("openflow:3", 2, 3, &h3, &[]));

    topo.insert("s1", "s4", link("openflow:1", 3, 2, &h1, &[]));
    topo.insert("s4", "s1", link("openflow:4", 2, 3, &[], &h1));
    topo.insert("s4", "s3", link("openflow:4", 3, 3, &[], &h3));
    topo.insert("s3", "s4", link("openflow:3", 3, 3, &h3, &[]));

    topo
}

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
