use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use tempfile::TempDir;

use crate::core::client::storage::{ArtifactStore, LocalFileStore};
use crate::core::config::Config;
use crate::server::types::ApiResponse;
use crate::server::{setup_server, ServerHandle};
use crate::types::artifact::ArtifactType;
use crate::types::call_id::CallId;
use crate::types::constant::DEFAULT_CALL_ID_PREFIX;
use crate::types::job::{CallStatus, StatusReport};
use crate::types::params::{ServerParams, ServiceParams};

pub struct TestServices {
    pub config: Arc<Config>,
    pub api_server_address: Option<SocketAddr>,
    pub server_handle: Option<ServerHandle>,
    pub data_dir: TempDir,
}

impl TestServices {
    pub fn base_url(&self) -> String {
        format!("http://{}", self.api_server_address.expect("API server was not configured"))
    }

    pub fn artifact_path(&self, call_id: &CallId, artifact: ArtifactType) -> std::path::PathBuf {
        self.config.layout().path(call_id, artifact)
    }
}

/// Builds a `Config` over a fresh temporary data folder, optionally
/// starting the HTTP server on a random port.
pub struct TestConfigBuilder {
    write_pod_spec: bool,
    cleanup_on_retrieval: bool,
    storage: Option<Box<dyn ArtifactStore>>,
    api_server: bool,
}

impl Default for TestConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TestConfigBuilder {
    pub fn new() -> Self {
        Self { write_pod_spec: false, cleanup_on_retrieval: false, storage: None, api_server: false }
    }

    pub fn write_pod_spec(mut self, enabled: bool) -> Self {
        self.write_pod_spec = enabled;
        self
    }

    pub fn cleanup_on_retrieval(mut self, enabled: bool) -> Self {
        self.cleanup_on_retrieval = enabled;
        self
    }

    pub fn configure_storage(mut self, storage: Box<dyn ArtifactStore>) -> Self {
        self.storage = Some(storage);
        self
    }

    pub fn configure_api_server(mut self) -> Self {
        self.api_server = true;
        self
    }

    pub async fn build(self) -> TestServices {
        let data_dir = tempfile::tempdir().expect("Failed to create temp data folder");

        let server_params = ServerParams { host: "127.0.0.1".to_string(), port: 0 };
        let service_params = ServiceParams {
            data_folder: data_dir.path().to_path_buf(),
            call_id_prefix: DEFAULT_CALL_ID_PREFIX.to_string(),
            write_pod_spec: self.write_pod_spec,
            cleanup_on_retrieval: self.cleanup_on_retrieval,
        };
        let storage = self.storage.unwrap_or_else(|| Box::new(LocalFileStore::new(data_dir.path())));

        let config = Arc::new(Config::new(server_params, service_params, storage).expect("Failed to build config"));

        let (api_server_address, server_handle) = if self.api_server {
            let (addr, handle) = setup_server(config.clone()).await.expect("Failed to start API server");
            (Some(addr), Some(handle))
        } else {
            (None, None)
        };

        TestServices { config, api_server_address, server_handle, data_dir }
    }
}

/// Writes an artifact directly, as if left behind by an earlier process.
pub async fn write_artifact(path: &Path, content: &'static [u8]) {
    LocalFileStore::new("/")
        .put_data(Bytes::from_static(content), path)
        .await
        .expect("Failed to write artifact");
}

/// Polls the status route until the call reaches `expected`.
pub async fn wait_for_status(
    client: &reqwest::Client,
    base_url: &str,
    call_uuid: &CallId,
    expected: CallStatus,
) -> StatusReport {
    for _ in 0..100 {
        let response = client
            .get(format!("{}/api/v1/calls/{}/status", base_url, call_uuid))
            .send()
            .await
            .expect("Status request failed");
        let body: ApiResponse<StatusReport> = response.json().await.expect("Failed to parse status response");
        let report = body.data.expect("Status response without data");
        if report.status == expected {
            return report;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    panic!("Call {} never reached status {}", call_uuid, expected);
}
