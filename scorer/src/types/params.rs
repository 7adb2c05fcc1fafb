use std::path::PathBuf;

use crate::cli::server::ServerCliArgs;
use crate::cli::service::ServiceCliArgs;

#[derive(Debug, Clone)]
pub struct ServerParams {
    pub host: String,
    pub port: u16,
}

impl From<ServerCliArgs> for ServerParams {
    fn from(args: ServerCliArgs) -> Self {
        Self { host: args.host, port: args.port }
    }
}

#[derive(Debug, Clone)]
pub struct ServiceParams {
    pub data_folder: PathBuf,
    pub call_id_prefix: String,
    pub write_pod_spec: bool,
    /// Default for the `cleanup` query parameter of result retrieval
    pub cleanup_on_retrieval: bool,
}

impl From<ServiceCliArgs> for ServiceParams {
    fn from(args: ServiceCliArgs) -> Self {
        Self {
            data_folder: args.data_folder,
            call_id_prefix: args.call_id_prefix,
            write_pod_spec: args.write_pod_spec,
            cleanup_on_retrieval: args.cleanup_on_retrieval,
        }
    }
}
