use std::path::PathBuf;

use clap::Args;

use crate::types::constant::DEFAULT_CALL_ID_PREFIX;

/// Parameters controlling how scoring calls are stored and served.
#[derive(Debug, Clone, Args)]
#[group()]
pub struct ServiceCliArgs {
    /// Root folder holding one directory of artifacts per call.
    #[arg(env = "SCORER_DATA_FOLDER", long, default_value = "./api_data")]
    pub data_folder: PathBuf,

    /// Prefix of generated call ids.
    #[arg(env = "SCORER_CALL_ID_PREFIX", long, default_value = DEFAULT_CALL_ID_PREFIX)]
    pub call_id_prefix: String,

    /// Write an execution manifest next to the input of every call.
    #[arg(env = "SCORER_WRITE_POD_SPEC", long, default_value_t = false)]
    pub write_pod_spec: bool,

    /// Delete the artifacts of a call once its result has been retrieved,
    /// unless the request says otherwise.
    #[arg(env = "SCORER_CLEANUP_ON_RETRIEVAL", long, default_value_t = false)]
    pub cleanup_on_retrieval: bool,
}
