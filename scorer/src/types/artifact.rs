use std::path::PathBuf;
use std::str::FromStr;

use strum::IntoEnumIterator;
use strum_macros::{AsRefStr, Display, EnumIter, EnumString};
use thiserror::Error;

use super::call_id::CallId;
use super::constant::{INPUTS_DIR, INPUT_JSON_PREFIX, OUTPUT_PREFIX, POD_SPEC_PREFIX, RESULTS_DIR};

/// The files a scoring call may leave on disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, AsRefStr, EnumIter, EnumString)]
#[strum(serialize_all = "snake_case")]
pub enum ArtifactType {
    ModelInput,
    ModelOutput,
    ModelPodSpec,
}

#[derive(Error, Debug, PartialEq)]
#[error("Can't generate filepath for {requested}. Supported values are: {supported}")]
pub struct UnknownArtifactType {
    pub requested: String,
    pub supported: String,
}

impl ArtifactType {
    pub fn parse(value: &str) -> Result<Self, UnknownArtifactType> {
        Self::from_str(value).map_err(|_| UnknownArtifactType {
            requested: value.to_string(),
            supported: Self::iter().map(|t| t.to_string()).collect::<Vec<_>>().join(", "),
        })
    }
}

/// Computes artifact paths under the data folder. Nothing is stored: the
/// path of every artifact is a pure function of the call id.
#[derive(Debug, Clone)]
pub struct ArtifactLayout {
    data_folder: PathBuf,
}

impl ArtifactLayout {
    pub fn new(data_folder: impl Into<PathBuf>) -> Self {
        Self { data_folder: data_folder.into() }
    }

    pub fn call_dir(&self, call_id: &CallId) -> PathBuf {
        self.data_folder.join(call_id.as_str())
    }

    pub fn path(&self, call_id: &CallId, artifact: ArtifactType) -> PathBuf {
        let (dir, file_name) = match artifact {
            ArtifactType::ModelInput => (INPUTS_DIR, format!("{}{}.json", INPUT_JSON_PREFIX, call_id)),
            ArtifactType::ModelOutput => (RESULTS_DIR, format!("{}{}.csv", OUTPUT_PREFIX, call_id)),
            ArtifactType::ModelPodSpec => (INPUTS_DIR, format!("{}{}.json", POD_SPEC_PREFIX, call_id)),
        };
        self.call_dir(call_id).join(dir).join(file_name)
    }

    /// Every artifact path of a call, in `ArtifactType` order.
    pub fn all_paths(&self, call_id: &CallId) -> Vec<(ArtifactType, PathBuf)> {
        ArtifactType::iter().map(|artifact| (artifact, self.path(call_id, artifact))).collect()
    }
}
