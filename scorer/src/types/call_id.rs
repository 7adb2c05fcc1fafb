use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::constant::{
    CALL_ID_RANDOM_LETTERS, CALL_ID_TIME_FORMAT, MAX_CALL_ID_LEN, MAX_CALL_ID_PREFIX_LEN, MAX_RUN_ID_LEN,
};

#[derive(Error, Debug, PartialEq)]
pub enum CallIdError {
    #[error("call id is empty")]
    Empty,

    #[error("call id is longer than {MAX_CALL_ID_LEN} characters")]
    TooLong,

    #[error("call id contains invalid character {0:?}")]
    InvalidCharacter(char),

    #[error("run id {0:?} must be 1 to {MAX_RUN_ID_LEN} ascii letters, digits or underscores")]
    InvalidRunId(String),

    #[error("call id prefix {0:?} must be 1 to {MAX_CALL_ID_PREFIX_LEN} ascii letters, digits or underscores")]
    InvalidPrefix(String),
}

/// Key correlating a scoring request with its artifacts on disk.
///
/// Generated ids look like `wsm-2026-10-18-09-41-07-qzkfa`, optionally
/// followed by `-{run_id}`. Ids coming back from clients are restricted to
/// `[A-Za-z0-9_-]`, so they can be used as a path component as-is.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CallId(String);

fn is_word_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

impl CallId {
    /// Issues a fresh id from the current UTC time.
    pub fn generate(prefix: &str, run_id: Option<&str>) -> Result<Self, CallIdError> {
        Self::generate_at(prefix, Utc::now(), &mut rand::thread_rng(), run_id)
    }

    pub fn generate_at<R: Rng>(
        prefix: &str,
        now: DateTime<Utc>,
        rng: &mut R,
        run_id: Option<&str>,
    ) -> Result<Self, CallIdError> {
        validate_prefix(prefix)?;

        let letters: String = (0..CALL_ID_RANDOM_LETTERS).map(|_| rng.gen_range(b'a'..=b'z') as char).collect();
        let mut id = format!("{}-{}-{}", prefix, now.format(CALL_ID_TIME_FORMAT), letters);

        if let Some(run_id) = run_id {
            if run_id.is_empty() || run_id.len() > MAX_RUN_ID_LEN || !run_id.chars().all(is_word_char) {
                return Err(CallIdError::InvalidRunId(run_id.to_string()));
            }
            id.push('-');
            id.push_str(run_id);
        }

        Self::parse(&id)
    }

    /// Validates an id received from a client.
    pub fn parse(value: &str) -> Result<Self, CallIdError> {
        if value.is_empty() {
            return Err(CallIdError::Empty);
        }
        if value.len() > MAX_CALL_ID_LEN {
            return Err(CallIdError::TooLong);
        }
        if let Some(c) = value.chars().find(|c| !is_word_char(*c) && *c != '-') {
            return Err(CallIdError::InvalidCharacter(c));
        }
        Ok(Self(value.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Checks that a configured prefix yields valid ids for every accepted run id.
pub fn validate_prefix(prefix: &str) -> Result<(), CallIdError> {
    if prefix.is_empty() || prefix.len() > MAX_CALL_ID_PREFIX_LEN || !prefix.chars().all(is_word_char) {
        return Err(CallIdError::InvalidPrefix(prefix.to_string()));
    }
    Ok(())
}

impl fmt::Display for CallId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for CallId {
    type Err = CallIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for CallId {
    type Error = CallIdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<CallId> for String {
    fn from(value: CallId) -> Self {
        value.0
    }
}
