pub const INPUT_JSON_PREFIX: &str = "input_";
pub const OUTPUT_PREFIX: &str = "output_";
pub const POD_SPEC_PREFIX: &str = "pod_spec_";

pub const INPUTS_DIR: &str = "inputs";
pub const RESULTS_DIR: &str = "results";

pub const DEFAULT_CALL_ID_PREFIX: &str = "wsm";
pub const CALL_ID_TIME_FORMAT: &str = "%Y-%m-%d-%H-%M-%S";
pub const CALL_ID_RANDOM_LETTERS: usize = 5;
pub const MAX_CALL_ID_LEN: usize = 128;
pub const MAX_RUN_ID_LEN: usize = 64;
/// Length of a formatted `CALL_ID_TIME_FORMAT` timestamp
pub const CALL_ID_TIMESTAMP_LEN: usize = 19;
/// Longest prefix that still leaves room for the timestamp, the letters, a
/// full-length run id and the three dashes between them
pub const MAX_CALL_ID_PREFIX_LEN: usize =
    MAX_CALL_ID_LEN - MAX_RUN_ID_LEN - CALL_ID_TIMESTAMP_LEN - CALL_ID_RANDOM_LETTERS - 3;

/// How many times a colliding call id is re-rolled before giving up
pub const MAX_CALL_ID_ATTEMPTS: usize = 8;

/// Failed calls remembered in memory before the oldest are evicted
pub const MAX_FAILED_RECORDS: usize = 1024;
