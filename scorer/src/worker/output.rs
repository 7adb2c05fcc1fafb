use bytes::Bytes;
use scorer_functions::Evaluation;

use crate::error::{ScorerError, ScorerResult};

/// Serialises metrics as CSV with a `metric_name,mean,sem` header, one row
/// per metric in evaluation order.
pub fn encode_metrics_csv(evaluation: &Evaluation) -> ScorerResult<Bytes> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    for metric in &evaluation.metrics {
        writer.serialize(metric).map_err(|e| ScorerError::OutputEncodingError(e.to_string()))?;
    }
    let data = writer.into_inner().map_err(|e| ScorerError::OutputEncodingError(e.error().to_string()))?;
    Ok(Bytes::from(data))
}
