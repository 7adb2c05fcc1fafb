use serde::{Deserialize, Serialize};

/// A single named measurement produced by a function evaluation.
///
/// The field order is also the column order of the output CSV.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Metric {
    pub metric_name: String,
    pub mean: f64,
    pub sem: f64,
}

impl Metric {
    /// Noise-free measurement, the standard error is always zero.
    pub fn exact(name: impl Into<String>, value: f64) -> Self {
        Self { metric_name: name.into(), mean: value, sem: 0.0 }
    }
}

/// Ordered list of metrics, primary metric first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Evaluation {
    pub metrics: Vec<Metric>,
}

impl Evaluation {
    pub fn get(&self, name: &str) -> Option<&Metric> {
        self.metrics.iter().find(|m| m.metric_name == name)
    }
}

pub fn l2norm(x: &[f64]) -> f64 {
    x.iter().map(|v| v * v).sum::<f64>().sqrt()
}
