use std::collections::BTreeMap;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;
use strum_macros::{AsRefStr, Display, EnumIter, EnumString};
use tracing::debug;

use crate::colville::colville;
use crate::error::FunctionError;
use crate::hartmann::{aug_hartmann6, hartmann6};
use crate::metric::{l2norm, Evaluation, Metric};

/// Named inputs as received from a client, keyed by parameter name.
pub type Inputs = BTreeMap<String, f64>;

/// The synthetic functions the service knows how to evaluate.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, AsRefStr, EnumIter, EnumString,
)]
#[strum(ascii_case_insensitive)]
pub enum FunctionKind {
    Hartmann6,
    AugHartmann6,
    Colville,
}

/// Static description of a function, as listed by the API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionDescriptor {
    pub name: String,
    pub parameters: Vec<String>,
    pub domain: Vec<(f64, f64)>,
    pub metrics: Vec<String>,
}

const HARTMANN6_PARAMETERS: &[&str] = &["x1", "x2", "x3", "x4", "x5", "x6"];
const AUG_HARTMANN6_PARAMETERS: &[&str] = &["x1", "x2", "x3", "x4", "x5", "x6", "x7"];
const COLVILLE_PARAMETERS: &[&str] = &["x1", "x2", "x3", "x4"];

const L2NORM_METRIC: &str = "l2norm";

impl FunctionKind {
    /// Case-insensitive lookup, listing the supported names on failure.
    pub fn parse(name: &str) -> Result<Self, FunctionError> {
        Self::from_str(name).map_err(|_| FunctionError::UnknownFunction(name.to_string(), Self::supported_names()))
    }

    pub fn supported_names() -> String {
        Self::iter().map(|kind| kind.to_string()).collect::<Vec<_>>().join(", ")
    }

    pub fn parameters(&self) -> &'static [&'static str] {
        match self {
            FunctionKind::Hartmann6 => HARTMANN6_PARAMETERS,
            FunctionKind::AugHartmann6 => AUG_HARTMANN6_PARAMETERS,
            FunctionKind::Colville => COLVILLE_PARAMETERS,
        }
    }

    /// Name of the metric carrying the function value.
    pub fn primary_metric(&self) -> &'static str {
        match self {
            FunctionKind::Hartmann6 | FunctionKind::AugHartmann6 => "hartmann6",
            FunctionKind::Colville => "colville",
        }
    }

    pub fn domain(&self) -> Vec<(f64, f64)> {
        let bounds = match self {
            FunctionKind::Hartmann6 | FunctionKind::AugHartmann6 => (0.0, 1.0),
            FunctionKind::Colville => (-10.0, 10.0),
        };
        vec![bounds; self.parameters().len()]
    }

    pub fn descriptor(&self) -> FunctionDescriptor {
        FunctionDescriptor {
            name: self.to_string(),
            parameters: self.parameters().iter().map(|p| p.to_string()).collect(),
            domain: self.domain(),
            metrics: vec![self.primary_metric().to_string(), L2NORM_METRIC.to_string()],
        }
    }

    /// Orders the named inputs into the argument vector of this function.
    ///
    /// Keys that are not parameters of the function are ignored.
    pub fn bind(&self, inputs: &Inputs) -> Result<Vec<f64>, FunctionError> {
        let parameters = self.parameters();
        let mut args = Vec::with_capacity(parameters.len());

        for parameter in parameters {
            let value = *inputs.get(*parameter).ok_or_else(|| FunctionError::MissingInput {
                function: self.to_string(),
                parameter: parameter.to_string(),
            })?;
            if !value.is_finite() {
                return Err(FunctionError::NonFiniteInput {
                    function: self.to_string(),
                    parameter: parameter.to_string(),
                });
            }
            args.push(value);
        }

        for key in inputs.keys().filter(|key| !parameters.contains(&key.as_str())) {
            debug!(function = %self, input = %key, "Ignoring input that is not a function parameter");
        }

        Ok(args)
    }

    pub fn evaluate(&self, args: &[f64]) -> Result<Evaluation, FunctionError> {
        let expected = self.parameters().len();
        if args.len() != expected {
            return Err(FunctionError::ArityMismatch { function: self.to_string(), expected, actual: args.len() });
        }

        let value = match self {
            FunctionKind::Hartmann6 => hartmann6(&[args[0], args[1], args[2], args[3], args[4], args[5]]),
            FunctionKind::AugHartmann6 => {
                aug_hartmann6(&[args[0], args[1], args[2], args[3], args[4], args[5], args[6]])
            }
            FunctionKind::Colville => colville(&[args[0], args[1], args[2], args[3]]),
        };

        Ok(Evaluation {
            metrics: vec![Metric::exact(self.primary_metric(), value), Metric::exact(L2NORM_METRIC, l2norm(args))],
        })
    }

    /// Binds and evaluates in one step.
    pub fn evaluate_inputs(&self, inputs: &Inputs) -> Result<Evaluation, FunctionError> {
        let args = self.bind(inputs)?;
        self.evaluate(&args)
    }
}
