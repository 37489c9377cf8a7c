//! Command execution.
//!
//! Each command returns a serializable report; the CLI decides how to print
//! it and [`log_command`] records the outcome.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use simplemath_binding::structured_log::{LogEmitter, LogLevel, Outcome};
use simplemath_binding::{Binding, SimpleMath as NativeSimpleMath};
use simplemath_core::Equation;

use crate::HarnessError;

/// An equation with its variable names and (for evaluation) values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EquationRequest {
    pub equation: String,
    #[serde(default)]
    pub variables: Vec<String>,
    #[serde(default)]
    pub values: Vec<f64>,
}

impl EquationRequest {
    #[must_use]
    pub fn new(equation: impl Into<String>) -> Self {
        Self {
            equation: equation.into(),
            variables: Vec::new(),
            values: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_variable(mut self, name: impl Into<String>, value: f64) -> Self {
        self.variables.push(name.into());
        self.values.push(value);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvalReport {
    pub equation: String,
    pub variables: Vec<String>,
    /// Space-separated RPN program.
    pub program: String,
    pub result: f64,
}

impl EvalReport {
    /// `Result: ` followed by the value as printf `%23.16e` renders it.
    #[must_use]
    pub fn result_line(&self) -> String {
        format!("Result: {:>23}", c_scientific(self.result, 16))
    }
}

/// printf-style `%.Ne`: signed exponent of at least two digits
/// (`9.0e+00`), and `nan` / `inf` for non-finite values.
#[must_use]
pub fn c_scientific(value: f64, precision: usize) -> String {
    if value.is_nan() {
        return "nan".to_string();
    }
    if value.is_infinite() {
        return if value < 0.0 { "-inf" } else { "inf" }.to_string();
    }
    let rust = format!("{value:.precision$e}");
    let Some((mantissa, exponent)) = rust.split_once('e') else {
        return rust;
    };
    let exponent: i32 = exponent.parse().unwrap_or(0);
    let sign = if exponent < 0 { '-' } else { '+' };
    format!("{mantissa}e{sign}{:02}", exponent.unsigned_abs())
}

/// Parse and evaluate in process.
pub fn eval(request: &EquationRequest) -> Result<EvalReport, HarnessError> {
    let equation = Equation::parse(&request.equation, &request.variables)?;
    let result = equation.eval(&request.values)?;
    Ok(EvalReport {
        equation: request.equation.clone(),
        variables: request.variables.clone(),
        program: equation.to_string(),
        result,
    })
}

/// RPN listing, one instruction per line.
pub fn program(request: &EquationRequest) -> Result<Vec<String>, HarnessError> {
    Ok(Equation::parse(&request.equation, &request.variables)?.program_listing())
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProbeEquation {
    pub equation: String,
    pub id: i32,
    pub result: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProbeReport {
    pub library: String,
    /// Native handle as returned by the constructor, in hex.
    pub handle: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub equation: Option<ProbeEquation>,
}

/// Construct a native object through `binding` and optionally run one
/// equation over the C boundary.
pub fn probe(
    binding: Arc<Binding>,
    request: Option<&EquationRequest>,
) -> Result<ProbeReport, HarnessError> {
    let library = binding.library().path().display().to_string();
    let mut smath = NativeSimpleMath::with_binding(binding);
    let handle = format!("{:#x}", smath.handle().addr());

    let equation = match request {
        Some(request) => {
            let names: Vec<&str> = request.variables.iter().map(String::as_str).collect();
            let id = smath.add_equation(&request.equation, &names)?;
            let result = smath.eval_equation(id, &request.values)?;
            Some(ProbeEquation {
                equation: request.equation.clone(),
                id: id.raw(),
                result,
            })
        }
        None => None,
    };

    Ok(ProbeReport {
        library,
        handle,
        equation,
    })
}

/// Record one command's outcome.
pub fn log_command(
    emitter: &mut LogEmitter,
    command: &str,
    latency_ns: u64,
    outcome: Result<&serde_json::Value, &HarnessError>,
) -> std::io::Result<()> {
    let entry = emitter
        .entry(LogLevel::Info, "command")
        .with_latency_ns(latency_ns);
    let entry = match outcome {
        Ok(report) => entry
            .with_outcome(Outcome::Pass)
            .with_details(serde_json::json!({ "command": command, "report": report })),
        Err(err) => entry
            .with_failure(err.kind())
            .with_details(serde_json::json!({ "command": command, "error": err.to_string() })),
    };
    emitter.emit_entry(entry)
}
