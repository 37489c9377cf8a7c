//! CLI entrypoint for the SimpleMath harness.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use clap::{Parser, Subcommand};
use simplemath_binding::structured_log::LogEmitter;
use simplemath_binding::{Binding, BindingConfig, DlLoader, default_binding};
use simplemath_harness::runner::{self, EquationRequest};
use simplemath_harness::HarnessError;

/// Equation tooling for SimpleMath.
#[derive(Debug, Parser)]
#[command(name = "simplemath-harness")]
#[command(about = "Evaluate equations in process or through libSimpleMath.so")]
struct Cli {
    /// Append a structured JSONL record of this run (and of the binding's
    /// load events) to this file.
    #[arg(long, global = true)]
    log: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Evaluate an equation with the in-process engine.
    Eval {
        /// Equation text, e.g. "x * 2 - sin(y)".
        #[arg(long)]
        equation: String,
        /// Variable name, repeated in binding order.
        #[arg(long = "var")]
        vars: Vec<String>,
        /// Variable value, one per --var.
        #[arg(long = "value", allow_negative_numbers = true)]
        values: Vec<f64>,
    },
    /// Print the compiled RPN program.
    Program {
        #[arg(long)]
        equation: String,
        #[arg(long = "var")]
        vars: Vec<String>,
    },
    /// Construct a native object through the dynamic binding.
    Probe {
        /// Library path (default: SIMPLEMATH_LIBRARY or ./libSimpleMath.so).
        #[arg(long)]
        library: Option<PathBuf>,
        /// Optional equation to add and evaluate over the C boundary.
        #[arg(long)]
        equation: Option<String>,
        #[arg(long = "var")]
        vars: Vec<String>,
        #[arg(long = "value", allow_negative_numbers = true)]
        values: Vec<f64>,
    },
}

impl Command {
    fn name(&self) -> &'static str {
        match self {
            Self::Eval { .. } => "eval",
            Self::Program { .. } => "program",
            Self::Probe { .. } => "probe",
        }
    }
}

fn equation_request(equation: &str, vars: &[String], values: &[f64]) -> EquationRequest {
    EquationRequest {
        equation: equation.to_string(),
        variables: vars.to_vec(),
        values: values.to_vec(),
    }
}

fn open_binding(library: Option<&Path>, log: Option<&Path>) -> Result<Arc<Binding>, HarnessError> {
    if library.is_none() && log.is_none() {
        return Ok(default_binding()?);
    }
    let mut config = BindingConfig::from_env();
    if let Some(path) = library {
        config = config.with_library_path(path);
    }
    if let Some(path) = log {
        config = config.with_log_path(path);
    }
    Ok(Arc::new(Binding::open(Arc::new(DlLoader), &config)?))
}

fn run(command: &Command, log: Option<&Path>) -> Result<serde_json::Value, HarnessError> {
    match command {
        Command::Eval {
            equation,
            vars,
            values,
        } => {
            let report = runner::eval(&equation_request(equation, vars, values))?;
            println!("{}", report.result_line());
            Ok(serde_json::to_value(&report)?)
        }
        Command::Program { equation, vars } => {
            let listing = runner::program(&equation_request(equation, vars, &[]))?;
            for instruction in &listing {
                println!("{instruction}");
            }
            Ok(serde_json::to_value(&listing)?)
        }
        Command::Probe {
            library,
            equation,
            vars,
            values,
        } => {
            let binding = open_binding(library.as_deref(), log)?;
            let request = equation.as_deref().map(|eq| equation_request(eq, vars, values));
            let report = runner::probe(binding, request.as_ref())?;
            println!("{}", serde_json::to_string_pretty(&report)?);
            Ok(serde_json::to_value(&report)?)
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let mut emitter = match &cli.log {
        Some(path) => Some(LogEmitter::to_file(
            path,
            "harness",
            &format!("pid{}", std::process::id()),
        )?),
        None => None,
    };

    let started = Instant::now();
    let outcome = run(&cli.command, cli.log.as_deref());
    let latency_ns = u64::try_from(started.elapsed().as_nanos()).unwrap_or(u64::MAX);

    if let Some(emitter) = emitter.as_mut() {
        runner::log_command(emitter, cli.command.name(), latency_ns, outcome.as_ref())?;
    }
    if let Err(err) = outcome {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
    Ok(())
}
