//! Command-line tooling for SimpleMath.
//!
//! This crate provides:
//! - In-process evaluation and RPN listings through `simplemath-core`
//! - A native probe that loads `libSimpleMath.so` through the binding shim
//! - One structured log record per command

#![forbid(unsafe_code)]

pub mod error;
pub mod runner;

pub use error::HarnessError;
pub use runner::{EquationRequest, EvalReport, ProbeEquation, ProbeReport};
