//! # simplemath-core
//!
//! Safe Rust implementation of the SimpleMath equation engine.
//!
//! Equations are tokenized against a declared variable list, converted to
//! reverse Polish notation with the shunting-yard algorithm and evaluated
//! on a value stack. No `unsafe` code is permitted at the crate level; the
//! C ABI lives in `simplemath-abi`.
//!
//! ```text
//! "sin(x)*2" -> lexer -> [sin ( x ) * 2] -> parser -> [x sin 2 *] -> eval
//! ```

#![deny(unsafe_code)]

pub mod equation;
pub mod error;
pub mod eval;
pub mod lexer;
pub mod parser;
pub mod registry;

pub use equation::Equation;
pub use error::MathError;
pub use parser::Instruction;
pub use registry::{EquationId, SimpleMath};
