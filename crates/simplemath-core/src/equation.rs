//! A single parsed equation bound to its variable list.

use std::fmt;

use crate::error::MathError;
use crate::eval;
use crate::lexer::{self, is_identifier, is_reserved};
use crate::parser::{self, Instruction};

#[derive(Debug, Clone, PartialEq)]
pub struct Equation {
    source: String,
    variables: Vec<String>,
    program: Vec<Instruction>,
}

impl Equation {
    /// Validate `variables`, then tokenize and compile `equation`.
    ///
    /// Variable order fixes the order of values passed to [`Equation::eval`].
    pub fn parse<S: AsRef<str>>(equation: &str, variables: &[S]) -> Result<Self, MathError> {
        let variables = validate_variables(variables)?;
        let tokens = lexer::tokenize(equation, &variables)?;
        let program = parser::to_rpn(&tokens)?;
        Ok(Self {
            source: equation.to_string(),
            variables,
            program,
        })
    }

    pub fn eval(&self, values: &[f64]) -> Result<f64, MathError> {
        if values.len() != self.variables.len() {
            return Err(MathError::ValueCountMismatch {
                expected: self.variables.len(),
                found: values.len(),
            });
        }
        eval::execute(&self.program, values)
    }

    #[must_use]
    pub fn source(&self) -> &str {
        &self.source
    }

    #[must_use]
    pub fn variables(&self) -> &[String] {
        &self.variables
    }

    #[must_use]
    pub fn program(&self) -> &[Instruction] {
        &self.program
    }

    /// RPN listing with variables shown by name.
    #[must_use]
    pub fn program_listing(&self) -> Vec<String> {
        self.program
            .iter()
            .map(|instr| match *instr {
                Instruction::Push(v) => format!("{v}"),
                Instruction::Load(idx) => self.variables[idx].clone(),
                Instruction::Unary(op) => format!("u{}", op.symbol()),
                Instruction::Binary(op) => op.symbol().to_string(),
                Instruction::Call(func) => func.name().to_string(),
            })
            .collect()
    }
}

impl fmt::Display for Equation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program_listing().join(" "))
    }
}

fn validate_variables<S: AsRef<str>>(variables: &[S]) -> Result<Vec<String>, MathError> {
    let mut out: Vec<String> = Vec::with_capacity(variables.len());
    for name in variables.iter().map(AsRef::as_ref) {
        if is_reserved(name) {
            return Err(MathError::ReservedVariable {
                name: name.to_string(),
            });
        }
        if !is_identifier(name) {
            return Err(MathError::InvalidVariable {
                name: name.to_string(),
            });
        }
        if out.iter().any(|v| v == name) {
            return Err(MathError::DuplicateVariable {
                name: name.to_string(),
            });
        }
        out.push(name.to_string());
    }
    Ok(out)
}
