//! Safe wrapper around one native SimpleMath object.

use std::ffi::{CString, c_int};
use std::sync::Arc;

use crate::binding::{Binding, default_binding};
use crate::error::BindingError;
use crate::handle::{EquationId, NativeHandle};

/// Owns one native object created by `smath_new`.
///
/// The handle is released with `smath_free` on drop when the library
/// exports it. Not `Send`: the native object is single-threaded.
#[derive(Debug)]
pub struct SimpleMath {
    binding: Arc<Binding>,
    handle: NativeHandle,
}

impl SimpleMath {
    /// Create an object through the process-wide default binding.
    ///
    /// Loader and lookup failures are returned; no object exists then.
    pub fn new() -> Result<Self, BindingError> {
        Ok(Self::with_binding(default_binding()?))
    }

    /// Create an object through an explicit binding.
    #[must_use]
    pub fn with_binding(binding: Arc<Binding>) -> Self {
        let handle = binding.construct();
        Self { binding, handle }
    }

    #[must_use]
    pub fn handle(&self) -> &NativeHandle {
        &self.handle
    }

    #[must_use]
    pub fn binding(&self) -> &Arc<Binding> {
        &self.binding
    }

    /// Register `equation` over `variables` with the native object.
    pub fn add_equation(
        &mut self,
        equation: &str,
        variables: &[&str],
    ) -> Result<EquationId, BindingError> {
        for name in variables {
            check_variable_name(name)?;
        }
        let equation = to_c_string("equation", equation)?;
        let variables = to_c_string("variable list", &variables.join(","))?;
        let add = self.binding.add_equation_fn()?;

        // SAFETY: handle came from the constructor; both strings outlive the call.
        let rc = unsafe { add(self.handle.as_ptr(), equation.as_ptr(), variables.as_ptr()) };
        if rc < 0 {
            return Err(self.native_error());
        }
        Ok(EquationId::new(rc))
    }

    /// Evaluate a registered equation with one value per variable.
    pub fn eval_equation(&self, id: EquationId, values: &[f64]) -> Result<f64, BindingError> {
        let eval = self.binding.eval_equation_fn()?;
        let mut out = 0.0_f64;

        // SAFETY: values is a live slice of `len` doubles; out is a valid
        // write target for the duration of the call.
        let rc: c_int = unsafe {
            eval(
                self.handle.as_ptr(),
                id.raw(),
                values.as_ptr(),
                values.len(),
                &mut out,
            )
        };
        if rc != 0 {
            return Err(self.native_error());
        }
        Ok(out)
    }

    fn native_error(&self) -> BindingError {
        BindingError::Native {
            message: self.binding.last_native_error(),
        }
    }
}

impl Drop for SimpleMath {
    fn drop(&mut self) {
        let free = self.binding.free_fn();
        if let Some(free) = free {
            // SAFETY: handle came from this binding's constructor and is
            // released exactly once.
            unsafe { free(self.handle.as_ptr()) };
        }
        self.binding.log_release(&self.handle, free.is_some());
    }
}

/// A name must reach the library exactly as given: the list format uses
/// `,` as separator and strips surrounding whitespace, so blank, padded or
/// comma-bearing names would be altered or dropped in transit.
fn check_variable_name(name: &str) -> Result<(), BindingError> {
    let problem = if name.trim().is_empty() {
        "is blank"
    } else if name.contains(',') {
        "contains ','"
    } else if name.trim() != name {
        "has surrounding whitespace"
    } else {
        return Ok(());
    };
    Err(BindingError::InvalidArgument(format!(
        "variable name '{name}' {problem}"
    )))
}

fn to_c_string(what: &str, value: &str) -> Result<CString, BindingError> {
    CString::new(value)
        .map_err(|_| BindingError::InvalidArgument(format!("{what} contains an interior NUL")))
}
