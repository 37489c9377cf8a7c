//! ABI layer for the SimpleMath registry.
//!
//! A handle returned by `smath_new` owns one `SimpleMath` registry. Failing
//! calls return `-1` and leave a message for `smath_last_error`; succeeding
//! calls clear it.

use std::ffi::{c_char, c_int, c_void};

use simplemath_core::{EquationId, SimpleMath};

use crate::error::{AbiError, clear_last_error, last_error_ptr};
use crate::util::{c_str, split_variables};

/// Opaque registry pointer as seen by C callers.
pub type SmathHandle = *mut c_void;

/// Reborrow a handle as a registry.
///
/// # Safety
///
/// `handle` must be null or a live pointer obtained from `smath_new`.
unsafe fn registry<'a>(handle: SmathHandle) -> Result<&'a mut SimpleMath, AbiError> {
    // SAFETY: per caller contract the pointer came from Box::into_raw.
    unsafe { handle.cast::<SimpleMath>().as_mut() }.ok_or(AbiError::NullPointer("handle"))
}

// ---------------------------------------------------------------------------
// smath_new / smath_free
// ---------------------------------------------------------------------------

abi_fn! {
    /// Allocate an empty equation registry. Never returns null.
    fn smath_new() -> SmathHandle {
        clear_last_error();
        Box::into_raw(Box::new(SimpleMath::new())).cast()
    }
}

abi_fn! {
    /// Release a registry. Null is a no-op.
    fn smath_free(handle: SmathHandle) {
        clear_last_error();
        if !handle.is_null() {
            // SAFETY: handle came from smath_new and is released exactly once.
            drop(unsafe { Box::from_raw(handle.cast::<SimpleMath>()) });
        }
    }
}

// ---------------------------------------------------------------------------
// smath_add_eq
// ---------------------------------------------------------------------------

abi_fn! {
    /// Parse `equation` over the comma-separated `variables` list (null or
    /// empty for none). Returns the new equation id, or -1.
    fallible fn smath_add_eq(
        handle: SmathHandle,
        equation: *const c_char,
        variables: *const c_char,
    ) -> c_int, or -1;
    {
        let smath = registry(handle)?;
        let equation = c_str(equation, "equation")?;
        let names = if variables.is_null() {
            Vec::new()
        } else {
            split_variables(c_str(variables, "variables")?)?
        };
        let id = smath.add_equation(equation, &names)?;
        c_int::try_from(id.index()).map_err(|_| AbiError::IdOverflow)
    }
}

// ---------------------------------------------------------------------------
// smath_eval_eq
// ---------------------------------------------------------------------------

abi_fn! {
    /// Evaluate equation `id` with `len` values (bound in variable order)
    /// and store the result in `*out`. Returns 0, or -1 leaving `*out`
    /// untouched. `values` may be null only when `len` is 0.
    fallible fn smath_eval_eq(
        handle: SmathHandle,
        id: c_int,
        values: *const f64,
        len: usize,
        out: *mut f64,
    ) -> c_int, or -1;
    {
        let smath = registry(handle)?;
        if out.is_null() {
            return Err(AbiError::NullPointer("out"));
        }
        let index = usize::try_from(id).map_err(|_| AbiError::InvalidId(id))?;
        let values: &[f64] = match (values.is_null(), len) {
            (_, 0) => &[],
            (true, _) => return Err(AbiError::NullPointer("values")),
            // SAFETY: caller guarantees `len` readable f64s at `values`.
            (false, _) => std::slice::from_raw_parts(values, len),
        };
        let value = smath.eval_equation(EquationId::new(index), values)?;
        // SAFETY: checked non-null above.
        out.write(value);
        Ok(0)
    }
}

// ---------------------------------------------------------------------------
// smath_last_error
// ---------------------------------------------------------------------------

abi_fn! {
    /// Message describing this thread's last failed call, or null when the
    /// last call succeeded. Valid until the next `smath_*` call on the same
    /// thread.
    fn smath_last_error() -> *const c_char {
        last_error_ptr()
    }
}
