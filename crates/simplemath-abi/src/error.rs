//! ABI failure kinds and the thread-local last-error slot.

use std::cell::RefCell;
use std::ffi::{CString, c_char, c_int};
use std::fmt::Display;

use simplemath_core::MathError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AbiError {
    #[error("null {0} pointer")]
    NullPointer(&'static str),
    #[error("{0} is not valid UTF-8")]
    InvalidUtf8(&'static str),
    #[error("variable list entry {0} is blank")]
    BlankVariable(usize),
    #[error("equation id {0} is out of range")]
    InvalidId(c_int),
    #[error("too many equations")]
    IdOverflow,
    #[error(transparent)]
    Math(#[from] MathError),
}

std::thread_local! {
    static LAST_ERROR: RefCell<Option<CString>> = const { RefCell::new(None) };
}

/// Record `err` as this thread's last error.
pub(crate) fn set_last_error(err: impl Display) {
    let msg = CString::new(err.to_string().replace('\0', " ")).unwrap_or_default();
    LAST_ERROR.with(|slot| *slot.borrow_mut() = Some(msg));
}

pub(crate) fn clear_last_error() {
    LAST_ERROR.with(|slot| *slot.borrow_mut() = None);
}

/// Pointer to the current message, or null. Valid until the slot changes.
pub(crate) fn last_error_ptr() -> *const c_char {
    LAST_ERROR.with(|slot| {
        slot.borrow()
            .as_ref()
            .map_or(std::ptr::null(), |msg| msg.as_ptr())
    })
}

/// Collapse an ABI result into a C return code, updating the error slot.
pub(crate) fn report<T>(result: Result<T, AbiError>, failure: T) -> T {
    match result {
        Ok(value) => {
            clear_last_error();
            value
        }
        Err(err) => {
            set_last_error(err);
            failure
        }
    }
}
