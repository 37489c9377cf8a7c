//! Shared internal utilities for ABI adapters.

use std::ffi::{CStr, c_char};

use crate::error::AbiError;

/// Borrow a NUL-terminated UTF-8 string.
///
/// # Safety
///
/// `ptr` must be null or point to a NUL-terminated string that outlives `'a`.
pub(crate) unsafe fn c_str<'a>(ptr: *const c_char, what: &'static str) -> Result<&'a str, AbiError> {
    if ptr.is_null() {
        return Err(AbiError::NullPointer(what));
    }
    // SAFETY: non-null and NUL-terminated per caller contract.
    let raw = unsafe { CStr::from_ptr(ptr) };
    raw.to_str().map_err(|_| AbiError::InvalidUtf8(what))
}

/// Split a comma-separated variable list, trimming spaces around each name.
///
/// A blank list means no variables; a blank entry in a non-blank list
/// (`"x,,y"`, `"x,"`) is an error rather than being dropped.
pub(crate) fn split_variables(list: &str) -> Result<Vec<&str>, AbiError> {
    if list.trim().is_empty() {
        return Ok(Vec::new());
    }
    list.split(',')
        .enumerate()
        .map(|(position, name)| match name.trim() {
            "" => Err(AbiError::BlankVariable(position)),
            name => Ok(name),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_variables_trims_names() {
        assert_eq!(split_variables("x, y ,z").unwrap(), vec!["x", "y", "z"]);
        assert_eq!(split_variables("").unwrap(), Vec::<&str>::new());
        assert_eq!(split_variables("  ").unwrap(), Vec::<&str>::new());
    }

    #[test]
    fn split_variables_rejects_blank_entries() {
        assert!(matches!(split_variables("x,"), Err(AbiError::BlankVariable(1))));
        assert!(matches!(split_variables(" , x"), Err(AbiError::BlankVariable(0))));
        assert!(matches!(split_variables("x,,y"), Err(AbiError::BlankVariable(1))));
    }

    #[test]
    fn c_str_rejects_null_and_bad_utf8() {
        assert!(matches!(
            unsafe { c_str(std::ptr::null(), "equation") },
            Err(AbiError::NullPointer("equation"))
        ));
        let bad = [0xffu8, 0];
        assert!(matches!(
            unsafe { c_str(bad.as_ptr().cast(), "equation") },
            Err(AbiError::InvalidUtf8("equation"))
        ));
        let ok = c"x+1";
        assert_eq!(unsafe { c_str(ok.as_ptr(), "equation") }.unwrap(), "x+1");
    }
}
