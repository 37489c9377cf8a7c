//! Dynamic library loading.
//!
//! [`NativeLibraryLoader`] is the seam between the binding and the
//! platform loader. [`DlLoader`] delegates to `dlopen`/`dlsym` via `libc`;
//! tests substitute loaders that hand out in-process function addresses.

use std::ffi::{CStr, CString};
use std::os::unix::ffi::OsStrExt;
use std::path::Path;
use std::ptr::NonNull;

use crate::error::BindingError;
use crate::handle::{LibraryHandle, SymbolAddress};

pub trait NativeLibraryLoader: Send + Sync {
    /// Load the library at `path`. A path containing `/` is used as is
    /// (relative to the working directory); a bare file name goes through
    /// the platform search path.
    fn load(&self, path: &Path) -> Result<LibraryHandle, BindingError>;

    /// Look up an exported symbol in a library returned by [`Self::load`].
    fn resolve(&self, library: &LibraryHandle, symbol: &CStr)
    -> Result<SymbolAddress, BindingError>;
}

/// `dlopen(RTLD_NOW | RTLD_LOCAL)` + `dlsym`. Never calls `dlclose`.
#[derive(Debug, Default, Clone, Copy)]
pub struct DlLoader;

impl NativeLibraryLoader for DlLoader {
    fn load(&self, path: &Path) -> Result<LibraryHandle, BindingError> {
        let c_path = CString::new(path.as_os_str().as_bytes()).map_err(|_| {
            BindingError::InvalidArgument(format!("library path {} contains NUL", path.display()))
        })?;

        clear_dlerror();
        // SAFETY: c_path is NUL-terminated; flags are valid dlopen modes.
        let raw = unsafe { libc::dlopen(c_path.as_ptr(), libc::RTLD_NOW | libc::RTLD_LOCAL) };
        match NonNull::new(raw) {
            // SAFETY: handle returned by dlopen and never closed.
            Some(raw) => Ok(unsafe { LibraryHandle::from_raw(raw, path) }),
            None => Err(BindingError::LibraryNotFound {
                path: path.to_path_buf(),
                reason: take_dlerror(),
            }),
        }
    }

    fn resolve(
        &self,
        library: &LibraryHandle,
        symbol: &CStr,
    ) -> Result<SymbolAddress, BindingError> {
        clear_dlerror();
        // SAFETY: library handle came from dlopen; symbol is NUL-terminated.
        let raw = unsafe { libc::dlsym(library.as_ptr(), symbol.as_ptr()) };
        match NonNull::new(raw) {
            // SAFETY: exported by a library that is never unloaded.
            Some(raw) => Ok(unsafe { SymbolAddress::from_raw(raw) }),
            None => Err(BindingError::SymbolNotFound {
                symbol: symbol.to_string_lossy().into_owned(),
                reason: take_dlerror(),
            }),
        }
    }
}

fn clear_dlerror() {
    // SAFETY: dlerror only reads and resets thread-local loader state.
    unsafe { libc::dlerror() };
}

fn take_dlerror() -> String {
    // SAFETY: dlerror returns null or a NUL-terminated thread-local string.
    let msg = unsafe { libc::dlerror() };
    if msg.is_null() {
        "unknown loader error".to_string()
    } else {
        // SAFETY: non-null, NUL-terminated, valid until the next dl* call.
        unsafe { CStr::from_ptr(msg) }.to_string_lossy().into_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_library_is_library_not_found() {
        let err = DlLoader
            .load(Path::new("./definitely-not-here/libSimpleMath.so"))
            .unwrap_err();
        match err {
            BindingError::LibraryNotFound { path, reason } => {
                assert_eq!(path, Path::new("./definitely-not-here/libSimpleMath.so"));
                assert!(!reason.is_empty());
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn interior_nul_in_path_rejected() {
        let err = DlLoader.load(Path::new("lib\0x.so")).unwrap_err();
        assert!(matches!(err, BindingError::InvalidArgument(_)));
    }
}
