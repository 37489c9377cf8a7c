//! Opaque handle types.
//!
//! Each kind of native reference gets its own newtype so that a library
//! handle, a symbol address and an object handle can never be swapped.

use std::ffi::{c_int, c_void};
use std::fmt;
use std::path::{Path, PathBuf};
use std::ptr::NonNull;

/// A loaded dynamic library. Never unloaded.
pub struct LibraryHandle {
    raw: NonNull<c_void>,
    path: PathBuf,
}

// SAFETY: a loader handle is a process-wide token; dlsym on it is thread-safe.
unsafe impl Send for LibraryHandle {}
// SAFETY: see above; the handle is never mutated.
unsafe impl Sync for LibraryHandle {}

impl LibraryHandle {
    /// Wrap a raw loader handle.
    ///
    /// # Safety
    ///
    /// `raw` must be meaningful to the [`crate::NativeLibraryLoader`] that
    /// later resolves symbols against it, and must stay valid for the
    /// life of the process.
    pub unsafe fn from_raw(raw: NonNull<c_void>, path: impl Into<PathBuf>) -> Self {
        Self {
            raw,
            path: path.into(),
        }
    }

    #[must_use]
    pub fn as_ptr(&self) -> *mut c_void {
        self.raw.as_ptr()
    }

    /// Path the library was loaded from, as given to the loader.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl fmt::Debug for LibraryHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LibraryHandle")
            .field("raw", &self.raw)
            .field("path", &self.path)
            .finish()
    }
}

/// Address of a resolved export.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SymbolAddress(NonNull<c_void>);

// SAFETY: a code address; calling through it is governed by the fn type.
unsafe impl Send for SymbolAddress {}
// SAFETY: immutable address.
unsafe impl Sync for SymbolAddress {}

impl SymbolAddress {
    /// # Safety
    ///
    /// `raw` must be the address of a function exported by a loaded
    /// library (or linked into the process) that stays mapped for the life
    /// of the process.
    pub unsafe fn from_raw(raw: NonNull<c_void>) -> Self {
        Self(raw)
    }

    #[must_use]
    pub fn as_ptr(self) -> *mut c_void {
        self.0.as_ptr()
    }
}

/// Opaque object handle returned by the native constructor.
///
/// Stored exactly as returned, with no null check. Only this crate can
/// create one, so a handle always originates from a constructor call.
#[repr(transparent)]
#[derive(PartialEq, Eq, Hash)]
pub struct NativeHandle(*mut c_void);

impl NativeHandle {
    pub(crate) fn new(raw: *mut c_void) -> Self {
        Self(raw)
    }

    /// Raw value, for passing back into native entry points.
    #[must_use]
    pub fn as_ptr(&self) -> *mut c_void {
        self.0
    }

    #[must_use]
    pub fn addr(&self) -> usize {
        self.0 as usize
    }

    #[must_use]
    pub fn is_null(&self) -> bool {
        self.0.is_null()
    }
}

impl fmt::Debug for NativeHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NativeHandle({:#x})", self.addr())
    }
}

/// Equation id issued by the native `smath_add_eq`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EquationId(c_int);

impl EquationId {
    pub(crate) fn new(raw: c_int) -> Self {
        Self(raw)
    }

    #[must_use]
    pub fn raw(self) -> c_int {
        self.0
    }
}
