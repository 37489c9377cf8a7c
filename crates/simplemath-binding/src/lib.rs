//! # simplemath-binding
//!
//! Runtime binding to the native SimpleMath library.
//!
//! The shim resolves `libSimpleMath.so` by path (relative paths resolve
//! against the current working directory), binds the zero-argument
//! constructor `smath_new`, and wraps the returned opaque handle:
//!
//! ```text
//! BindingConfig -> NativeLibraryLoader::load -> resolve("smath_new") -> SimpleMath { handle }
//! ```
//!
//! Loading is process-wide and never undone. The default binding is
//! cached, so constructing many wrappers loads the library once.
//!
//! ```ignore
//! let smath = simplemath_binding::SimpleMath::new()?;
//! println!("native handle: {:?}", smath.handle());
//! ```

pub mod binding;
pub mod config;
pub mod error;
pub mod handle;
pub mod loader;
pub mod simple_math;
pub mod structured_log;

pub use binding::{Binding, BindingCache, default_binding};
pub use config::BindingConfig;
pub use error::BindingError;
pub use handle::{EquationId, LibraryHandle, NativeHandle, SymbolAddress};
pub use loader::{DlLoader, NativeLibraryLoader};
pub use simple_math::SimpleMath;
