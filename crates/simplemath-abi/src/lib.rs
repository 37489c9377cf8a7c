// Exports check their pointers at runtime; contracts are in each doc comment.
#![allow(clippy::missing_safety_doc)]
//! # simplemath-abi
//!
//! extern "C" boundary for the SimpleMath equation engine.
//!
//! Built as a `cdylib` this crate is `libSimpleMath.so`: the library the
//! binding shim loads at runtime. Every export validates its pointers,
//! delegates to `simplemath-core`, and records failures in a thread-local
//! message readable through `smath_last_error`.
//!
//! ```text
//! C caller -> smath_* entry (this crate) -> simplemath_core::SimpleMath -> return
//! ```

#[macro_use]
mod macros;

pub mod error;
pub mod smath_abi;
mod util;

pub use smath_abi::{
    SmathHandle, smath_add_eq, smath_eval_eq, smath_free, smath_last_error, smath_new,
};
