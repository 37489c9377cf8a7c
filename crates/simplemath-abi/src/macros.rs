//! `abi_fn!`: declares an unmangled `extern "C"` export.
//!
//! Two forms:
//!
//! ```ignore
//! abi_fn! {
//!     /// Plain export; the body is the return value.
//!     fn smath_thing(handle: SmathHandle) -> c_int { ... }
//! }
//!
//! abi_fn! {
//!     /// Fallible export; the body evaluates to `Result<c_int, AbiError>`.
//!     /// `Ok` clears the last error, `Err` records it and returns `-1`.
//!     fallible fn smath_other(handle: SmathHandle) -> c_int, or -1; { ... }
//! }
//! ```
//!
//! Bodies run inside `unsafe`, and `return Err(..)` / `?` in a fallible
//! body leave the body, not the export.

macro_rules! abi_fn {
    (
        $(#[$meta:meta])*
        fallible fn $name:ident( $($arg:ident : $argty:ty),* $(,)? ) -> $ret:ty, or $failure:expr;
        $body:block
    ) => {
        $(#[$meta])*
        #[unsafe(no_mangle)]
        #[allow(unused_unsafe)]
        pub unsafe extern "C" fn $name( $($arg : $argty),* ) -> $ret {
            let result = (|| -> Result<$ret, $crate::error::AbiError> { unsafe { $body } })();
            $crate::error::report(result, $failure)
        }
    };

    (
        $(#[$meta:meta])*
        fn $name:ident( $($arg:ident : $argty:ty),* $(,)? ) -> $ret:ty
        $body:block
    ) => {
        $(#[$meta])*
        #[unsafe(no_mangle)]
        #[allow(unused_unsafe)]
        pub unsafe extern "C" fn $name( $($arg : $argty),* ) -> $ret {
            unsafe { $body }
        }
    };

    (
        $(#[$meta:meta])*
        fn $name:ident( $($arg:ident : $argty:ty),* $(,)? )
        $body:block
    ) => {
        $(#[$meta])*
        #[unsafe(no_mangle)]
        #[allow(unused_unsafe)]
        pub unsafe extern "C" fn $name( $($arg : $argty),* ) {
            unsafe { $body }
        }
    };
}
