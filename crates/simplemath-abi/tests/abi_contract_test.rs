//! Integration tests for the exported SimpleMath C ABI.
//!
//! Calls the extern "C" entry points through the rlib exactly as a C
//! caller would: raw pointers in, status codes and `smath_last_error` out.
//!
//! Run: cargo test -p simplemath-abi --test abi_contract_test

use std::ffi::{CStr, CString, c_int};
use std::thread;

use simplemath_abi::{
    SmathHandle, smath_add_eq, smath_eval_eq, smath_free, smath_last_error, smath_new,
};

fn last_error() -> Option<String> {
    // SAFETY: returns null or a NUL-terminated thread-local message.
    let ptr = unsafe { smath_last_error() };
    if ptr.is_null() {
        None
    } else {
        Some(unsafe { CStr::from_ptr(ptr) }.to_string_lossy().into_owned())
    }
}

fn add(h: SmathHandle, equation: &str, vars: &str) -> c_int {
    let eq = CString::new(equation).unwrap();
    let vars = CString::new(vars).unwrap();
    unsafe { smath_add_eq(h, eq.as_ptr(), vars.as_ptr()) }
}

fn eval(h: SmathHandle, id: c_int, values: &[f64]) -> Result<f64, String> {
    let mut out = f64::NAN;
    let rc = unsafe { smath_eval_eq(h, id, values.as_ptr(), values.len(), &mut out) };
    if rc == 0 {
        Ok(out)
    } else {
        Err(last_error().unwrap_or_default())
    }
}

#[test]
fn reference_equation_through_abi() {
    let h = unsafe { smath_new() };
    let id = add(h, "-sin(x)*1e2 + (+5e+1)", "x");
    assert_eq!(id, 0);
    let got = eval(h, id, &[1.0]).unwrap();
    assert!((got - (50.0 - 100.0 * 1.0f64.sin())).abs() < 1e-12);
    unsafe { smath_free(h) };
}

#[test]
fn handles_are_independent() {
    let a = unsafe { smath_new() };
    let b = unsafe { smath_new() };
    assert_ne!(a, b);

    assert_eq!(add(a, "x + 1", "x"), 0);
    assert_eq!(add(a, "x + 2", "x"), 1);
    assert_eq!(add(b, "x * 10", "x"), 0);

    assert_eq!(eval(a, 1, &[1.0]), Ok(3.0));
    assert_eq!(eval(b, 0, &[1.0]), Ok(10.0));
    assert_eq!(eval(b, 1, &[1.0]), Err("no equation with id 1".to_string()));

    unsafe {
        smath_free(a);
        smath_free(b);
    }
}

#[test]
fn success_clears_previous_error() {
    let h = unsafe { smath_new() };
    assert_eq!(add(h, "pi", "pi"), -1);
    assert_eq!(
        last_error().as_deref(),
        Some("variable name 'pi' is reserved")
    );
    assert_eq!(add(h, "pi", ""), 0);
    assert_eq!(last_error(), None);
    unsafe { smath_free(h) };
}

#[test]
fn errors_are_thread_local() {
    let h = unsafe { smath_new() };
    assert_eq!(add(h, "(", ""), -1);
    assert!(last_error().is_some());

    let other = thread::spawn(last_error).join().unwrap();
    assert_eq!(other, None, "another thread must not see this thread's error");
    assert!(last_error().is_some());
    unsafe { smath_free(h) };
}

#[test]
fn null_out_pointer_rejected() {
    let h = unsafe { smath_new() };
    assert_eq!(add(h, "1", ""), 0);
    let rc = unsafe { smath_eval_eq(h, 0, std::ptr::null(), 0, std::ptr::null_mut()) };
    assert_eq!(rc, -1);
    assert_eq!(last_error().as_deref(), Some("null out pointer"));
    unsafe { smath_free(h) };
}

#[test]
fn blank_variable_entries_rejected() {
    let h = unsafe { smath_new() };
    assert_eq!(add(h, "x", "x,"), -1);
    assert_eq!(last_error().as_deref(), Some("variable list entry 1 is blank"));
    assert_eq!(add(h, "x", " , x"), -1);
    assert_eq!(last_error().as_deref(), Some("variable list entry 0 is blank"));
    // Spaces around separators are not part of the names.
    assert_eq!(add(h, "x + y", " x , y "), 0);
    assert_eq!(eval(h, 0, &[1.0, 2.0]), Ok(3.0));
    unsafe { smath_free(h) };
}
