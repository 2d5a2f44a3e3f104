//! FFI bindings for Synheart Synth
//!
//! This module provides C-compatible functions for calling the generator from
//! other languages. All functions use C strings (null-terminated) and return
//! allocated memory that must be freed by the caller using `synth_free_string`.

use std::cell::RefCell;
use std::ffi::{CStr, CString};
use std::os::raw::c_char;
use std::ptr;

use crate::encoder::BundleEncoder;
use crate::pipeline::generate;

// Thread-local storage for the last error message
thread_local! {
    static LAST_ERROR: RefCell<Option<CString>> = const { RefCell::new(None) };
}

/// Set the last error message
fn set_last_error(msg: &str) {
    LAST_ERROR.with(|e| {
        *e.borrow_mut() = CString::new(msg).ok();
    });
}

/// Clear the last error message
fn clear_last_error() {
    LAST_ERROR.with(|e| {
        *e.borrow_mut() = None;
    });
}

/// Helper to convert C string to Rust string
unsafe fn cstr_to_string(ptr: *const c_char) -> Option<String> {
    if ptr.is_null() {
        return None;
    }
    CStr::from_ptr(ptr).to_str().ok().map(|s| s.to_string())
}

/// Helper to convert Rust string to C string (caller must free)
fn string_to_cstr(s: &str) -> *mut c_char {
    match CString::new(s) {
        Ok(cstr) => cstr.into_raw(),
        Err(_) => ptr::null_mut(),
    }
}

/// Generate synthetic data for an inclusive date range and return it as JSON.
///
/// Equal arguments give equal signal data. `producer.instance_id` and
/// `provenance.generated_at_utc` differ on every call.
///
/// # Safety
/// - `start_date` and `end_date` must be valid null-terminated C strings
///   formatted `YYYY-MM-DD`.
/// - Returns a newly allocated string that must be freed with `synth_free_string`.
/// - Returns NULL on error; call `synth_last_error` to get the error message.
#[no_mangle]
pub unsafe extern "C" fn synth_generate_json(
    start_date: *const c_char,
    end_date: *const c_char,
    seed: u64,
) -> *mut c_char {
    clear_last_error();

    let start = match cstr_to_string(start_date) {
        Some(s) => s,
        None => {
            set_last_error("Invalid start_date string pointer");
            return ptr::null_mut();
        }
    };

    let end = match cstr_to_string(end_date) {
        Some(s) => s,
        None => {
            set_last_error("Invalid end_date string pointer");
            return ptr::null_mut();
        }
    };

    let encoded = generate(&start, &end, seed)
        .and_then(|bundle| BundleEncoder::new().encode_to_json(&bundle, Some(seed)));

    match encoded {
        Ok(json) => string_to_cstr(&json),
        Err(e) => {
            set_last_error(&e.to_string());
            ptr::null_mut()
        }
    }
}

/// Get the last error message.
///
/// # Safety
/// - Returns a pointer to a thread-local string that is valid until the next
///   FFI call on the same thread. Do NOT free this pointer.
/// - Returns NULL if there was no error.
#[no_mangle]
pub unsafe extern "C" fn synth_last_error() -> *const c_char {
    LAST_ERROR.with(|e| match e.borrow().as_ref() {
        Some(cstr) => cstr.as_ptr(),
        None => ptr::null(),
    })
}

/// Free a string returned by a Synth function.
///
/// # Safety
/// - `s` must be a pointer returned by a Synth function, or NULL.
/// - After calling this function, the pointer is invalid.
#[no_mangle]
pub unsafe extern "C" fn synth_free_string(s: *mut c_char) {
    if !s.is_null() {
        drop(CString::from_raw(s));
    }
}

/// Get the crate version.
///
/// # Safety
/// - Returns a pointer to a static string. Do NOT free this pointer.
#[no_mangle]
pub unsafe extern "C" fn synth_version() -> *const c_char {
    static VERSION: &[u8] = concat!(env!("CARGO_PKG_VERSION"), "\0").as_bytes();
    VERSION.as_ptr() as *const c_char
}
