//! FFI bindings for the curl counter
//!
//! This module provides C-compatible functions for driving counting sessions
//! from other languages. All functions use C strings (null-terminated) and
//! return allocated memory that must be freed by the caller using
//! `curl_free_string`.

use std::cell::RefCell;
use std::ffi::{CStr, CString};
use std::os::raw::c_char;
use std::ptr;

use crate::config::ExerciseConfig;
use crate::encoder::SessionEncoder;
use crate::session::{count_reps_ndjson, CurlSession};

// Thread-local storage for the last error message
thread_local! {
    static LAST_ERROR: RefCell<Option<CString>> = const { RefCell::new(None) };
}

fn set_last_error(msg: &str) {
    LAST_ERROR.with(|e| {
        *e.borrow_mut() = CString::new(msg).ok();
    });
}

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

/// Config from an optional JSON string; NULL selects the default right-arm curl
unsafe fn config_from_ptr(config_json: *const c_char) -> Result<ExerciseConfig, String> {
    if config_json.is_null() {
        return Ok(ExerciseConfig::default());
    }
    let json = cstr_to_string(config_json).ok_or("Invalid config string pointer")?;
    ExerciseConfig::from_json(&json).map_err(|e| e.to_string())
}

// ============================================================================
// Stateless API
// ============================================================================

/// Count repetitions in NDJSON landmark frames and return the report JSON.
///
/// # Safety
/// - `ndjson` must be a valid null-terminated C string.
/// - `config_json` must be a valid null-terminated C string or NULL.
/// - Returns a newly allocated string that must be freed with `curl_free_string`.
/// - Returns NULL on error; call `curl_last_error` to get the error message.
#[no_mangle]
pub unsafe extern "C" fn curl_count_reps_ndjson(
    ndjson: *const c_char,
    config_json: *const c_char,
) -> *mut c_char {
    clear_last_error();

    let ndjson_str = match cstr_to_string(ndjson) {
        Some(s) => s,
        None => {
            set_last_error("Invalid NDJSON string pointer");
            return ptr::null_mut();
        }
    };

    let config = match config_from_ptr(config_json) {
        Ok(config) => config,
        Err(msg) => {
            set_last_error(&msg);
            return ptr::null_mut();
        }
    };

    match count_reps_ndjson(ndjson_str, config) {
        Ok(report) => string_to_cstr(&report),
        Err(e) => {
            set_last_error(&e.to_string());
            ptr::null_mut()
        }
    }
}

// ============================================================================
// Session API
// ============================================================================

/// Opaque handle to a CurlSession
pub struct CurlSessionHandle {
    session: CurlSession,
}

/// Create a new counting session.
///
/// # Safety
/// - `config_json` must be a valid null-terminated C string or NULL for the
///   default configuration.
/// - Returns a pointer to a newly allocated session.
/// - Must be freed with `curl_session_free`.
/// - Returns NULL on error; call `curl_last_error` to get the error message.
#[no_mangle]
pub unsafe extern "C" fn curl_session_new(config_json: *const c_char) -> *mut CurlSessionHandle {
    clear_last_error();

    let config = match config_from_ptr(config_json) {
        Ok(config) => config,
        Err(msg) => {
            set_last_error(&msg);
            return ptr::null_mut();
        }
    };

    match CurlSession::new(config) {
        Ok(session) => Box::into_raw(Box::new(CurlSessionHandle { session })),
        Err(e) => {
            set_last_error(&e.to_string());
            ptr::null_mut()
        }
    }
}

/// Free a session.
///
/// # Safety
/// - `session` must be a valid pointer returned by `curl_session_new`, or NULL.
/// - After calling this function, the pointer is invalid.
#[no_mangle]
pub unsafe extern "C" fn curl_session_free(session: *mut CurlSessionHandle) {
    if !session.is_null() {
        drop(Box::from_raw(session));
    }
}

/// Push one landmark frame (pose.landmark_frame.v1 JSON) and return the
/// frame snapshot JSON. A frame that does not parse or validate is counted as
/// dropped and reported with status `invalid_frame`.
///
/// # Safety
/// - `session` must be a valid pointer returned by `curl_session_new`.
/// - `frame_json` must be a valid null-terminated C string.
/// - Returns a newly allocated string that must be freed with `curl_free_string`.
/// - Returns NULL on error; call `curl_last_error` to get the error message.
#[no_mangle]
pub unsafe extern "C" fn curl_session_push_frame(
    session: *mut CurlSessionHandle,
    frame_json: *const c_char,
) -> *mut c_char {
    clear_last_error();

    if session.is_null() {
        set_last_error("Null session pointer");
        return ptr::null_mut();
    }

    let handle = &mut *session;

    let frame_str = match cstr_to_string(frame_json) {
        Some(s) => s,
        None => {
            set_last_error("Invalid frame string pointer");
            return ptr::null_mut();
        }
    };

    let snapshot = handle.session.process_line(&frame_str);

    match serde_json::to_string(&snapshot) {
        Ok(json) => string_to_cstr(&json),
        Err(e) => {
            set_last_error(&e.to_string());
            ptr::null_mut()
        }
    }
}

/// Current session report JSON.
///
/// # Safety
/// - `session` must be a valid pointer returned by `curl_session_new`.
/// - Returns a newly allocated string that must be freed with `curl_free_string`.
/// - Returns NULL on error; call `curl_last_error` to get the error message.
#[no_mangle]
pub unsafe extern "C" fn curl_session_summary(session: *const CurlSessionHandle) -> *mut c_char {
    clear_last_error();

    if session.is_null() {
        set_last_error("Null session pointer");
        return ptr::null_mut();
    }

    let handle = &*session;

    match SessionEncoder::new().encode_to_json(&handle.session.summary(), &[]) {
        Ok(json) => string_to_cstr(&json),
        Err(e) => {
            set_last_error(&e.to_string());
            ptr::null_mut()
        }
    }
}

// ============================================================================
// Memory Management
// ============================================================================

/// Free a string returned by curl counter functions.
///
/// # Safety
/// - `ptr` must be a valid pointer returned by a curl counter function, or NULL.
/// - After calling this function, the pointer is invalid.
#[no_mangle]
pub unsafe extern "C" fn curl_free_string(ptr: *mut c_char) {
    if !ptr.is_null() {
        drop(CString::from_raw(ptr));
    }
}

// ============================================================================
// Error Handling
// ============================================================================

/// Get the last error message.
///
/// # Safety
/// - Returns a pointer to a thread-local error string.
/// - The returned pointer is valid until the next curl counter call on this thread.
/// - Do NOT free the returned pointer.
/// - Returns NULL if no error occurred.
#[no_mangle]
pub unsafe extern "C" fn curl_last_error() -> *const c_char {
    LAST_ERROR.with(|e| match &*e.borrow() {
        Some(cstr) => cstr.as_ptr(),
        None => ptr::null(),
    })
}

// ============================================================================
// Version Information
// ============================================================================

/// Get the library version.
///
/// # Safety
/// - Returns a pointer to a static string. Do NOT free.
#[no_mangle]
pub unsafe extern "C" fn curl_version() -> *const c_char {
    static VERSION: &[u8] = concat!(env!("CARGO_PKG_VERSION"), "\0").as_bytes();
    VERSION.as_ptr() as *const c_char
}
