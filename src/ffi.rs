//! C-ABI FFI bindings for cross-language integration.
//!
//! This module exposes parsing, rendering and the contrast utility to hosts
//! such as C#, Python and Node.js. Documents cross the boundary as JSON.

use std::ffi::{c_char, CStr, CString};
use std::ptr;

use crate::render::{self, JsonFormat};
use crate::{parse_markup_to_document, theme, Document};

/// Result structure returned by FFI functions.
#[repr(C)]
pub struct HelpdocResult {
    /// Whether the operation succeeded.
    pub success: bool,
    /// The result data (null if failed). Must be freed with `helpdoc_free_result`.
    pub data: *mut c_char,
    /// Error message (null if succeeded). Must be freed with `helpdoc_free_result`.
    pub error: *mut c_char,
}

impl HelpdocResult {
    fn success(data: String) -> Self {
        Self {
            success: true,
            data: CString::new(data).unwrap_or_default().into_raw(),
            error: ptr::null_mut(),
        }
    }

    fn error(message: String) -> Self {
        Self {
            success: false,
            data: ptr::null_mut(),
            error: CString::new(message).unwrap_or_default().into_raw(),
        }
    }

    fn from_result(result: crate::Result<String>) -> Self {
        match result {
            Ok(data) => Self::success(data),
            Err(e) => Self::error(e.to_string()),
        }
    }
}

unsafe fn read_str<'a>(ptr: *const c_char, name: &str) -> Result<&'a str, HelpdocResult> {
    if ptr.is_null() {
        return Err(HelpdocResult::error(format!("{name} cannot be null")));
    }
    CStr::from_ptr(ptr)
        .to_str()
        .map_err(|_| HelpdocResult::error(format!("Invalid UTF-8 {name}")))
}

/// Parse plain markup into document JSON.
///
/// # Safety
///
/// The `markup` must be a valid null-terminated UTF-8 string.
/// The returned result must be freed with `helpdoc_free_result`.
#[no_mangle]
pub unsafe extern "C" fn helpdoc_parse_markup(markup: *const c_char, pretty: bool) -> HelpdocResult {
    let markup = match read_str(markup, "markup") {
        Ok(s) => s,
        Err(e) => return e,
    };

    let format = if pretty {
        JsonFormat::Pretty
    } else {
        JsonFormat::Compact
    };
    HelpdocResult::from_result(render::to_json(&parse_markup_to_document(markup), format))
}

/// Render document JSON to display HTML.
///
/// # Safety
///
/// The `json` must be a valid null-terminated UTF-8 string.
/// The returned result must be freed with `helpdoc_free_result`.
#[no_mangle]
pub unsafe extern "C" fn helpdoc_render_html(json: *const c_char) -> HelpdocResult {
    let json = match read_str(json, "json") {
        Ok(s) => s,
        Err(e) => return e,
    };

    HelpdocResult::from_result(
        Document::from_json(json).map(|doc| render::render_document_to_markup(&doc)),
    )
}

/// Render document JSON to plain text.
///
/// # Safety
///
/// The `json` must be a valid null-terminated UTF-8 string.
/// The returned result must be freed with `helpdoc_free_result`.
#[no_mangle]
pub unsafe extern "C" fn helpdoc_render_text(json: *const c_char) -> HelpdocResult {
    let json = match read_str(json, "json") {
        Ok(s) => s,
        Err(e) => return e,
    };

    HelpdocResult::from_result(Document::from_json(json).map(|doc| render::to_text(&doc)))
}

/// Render document JSON back to plain markup.
///
/// # Safety
///
/// The `json` must be a valid null-terminated UTF-8 string.
/// The returned result must be freed with `helpdoc_free_result`.
#[no_mangle]
pub unsafe extern "C" fn helpdoc_render_markup(json: *const c_char) -> HelpdocResult {
    let json = match read_str(json, "json") {
        Ok(s) => s,
        Err(e) => return e,
    };

    HelpdocResult::from_result(Document::from_json(json).map(|doc| render::to_markup(&doc)))
}

/// Pick `#000000` or `#ffffff` text for a background color.
///
/// # Safety
///
/// The `background` must be a valid null-terminated UTF-8 string.
/// The returned result must be freed with `helpdoc_free_result`.
#[no_mangle]
pub unsafe extern "C" fn helpdoc_text_color(background: *const c_char) -> HelpdocResult {
    let background = match read_str(background, "background") {
        Ok(s) => s,
        Err(e) => return e,
    };

    HelpdocResult::from_result(theme::text_color_for(background).map(|c| c.hex().to_string()))
}

/// Free a result returned by any helpdoc function.
///
/// # Safety
///
/// The `result` must have been returned by a helpdoc function.
/// This function should only be called once per result.
#[no_mangle]
pub unsafe extern "C" fn helpdoc_free_result(result: HelpdocResult) {
    if !result.data.is_null() {
        drop(CString::from_raw(result.data));
    }
    if !result.error.is_null() {
        drop(CString::from_raw(result.error));
    }
}

/// Free a string allocated by helpdoc.
///
/// # Safety
///
/// The `ptr` must have been allocated by helpdoc.
/// This function should only be called once per pointer.
#[no_mangle]
pub unsafe extern "C" fn helpdoc_free_string(ptr: *mut c_char) {
    if !ptr.is_null() {
        drop(CString::from_raw(ptr));
    }
}

/// Get the version of the helpdoc library.
///
/// The returned string is statically allocated and should not be freed.
#[no_mangle]
pub extern "C" fn helpdoc_version() -> *const c_char {
    static VERSION: &[u8] = concat!(env!("CARGO_PKG_VERSION"), "\0").as_bytes();
    VERSION.as_ptr() as *const c_char
}
