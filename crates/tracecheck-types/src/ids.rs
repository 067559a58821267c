//! Stable identifiers for diagnostic categories and codes.
//!
//! `category` is the tag hosts group diagnostics under. `code` is a short snake_case discriminator.

// Categories
pub const CATEGORY_LOGGING: &str = "logging";

// Codes: key/value structure
pub const CODE_ODD_KEY_VALUES: &str = "odd_key_values";
pub const CODE_MISSING_TRACE_ID: &str = "missing_trace_id";

// Codes: optional key/value hygiene
pub const CODE_NON_CONSTANT_KEY: &str = "non_constant_key";
pub const CODE_NON_ASCII_KEY: &str = "non_ascii_key";
pub const CODE_PRINTF_SPECIFIER: &str = "printf_specifier";

// Tool-level
pub const CATEGORY_TOOL_RUNTIME: &str = "tool.runtime";
pub const CODE_RUNTIME_ERROR: &str = "runtime_error";
