//! Stderr diagnostics shared by validation and aggregation.

/// Print a non-fatal warning. The report still gets built.
pub fn warn(msg: String) {
    eprintln!("WARN: {}", msg);
}

/// Prefix for fatal error messages surfaced through anyhow.
pub fn error_message(msg: String) -> String {
    format!("ERROR: {}", msg)
}
