//! Plain CLI output helpers.
//!
//! Command results go to stdout; logs go through `tracing`.

use std::fmt::Display;

use serde::Serialize;

use crate::error::Result;

/// Print a value as pretty JSON.
///
/// # Errors
///
/// Returns an error if the value cannot be serialized.
pub fn json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Print an aligned `label: value` line.
pub fn field(label: &str, value: impl Display) {
    println!("  {label:<14} {value}");
}

pub fn success(message: &str) {
    println!("ok: {message}");
}
