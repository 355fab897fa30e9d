//! Handler for the `parse` command.

use serde_json::json;

use crate::adapter::inbound::cli::output;
use crate::application::parser;
use crate::error::Result;

/// Print the parse result. A miss prints `{"tick": null}`.
pub fn execute(text: &str) -> Result<()> {
    let tick = parser::parse(text);
    output::json(&json!({ "tick": tick }))
}
