/// JSON validation for `--json` mode.
use crate::error::PromptError;
use serde_json::Value;

/// Check that `raw` parses as a JSON value.
///
/// Validation only: callers print the entered text verbatim, never a
/// re-serialization.
pub fn ensure_json(raw: &str) -> Result<(), PromptError> {
    serde_json::from_str::<Value>(raw)
        .map(|_| ())
        .map_err(|e| PromptError::InvalidJson { source: e })
}
