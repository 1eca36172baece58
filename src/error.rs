//! The three fatal error kinds a transpile call can return (§7).
//!
//! Everything else — unrecognized syntax, unmatched braces, decorators with
//! no declaration to attach to — is a soft error: logged via `tracing` and
//! skipped in place, never surfaced here.

use std::fmt;

#[derive(Debug)]
pub enum BicepTranspileError {
    /// The source reader failed (including: lines that aren't valid UTF-8).
    Scan(std::io::Error),
    /// The built ARM document failed to serialize to bytes.
    Marshal(serde_json::Error),
    /// The serialized bytes failed to parse back into a generic JSON value.
    Unmarshal(serde_json::Error),
}

impl fmt::Display for BicepTranspileError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BicepTranspileError::Scan(e) => {
                write!(f, "error reading bicep file on parserBicepFile function: {e}")
            }
            BicepTranspileError::Marshal(e) => {
                write!(f, "error marshaling bicep file on parse function: {e}")
            }
            BicepTranspileError::Unmarshal(e) => {
                write!(f, "error unmarshaling bicep file on parse function: {e}")
            }
        }
    }
}

impl std::error::Error for BicepTranspileError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            BicepTranspileError::Scan(e) => Some(e),
            BicepTranspileError::Marshal(e) => Some(e),
            BicepTranspileError::Unmarshal(e) => Some(e),
        }
    }
}
