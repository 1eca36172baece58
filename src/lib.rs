//! A line-oriented Bicep to ARM JSON transpiler.
//!
//! This crate scans Bicep source one line at a time — no tokenizer, no
//! grammar — classifying each line (`lexer`), folding classified lines
//! through an explicit container stack into typed declarations (`parser`),
//! and rendering those declarations as an ARM JSON document (`serializer`).
//! It is a library: reading files from disk, deciding which files to feed
//! in, and doing anything with the resulting JSON are all left to the
//! caller.

pub mod container;
pub mod coerce;
pub mod error;
pub mod lexer;
pub mod model;
pub mod parser;
pub mod serializer;

pub use error::BicepTranspileError;
pub use model::{DecoratorSet, Element, PropertyMap, Value};
pub use serializer::LineMap;

use std::io::BufRead;

/// Splits raw bytes into lines the way the original's `bufio.Scanner` does:
/// lazily, surfacing the first decode/IO failure rather than panicking on
/// invalid input.
fn scan_lines(bytes: &[u8]) -> Result<Vec<String>, BicepTranspileError> {
    std::io::BufReader::new(bytes)
        .lines()
        .collect::<Result<Vec<_>, _>>()
        .map_err(BicepTranspileError::Scan)
}

/// Parses Bicep source bytes directly into the typed `Element` sequence,
/// without going on to serialize it. Useful for callers that want the
/// intermediate representation rather than ARM JSON.
pub fn parse_bicep_elements(bytes: &[u8]) -> Result<Vec<Element>, BicepTranspileError> {
    let lines = scan_lines(bytes)?;
    Ok(parser::parse_elements(&lines))
}

/// Parses Bicep source bytes all the way to an ARM JSON `serde_json::Value`.
///
/// Internally this performs the same marshal-then-unmarshal round trip the
/// original does: the built document is serialized to bytes and parsed back
/// into a generic JSON value, so `MarshalError`/`UnmarshalError` are real,
/// distinguishable failure points rather than one opaque serialization step.
pub fn parse_bicep_to_arm_json(bytes: &[u8]) -> Result<serde_json::Value, BicepTranspileError> {
    let elements = parse_bicep_elements(bytes)?;
    let arm = serializer::serialize_to_arm(&elements);
    let encoded = serde_json::to_vec(&arm).map_err(BicepTranspileError::Marshal)?;
    serde_json::from_slice(&encoded).map_err(BicepTranspileError::Unmarshal)
}

/// The capability surface (§6): a zero-config parser descriptor exposing
/// everything an external scanning pipeline needs to know about how this
/// crate handles Bicep — which extensions/types it claims, how to strip
/// comments, and how to turn raw bytes into the document list it produces.
#[derive(Debug, Default, Clone, Copy)]
pub struct BicepParser;

impl BicepParser {
    pub fn new() -> Self {
        BicepParser
    }

    /// Parses `bytes` (the contents of the file at `path`) into the
    /// single-element document list plus the (always-empty) line map.
    pub fn parse(&self, path: &str, bytes: &[u8]) -> Result<(Vec<serde_json::Value>, LineMap), BicepTranspileError> {
        tracing::debug!("parsing bicep file: {path}");
        let document = parse_bicep_to_arm_json(bytes)?;
        Ok((vec![document], LineMap::new()))
    }

    pub fn supported_extensions(&self) -> &'static [&'static str] {
        &[".bicep"]
    }

    pub fn supported_types(&self) -> &'static [&'static str] {
        &["bicep", "azureresourcemanager"]
    }

    pub fn comment_token(&self) -> &'static str {
        "//"
    }

    /// UTF-8 passthrough. Kept fallible (rather than an infallible
    /// `to_string_lossy`) because spec.md §6 specifies a `Result`-returning
    /// capability here, matching the original's `StringifyContent`.
    pub fn stringify(&self, bytes: &[u8]) -> Result<String, BicepTranspileError> {
        String::from_utf8(bytes.to_vec())
            .map_err(|e| BicepTranspileError::Scan(std::io::Error::new(std::io::ErrorKind::InvalidData, e)))
    }

    /// Identity: this parser does not rewrite source before scanning it.
    pub fn resolve(&self, bytes: &[u8]) -> Vec<u8> {
        bytes.to_vec()
    }

    /// This parser never resolves cross-file references, so the resolved
    /// file set is always empty.
    pub fn resolved_files(&self) -> indexmap::IndexMap<String, String> {
        indexmap::IndexMap::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn capability_surface_matches_spec() {
        let parser = BicepParser::new();
        assert_eq!(parser.supported_extensions(), &[".bicep"]);
        assert_eq!(parser.supported_types(), &["bicep", "azureresourcemanager"]);
        assert_eq!(parser.comment_token(), "//");
        assert!(parser.resolved_files().is_empty());
        assert_eq!(parser.resolve(b"abc"), b"abc".to_vec());
    }

    #[test]
    fn parse_wraps_a_single_arm_document() {
        let parser = BicepParser::new();
        let (docs, lines) = parser.parse("main.bicep", b"targetScope = 'subscription'").unwrap();
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0]["targetScope"], serde_json::json!("subscription"));
        assert!(lines.is_empty());
    }

    #[test]
    fn stringify_rejects_invalid_utf8() {
        let parser = BicepParser::new();
        assert!(parser.stringify(&[0xff, 0xfe]).is_err());
    }
}
