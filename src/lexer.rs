//! Line classification (§4.1): a pure function from a raw source line to a
//! `LineKind`, with no knowledge of parser state. Patterns are tried in a
//! fixed order and the first match wins, mirroring the ordered regex trial
//! the original Go scanner performs line by line.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref TARGET_SCOPE: Regex = Regex::new(r"^\s*targetScope\s*=\s*'([^']*)'\s*$").unwrap();
    static ref METADATA: Regex = Regex::new(r"^\s*metadata\s+(\S+)\s*=\s*'([^']*)'\s*$").unwrap();
    static ref DECORATOR_SECURE: Regex = Regex::new(r"^\s*@(?:sys\.)?secure\(\)\s*$").unwrap();
    static ref DECORATOR_ALLOWED_OPEN: Regex = Regex::new(r"^\s*@(?:sys\.)?allowed\(\[\s*$").unwrap();
    static ref DECORATOR_ALLOWED_INLINE: Regex =
        Regex::new(r"^\s*@(?:sys\.)?allowed\(\[\s*(.*?)\s*\]\s*\)\s*$").unwrap();
    static ref DECORATOR_KV: Regex =
        Regex::new(r"^\s*@(?:sys\.)?(description|maxLength|minLength|maxValue|minValue)\(\s*'?([^')]*)'?\s*\)\s*$")
            .unwrap();
    static ref VAR_OBJECT_OPEN: Regex = Regex::new(r"^\s*var\s+(\S+)\s*=\s*\{\s*$").unwrap();
    static ref VAR_ARRAY_OPEN: Regex = Regex::new(r"^\s*var\s+(\S+)\s*=\s*\[\s*$").unwrap();
    static ref VAR_SINGLE: Regex = Regex::new(r"^\s*var\s+(\S+)\s*=\s*(.+)$").unwrap();
    static ref RESOURCE: Regex =
        Regex::new(r"^\s*resource\s+(\S+)\s+'([^@']+)@([^']+)'\s*=\s*\{\s*$").unwrap();
    static ref PARAM: Regex = Regex::new(r"^\s*param\s+(\S+)\s+(\S+)\s*=\s*'([^']*)'\s*$").unwrap();
    static ref OUTPUT: Regex = Regex::new(r"^\s*output\s+(\S+)\s+(\S+)\s*=\s*'([^']*)'\s*$").unwrap();
    static ref INLINE_ARRAY_PROPERTY: Regex =
        Regex::new(r"^\s*([A-Za-z_][A-Za-z0-9_]*)\s*:\s*\[\s*(.*?)\s*\]\s*,?\s*$").unwrap();
    static ref PROPERTY: Regex = Regex::new(r"^\s*([A-Za-z_][A-Za-z0-9_]*)\s*:\s*(.+?)\s*,?\s*$").unwrap();
}

/// The classification of a single raw line (§4.1).
#[derive(Debug, Clone, PartialEq)]
pub enum LineKind {
    TargetScope { value: String },
    Metadata { name: String, description: String },
    DecoratorSecure,
    DecoratorAllowedOpen,
    DecoratorAllowedInline { raw_items: String },
    DecoratorKv { name: String, raw_value: String },
    VarObjectOpen { name: String },
    VarArrayOpen { name: String },
    VarSingle { name: String, raw_value: String },
    Resource { name: String, type_name: String, api_version: String },
    Param { name: String, type_name: String, raw_value: String },
    Output { name: String, type_name: String, raw_value: String },
    InlineArrayProperty { key: String, raw_items: String },
    /// A `key: value` line whose value isn't a bare opening bracket.
    Property { key: String, raw_value: String },
    /// A `key: {` or `key: [` line — the parser reclassifies this itself
    /// (see `parser::process_line`) rather than this module, since whether
    /// it opens an object or an array only matters to the container stack.
    OpenObject,
    OpenArray,
    CloseObject,
    CloseArray,
    CloseParen,
    Blank,
    Other { raw: String },
}

/// Classifies one raw source line. Leading/trailing whitespace is not
/// stripped before matching — each pattern embeds its own allowance.
pub fn classify(line: &str) -> LineKind {
    if line.trim().is_empty() {
        return LineKind::Blank;
    }

    if let Some(c) = TARGET_SCOPE.captures(line) {
        return LineKind::TargetScope { value: c[1].to_string() };
    }
    if let Some(c) = METADATA.captures(line) {
        return LineKind::Metadata { name: c[1].to_string(), description: c[2].to_string() };
    }
    if DECORATOR_SECURE.is_match(line) {
        return LineKind::DecoratorSecure;
    }
    if DECORATOR_ALLOWED_OPEN.is_match(line) {
        return LineKind::DecoratorAllowedOpen;
    }
    if let Some(c) = DECORATOR_ALLOWED_INLINE.captures(line) {
        return LineKind::DecoratorAllowedInline { raw_items: c[1].to_string() };
    }
    if let Some(c) = DECORATOR_KV.captures(line) {
        return LineKind::DecoratorKv { name: c[1].to_string(), raw_value: c[2].to_string() };
    }
    if let Some(c) = VAR_OBJECT_OPEN.captures(line) {
        return LineKind::VarObjectOpen { name: c[1].to_string() };
    }
    if let Some(c) = VAR_ARRAY_OPEN.captures(line) {
        return LineKind::VarArrayOpen { name: c[1].to_string() };
    }
    if let Some(c) = VAR_SINGLE.captures(line) {
        return LineKind::VarSingle { name: c[1].to_string(), raw_value: c[2].trim().to_string() };
    }
    if let Some(c) = RESOURCE.captures(line) {
        return LineKind::Resource {
            name: c[1].to_string(),
            type_name: c[2].to_string(),
            api_version: c[3].to_string(),
        };
    }
    if let Some(c) = PARAM.captures(line) {
        return LineKind::Param { name: c[1].to_string(), type_name: c[2].to_string(), raw_value: c[3].to_string() };
    }
    if let Some(c) = OUTPUT.captures(line) {
        return LineKind::Output { name: c[1].to_string(), type_name: c[2].to_string(), raw_value: c[3].to_string() };
    }
    if let Some(c) = INLINE_ARRAY_PROPERTY.captures(line) {
        return LineKind::InlineArrayProperty { key: c[1].to_string(), raw_items: c[2].to_string() };
    }
    if let Some(c) = PROPERTY.captures(line) {
        let value = c[2].trim().to_string();
        // A property whose value is a bare opening bracket isn't really a
        // scalar assignment — it opens a nested container keyed by this
        // property's name. The driver (parser.rs) handles that promotion;
        // we still report it as Property so the key is never lost.
        return LineKind::Property { key: c[1].to_string(), raw_value: value };
    }
    if line.contains('}') {
        return LineKind::CloseObject;
    }
    if line.contains(']') {
        return LineKind::CloseArray;
    }
    if line.contains('{') {
        return LineKind::OpenObject;
    }
    if line.contains('[') {
        return LineKind::OpenArray;
    }
    if line.contains(')') {
        return LineKind::CloseParen;
    }
    LineKind::Other { raw: line.to_string() }
}
