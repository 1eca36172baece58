//! Value Coercion (§4.2.1): turns the raw text to the right of a `=` or `:`
//! into a typed `Value`, resolving string interpolation and symbol
//! references along the way. Ported from the original's
//! `convertToInitialType`/`isParamOrVariable` pair, unified here into one
//! function used everywhere a scalar needs interpreting — variable values,
//! property values, parameter defaults, and output values alike.

use indexmap::IndexSet;
use lazy_static::lazy_static;
use regex::Regex;

use crate::model::Value;

lazy_static! {
    static ref INTERPOLATION: Regex = Regex::new(r"\$\{([^}]*)\}").unwrap();
    // `name(args)trailer` — a single level of parens, same shape as the
    // original's paramValueRegex. No support for nested calls.
    static ref CALL_EXPR: Regex = Regex::new(r"^([^()]*)\(([^()]*)\)(.*)$").unwrap();
}

/// Strips exactly one matching pair of leading/trailing single quotes, if
/// present. Leaves anything else untouched.
fn strip_quotes(s: &str) -> &str {
    if s.len() >= 2 && s.starts_with('\'') && s.ends_with('\'') {
        &s[1..s.len() - 1]
    } else {
        s
    }
}

/// Resolves a symbol appearing inside an interpolation span (or recursively,
/// inside a call expression's arguments): a known parameter becomes
/// `parameters('name')`, a call expression recurses into its argument list,
/// anything else is returned as a bare (quote-stripped) literal.
fn resolve_symbol(expr: &str, known_params: &IndexSet<String>) -> String {
    let trimmed = expr.trim();
    if let Some(c) = CALL_EXPR.captures(trimmed) {
        let name = &c[1];
        let args = &c[2];
        let trailer = &c[3];
        return format!("{name}({}){trailer}", resolve_symbol(args, known_params));
    }
    if known_params.contains(trimmed) {
        return format!("parameters('{trimmed}')");
    }
    strip_quotes(trimmed).to_string()
}

/// Rewrites a string containing one or more `${...}` interpolation spans
/// into an ARM `[format('...', ...)]` expression.
fn rewrite_interpolation(s: &str, known_params: &IndexSet<String>) -> String {
    let mut literal = String::new();
    let mut args = Vec::new();
    let mut last_end = 0;

    for (i, caps) in INTERPOLATION.captures_iter(s).enumerate() {
        let whole = caps.get(0).unwrap();
        literal.push_str(&s[last_end..whole.start()]);
        literal.push_str(&format!("{{{i}}}"));
        args.push(resolve_symbol(&caps[1], known_params));
        last_end = whole.end();
    }
    literal.push_str(&s[last_end..]);

    format!("[format('{literal}', {})]", args.join(", "))
}

/// Coerces the raw text to the right of `=`/`:` into a typed `Value`,
/// following the rule order in §4.2.1: bool, then signed integer, then
/// `${}` interpolation, then function-call resolution, then known-parameter
/// lookup, then plain (quote-stripped) string.
pub fn coerce_value(raw: &str, known_params: &IndexSet<String>) -> Value {
    let trimmed = raw.trim();

    if trimmed == "true" {
        return Value::Bool(true);
    }
    if trimmed == "false" {
        return Value::Bool(false);
    }
    if let Ok(n) = trimmed.parse::<i64>() {
        return Value::Int(n);
    }

    let unquoted = strip_quotes(trimmed);

    if unquoted.contains("${") {
        return Value::String(rewrite_interpolation(unquoted, known_params));
    }
    if CALL_EXPR.is_match(unquoted) {
        return Value::String(resolve_symbol(unquoted, known_params));
    }
    if known_params.contains(unquoted) {
        return Value::String(format!("parameters('{unquoted}')"));
    }
    Value::String(unquoted.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(names: &[&str]) -> IndexSet<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn coerces_booleans_and_integers() {
        let known = params(&[]);
        assert_eq!(coerce_value("true", &known), Value::Bool(true));
        assert_eq!(coerce_value("false", &known), Value::Bool(false));
        assert_eq!(coerce_value("-42", &known), Value::Int(-42));
    }

    #[test]
    fn coercion_is_idempotent_for_already_typed_literals() {
        let known = params(&[]);
        assert_eq!(coerce_value("true", &known), coerce_value(&"true".to_string(), &known));
        assert_eq!(coerce_value("42", &known), coerce_value("42", &known));
    }

    #[test]
    fn plain_quoted_string_loses_its_quotes() {
        let known = params(&[]);
        assert_eq!(coerce_value("'eastus'", &known), Value::String("eastus".to_string()));
    }

    #[test]
    fn known_param_reference_becomes_parameters_call() {
        let known = params(&["location"]);
        assert_eq!(
            coerce_value("location", &known),
            Value::String("parameters('location')".to_string())
        );
    }

    #[test]
    fn interpolation_rewrites_to_format_expression() {
        let known = params(&["prefix"]);
        assert_eq!(
            coerce_value("'${prefix}-suffix'", &known),
            Value::String("[format('{0}-suffix', parameters('prefix'))]".to_string())
        );
    }

    #[test]
    fn function_call_resolves_its_argument_recursively() {
        let known = params(&["rg"]);
        assert_eq!(
            coerce_value("resourceGroup(rg)", &known),
            Value::String("resourceGroup(parameters('rg'))".to_string())
        );
    }

    #[test]
    fn unrecognized_bare_identifier_passes_through_unchanged() {
        let known = params(&[]);
        assert_eq!(coerce_value("someLiteral", &known), Value::String("someLiteral".to_string()));
    }
}
