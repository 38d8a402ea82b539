//! @acp:module "Validation"
//! @acp:summary "Identifier rules and typed default-value coercion"
//! @acp:domain cli
//! @acp:layer utility
//!
//! Pure functions, no I/O. Parameter names are validated raw with
//! [`validate_name`]; action IDs are sanitized with [`sanitize_identifier`]
//! first and then checked with [`validate_action_id`].

use serde_json::Value;

use crate::error::{Result, ScaffoldError};
use crate::model::ParamType;

/// Fallback used when sanitizing leaves nothing behind
pub const FALLBACK_IDENTIFIER: &str = "action";

/// Make a string safe for use as a directory name.
///
/// Every character outside `[A-Za-z0-9_-]` becomes `-`, runs of `-` collapse
/// into one, and leading/trailing `-` are trimmed. Never returns an empty string.
pub fn sanitize_identifier(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        let c = if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
            c
        } else {
            '-'
        };
        if c == '-' && out.ends_with('-') {
            continue;
        }
        out.push(c);
    }

    let trimmed = out.trim_matches('-');
    if trimmed.is_empty() {
        FALLBACK_IDENTIFIER.to_string()
    } else {
        trimmed.to_string()
    }
}

/// Validate a user-facing identifier (parameter names).
///
/// Must be non-empty, whitespace-free, start with an ASCII letter and contain
/// only ASCII letters, digits and underscores.
pub fn validate_name(subject: &str, name: &str) -> Result<()> {
    check_identifier(subject, name, &[])
}

/// Validate an action ID. Same rules as [`validate_name`], but `-` is also
/// allowed after the first character since sanitized IDs use it as separator.
pub fn validate_action_id(id: &str) -> Result<()> {
    check_identifier("action ID", id, &['-'])
}

fn check_identifier(subject: &str, name: &str, extra: &[char]) -> Result<()> {
    if name.is_empty() {
        return Err(ScaffoldError::validation(format!(
            "{} cannot be empty",
            subject
        )));
    }

    if name.chars().any(char::is_whitespace) {
        return Err(ScaffoldError::validation(format!(
            "{} cannot contain whitespace",
            subject
        )));
    }

    let first = name.chars().next().unwrap_or_default();
    if !first.is_ascii_alphabetic() {
        return Err(ScaffoldError::validation(format!(
            "{} must start with a letter",
            subject
        )));
    }

    for (i, c) in name.char_indices() {
        if !(c.is_ascii_alphanumeric() || c == '_' || extra.contains(&c)) {
            return Err(ScaffoldError::validation(format!(
                "{}: invalid character '{}' at position {}: only letters, digits and underscores are allowed",
                subject, c, i
            )));
        }
    }

    Ok(())
}

/// Convert a raw string into a typed value.
///
/// Arrays split on `,` without trimming and coerce each element with
/// `items_type` (string when absent), failing on the first bad element.
/// Numbers keep a fractional part only when they have one, except zero,
/// which always serializes as `0.0`.
pub fn coerce(value: &str, param_type: ParamType, items_type: Option<ParamType>) -> Result<Value> {
    if param_type != ParamType::Array {
        return coerce_scalar(value, param_type);
    }

    let items_type = items_type.unwrap_or(ParamType::String);
    if items_type == ParamType::Array {
        return Err(ScaffoldError::validation(
            "array items cannot themselves be arrays",
        ));
    }

    value
        .split(',')
        .map(|item| coerce_scalar(item, items_type))
        .collect::<Result<Vec<_>>>()
        .map(Value::Array)
}

fn coerce_scalar(value: &str, param_type: ParamType) -> Result<Value> {
    match param_type {
        ParamType::String => Ok(Value::String(value.to_string())),
        ParamType::Number => {
            let n: f64 = value.parse().map_err(|_| {
                ScaffoldError::validation(format!("'{}' is not a valid number", value))
            })?;
            if !n.is_finite() {
                return Err(ScaffoldError::validation(format!(
                    "'{}' is not a finite number",
                    value
                )));
            }
            // Only zero keeps the float form (`0.0`); whole numbers render bare
            if n != 0.0 && n.fract() == 0.0 && n.abs() < i64::MAX as f64 {
                return Ok(Value::from(n as i64));
            }
            Ok(Value::from(if n == 0.0 { 0.0 } else { n }))
        }
        ParamType::Integer => value.parse::<i64>().map(Value::from).map_err(|_| {
            ScaffoldError::validation(format!("'{}' is not a valid integer", value))
        }),
        ParamType::Boolean => match value {
            "1" | "t" | "T" | "true" | "TRUE" | "True" => Ok(Value::Bool(true)),
            "0" | "f" | "F" | "false" | "FALSE" | "False" => Ok(Value::Bool(false)),
            _ => Err(ScaffoldError::validation(format!(
                "'{}' is not a valid boolean",
                value
            ))),
        },
        ParamType::Array => Err(ScaffoldError::validation(
            "array items cannot themselves be arrays",
        )),
    }
}

/// Zero value of a type, used when no default is supplied
pub fn zero_value(param_type: ParamType) -> Value {
    match param_type {
        ParamType::String => Value::String(String::new()),
        ParamType::Number => Value::from(0.0_f64),
        ParamType::Integer => Value::from(0_i64),
        ParamType::Boolean => Value::Bool(false),
        ParamType::Array => Value::Array(Vec::new()),
    }
}

/// Whether an already-typed value fits the declared type
pub fn value_matches(value: &Value, param_type: ParamType, items_type: Option<ParamType>) -> bool {
    match param_type {
        ParamType::String => value.is_string(),
        ParamType::Number => value.is_number(),
        ParamType::Integer => value.is_i64() || value.is_u64(),
        ParamType::Boolean => value.is_boolean(),
        ParamType::Array => match (value, items_type) {
            (Value::Array(items), Some(item_type)) if item_type != ParamType::Array => items
                .iter()
                .all(|v| value_matches(v, item_type, None)),
            _ => false,
        },
    }
}
