//! Input validation against a [`FieldContract`].
//!
//! [`validate`] is pure: no I/O, no logging, same answer for the same input.

use std::str::FromStr;

use bigdecimal::BigDecimal;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::error::{FieldIssue, ValidationError};
use crate::schema::{Constraint, FieldContract, FieldKind, FieldSpec, UnknownFields};

/// Field name used for issues about the input as a whole.
pub const INPUT_FIELD: &str = "<input>";

/// Arguments that passed validation.
///
/// Defaults are filled in and unknown fields are gone (strip) or were
/// rejected (strict). Amount fields hold their exact decimal text.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ParsedArgs {
    values: Map<String, Value>,
}

impl ParsedArgs {
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    pub fn str(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(Value::as_str)
    }

    pub fn bool(&self, name: &str) -> Option<bool> {
        self.get(name).and_then(Value::as_bool)
    }

    pub fn i64(&self, name: &str) -> Option<i64> {
        self.get(name).and_then(Value::as_i64)
    }

    pub fn f64(&self, name: &str) -> Option<f64> {
        self.get(name).and_then(Value::as_f64)
    }

    /// Exact value of an amount field.
    pub fn amount(&self, name: &str) -> Option<BigDecimal> {
        self.str(name).and_then(|text| BigDecimal::from_str(text).ok())
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.values
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.values)
    }

    /// Deserialize into a handler's own input struct.
    pub fn parse<T: DeserializeOwned>(&self) -> serde_json::Result<T> {
        serde_json::from_value(Value::Object(self.values.clone()))
    }
}

/// Validate `raw` against `contract`.
///
/// `null` is accepted as an empty argument object; any other non-object input
/// is rejected outright.
pub fn validate(contract: &FieldContract, raw: &Value) -> Result<ParsedArgs, ValidationError> {
    let empty = Map::new();
    let input = match raw {
        Value::Object(map) => map,
        Value::Null => &empty,
        other => {
            return Err(ValidationError::single(
                INPUT_FIELD,
                format!("expected object, received {}", json_kind(other)),
            ))
        }
    };

    let mut issues = Vec::new();
    let mut values = Map::new();

    for spec in &contract.fields {
        match input.get(&spec.name) {
            None | Some(Value::Null) => {
                if let Some(default) = &spec.default {
                    values.insert(spec.name.clone(), default.clone());
                } else if spec.required {
                    issues.push(FieldIssue::new(&spec.name, "missing required field"));
                }
            }
            Some(value) => match check_field(spec, value) {
                Ok(parsed) => {
                    values.insert(spec.name.clone(), parsed);
                }
                Err(reason) => issues.push(FieldIssue::new(&spec.name, reason)),
            },
        }
    }

    if contract.unknown_fields == UnknownFields::Strict {
        for name in input.keys().filter(|name| !contract.declares(name)) {
            issues.push(FieldIssue::new(name, "unknown field not allowed"));
        }
    }

    if issues.is_empty() {
        Ok(ParsedArgs { values })
    } else {
        Err(ValidationError::new(issues))
    }
}

fn check_field(spec: &FieldSpec, value: &Value) -> Result<Value, String> {
    let mismatch = || format!("expected {}, received {}", spec.kind.as_str(), json_kind(value));

    match spec.kind {
        FieldKind::String => {
            let text = value.as_str().ok_or_else(mismatch)?;
            check_constraints(spec, |c| string_satisfies(c, text), value)?;
            Ok(value.clone())
        }
        FieldKind::Number => {
            let number = value.as_f64().ok_or_else(mismatch)?;
            check_constraints(spec, |c| number_satisfies(c, number), value)?;
            Ok(value.clone())
        }
        FieldKind::Integer => {
            let number = match value {
                Value::Number(n) if n.is_i64() || n.is_u64() => n.as_f64().unwrap_or_default(),
                _ => return Err(mismatch()),
            };
            check_constraints(spec, |c| number_satisfies(c, number), value)?;
            Ok(value.clone())
        }
        FieldKind::Boolean => {
            if !value.is_boolean() {
                return Err(mismatch());
            }
            Ok(value.clone())
        }
        FieldKind::Amount => {
            let (text, amount) = parse_amount(value)?;
            check_constraints(spec, |c| amount_satisfies(c, &amount), value)?;
            Ok(Value::String(text))
        }
        FieldKind::Object => {
            if !value.is_object() {
                return Err(mismatch());
            }
            Ok(value.clone())
        }
        FieldKind::Array => {
            let items = value.as_array().ok_or_else(mismatch)?;
            check_constraints(spec, |c| array_satisfies(c, items.len()), value)?;
            Ok(value.clone())
        }
    }
}

/// Longest amount text accepted, sign and point included.
pub const MAX_AMOUNT_LEN: usize = 96;
/// Most digits accepted after the decimal point.
pub const MAX_AMOUNT_SCALE: usize = 36;

/// Amounts arrive as decimal strings or JSON integers. Floats are refused
/// outright since they may already have lost precision.
fn parse_amount(value: &Value) -> Result<(String, BigDecimal), String> {
    let text = match value {
        Value::String(text) => text.trim().to_string(),
        Value::Number(n) if n.is_i64() || n.is_u64() => n.to_string(),
        Value::Number(_) => {
            return Err(
                "expected amount as a decimal string or integer, received floating-point number"
                    .to_string(),
            )
        }
        other => return Err(format!("expected amount, received {}", json_kind(other))),
    };

    if text.len() > MAX_AMOUNT_LEN {
        return Err(format!(
            "expected amount of at most {MAX_AMOUNT_LEN} characters, received {}",
            text.len()
        ));
    }
    let scale = check_decimal_text(&text)
        .ok_or_else(|| format!("expected amount as plain decimal text, received \"{text}\""))?;
    if scale > MAX_AMOUNT_SCALE {
        return Err(format!(
            "expected amount with at most {MAX_AMOUNT_SCALE} decimal places, received {scale}"
        ));
    }

    let amount = BigDecimal::from_str(&text)
        .map_err(|_| format!("expected amount as plain decimal text, received \"{text}\""))?;
    Ok((text, amount))
}

/// Matches `-?digits(.digits)?` and returns the number of fractional digits.
/// Exponents, signs other than a leading `-`, and bare points are refused.
fn check_decimal_text(text: &str) -> Option<usize> {
    let unsigned = text.strip_prefix('-').unwrap_or(text);
    let (whole, fraction) = match unsigned.split_once('.') {
        Some((whole, fraction)) => (whole, Some(fraction)),
        None => (unsigned, None),
    };
    let all_digits = |part: &str| !part.is_empty() && part.bytes().all(|b| b.is_ascii_digit());

    if !all_digits(whole) {
        return None;
    }
    match fraction {
        Some(fraction) if all_digits(fraction) => Some(fraction.len()),
        Some(_) => None,
        None => Some(0),
    }
}

fn check_constraints(
    spec: &FieldSpec,
    satisfies: impl Fn(&Constraint) -> bool,
    value: &Value,
) -> Result<(), String> {
    match spec.constraints.iter().find(|c| !satisfies(c)) {
        Some(failed) => Err(format!("expected {}, received {}", failed.describe(), value)),
        None => Ok(()),
    }
}

fn string_satisfies(constraint: &Constraint, text: &str) -> bool {
    match constraint {
        Constraint::MinLength(n) => text.chars().count() >= *n,
        Constraint::MaxLength(n) => text.chars().count() <= *n,
        Constraint::OneOf(options) => options.iter().any(|option| option == text),
        _ => false,
    }
}

fn number_satisfies(constraint: &Constraint, number: f64) -> bool {
    match constraint {
        Constraint::Positive => number > 0.0,
        Constraint::NonNegative => number >= 0.0,
        Constraint::Integral => number.fract() == 0.0,
        _ => false,
    }
}

fn amount_satisfies(constraint: &Constraint, amount: &BigDecimal) -> bool {
    let zero = BigDecimal::from(0);
    match constraint {
        Constraint::Positive => *amount > zero,
        Constraint::NonNegative => *amount >= zero,
        Constraint::Integral => amount.is_integer(),
        _ => false,
    }
}

fn array_satisfies(constraint: &Constraint, len: usize) -> bool {
    match constraint {
        Constraint::MinLength(n) => len >= *n,
        Constraint::MaxLength(n) => len <= *n,
        _ => false,
    }
}

/// JSON kind name of a received value, for error messages.
pub fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
