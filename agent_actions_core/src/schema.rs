//! Field contracts describing what an action accepts.
//!
//! A contract is plain data. Interpretation lives in [`crate::validate`], so
//! the same contract can be validated against, rendered as JSON Schema for an
//! LLM, or serialized into a tool listing.

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use crate::error::FieldIssue;

/// The JSON shape a field must have.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    String,
    Number,
    Integer,
    Boolean,
    /// Currency quantity: decimal string or JSON integer, kept exact.
    Amount,
    Object,
    Array,
}

impl FieldKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Number => "number",
            Self::Integer => "integer",
            Self::Boolean => "boolean",
            Self::Amount => "amount",
            Self::Object => "object",
            Self::Array => "array",
        }
    }

    fn json_schema_type(self) -> Value {
        match self {
            // Amounts travel as strings so they never pass through a float.
            Self::Amount => json!("string"),
            other => json!(other.as_str()),
        }
    }
}

/// Extra checks applied after the kind check passes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "type", content = "value")]
pub enum Constraint {
    /// Strictly greater than zero (number, integer, amount).
    Positive,
    /// Zero or greater (number, integer, amount).
    NonNegative,
    /// No fractional part (amount).
    Integral,
    /// Minimum chars for strings, items for arrays.
    MinLength(usize),
    /// Maximum chars for strings, items for arrays.
    MaxLength(usize),
    /// String must be one of the listed values.
    OneOf(Vec<String>),
}

impl Constraint {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Positive => "positive",
            Self::NonNegative => "non_negative",
            Self::Integral => "integral",
            Self::MinLength(_) => "min_length",
            Self::MaxLength(_) => "max_length",
            Self::OneOf(_) => "one_of",
        }
    }

    /// Whether the constraint means anything for fields of `kind`.
    pub fn applies_to(&self, kind: FieldKind) -> bool {
        match self {
            Self::Positive | Self::NonNegative | Self::Integral => matches!(
                kind,
                FieldKind::Number | FieldKind::Integer | FieldKind::Amount
            ),
            Self::MinLength(_) | Self::MaxLength(_) => {
                matches!(kind, FieldKind::String | FieldKind::Array)
            }
            Self::OneOf(_) => kind == FieldKind::String,
        }
    }

    pub fn describe(&self) -> String {
        match self {
            Self::Positive => "a positive value".to_string(),
            Self::NonNegative => "a non-negative value".to_string(),
            Self::Integral => "a whole number".to_string(),
            Self::MinLength(n) => format!("length of at least {n}"),
            Self::MaxLength(n) => format!("length of at most {n}"),
            Self::OneOf(options) => format!("one of [{}]", options.join(", ")),
        }
    }
}

/// One declared input field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldSpec {
    pub name: String,
    pub kind: FieldKind,
    pub required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub constraints: Vec<Constraint>,
}

impl FieldSpec {
    pub fn required(name: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            name: name.into(),
            kind,
            required: true,
            default: None,
            description: None,
            constraints: Vec::new(),
        }
    }

    pub fn optional(name: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            required: false,
            ..Self::required(name, kind)
        }
    }

    #[must_use]
    pub fn with_default(mut self, default: Value) -> Self {
        self.default = Some(default);
        self
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    #[must_use]
    pub fn with_constraint(mut self, constraint: Constraint) -> Self {
        self.constraints.push(constraint);
        self
    }

    fn to_json_schema(&self) -> Value {
        let mut schema = Map::new();
        schema.insert("type".to_string(), self.kind.json_schema_type());
        if let Some(description) = &self.description {
            schema.insert("description".to_string(), json!(description));
        }
        if let Some(default) = &self.default {
            schema.insert("default".to_string(), default.clone());
        }
        for constraint in &self.constraints {
            match (constraint, self.kind) {
                (Constraint::MinLength(n), FieldKind::Array) => {
                    schema.insert("minItems".to_string(), json!(n));
                }
                (Constraint::MaxLength(n), FieldKind::Array) => {
                    schema.insert("maxItems".to_string(), json!(n));
                }
                (Constraint::MinLength(n), _) => {
                    schema.insert("minLength".to_string(), json!(n));
                }
                (Constraint::MaxLength(n), _) => {
                    schema.insert("maxLength".to_string(), json!(n));
                }
                (Constraint::OneOf(options), _) => {
                    schema.insert("enum".to_string(), json!(options));
                }
                (Constraint::Positive, FieldKind::Number | FieldKind::Integer) => {
                    schema.insert("exclusiveMinimum".to_string(), json!(0));
                }
                (Constraint::NonNegative, FieldKind::Number | FieldKind::Integer) => {
                    schema.insert("minimum".to_string(), json!(0));
                }
                // Amount constraints have no JSON Schema form over strings.
                _ => {}
            }
        }
        Value::Object(schema)
    }
}

/// What to do with input fields the contract does not declare.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnknownFields {
    /// Reject the input.
    Strict,
    /// Silently drop them.
    Strip,
}

/// Ordered field declarations plus an unknown-field policy.
///
/// Build one with [`FieldContract::strict`] or [`FieldContract::strip`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldContract {
    pub unknown_fields: UnknownFields,
    pub fields: Vec<FieldSpec>,
}

impl FieldContract {
    pub fn strict() -> Self {
        Self {
            unknown_fields: UnknownFields::Strict,
            fields: Vec::new(),
        }
    }

    pub fn strip() -> Self {
        Self {
            unknown_fields: UnknownFields::Strip,
            fields: Vec::new(),
        }
    }

    #[must_use]
    pub fn field(mut self, spec: FieldSpec) -> Self {
        self.fields.push(spec);
        self
    }

    pub fn get(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|spec| spec.name == name)
    }

    pub fn declares(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Reports the first constraint declared on a kind it cannot apply to.
    pub fn check(&self) -> Result<(), FieldIssue> {
        for spec in &self.fields {
            if let Some(misfit) = spec.constraints.iter().find(|c| !c.applies_to(spec.kind)) {
                return Err(FieldIssue::new(
                    &spec.name,
                    format!(
                        "constraint '{}' does not apply to {} fields",
                        misfit.name(),
                        spec.kind.as_str()
                    ),
                ));
            }
        }
        Ok(())
    }

    /// Render as a JSON Schema object suitable for LLM tool definitions.
    pub fn to_json_schema(&self) -> Value {
        let properties: Map<String, Value> = self
            .fields
            .iter()
            .map(|spec| (spec.name.clone(), spec.to_json_schema()))
            .collect();
        let required: Vec<&str> = self
            .fields
            .iter()
            .filter(|spec| spec.required)
            .map(|spec| spec.name.as_str())
            .collect();

        json!({
            "type": "object",
            "properties": properties,
            "required": required,
            "additionalProperties": self.unknown_fields == UnknownFields::Strip,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn transfer_contract() -> FieldContract {
        FieldContract::strict()
            .field(
                FieldSpec::required("to", FieldKind::String)
                    .with_description("Destination address"),
            )
            .field(
                FieldSpec::required("amount", FieldKind::Amount)
                    .with_constraint(Constraint::Positive),
            )
            .field(FieldSpec::optional("memo", FieldKind::String).with_constraint(
                Constraint::MaxLength(32),
            ))
    }

    #[test]
    fn json_schema_lists_required_fields_in_order() {
        let schema = transfer_contract().to_json_schema();
        assert_eq!(schema["type"], "object");
        assert_eq!(schema["required"], json!(["to", "amount"]));
        assert_eq!(schema["additionalProperties"], json!(false));
        assert_eq!(schema["properties"]["to"]["description"], "Destination address");
        assert_eq!(schema["properties"]["memo"]["maxLength"], 32);
    }

    #[test]
    fn amounts_are_advertised_as_strings() {
        let schema = transfer_contract().to_json_schema();
        assert_eq!(schema["properties"]["amount"]["type"], "string");
    }

    #[test]
    fn strip_contracts_allow_additional_properties() {
        let schema = FieldContract::strip()
            .field(FieldSpec::optional("limit", FieldKind::Integer).with_default(json!(10)))
            .to_json_schema();
        assert_eq!(schema["additionalProperties"], json!(true));
        assert_eq!(schema["properties"]["limit"]["default"], 10);
    }

    #[test]
    fn lookup_by_name() {
        let contract = transfer_contract();
        assert!(contract.declares("amount"));
        assert!(!contract.declares("mint"));
        assert_eq!(contract.get("to").map(|f| f.kind), Some(FieldKind::String));
    }

    #[test]
    fn constraint_descriptions() {
        assert_eq!(Constraint::MinLength(1).describe(), "length of at least 1");
        assert_eq!(
            Constraint::OneOf(vec!["USDC".to_string(), "SOL".to_string()]).describe(),
            "one of [USDC, SOL]"
        );
    }

    #[test]
    fn well_formed_contracts_pass_the_check() {
        assert_eq!(transfer_contract().check(), Ok(()));
        assert_eq!(FieldContract::strict().check(), Ok(()));
    }

    #[test]
    fn constraints_on_the_wrong_kind_are_reported() {
        let contract = FieldContract::strict()
            .field(FieldSpec::required("to", FieldKind::String))
            .field(FieldSpec::required("memo", FieldKind::String).with_constraint(Constraint::Positive));
        let issue = contract.check().unwrap_err();
        assert_eq!(issue.field, "memo");
        assert_eq!(issue.reason, "constraint 'positive' does not apply to string fields");

        let amount = FieldContract::strict().field(
            FieldSpec::required("amount", FieldKind::Amount).with_constraint(Constraint::MaxLength(3)),
        );
        assert_eq!(amount.check().unwrap_err().field, "amount");

        let flag = FieldContract::strict().field(
            FieldSpec::required("flag", FieldKind::Boolean)
                .with_constraint(Constraint::OneOf(vec!["true".to_string()])),
        );
        assert!(flag.check().is_err());
    }
}
