use jsonschema::validator_for;
use serde_json::Value;

/// JSON Schema (draft 2020-12) of the webhook response, both variants.
///
/// `account` and `cltrefno` are required when `lookup_status` is `found`
/// and forbidden when it is `not_found`.
pub const WEBHOOK_RESPONSE_SCHEMA: &str = r#"{
  "$schema": "https://json-schema.org/draft/2020-12/schema",
  "title": "Retell inbound webhook response",
  "type": "object",
  "required": ["call_inbound"],
  "additionalProperties": false,
  "properties": {
    "call_inbound": {
      "type": "object",
      "required": ["dynamic_variables", "metadata"],
      "additionalProperties": false,
      "properties": {
        "dynamic_variables": {
          "type": "object",
          "required": ["full_name", "ssn_last_two_digit"],
          "additionalProperties": false,
          "properties": {
            "full_name": { "type": "string" },
            "ssn_last_two_digit": { "type": "string" }
          }
        },
        "metadata": {
          "type": "object",
          "required": ["source", "lookup_status"],
          "additionalProperties": false,
          "properties": {
            "source": { "const": "tcn_linkback" },
            "lookup_status": { "enum": ["found", "not_found"] },
            "account": { "type": "string" },
            "cltrefno": { "type": "string" }
          },
          "if": { "properties": { "lookup_status": { "const": "found" } } },
          "then": { "required": ["account", "cltrefno"] },
          "else": { "not": { "anyOf": [{ "required": ["account"] }, { "required": ["cltrefno"] }] } }
        }
      }
    }
  }
}"#;

/// JSON Schema (draft 2020-12) of the `/health` response.
pub const HEALTH_RESPONSE_SCHEMA: &str = r#"{
  "$schema": "https://json-schema.org/draft/2020-12/schema",
  "title": "Health response",
  "type": "object",
  "required": ["status", "contacts_loaded", "uptime"],
  "additionalProperties": false,
  "properties": {
    "status": { "const": "ok" },
    "contacts_loaded": { "type": "integer", "minimum": 0 },
    "uptime": { "type": "number", "minimum": 0 }
  }
}"#;

#[derive(Debug, thiserror::Error)]
pub enum SchemaValidationError {
    #[error("Schema parse error: {0}")]
    SchemaParse(#[from] serde_json::Error),
    #[error("Schema compile error: {0}")]
    SchemaCompile(String),
    #[error("Instance validation failed: {0}")]
    ValidationFailed(String),
}

/// Validate `instance` against a JSON Schema given as text.
///
/// On failure the error carries the first violation message.
pub fn validate_value(schema_str: &str, instance: &Value) -> Result<(), SchemaValidationError> {
    let schema_json: Value = serde_json::from_str(schema_str)?;

    let validator = validator_for(&schema_json)
        .map_err(|e| SchemaValidationError::SchemaCompile(e.to_string()))?;

    let result = match validator.iter_errors(instance).next() {
        None => Ok(()),
        Some(err) => Err(SchemaValidationError::ValidationFailed(err.to_string())),
    };
    result
}

/// Check a serialized webhook response against [`WEBHOOK_RESPONSE_SCHEMA`].
pub fn validate_webhook_response(instance: &Value) -> Result<(), SchemaValidationError> {
    validate_value(WEBHOOK_RESPONSE_SCHEMA, instance)
}

/// Check a serialized health response against [`HEALTH_RESPONSE_SCHEMA`].
pub fn validate_health_response(instance: &Value) -> Result<(), SchemaValidationError> {
    validate_value(HEALTH_RESPONSE_SCHEMA, instance)
}
