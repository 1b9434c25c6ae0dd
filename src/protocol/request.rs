use serde::Deserialize;
use serde_json::Value;

/// Inbound webhook envelope sent by Retell when a call arrives.
///
/// Every field is optional; anything the platform omits reads as empty.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct InboundWebhook {
    #[serde(default)]
    pub call_inbound: Option<CallInbound>,
}

/// The `call_inbound` object of an inbound webhook.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CallInbound {
    /// Kept loose: some integrations send the number as a JSON number.
    #[serde(default)]
    pub from_number: Option<Value>,
}

impl InboundWebhook {
    /// Interpret an arbitrary JSON payload, falling back to an empty event
    /// when the shape does not match.
    pub fn from_payload(payload: &Value) -> Self {
        serde_json::from_value(payload.clone()).unwrap_or_default()
    }

    /// Caller number as text; empty when absent.
    pub fn from_number(&self) -> String {
        self.call_inbound
            .as_ref()
            .and_then(|c| c.from_number.as_ref())
            .map(value_text)
            .unwrap_or_default()
    }
}

fn value_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        _ => String::new(),
    }
}
