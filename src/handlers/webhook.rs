use chrono::{SecondsFormat, Utc};
use serde_json::Value;

use crate::phone;
use crate::protocol::{InboundWebhook, WebhookResponse};
use crate::store::ContactStore;

/// Handle a Retell inbound-call webhook.
///
/// Normalizes `call_inbound.from_number` and looks it up in the store.
/// An unknown, missing, or too-short number yields the `not_found`
/// variant; there is no failure response.
pub fn handle(payload: &Value, store: &ContactStore) -> WebhookResponse {
    let timestamp = Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true);
    let pretty = serde_json::to_string_pretty(payload).unwrap_or_else(|_| payload.to_string());
    tracing::info!(%timestamp, payload = %pretty, "retell inbound webhook");

    let event = InboundWebhook::from_payload(payload);
    let from_number = event.from_number();
    let normalized = phone::normalize(&from_number);
    tracing::info!(from_number = %from_number, normalized = %normalized, "looking up caller");

    match store.get(&normalized) {
        Some(record) => {
            tracing::info!(
                normalized = %normalized,
                full_name = %record.full_name,
                account_ref = %record.account_ref,
                "caller found"
            );
            WebhookResponse::found(record)
        }
        None => {
            tracing::info!(normalized = %normalized, "caller not found");
            WebhookResponse::not_found()
        }
    }
}
