use serde::Serialize;

use crate::store::ContactRecord;

/// Identifier of this integration, echoed in every webhook response.
pub const LOOKUP_SOURCE: &str = "tcn_linkback";

// ---------------------------------------------------------------------------
// Webhook response
// ---------------------------------------------------------------------------

/// Top-level webhook response; mirrors the request's `call_inbound` key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WebhookResponse {
    pub call_inbound: InboundResponse,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InboundResponse {
    pub dynamic_variables: DynamicVariables,
    pub metadata: LookupMetadata,
}

/// Personalization fields injected into the live conversation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DynamicVariables {
    pub full_name: String,
    /// Historical name; carries the configured account-reference column,
    /// whatever its length.
    pub ssn_last_two_digit: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LookupStatus {
    Found,
    NotFound,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LookupMetadata {
    pub source: String,
    pub lookup_status: LookupStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub account: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cltrefno: Option<String>,
}

impl WebhookResponse {
    pub fn found(record: &ContactRecord) -> Self {
        Self {
            call_inbound: InboundResponse {
                dynamic_variables: DynamicVariables {
                    full_name: record.full_name.clone(),
                    ssn_last_two_digit: record.account_ref.clone(),
                },
                metadata: LookupMetadata {
                    source: LOOKUP_SOURCE.into(),
                    lookup_status: LookupStatus::Found,
                    account: Some(record.raw.account.clone()),
                    cltrefno: Some(record.raw.client_ref.clone()),
                },
            },
        }
    }

    pub fn not_found() -> Self {
        Self {
            call_inbound: InboundResponse {
                dynamic_variables: DynamicVariables::default(),
                metadata: LookupMetadata {
                    source: LOOKUP_SOURCE.into(),
                    lookup_status: LookupStatus::NotFound,
                    account: None,
                    cltrefno: None,
                },
            },
        }
    }

    pub fn status(&self) -> LookupStatus {
        self.call_inbound.metadata.lookup_status
    }
}

// ---------------------------------------------------------------------------
// Health response
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HealthResponse {
    pub status: String,
    /// Distinct phone keys in the store.
    pub contacts_loaded: usize,
    /// Seconds since process start.
    pub uptime: f64,
}
