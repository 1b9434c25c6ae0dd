pub mod request;
pub mod response;

pub use request::{CallInbound, InboundWebhook};
pub use response::{
    DynamicVariables, HealthResponse, InboundResponse, LookupMetadata, LookupStatus,
    WebhookResponse, LOOKUP_SOURCE,
};
