//! Webhook Event Parsing
//!
//! Decodes the provider's event envelope into the two event kinds the
//! reconciler cares about. The user and price identifiers travel in the
//! session/subscription metadata that checkout creation wrote.

use std::collections::HashMap;

use serde::Deserialize;
use uuid::Uuid;

use crate::error::{PaymentError, Result};

/// Parsed webhook event
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum WebhookEvent {
    /// A checkout session finished paying; the profile tier follows the price
    CheckoutCompleted {
        user_id: Option<Uuid>,
        price_id: Option<String>,
    },

    /// A subscription ended; the profile drops back to free
    ///
    /// The provider does not guarantee metadata on deletion events, so
    /// `user_id` may legitimately be absent.
    SubscriptionDeleted { user_id: Option<Uuid> },

    /// Unhandled event type
    Other { kind: String },
}

#[derive(Deserialize)]
struct RawEvent {
    #[serde(rename = "type")]
    kind: String,
    data: RawData,
}

#[derive(Deserialize)]
struct RawData {
    object: RawObject,
}

#[derive(Deserialize, Default)]
struct RawObject {
    #[serde(default)]
    metadata: Option<HashMap<String, String>>,
}

/// Parse an already-authenticated event body.
pub fn parse(payload: &str) -> Result<WebhookEvent> {
    let raw: RawEvent =
        serde_json::from_str(payload).map_err(|e| PaymentError::Parse(e.to_string()))?;

    let metadata = raw.data.object.metadata.unwrap_or_default();

    Ok(match raw.kind.as_str() {
        "checkout.session.completed" => WebhookEvent::CheckoutCompleted {
            user_id: metadata_user_id(&metadata),
            price_id: metadata.get("priceId").cloned(),
        },
        "customer.subscription.deleted" => WebhookEvent::SubscriptionDeleted {
            user_id: metadata_user_id(&metadata),
        },
        _ => WebhookEvent::Other { kind: raw.kind },
    })
}

fn metadata_user_id(metadata: &HashMap<String, String>) -> Option<Uuid> {
    let raw = metadata.get("userId")?;
    match Uuid::parse_str(raw) {
        Ok(id) => Some(id),
        Err(_) => {
            tracing::warn!(user_id = %raw, "Event metadata userId is not a UUID");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_checkout_completed_event() {
        let user_id = Uuid::new_v4();
        let payload = json!({
            "id": "evt_1",
            "type": "checkout.session.completed",
            "data": { "object": {
                "id": "cs_test_1",
                "metadata": { "userId": user_id.to_string(), "priceId": "price_pro_monthly" }
            }}
        })
        .to_string();

        let event = parse(&payload).unwrap();
        assert_eq!(
            event,
            WebhookEvent::CheckoutCompleted {
                user_id: Some(user_id),
                price_id: Some("price_pro_monthly".into()),
            }
        );
    }

    #[test]
    fn test_deletion_event_without_metadata() {
        let payload = json!({
            "id": "evt_2",
            "type": "customer.subscription.deleted",
            "data": { "object": { "id": "sub_1" } }
        })
        .to_string();

        let event = parse(&payload).unwrap();
        assert_eq!(event, WebhookEvent::SubscriptionDeleted { user_id: None });
    }

    #[test]
    fn test_unknown_event_kind() {
        let payload = json!({
            "type": "invoice.payment_failed",
            "data": { "object": {} }
        })
        .to_string();

        let event = parse(&payload).unwrap();
        assert_eq!(
            event,
            WebhookEvent::Other {
                kind: "invoice.payment_failed".into()
            }
        );
    }

    #[test]
    fn test_malformed_user_id_is_dropped() {
        let payload = json!({
            "type": "checkout.session.completed",
            "data": { "object": { "metadata": { "userId": "not-a-uuid" } } }
        })
        .to_string();

        let event = parse(&payload).unwrap();
        assert_eq!(
            event,
            WebhookEvent::CheckoutCompleted {
                user_id: None,
                price_id: None,
            }
        );
    }

    #[test]
    fn test_invalid_json_is_a_parse_error() {
        assert!(parse("{ not json").is_err());
    }
}
