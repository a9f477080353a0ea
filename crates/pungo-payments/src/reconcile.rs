//! Webhook Reconciliation
//!
//! Maps authenticated webhook events onto profile tier writes. Every write
//! is a deterministic single-row update, so replaying an event under
//! at-least-once delivery lands on the same tier.
//!
//! Store failures are logged and swallowed: surfacing them to the provider
//! would trigger event-redelivery storms for writes that will keep failing.

use std::sync::Arc;

use pungo_core::model::Tier;
use pungo_core::store::DataStore;

use crate::event::WebhookEvent;
use crate::tier::PriceTable;

/// Applies webhook events to the profile store
pub struct Reconciler<S: DataStore + ?Sized> {
    store: Arc<S>,
    prices: PriceTable,
}

impl<S: DataStore + ?Sized> Reconciler<S> {
    pub fn new(store: Arc<S>, prices: PriceTable) -> Self {
        Self { store, prices }
    }

    /// Process one authenticated event.
    ///
    /// Never fails: every path is handled-without-exception so the caller
    /// can acknowledge with 200 and stop redelivery.
    pub async fn process(&self, event: WebhookEvent) {
        match event {
            WebhookEvent::CheckoutCompleted { user_id, price_id } => {
                let Some(user_id) = user_id else {
                    tracing::warn!("Completed checkout without userId metadata, skipping");
                    return;
                };

                let tier = self.prices.resolve(price_id.as_deref().unwrap_or(""));
                match self.store.set_subscription_tier(user_id, tier).await {
                    Ok(()) => {
                        tracing::info!(%user_id, %tier, "Checkout completed, tier updated");
                    }
                    Err(e) => {
                        tracing::error!(%user_id, %tier, error = %e, "Tier update failed");
                    }
                }
            }

            WebhookEvent::SubscriptionDeleted { user_id } => {
                let Some(user_id) = user_id else {
                    // The provider does not always populate metadata here
                    tracing::warn!("Subscription deleted without userId metadata, skipping");
                    return;
                };

                match self.store.set_subscription_tier(user_id, Tier::Free).await {
                    Ok(()) => {
                        tracing::info!(%user_id, "Subscription deleted, tier reset to free");
                    }
                    Err(e) => {
                        tracing::error!(%user_id, error = %e, "Tier reset failed");
                    }
                }
            }

            WebhookEvent::Other { kind } => {
                tracing::debug!(event_type = %kind, "Unhandled webhook event");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pungo_core::model::Profile;
    use pungo_store::MemoryStore;
    use uuid::Uuid;

    fn prices() -> PriceTable {
        PriceTable::new(
            "price_pro_monthly",
            "price_pro_yearly",
            "price_premium_monthly",
            "price_premium_yearly",
        )
    }

    async fn store_with_user(user_id: Uuid) -> Arc<MemoryStore> {
        let store = Arc::new(MemoryStore::new());
        store.seed_profile(Profile::new(user_id)).await;
        store
    }

    #[tokio::test]
    async fn test_completed_checkout_sets_pro_tier() {
        let user_id = Uuid::new_v4();
        let store = store_with_user(user_id).await;
        let reconciler = Reconciler::new(store.clone(), prices());

        reconciler
            .process(WebhookEvent::CheckoutCompleted {
                user_id: Some(user_id),
                price_id: Some("price_pro_monthly".into()),
            })
            .await;

        let profile = store.profile(user_id).await.unwrap().unwrap();
        assert_eq!(profile.subscription_tier, Tier::Pro);
    }

    #[tokio::test]
    async fn test_replayed_event_is_idempotent() {
        let user_id = Uuid::new_v4();
        let store = store_with_user(user_id).await;
        let reconciler = Reconciler::new(store.clone(), prices());

        let event = WebhookEvent::CheckoutCompleted {
            user_id: Some(user_id),
            price_id: Some("price_premium_yearly".into()),
        };
        reconciler.process(event.clone()).await;
        reconciler.process(event).await;

        let profile = store.profile(user_id).await.unwrap().unwrap();
        assert_eq!(profile.subscription_tier, Tier::Premium);
    }

    #[tokio::test]
    async fn test_unknown_price_degrades_to_free() {
        let user_id = Uuid::new_v4();
        let store = store_with_user(user_id).await;
        let reconciler = Reconciler::new(store.clone(), prices());

        reconciler
            .process(WebhookEvent::CheckoutCompleted {
                user_id: Some(user_id),
                price_id: Some("price_discontinued".into()),
            })
            .await;

        let profile = store.profile(user_id).await.unwrap().unwrap();
        assert_eq!(profile.subscription_tier, Tier::Free);
    }

    #[tokio::test]
    async fn test_deletion_resets_tier() {
        let user_id = Uuid::new_v4();
        let store = store_with_user(user_id).await;
        store
            .set_subscription_tier(user_id, Tier::Premium)
            .await
            .unwrap();

        let reconciler = Reconciler::new(store.clone(), prices());
        reconciler
            .process(WebhookEvent::SubscriptionDeleted {
                user_id: Some(user_id),
            })
            .await;

        let profile = store.profile(user_id).await.unwrap().unwrap();
        assert_eq!(profile.subscription_tier, Tier::Free);
    }

    #[tokio::test]
    async fn test_deletion_without_user_id_changes_nothing() {
        let user_id = Uuid::new_v4();
        let store = store_with_user(user_id).await;
        store
            .set_subscription_tier(user_id, Tier::Pro)
            .await
            .unwrap();

        let reconciler = Reconciler::new(store.clone(), prices());
        reconciler
            .process(WebhookEvent::SubscriptionDeleted { user_id: None })
            .await;

        let profile = store.profile(user_id).await.unwrap().unwrap();
        assert_eq!(profile.subscription_tier, Tier::Pro);
    }
}
