//! Price-to-Tier Resolution
//!
//! The four configured Stripe price ids map onto subscription tiers. The
//! mapping is total: anything unrecognized degrades to `free` so billing
//! processing never fails on an unknown price.

use pungo_core::model::Tier;

/// The four configured price ids (pro/premium x monthly/yearly)
#[derive(Clone, Debug, Default)]
pub struct PriceTable {
    pro_monthly: String,
    pro_yearly: String,
    premium_monthly: String,
    premium_yearly: String,
}

impl PriceTable {
    pub fn new(
        pro_monthly: impl Into<String>,
        pro_yearly: impl Into<String>,
        premium_monthly: impl Into<String>,
        premium_yearly: impl Into<String>,
    ) -> Self {
        Self {
            pro_monthly: pro_monthly.into(),
            pro_yearly: pro_yearly.into(),
            premium_monthly: premium_monthly.into(),
            premium_yearly: premium_yearly.into(),
        }
    }

    /// Read the price ids from the environment. Missing entries stay empty
    /// and never match, so a partially configured table still resolves.
    pub fn from_env() -> Self {
        let var = |name: &str| {
            std::env::var(name).unwrap_or_else(|_| {
                tracing::warn!(price = name, "Price id not configured");
                String::new()
            })
        };
        Self {
            pro_monthly: var("STRIPE_PRICE_PRO_MONTHLY"),
            pro_yearly: var("STRIPE_PRICE_PRO_YEARLY"),
            premium_monthly: var("STRIPE_PRICE_PREMIUM_MONTHLY"),
            premium_yearly: var("STRIPE_PRICE_PREMIUM_YEARLY"),
        }
    }

    /// Resolve a price id to a tier. Total: unknown ids default to Free.
    pub fn resolve(&self, price_id: &str) -> Tier {
        if price_id.is_empty() {
            return Tier::Free;
        }
        if price_id == self.pro_monthly || price_id == self.pro_yearly {
            Tier::Pro
        } else if price_id == self.premium_monthly || price_id == self.premium_yearly {
            Tier::Premium
        } else {
            Tier::Free
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> PriceTable {
        PriceTable::new(
            "price_pro_monthly",
            "price_pro_yearly",
            "price_premium_monthly",
            "price_premium_yearly",
        )
    }

    #[test]
    fn test_known_prices_resolve() {
        let table = table();
        assert_eq!(table.resolve("price_pro_monthly"), Tier::Pro);
        assert_eq!(table.resolve("price_pro_yearly"), Tier::Pro);
        assert_eq!(table.resolve("price_premium_monthly"), Tier::Premium);
        assert_eq!(table.resolve("price_premium_yearly"), Tier::Premium);
    }

    #[test]
    fn test_unknown_price_defaults_to_free() {
        let table = table();
        assert_eq!(table.resolve("price_legacy_plan"), Tier::Free);
        assert_eq!(table.resolve(""), Tier::Free);
    }

    #[test]
    fn test_unconfigured_table_never_matches() {
        let empty = PriceTable::default();
        assert_eq!(empty.resolve(""), Tier::Free);
        assert_eq!(empty.resolve("price_pro_monthly"), Tier::Free);
    }
}
