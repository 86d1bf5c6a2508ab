use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;

/// A multi-buy promotion: every `quantity` units cost `price` instead of
/// `quantity * unit_price`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpecialOffer {
    pub quantity: u32,
    pub price: u32,
}

/// Pricing for a single SKU. Prices are in the smallest currency unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PricingRule {
    #[serde(rename = "unitPrice")]
    pub unit_price: u32,

    #[serde(rename = "specialPrice", skip_serializing_if = "Option::is_none")]
    pub special_offer: Option<SpecialOffer>,
}

impl PricingRule {
    pub fn unit(unit_price: u32) -> Self {
        Self {
            unit_price,
            special_offer: None,
        }
    }

    pub fn with_offer(unit_price: u32, quantity: u32, price: u32) -> Self {
        Self {
            unit_price,
            special_offer: Some(SpecialOffer { quantity, price }),
        }
    }

    /// Price for `count` units of this SKU, maximizing offer usage.
    pub fn price_for(&self, count: u32) -> u64 {
        match self.special_offer {
            Some(offer) if count >= offer.quantity => {
                let bundles = u64::from(count / offer.quantity);
                let remainder = u64::from(count % offer.quantity);
                bundles * u64::from(offer.price) + remainder * u64::from(self.unit_price)
            }
            _ => u64::from(count) * u64::from(self.unit_price),
        }
    }
}

/// The capability checkout sessions depend on to resolve pricing rules.
///
/// Implementations return an immutable snapshot. Callers never observe a
/// partially updated mapping and cannot mutate catalog internals through it.
pub trait RulesProvider: Send + Sync {
    fn rules(&self) -> Arc<HashMap<String, PricingRule>>;
}

/// A fixed rule set, used as a test double and for static deployments.
pub struct StaticRules {
    rules: Arc<HashMap<String, PricingRule>>,
}

impl StaticRules {
    pub fn new(rules: HashMap<String, PricingRule>) -> Self {
        Self {
            rules: Arc::new(rules),
        }
    }
}

impl RulesProvider for StaticRules {
    fn rules(&self) -> Arc<HashMap<String, PricingRule>> {
        Arc::clone(&self.rules)
    }
}
