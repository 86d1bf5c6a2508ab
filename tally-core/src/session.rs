use crate::error::CheckoutError;
use crate::rules::PricingRule;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

/// One scanned SKU: how many units, and the pricing rule in force.
///
/// The rule is captured at scan time and refreshed on every subsequent scan
/// of the same SKU, so totaling never consults the catalog. A SKU dropped
/// from the catalog mid-session keeps pricing at the last rule it was
/// scanned under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScannedLine {
    pub count: u32,
    pub rule: PricingRule,
}

/// A single customer's in-progress scan-and-total transaction.
///
/// Pure accumulator: all I/O and locking live with the store and the
/// catalog. The session only ever grows; there is no un-scan.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckoutSession {
    id: Uuid,
    created_at: DateTime<Utc>,
    lines: HashMap<String, ScannedLine>,
}

impl CheckoutSession {
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            lines: HashMap::new(),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Total number of scanned units across all SKUs.
    pub fn item_count(&self) -> u32 {
        self.lines.values().map(|line| line.count).sum()
    }

    /// Validates `sku` against the supplied rules snapshot and adds one unit.
    ///
    /// On `UnknownSku` the session is left unchanged.
    pub fn scan(
        &mut self,
        sku: &str,
        rules: &HashMap<String, PricingRule>,
    ) -> Result<(), CheckoutError> {
        let rule = rules
            .get(sku)
            .copied()
            .ok_or_else(|| CheckoutError::UnknownSku(sku.to_string()))?;

        let line = self
            .lines
            .entry(sku.to_string())
            .or_insert(ScannedLine { count: 0, rule });
        line.count += 1;
        line.rule = rule;
        Ok(())
    }

    /// Total price of the session in the smallest currency unit.
    ///
    /// Per line: `floor(count / quantity) * offer_price + (count % quantity)
    /// * unit_price` when an offer applies, `count * unit_price` otherwise.
    /// Summation is commutative, so scan order never affects the result.
    pub fn total_price(&self) -> u64 {
        self.lines
            .values()
            .map(|line| line.rule.price_for(line.count))
            .sum()
    }
}

impl Default for CheckoutSession {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rules() -> HashMap<String, PricingRule> {
        HashMap::from([
            ("A".to_string(), PricingRule::with_offer(50, 3, 130)),
            ("B".to_string(), PricingRule::with_offer(30, 2, 45)),
            ("C".to_string(), PricingRule::unit(20)),
            ("D".to_string(), PricingRule::unit(15)),
        ])
    }

    fn scan_all(session: &mut CheckoutSession, skus: &[&str]) {
        let rules = rules();
        for sku in skus {
            session.scan(sku, &rules).unwrap();
        }
    }

    #[test]
    fn fresh_session_totals_zero() {
        let session = CheckoutSession::new();
        assert!(session.is_empty());
        assert_eq!(session.total_price(), 0);
    }

    #[test]
    fn totals_match_pricing_table() {
        let cases: &[(&[&str], u64)] = &[
            (&["A", "B", "C"], 100),
            (&["A", "A", "A"], 130),
            (&["A", "A", "A", "A"], 180),
            (&["A", "B", "A", "B", "A"], 175),
            (&["C", "B", "A", "B", "A", "A", "D"], 210),
        ];

        for (skus, expected) in cases {
            let mut session = CheckoutSession::new();
            scan_all(&mut session, skus);
            assert_eq!(session.total_price(), *expected, "scanning {skus:?}");
        }
    }

    #[test]
    fn total_is_invariant_under_scan_order() {
        let mut forward = CheckoutSession::new();
        scan_all(&mut forward, &["A", "A", "B", "C", "A", "B"]);

        let mut shuffled = CheckoutSession::new();
        scan_all(&mut shuffled, &["B", "A", "C", "B", "A", "A"]);

        assert_eq!(forward.total_price(), shuffled.total_price());
    }

    #[test]
    fn unknown_sku_leaves_session_unchanged() {
        let mut session = CheckoutSession::new();
        scan_all(&mut session, &["A"]);

        let err = session.scan("Z", &rules()).unwrap_err();
        assert_eq!(err, CheckoutError::UnknownSku("Z".to_string()));
        assert_eq!(session.item_count(), 1);
        assert_eq!(session.total_price(), 50);
    }

    #[test]
    fn rescan_reprices_line_at_current_rule() {
        let mut session = CheckoutSession::new();
        let mut rules = rules();
        session.scan("C", &rules).unwrap();

        rules.insert("C".to_string(), PricingRule::unit(25));
        session.scan("C", &rules).unwrap();

        // Last scan's rule prices the whole line.
        assert_eq!(session.total_price(), 50);
    }

    #[test]
    fn dropped_sku_keeps_captured_rule() {
        let mut session = CheckoutSession::new();
        session.scan("D", &rules()).unwrap();

        // Catalog no longer knows "D"; the total still prices it.
        assert_eq!(session.total_price(), 15);
    }

    #[test]
    fn sessions_get_distinct_ids() {
        let a = CheckoutSession::new();
        let b = CheckoutSession::new();
        assert_ne!(a.id(), b.id());
    }

    #[test]
    fn item_count_sums_across_skus() {
        let mut session = CheckoutSession::new();
        scan_all(&mut session, &["A", "B", "A"]);
        assert_eq!(session.item_count(), 3);
    }
}
