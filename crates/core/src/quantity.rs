//! Scope-item quantities and balance arithmetic.
//!
//! Every billing/progress module carries scope items with three server-side
//! quantities (scope, cumulative, certified).  The derived balance is
//! `max(0, scope - cumulative - certified)` rounded to two decimal places,
//! recomputed on every edit of the certified quantity.

use serde::{Deserialize, Serialize};

use crate::types::{EntityId, Quantity};

/// Decimal places for all displayed quantities.
pub const QTY_SCALE: u32 = 2;

/// One scope line item of an entity (work item, attendance row, etc.).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScopeItem {
    pub id: EntityId,
    pub name: String,
    pub scope_qty: Quantity,
    pub cumulative_qty: Quantity,
    #[serde(default)]
    pub certified_qty: Quantity,
}

/// Remaining balance after certification, floored at zero and rounded to
/// [`QTY_SCALE`] decimal places.
pub fn balance(scope: Quantity, cumulative: Quantity, certified: Quantity) -> Quantity {
    (scope - cumulative - certified)
        .max(Quantity::ZERO)
        .round_dp(QTY_SCALE)
}

/// The largest certified quantity an item still accepts.
pub fn certifiable_limit(scope: Quantity, cumulative: Quantity) -> Quantity {
    scope - cumulative
}

impl ScopeItem {
    /// Balance for this item's current quantities.
    pub fn balance(&self) -> Quantity {
        balance(self.scope_qty, self.cumulative_qty, self.certified_qty)
    }

    /// The largest certified quantity this item still accepts.
    pub fn certifiable_limit(&self) -> Quantity {
        certifiable_limit(self.scope_qty, self.cumulative_qty)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn qty(s: &str) -> Quantity {
        s.parse().unwrap()
    }

    #[test]
    fn test_balance_example_scenario() {
        // scope 12000, cumulative 0, certified 61 -> 11939.00
        let result = balance(qty("12000"), qty("0"), qty("61"));
        assert_eq!(result, qty("11939.00"));
    }

    #[test]
    fn test_balance_floors_at_zero() {
        let result = balance(qty("100"), qty("80"), qty("50"));
        assert_eq!(result, Quantity::ZERO);
    }

    #[test]
    fn test_balance_rounds_to_two_decimals() {
        let result = balance(qty("10"), qty("0"), qty("3.333"));
        assert_eq!(result, qty("6.67"));
    }

    #[test]
    fn test_balance_exact_zero_when_fully_certified() {
        let result = balance(qty("250.50"), qty("100.25"), qty("150.25"));
        assert_eq!(result, Quantity::ZERO);
    }

    #[test]
    fn test_certifiable_limit() {
        assert_eq!(certifiable_limit(qty("12000"), qty("500")), qty("11500"));
    }

    #[test]
    fn test_scope_item_parses_wire_fields() {
        let json = r#"{
            "id": 3,
            "name": "Excavation",
            "scopeQty": "12000",
            "cumulativeQty": "0",
            "certifiedQty": "61"
        }"#;
        let item: ScopeItem = serde_json::from_str(json).unwrap();
        assert_eq!(item.balance(), qty("11939.00"));
        assert_eq!(item.certifiable_limit(), qty("12000"));
    }

    #[test]
    fn test_scope_item_certified_defaults_to_zero() {
        let json = r#"{
            "id": 4,
            "name": "Brickwork",
            "scopeQty": "500",
            "cumulativeQty": "120.5"
        }"#;
        let item: ScopeItem = serde_json::from_str(json).unwrap();
        assert_eq!(item.certified_qty, Quantity::ZERO);
        assert_eq!(item.balance(), qty("379.50"));
    }
}
