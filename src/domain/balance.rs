use serde::{Deserialize, Serialize};

use super::Cents;

/// Account balance derived from the full transaction history.
/// Never stored; recomputed on demand via SQL aggregation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Balance {
    /// Sum of all income transaction values.
    pub income: Cents,
    /// Sum of all outcome transaction values.
    pub outcome: Cents,
    /// income - outcome
    pub total: Cents,
}

impl Balance {
    pub fn new(income: Cents, outcome: Cents) -> Self {
        Self {
            income,
            outcome,
            total: income - outcome,
        }
    }

    /// Returns true if an outcome of `value_cents` would not drive the
    /// balance negative.
    pub fn covers(&self, value_cents: Cents) -> bool {
        value_cents <= self.total
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_total_is_income_minus_outcome() {
        let balance = Balance::new(10000, 3500);
        assert_eq!(balance.total, 6500);
    }

    #[test]
    fn test_covers_boundary() {
        let balance = Balance::new(10000, 0);
        assert!(balance.covers(9999));
        assert!(balance.covers(10000));
        assert!(!balance.covers(10001));
    }

    #[test]
    fn test_negative_total_covers_nothing() {
        let balance = Balance::new(0, 100);
        assert!(!balance.covers(1));
    }
}
