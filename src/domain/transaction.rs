use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use super::{CategoryId, Cents};

pub type TransactionId = Uuid;

/// Direction of a transaction: money entering (income) or leaving (outcome)
/// the account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    Income,
    Outcome,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown transaction kind: {0:?} (expected \"income\" or \"outcome\")")]
pub struct UnknownKindError(pub String);

impl TransactionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionKind::Income => "income",
            TransactionKind::Outcome => "outcome",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "income" => Some(TransactionKind::Income),
            "outcome" => Some(TransactionKind::Outcome),
            _ => None,
        }
    }
}

impl std::fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for TransactionKind {
    type Err = UnknownKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TransactionKind::from_str(s).ok_or_else(|| UnknownKindError(s.to_string()))
    }
}

/// A single recorded movement of money. Transactions are immutable once
/// persisted; there is no update or delete path.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    pub id: TransactionId,
    /// Monotonically increasing insertion counter for ordering.
    /// Assigned by the repository on save.
    pub sequence: i64,
    pub title: String,
    pub kind: TransactionKind,
    /// Amount in cents (always positive; direction comes from `kind`).
    pub value_cents: Cents,
    pub category_id: CategoryId,
    pub created_at: DateTime<Utc>,
}

impl Transaction {
    /// Create a new transaction. Sequence number must be assigned by the
    /// repository.
    pub fn new(
        title: impl Into<String>,
        kind: TransactionKind,
        value_cents: Cents,
        category_id: CategoryId,
    ) -> Self {
        assert!(value_cents > 0, "Transaction value must be positive");
        Self {
            id: Uuid::new_v4(),
            sequence: 0, // Will be set by repository
            title: title.into(),
            kind,
            value_cents,
            category_id,
            created_at: Utc::now(),
        }
    }
}

/// A parsed-but-unpersisted transaction read from an import file.
/// The category is still a bare title here; resolution to a `CategoryId`
/// happens during import, after existing categories have been looked up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionDraft {
    pub title: String,
    pub kind: TransactionKind,
    pub value_cents: Cents,
    pub category_title: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_roundtrip() {
        for kind in [TransactionKind::Income, TransactionKind::Outcome] {
            let s = kind.as_str();
            assert_eq!(TransactionKind::from_str(s), Some(kind));
        }
    }

    #[test]
    fn test_kind_parse_is_case_insensitive() {
        assert_eq!(
            "INCOME".parse::<TransactionKind>().ok(),
            Some(TransactionKind::Income)
        );
        assert!("transfer".parse::<TransactionKind>().is_err());
    }

    #[test]
    fn test_create_transaction() {
        let category = Uuid::new_v4();
        let transaction = Transaction::new("Rent", TransactionKind::Outcome, 120000, category);

        assert_eq!(transaction.title, "Rent");
        assert_eq!(transaction.kind, TransactionKind::Outcome);
        assert_eq!(transaction.value_cents, 120000);
        assert_eq!(transaction.category_id, category);
        assert_eq!(transaction.sequence, 0);
    }

    #[test]
    #[should_panic(expected = "Transaction value must be positive")]
    fn test_transaction_requires_positive_value() {
        Transaction::new("Nothing", TransactionKind::Income, 0, Uuid::new_v4());
    }
}
