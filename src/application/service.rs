use std::collections::{HashMap, HashSet};

use tracing::debug;

use crate::domain::{
    Balance, Category, CategoryId, Cents, Transaction, TransactionDraft, TransactionKind,
};
use crate::storage::Repository;

use super::AppError;

/// Application service providing high-level operations for the tracker.
/// This is the primary interface for any client (CLI, tests, etc.).
pub struct TrackerService {
    repo: Repository,
}

/// Result of creating a transaction
#[derive(Debug)]
pub struct TransactionResult {
    pub transaction: Transaction,
    pub category: Category,
}

impl TrackerService {
    /// Create a new tracker service with the given repository.
    pub fn new(repo: Repository) -> Self {
        Self { repo }
    }

    /// Initialize a new database at the given path.
    pub async fn init(database_path: &str) -> Result<Self, AppError> {
        let db_url = format!("sqlite:{}?mode=rwc", database_path);
        let repo = Repository::init(&db_url).await?;
        Ok(Self::new(repo))
    }

    /// Connect to an existing database.
    pub async fn connect(database_path: &str) -> Result<Self, AppError> {
        let db_url = format!("sqlite:{}", database_path);
        let repo = Repository::connect(&db_url).await?;
        Ok(Self::new(repo))
    }

    // ========================
    // Transaction operations
    // ========================

    /// Record a new transaction, creating its category on first use.
    ///
    /// An outcome transaction is rejected when its value exceeds the current
    /// total balance. The balance is read before the insert and there is no
    /// cross-statement locking, so two concurrent calls can both pass the
    /// check; single-writer usage is assumed. The category lookup has the
    /// same shape: the category may already be persisted when the balance
    /// check rejects the transaction.
    pub async fn create_transaction(
        &self,
        title: String,
        kind: TransactionKind,
        value_cents: Cents,
        category_title: String,
    ) -> Result<TransactionResult, AppError> {
        if value_cents <= 0 {
            return Err(AppError::InvalidValue("Value must be positive".to_string()));
        }

        let category = match self.repo.get_category_by_title(&category_title).await? {
            Some(existing) => existing,
            None => {
                let category = Category::new(category_title);
                self.repo.save_category(&category).await?;
                category
            }
        };
        debug!(category = %category.title, "resolved transaction category");

        let balance = self.repo.get_balance().await?;
        if kind == TransactionKind::Outcome && !balance.covers(value_cents) {
            return Err(AppError::InsufficientBalance {
                balance: balance.total,
                requested: value_cents,
            });
        }

        let mut transaction = Transaction::new(title, kind, value_cents, category.id);
        debug!(
            id = %transaction.id,
            kind = %transaction.kind,
            value = transaction.value_cents,
            "recording transaction"
        );
        self.repo.save_transaction(&mut transaction).await?;

        Ok(TransactionResult {
            transaction,
            category,
        })
    }

    /// Persist a batch of parsed transactions, resolving categories in bulk:
    /// one lookup covering every referenced title, one write for the titles
    /// that don't exist yet, one write for the transactions themselves.
    /// Returns the persisted transactions in input order.
    ///
    /// No balance check is applied here; imports are backfill of history
    /// that has already happened.
    pub async fn import_drafts(
        &self,
        drafts: Vec<TransactionDraft>,
    ) -> Result<Vec<Transaction>, AppError> {
        if drafts.is_empty() {
            return Ok(Vec::new());
        }

        // Referenced titles, deduplicated in first-seen order.
        let mut seen = HashSet::new();
        let referenced: Vec<&str> = drafts
            .iter()
            .map(|draft| draft.category_title.as_str())
            .filter(|title| seen.insert(*title))
            .collect();

        let existing = self.repo.list_categories_by_titles(&referenced).await?;
        let existing_titles: HashSet<&str> = existing
            .iter()
            .map(|category| category.title.as_str())
            .collect();

        let new_categories: Vec<Category> = referenced
            .iter()
            .filter(|title| !existing_titles.contains(*title))
            .map(|title| Category::new(*title))
            .collect();
        self.repo.save_categories(&new_categories).await?;
        debug!(
            existing = existing.len(),
            created = new_categories.len(),
            "resolved import categories"
        );

        let mut categories_by_title: HashMap<&str, CategoryId> = HashMap::new();
        for category in new_categories.iter().chain(existing.iter()) {
            categories_by_title
                .entry(category.title.as_str())
                .or_insert(category.id);
        }

        let mut transactions = Vec::with_capacity(drafts.len());
        for draft in &drafts {
            let category_id = categories_by_title
                .get(draft.category_title.as_str())
                .copied()
                .ok_or_else(|| {
                    anyhow::anyhow!("Category missing after resolution: {}", draft.category_title)
                })?;
            transactions.push(Transaction::new(
                draft.title.clone(),
                draft.kind,
                draft.value_cents,
                category_id,
            ));
        }

        self.repo.save_transactions(&mut transactions).await?;
        Ok(transactions)
    }

    /// List all transactions in insertion order.
    pub async fn list_transactions(&self) -> Result<Vec<Transaction>, AppError> {
        Ok(self.repo.list_transactions().await?)
    }

    // ========================
    // Balance and categories
    // ========================

    /// Current account balance (sum of incomes minus sum of outcomes).
    pub async fn get_balance(&self) -> Result<Balance, AppError> {
        Ok(self.repo.get_balance().await?)
    }

    /// List all categories.
    pub async fn list_categories(&self) -> Result<Vec<Category>, AppError> {
        Ok(self.repo.list_categories().await?)
    }

    /// Get a map of category IDs to titles (useful for display).
    pub async fn get_category_titles(&self) -> Result<HashMap<CategoryId, String>, AppError> {
        let categories = self.repo.list_categories().await?;
        Ok(categories.into_iter().map(|c| (c.id, c.title)).collect())
    }
}
