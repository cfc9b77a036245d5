use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use sqlx::{Row, SqlitePool};
use uuid::Uuid;

use crate::domain::{Balance, Category, Transaction, TransactionKind};

use super::MIGRATION_001_INITIAL;

// SQLite's default bind-variable limit is 999 per statement; batches stay
// well below it.
const MAX_BATCH_ROWS: usize = 100;
const MAX_IN_BINDS: usize = 500;

/// Repository for persisting and querying transactions and categories.
pub struct Repository {
    pool: SqlitePool,
}

impl Repository {
    /// Create a new repository with the given SQLite connection pool.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Connect to a SQLite database at the given path.
    /// Creates the database file if it doesn't exist.
    pub async fn connect(database_url: &str) -> Result<Self> {
        let pool = SqlitePool::connect(database_url)
            .await
            .context("Failed to connect to database")?;
        Ok(Self::new(pool))
    }

    /// Run database migrations.
    pub async fn migrate(&self) -> Result<()> {
        sqlx::query(MIGRATION_001_INITIAL)
            .execute(&self.pool)
            .await
            .context("Failed to run migration 001")?;

        Ok(())
    }

    /// Initialize a new database (connect + migrate).
    pub async fn init(database_url: &str) -> Result<Self> {
        let repo = Self::connect(database_url).await?;
        repo.migrate().await?;
        Ok(repo)
    }

    // ========================
    // Category operations
    // ========================

    /// Save a new category to the database.
    pub async fn save_category(&self, category: &Category) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO categories (id, title, created_at)
            VALUES (?, ?, ?)
            "#,
        )
        .bind(category.id.to_string())
        .bind(&category.title)
        .bind(category.created_at.to_rfc3339())
        .execute(&self.pool)
        .await
        .context("Failed to save category")?;
        Ok(())
    }

    /// Save a batch of new categories in one write per chunk.
    pub async fn save_categories(&self, categories: &[Category]) -> Result<()> {
        for chunk in categories.chunks(MAX_BATCH_ROWS) {
            let mut sql = String::from("INSERT INTO categories (id, title, created_at) VALUES ");
            sql.push_str(&vec!["(?, ?, ?)"; chunk.len()].join(", "));

            let mut query = sqlx::query(&sql);
            for category in chunk {
                query = query
                    .bind(category.id.to_string())
                    .bind(&category.title)
                    .bind(category.created_at.to_rfc3339());
            }

            query
                .execute(&self.pool)
                .await
                .context("Failed to bulk-save categories")?;
        }
        Ok(())
    }

    /// Get a category by exact title match.
    pub async fn get_category_by_title(&self, title: &str) -> Result<Option<Category>> {
        let row = sqlx::query(
            r#"
            SELECT id, title, created_at
            FROM categories
            WHERE title = ?
            "#,
        )
        .bind(title)
        .fetch_optional(&self.pool)
        .await
        .context("Failed to fetch category by title")?;

        match row {
            Some(row) => Ok(Some(Self::row_to_category(&row)?)),
            None => Ok(None),
        }
    }

    /// Get all categories whose title is in the given set.
    pub async fn list_categories_by_titles(&self, titles: &[&str]) -> Result<Vec<Category>> {
        let mut categories = Vec::new();

        for chunk in titles.chunks(MAX_IN_BINDS) {
            let placeholders = vec!["?"; chunk.len()].join(", ");
            let sql = format!(
                "SELECT id, title, created_at FROM categories WHERE title IN ({placeholders})"
            );

            let mut query = sqlx::query(&sql);
            for title in chunk {
                query = query.bind(*title);
            }

            let rows = query
                .fetch_all(&self.pool)
                .await
                .context("Failed to fetch categories by titles")?;

            for row in rows.iter() {
                categories.push(Self::row_to_category(row)?);
            }
        }

        Ok(categories)
    }

    /// List all categories, ordered by title.
    pub async fn list_categories(&self) -> Result<Vec<Category>> {
        let rows = sqlx::query(
            r#"
            SELECT id, title, created_at
            FROM categories
            ORDER BY title
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .context("Failed to list categories")?;

        rows.iter().map(Self::row_to_category).collect()
    }

    fn row_to_category(row: &sqlx::sqlite::SqliteRow) -> Result<Category> {
        let id_str: String = row.get("id");
        let created_at_str: String = row.get("created_at");

        Ok(Category {
            id: Uuid::parse_str(&id_str).context("Invalid category ID")?,
            title: row.get("title"),
            created_at: DateTime::parse_from_rfc3339(&created_at_str)
                .context("Invalid created_at timestamp")?
                .with_timezone(&Utc),
        })
    }

    // ========================
    // Transaction operations
    // ========================

    /// Save a new transaction to the database.
    /// Automatically assigns the next sequence number.
    pub async fn save_transaction(&self, transaction: &mut Transaction) -> Result<()> {
        transaction.sequence = self.reserve_sequences(1).await?;

        sqlx::query(
            r#"
            INSERT INTO transactions (id, sequence, title, kind, value_cents, category_id, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(transaction.id.to_string())
        .bind(transaction.sequence)
        .bind(&transaction.title)
        .bind(transaction.kind.as_str())
        .bind(transaction.value_cents)
        .bind(transaction.category_id.to_string())
        .bind(transaction.created_at.to_rfc3339())
        .execute(&self.pool)
        .await
        .context("Failed to save transaction")?;

        Ok(())
    }

    /// Save a batch of new transactions, preserving slice order.
    /// Sequence numbers are reserved as one contiguous block so the
    /// insertion order survives into listings.
    pub async fn save_transactions(&self, transactions: &mut [Transaction]) -> Result<()> {
        if transactions.is_empty() {
            return Ok(());
        }

        let first = self.reserve_sequences(transactions.len() as i64).await?;
        for (offset, transaction) in transactions.iter_mut().enumerate() {
            transaction.sequence = first + offset as i64;
        }

        for chunk in transactions.chunks(MAX_BATCH_ROWS) {
            let mut sql = String::from(
                "INSERT INTO transactions (id, sequence, title, kind, value_cents, category_id, created_at) VALUES ",
            );
            sql.push_str(&vec!["(?, ?, ?, ?, ?, ?, ?)"; chunk.len()].join(", "));

            let mut query = sqlx::query(&sql);
            for transaction in chunk.iter() {
                query = query
                    .bind(transaction.id.to_string())
                    .bind(transaction.sequence)
                    .bind(&transaction.title)
                    .bind(transaction.kind.as_str())
                    .bind(transaction.value_cents)
                    .bind(transaction.category_id.to_string())
                    .bind(transaction.created_at.to_rfc3339());
            }

            query
                .execute(&self.pool)
                .await
                .context("Failed to bulk-save transactions")?;
        }

        Ok(())
    }

    /// Reserve a contiguous block of sequence numbers, returning the first.
    async fn reserve_sequences(&self, count: i64) -> Result<i64> {
        let row = sqlx::query(
            r#"
            UPDATE sequence_counter
            SET value = value + ?
            WHERE name = 'transaction_sequence'
            RETURNING value
            "#,
        )
        .bind(count)
        .fetch_one(&self.pool)
        .await
        .context("Failed to reserve sequence numbers")?;

        let last: i64 = row.get("value");
        Ok(last - count + 1)
    }

    /// List all transactions, ordered by sequence number.
    pub async fn list_transactions(&self) -> Result<Vec<Transaction>> {
        let rows = sqlx::query(
            r#"
            SELECT id, sequence, title, kind, value_cents, category_id, created_at
            FROM transactions
            ORDER BY sequence
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .context("Failed to list transactions")?;

        rows.iter().map(Self::row_to_transaction).collect()
    }

    /// Compute the account balance using SQL aggregation.
    /// This is more efficient than loading all transactions and summing in
    /// memory.
    pub async fn get_balance(&self) -> Result<Balance> {
        let row = sqlx::query(
            r#"
            SELECT
                COALESCE(SUM(CASE WHEN kind = 'income' THEN value_cents ELSE 0 END), 0) as income,
                COALESCE(SUM(CASE WHEN kind = 'outcome' THEN value_cents ELSE 0 END), 0) as outcome
            FROM transactions
            "#,
        )
        .fetch_one(&self.pool)
        .await
        .context("Failed to compute balance")?;

        Ok(Balance::new(row.get("income"), row.get("outcome")))
    }

    fn row_to_transaction(row: &sqlx::sqlite::SqliteRow) -> Result<Transaction> {
        let id_str: String = row.get("id");
        let kind_str: String = row.get("kind");
        let category_id_str: String = row.get("category_id");
        let created_at_str: String = row.get("created_at");

        Ok(Transaction {
            id: Uuid::parse_str(&id_str).context("Invalid transaction ID")?,
            sequence: row.get("sequence"),
            title: row.get("title"),
            kind: TransactionKind::from_str(&kind_str)
                .ok_or_else(|| anyhow::anyhow!("Invalid transaction kind: {}", kind_str))?,
            value_cents: row.get("value_cents"),
            category_id: Uuid::parse_str(&category_id_str).context("Invalid category ID")?,
            created_at: DateTime::parse_from_rfc3339(&created_at_str)
                .context("Invalid created_at timestamp")?
                .with_timezone(&Utc),
        })
    }
}
