use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::transaction::Transaction;
use crate::repositories::RepositoryError;

/// Trait defining transaction repository operations
#[async_trait]
pub trait TransactionRepository: Send + Sync {
    /// Persist a new transaction
    async fn create(&self, transaction: Transaction) -> Result<Transaction, RepositoryError>;

    /// Find a transaction by ID
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Transaction>, RepositoryError>;

    /// Find all transactions belonging to an owner, in store-native order.
    /// Ordering is imposed client-side by the listing session, not here.
    async fn find_by_owner(&self, owner: Uuid) -> Result<Vec<Transaction>, RepositoryError>;

    /// Update only the category column of the matching transaction.
    /// Returns NotFound when no row matched the ID.
    async fn update_category(&self, id: Uuid, category: &str) -> Result<(), RepositoryError>;
}

/// PostgreSQL implementation of TransactionRepository
pub struct PostgresTransactionRepository {
    pool: PgPool,
}

impl PostgresTransactionRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TransactionRepository for PostgresTransactionRepository {
    async fn create(&self, transaction: Transaction) -> Result<Transaction, RepositoryError> {
        let result = sqlx::query_as::<_, Transaction>(
            r#"
            INSERT INTO transactions (
                id, owner, date, description, original_description,
                amount, transaction_type, category, account_name, created_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING id, owner, date, description, original_description,
                      amount, transaction_type, category, account_name, created_at
            "#,
        )
        .bind(transaction.id)
        .bind(transaction.owner)
        .bind(transaction.date)
        .bind(&transaction.description)
        .bind(&transaction.original_description)
        .bind(transaction.amount)
        .bind(&transaction.transaction_type)
        .bind(&transaction.category)
        .bind(&transaction.account_name)
        .bind(transaction.created_at)
        .fetch_one(&self.pool)
        .await;

        match result {
            Ok(transaction) => Ok(transaction),
            Err(sqlx::Error::Database(db_err)) => {
                if db_err.is_foreign_key_violation() {
                    Err(RepositoryError::ConstraintViolation(
                        "Owner does not reference a known user".to_string(),
                    ))
                } else if db_err.is_unique_violation() {
                    Err(RepositoryError::ConstraintViolation(
                        "Transaction ID already exists".to_string(),
                    ))
                } else {
                    Err(RepositoryError::DatabaseError(db_err.to_string()))
                }
            }
            Err(e) => Err(RepositoryError::DatabaseError(e.to_string())),
        }
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Transaction>, RepositoryError> {
        sqlx::query_as::<_, Transaction>(
            r#"
            SELECT id, owner, date, description, original_description,
                   amount, transaction_type, category, account_name, created_at
            FROM transactions
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| RepositoryError::DatabaseError(e.to_string()))
    }

    async fn find_by_owner(&self, owner: Uuid) -> Result<Vec<Transaction>, RepositoryError> {
        sqlx::query_as::<_, Transaction>(
            r#"
            SELECT id, owner, date, description, original_description,
                   amount, transaction_type, category, account_name, created_at
            FROM transactions
            WHERE owner = $1
            "#,
        )
        .bind(owner)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| RepositoryError::DatabaseError(e.to_string()))
    }

    async fn update_category(&self, id: Uuid, category: &str) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            r#"
            UPDATE transactions
            SET category = $2
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(category)
        .execute(&self.pool)
        .await;

        match result {
            Ok(query_result) => {
                if query_result.rows_affected() == 0 {
                    Err(RepositoryError::NotFound)
                } else {
                    Ok(())
                }
            }
            Err(e) => Err(RepositoryError::DatabaseError(e.to_string())),
        }
    }
}
