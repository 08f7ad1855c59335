use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

use crate::models::transaction::{CreateTransactionRequest, Transaction};
use crate::repositories::transaction_repository::TransactionRepository;
use crate::repositories::RepositoryError;

/// Transaction service errors
#[derive(Debug, thiserror::Error)]
pub enum TransactionError {
    #[error("Please enter all information")]
    MissingInformation,

    #[error("Invalid userId")]
    InvalidOwnerId,

    #[error("Transaction not found")]
    TransactionNotFound,

    #[error("Database error: {0}")]
    DatabaseError(String),
}

/// Trait defining transaction service operations
///
/// The owner identity is accepted as the raw authenticated subject string and
/// validated here, before any repository access.
#[async_trait]
pub trait TransactionService: Send + Sync {
    /// Create a new transaction owned by the authenticated caller
    async fn create_transaction(
        &self,
        owner: &str,
        request: CreateTransactionRequest,
    ) -> Result<Transaction, TransactionError>;

    /// Look up a single transaction by ID
    async fn get_transaction(
        &self,
        transaction_id: Uuid,
    ) -> Result<Option<Transaction>, TransactionError>;

    /// Get all transactions owned by the caller, in store-native order
    async fn get_user_transactions(
        &self,
        owner: &str,
    ) -> Result<Vec<Transaction>, TransactionError>;

    /// Update only the category field of an existing transaction
    async fn update_transaction_category(
        &self,
        transaction_id: Uuid,
        category: &str,
    ) -> Result<(), TransactionError>;
}

/// Implementation of TransactionService
pub struct TransactionServiceImpl {
    transaction_repository: Arc<dyn TransactionRepository>,
}

impl TransactionServiceImpl {
    pub fn new(transaction_repository: Arc<dyn TransactionRepository>) -> Self {
        Self {
            transaction_repository,
        }
    }
}

fn map_repository_error(error: RepositoryError) -> TransactionError {
    match error {
        RepositoryError::NotFound => TransactionError::TransactionNotFound,
        RepositoryError::DatabaseError(msg) => TransactionError::DatabaseError(msg),
        RepositoryError::ConstraintViolation(msg) => TransactionError::DatabaseError(msg),
    }
}

#[async_trait]
impl TransactionService for TransactionServiceImpl {
    async fn create_transaction(
        &self,
        owner: &str,
        request: CreateTransactionRequest,
    ) -> Result<Transaction, TransactionError> {
        // All-or-nothing: every required field must carry a value before
        // anything is written. Amount is signed, so only zero counts as empty.
        let missing_field = request.description.trim().is_empty()
            || request.original_description.trim().is_empty()
            || request.transaction_type.trim().is_empty()
            || request.category.trim().is_empty()
            || request.account_name.trim().is_empty()
            || request.amount.is_zero();
        if missing_field {
            return Err(TransactionError::MissingInformation);
        }

        // Owner always comes from the authenticated caller, never the payload
        let owner = Uuid::parse_str(owner).map_err(|_| TransactionError::InvalidOwnerId)?;

        let transaction = Transaction {
            id: Uuid::new_v4(),
            date: request.date,
            description: request.description,
            original_description: request.original_description,
            amount: request.amount,
            transaction_type: request.transaction_type,
            category: request.category,
            account_name: request.account_name,
            owner,
            created_at: chrono::Utc::now(),
        };

        self.transaction_repository
            .create(transaction)
            .await
            .map_err(map_repository_error)
    }

    async fn get_transaction(
        &self,
        transaction_id: Uuid,
    ) -> Result<Option<Transaction>, TransactionError> {
        self.transaction_repository
            .find_by_id(transaction_id)
            .await
            .map_err(map_repository_error)
    }

    async fn get_user_transactions(
        &self,
        owner: &str,
    ) -> Result<Vec<Transaction>, TransactionError> {
        // A malformed identity never reaches the store
        let owner = Uuid::parse_str(owner).map_err(|_| TransactionError::InvalidOwnerId)?;

        self.transaction_repository
            .find_by_owner(owner)
            .await
            .map_err(map_repository_error)
    }

    async fn update_transaction_category(
        &self,
        transaction_id: Uuid,
        category: &str,
    ) -> Result<(), TransactionError> {
        self.transaction_repository
            .update_category(transaction_id, category)
            .await
            .map_err(map_repository_error)
    }
}
