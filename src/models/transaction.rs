use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::validation::{validate_nonzero_amount, validate_required_text};

/// Transaction entity representing a single financial transaction
///
/// Wire field names are camelCase to match the JSON payloads the frontend
/// consumes. `owner` is always derived from the authenticated caller and
/// `original_description` is never mutated after creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: Uuid,
    pub date: NaiveDate,
    pub description: String,
    pub original_description: String,
    pub amount: Decimal,
    pub transaction_type: String,
    /// Mutable classification; the only field that changes after creation
    pub category: String,
    pub account_name: String,
    pub owner: Uuid,
    pub created_at: DateTime<Utc>,
}

/// Request payload for creating a new transaction
///
/// The owner is intentionally absent: it is taken from the authenticated
/// caller, and an `owner` key in the request body is ignored.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
#[schema(example = json!({
    "date": "2024-01-15",
    "description": "Grocery Store",
    "originalDescription": "GROCERY STORE #1042 SEATTLE WA",
    "amount": -42.50,
    "transactionType": "debit",
    "category": "Food & Dining",
    "accountName": "Everyday Checking"
}))]
pub struct CreateTransactionRequest {
    #[schema(format = "date", example = "2024-01-15")]
    pub date: NaiveDate,

    #[validate(custom(function = "validate_required_text"))]
    #[schema(example = "Grocery Store")]
    pub description: String,

    #[validate(custom(function = "validate_required_text"))]
    #[schema(example = "GROCERY STORE #1042 SEATTLE WA")]
    pub original_description: String,

    /// Signed amount; negative values are debits. Zero is rejected.
    #[validate(custom(function = "validate_nonzero_amount"))]
    #[schema(example = json!(-42.50))]
    pub amount: Decimal,

    #[validate(custom(function = "validate_required_text"))]
    #[schema(example = "debit")]
    pub transaction_type: String,

    #[validate(custom(function = "validate_required_text"))]
    #[schema(example = "Food & Dining")]
    pub category: String,

    #[validate(custom(function = "validate_required_text"))]
    #[schema(example = "Everyday Checking")]
    pub account_name: String,
}

/// Request payload for the targeted category update
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[schema(example = json!({ "category": "Travel" }))]
pub struct UpdateCategoryRequest {
    pub category: String,
}
