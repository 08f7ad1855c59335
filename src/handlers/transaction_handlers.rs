use axum::{
    extract::{Extension, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::handlers::ErrorResponse;
use crate::middleware::auth_middleware::AuthenticatedUser;
use crate::models::transaction::{CreateTransactionRequest, Transaction, UpdateCategoryRequest};
use crate::services::transaction_service::{TransactionError, TransactionService};
use crate::validation::describe_validation_errors;

/// Confirmation returned by the category update endpoint
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[schema(example = json!({ "message": "Updated category to \"Travel\"" }))]
pub struct CategoryUpdatedResponse {
    pub message: String,
}

/// Convert TransactionError to HTTP response
impl IntoResponse for TransactionError {
    fn into_response(self) -> Response {
        let (status, error_type, message) = match self {
            TransactionError::MissingInformation => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "validation_error",
                "Please enter all information".to_string(),
            ),
            TransactionError::InvalidOwnerId => (
                StatusCode::BAD_REQUEST,
                "invalid_user_id",
                "Invalid userId".to_string(),
            ),
            TransactionError::TransactionNotFound => (
                StatusCode::NOT_FOUND,
                "transaction_not_found",
                "Transaction not found".to_string(),
            ),
            TransactionError::DatabaseError(msg) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "database_error", msg)
            }
        };

        let error_response = ErrorResponse::new(error_type, &message);
        (status, Json(error_response)).into_response()
    }
}

/// Handler for creating a transaction
///
/// Creates a new transaction owned by the authenticated user. The owner is
/// always taken from the caller identity; any owner value in the payload is
/// ignored.
#[utoipa::path(
    post,
    path = "/api/transactions",
    request_body = CreateTransactionRequest,
    responses(
        (status = 201, description = "Transaction successfully created", body = Transaction),
        (status = 400, description = "Malformed caller identity", body = ErrorResponse),
        (status = 422, description = "Missing required information", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "transactions"
)]
pub async fn create_transaction_handler(
    State(transaction_service): State<Arc<dyn TransactionService>>,
    Extension(auth_user): Extension<AuthenticatedUser>,
    Json(request): Json<CreateTransactionRequest>,
) -> Result<(StatusCode, Json<Transaction>), Response> {
    // Validate request body
    if let Err(validation_errors) = request.validate() {
        let error_response = ErrorResponse::new(
            "validation_error",
            &describe_validation_errors(&validation_errors),
        );
        return Err((StatusCode::UNPROCESSABLE_ENTITY, Json(error_response)).into_response());
    }

    // Call transaction service to create the record
    match transaction_service
        .create_transaction(&auth_user.user_id, request)
        .await
    {
        Ok(transaction) => Ok((StatusCode::CREATED, Json(transaction))),
        Err(e) => Err(e.into_response()),
    }
}

/// Handler for listing the caller's transactions
///
/// Retrieves all transactions owned by the authenticated user. Ordering,
/// filtering and pagination happen client-side over the returned set.
#[utoipa::path(
    get,
    path = "/api/transactions",
    responses(
        (status = 200, description = "List of the caller's transactions", body = Vec<Transaction>),
        (status = 400, description = "Malformed caller identity", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "transactions"
)]
pub async fn list_transactions_handler(
    State(transaction_service): State<Arc<dyn TransactionService>>,
    Extension(auth_user): Extension<AuthenticatedUser>,
) -> Result<Json<Vec<Transaction>>, Response> {
    match transaction_service
        .get_user_transactions(&auth_user.user_id)
        .await
    {
        Ok(transactions) => Ok(Json(transactions)),
        Err(e) => Err(e.into_response()),
    }
}

/// Handler for fetching a single transaction by ID
#[utoipa::path(
    get,
    path = "/api/transactions/{id}",
    params(
        ("id" = Uuid, Path, description = "Transaction ID")
    ),
    responses(
        (status = 200, description = "The transaction", body = Transaction),
        (status = 404, description = "Transaction not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "transactions"
)]
pub async fn get_transaction_handler(
    State(transaction_service): State<Arc<dyn TransactionService>>,
    Path(transaction_id): Path<Uuid>,
) -> Result<Json<Transaction>, Response> {
    match transaction_service.get_transaction(transaction_id).await {
        Ok(Some(transaction)) => Ok(Json(transaction)),
        Ok(None) => Err(TransactionError::TransactionNotFound.into_response()),
        Err(e) => Err(e.into_response()),
    }
}

/// Handler for the targeted category update
///
/// Updates only the category field of the matching transaction and echoes the
/// new value in a confirmation message.
#[utoipa::path(
    patch,
    path = "/api/transactions/{id}/category",
    params(
        ("id" = Uuid, Path, description = "Transaction ID")
    ),
    request_body = UpdateCategoryRequest,
    responses(
        (status = 200, description = "Category updated", body = CategoryUpdatedResponse),
        (status = 404, description = "Transaction not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "transactions"
)]
pub async fn update_category_handler(
    State(transaction_service): State<Arc<dyn TransactionService>>,
    Path(transaction_id): Path<Uuid>,
    Json(request): Json<UpdateCategoryRequest>,
) -> Result<Json<CategoryUpdatedResponse>, Response> {
    match transaction_service
        .update_transaction_category(transaction_id, &request.category)
        .await
    {
        Ok(()) => Ok(Json(CategoryUpdatedResponse {
            message: format!("Updated category to \"{}\"", request.category),
        })),
        Err(e) => Err(e.into_response()),
    }
}
