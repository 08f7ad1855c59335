use axum::{
    middleware,
    routing::{get, patch, post},
    Router,
};
use std::sync::Arc;

use crate::handlers::auth_handlers::{login_handler, register_handler};
use crate::handlers::transaction_handlers::{
    create_transaction_handler, get_transaction_handler, list_transactions_handler,
    update_category_handler,
};
use crate::middleware::auth_middleware::auth_middleware;
use crate::services::auth_service::AuthService;
use crate::services::transaction_service::TransactionService;

/// Assemble the application router.
///
/// Shared between `main` and the integration tests so both wire the exact
/// same routes and middleware; only the service implementations differ.
pub fn build_router(
    auth_service: Arc<dyn AuthService>,
    transaction_service: Arc<dyn TransactionService>,
) -> Router {
    let transaction_routes = Router::new()
        .route(
            "/api/transactions",
            post(create_transaction_handler).get(list_transactions_handler),
        )
        .route("/api/transactions/:id", get(get_transaction_handler))
        .route(
            "/api/transactions/:id/category",
            patch(update_category_handler),
        )
        .layer(middleware::from_fn_with_state(
            auth_service.clone(),
            auth_middleware,
        ))
        .with_state(transaction_service);

    Router::new()
        .route("/health", get(health_check))
        .route("/api/auth/register", post(register_handler))
        .route("/api/auth/login", post(login_handler))
        .with_state(auth_service)
        .merge(transaction_routes)
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "OK"
}
