use sqlx::postgres::PgPoolOptions;
use std::env;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing_subscriber::EnvFilter;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use transaction_tracker::app::build_router;
use transaction_tracker::handlers::transaction_handlers::CategoryUpdatedResponse;
use transaction_tracker::handlers::ErrorResponse;
use transaction_tracker::models::transaction::{
    CreateTransactionRequest, Transaction, UpdateCategoryRequest,
};
use transaction_tracker::models::user::{AuthToken, CreateUserRequest, LoginRequest, User};
use transaction_tracker::repositories::transaction_repository::PostgresTransactionRepository;
use transaction_tracker::repositories::user_repository::PostgresUserRepository;
use transaction_tracker::services::auth_service::{AuthService, AuthServiceImpl};
use transaction_tracker::services::transaction_service::{
    TransactionService, TransactionServiceImpl,
};

/// OpenAPI documentation structure
#[derive(OpenApi)]
#[openapi(
    paths(
        transaction_tracker::handlers::auth_handlers::register_handler,
        transaction_tracker::handlers::auth_handlers::login_handler,
        transaction_tracker::handlers::transaction_handlers::create_transaction_handler,
        transaction_tracker::handlers::transaction_handlers::list_transactions_handler,
        transaction_tracker::handlers::transaction_handlers::get_transaction_handler,
        transaction_tracker::handlers::transaction_handlers::update_category_handler,
    ),
    components(
        schemas(
            User,
            CreateUserRequest,
            LoginRequest,
            AuthToken,
            Transaction,
            CreateTransactionRequest,
            UpdateCategoryRequest,
            CategoryUpdatedResponse,
            ErrorResponse
        )
    ),
    tags(
        (name = "auth", description = "Authentication endpoints"),
        (name = "transactions", description = "Transaction endpoints")
    ),
    info(
        title = "Transaction Tracker API",
        version = "0.1.0",
        description = "REST API for tracking personal financial transactions",
    )
)]
struct ApiDoc;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables from .env file
    dotenv::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Get configuration from environment
    let database_url = env::var("DATABASE_URL").expect("DATABASE_URL must be set");
    let jwt_secret = env::var("JWT_SECRET").expect("JWT_SECRET must be set");
    let host = env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
    let port = env::var("PORT").unwrap_or_else(|_| "8080".to_string());

    // Create database connection pool
    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&database_url)
        .await?;

    tracing::info!("connected to database");

    // Run migrations
    sqlx::migrate!("./migrations").run(&pool).await?;
    tracing::info!("migrations completed");

    // Initialize repositories
    let user_repository = Arc::new(PostgresUserRepository::new(pool.clone()));
    let transaction_repository = Arc::new(PostgresTransactionRepository::new(pool.clone()));

    // Initialize services
    let auth_service: Arc<dyn AuthService> =
        Arc::new(AuthServiceImpl::new(user_repository, jwt_secret));
    let transaction_service: Arc<dyn TransactionService> =
        Arc::new(TransactionServiceImpl::new(transaction_repository));

    // Build router with routes, docs and global middleware
    let app = build_router(auth_service, transaction_service)
        .merge(SwaggerUi::new("/api/docs").url("/api/docs/openapi.json", ApiDoc::openapi()))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http());

    // Start server
    let addr = format!("{}:{}", host, port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("server running on http://{}", addr);
    tracing::info!("api docs at http://{}/api/docs", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
