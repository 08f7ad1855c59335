pub mod transaction;
pub mod user;

pub use transaction::{CreateTransactionRequest, Transaction, UpdateCategoryRequest};
pub use user::{AuthToken, CreateUserRequest, LoginRequest, User};
