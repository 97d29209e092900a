mod auth;
mod error_handler;

pub use auth::{PUBLIC_PATH_PREFIXES, auth_middleware, is_public_path};
pub use error_handler::log_errors;
