pub mod auth;
pub mod recover;
pub mod request_log;

pub use auth::{jwt_auth_middleware, AuthUser};
pub use recover::panic_response;
pub use request_log::request_log_middleware;
