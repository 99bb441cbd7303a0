// Endpoints reachable without a bearer token

pub mod health;
pub mod token;

pub use health::{health, method_not_allowed, not_found, root};
pub use token::issue_token;
