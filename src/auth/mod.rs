pub mod credentials;
pub mod password;
pub mod token;

pub use credentials::CredentialStore;
pub use token::{AuthError, Claims, IssuedToken, TokenService};
