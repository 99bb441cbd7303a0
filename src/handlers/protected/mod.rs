// Endpoints behind jwt_auth_middleware; each handler receives the verified
// AuthUser as an explicit Extension parameter.

pub mod assets;

pub use assets::{create_asset, get_asset, list_assets, update_asset};
