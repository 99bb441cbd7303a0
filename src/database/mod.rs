pub mod assets;
pub mod manager;
pub mod models;
pub mod seed;

pub use assets::AssetStore;
pub use manager::{DatabaseError, DatabaseManager};
pub use models::{Asset, AssetChanges, NewAsset, User};
