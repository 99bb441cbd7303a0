pub mod asset;
pub mod user;

pub use asset::{Asset, AssetChanges, NewAsset};
pub use user::User;
