pub mod init;
pub mod token;
pub mod user;
