pub mod api;
pub mod auth;
pub mod cli;
pub mod config;
pub mod database;
pub mod error;
pub mod handlers;
pub mod logging;
pub mod middleware;
pub mod server;

#[cfg(test)]
pub mod testing;

pub use server::{app, serve, AppState};
