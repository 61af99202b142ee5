pub mod auth;
pub mod bootstrap;
pub mod config;
pub mod database;
pub mod handlers;
pub mod router;
pub mod state;
pub mod utils;
