pub mod auth;
pub mod client;
pub mod config;
pub mod database;
pub mod errors;
pub mod server;
pub mod services;
pub mod storage;
