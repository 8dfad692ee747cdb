pub mod accounts;
pub mod api;
pub mod config;
pub mod error;
pub mod farming;
pub mod utils;
