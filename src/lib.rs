pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod report;
pub mod services;
pub mod state;
