pub mod background;
pub mod config;
pub mod error;
pub mod models;
pub mod persistence;
pub mod services;
