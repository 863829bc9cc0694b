pub mod config;
pub mod database;
pub mod entities;
pub mod errors;
pub mod models;
pub mod render;
pub mod services;
pub mod sky;
pub mod web;

pub use config::Config;
pub use errors::{AppError, AppResult};
