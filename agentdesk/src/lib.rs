pub mod api;
pub mod artifacts;
pub mod config;
pub mod error;
pub mod llm;
pub mod models;
pub mod render;
pub mod services;
