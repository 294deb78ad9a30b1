pub mod chat;
pub mod content;
pub mod download;
pub mod health;
pub mod help;
pub mod prediction;
pub mod presentation;

pub use health::health_check;
