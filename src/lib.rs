pub mod api;
pub mod cache;
pub mod commands;
pub mod config;
pub mod data_provider;
pub mod fixtures;
pub mod formatting;
pub mod report;
pub mod table;
pub mod tui;
pub mod types;
pub mod validation;

#[cfg(any(test, feature = "development"))]
pub mod dev;
