pub mod auth;
pub mod config;
pub mod engine;
pub mod entities;
pub mod error;
pub mod graphql;
pub mod notifier;
pub mod services;
