pub mod api;
pub mod auth;
pub mod config;
pub mod core;
pub mod infrastructure;

pub use crate::api::{AppState, app};
pub use crate::core::errors::TodoError;

#[cfg(test)]
mod tests;
