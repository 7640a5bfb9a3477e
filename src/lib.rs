//! Civic Desk
//!
//! Client-side core of the office-management dashboard: the persisted
//! session, the route guard, cached data-access hooks over the REST backend
//! and the report export trigger.

pub mod api;
pub mod cache;
pub mod config;
pub mod errors;
pub mod export;
pub mod filters;
pub mod guard;
pub mod hooks;
pub mod messages;
pub mod models;
pub mod portal;
pub mod session;
pub mod storage;
pub mod toast;

pub use config::Config;
pub use errors::{PortalError, PortalResult};
pub use portal::Portal;

#[cfg(test)]
mod tests;
