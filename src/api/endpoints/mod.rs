//! API endpoint handlers.

pub mod auth;
pub mod chat;
pub mod demo;
pub mod health;
