//! HTTP request handlers, grouped by concern.

pub mod auth;
pub mod health;
pub mod planner;
pub mod trips;
