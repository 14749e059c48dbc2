//! HTTP request handlers

pub mod health;
pub mod location;
pub mod trips;
