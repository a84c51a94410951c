//! Guava Market API library.
//!
//! This crate provides the REST API as a library,
//! allowing it to be tested and reused.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod clock;
pub mod config;
pub mod error;
pub mod extract;
pub mod firebase;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod state;
pub mod store;
pub mod testing;
