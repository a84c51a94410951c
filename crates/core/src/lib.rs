//! Guava Market Core - Shared types library.
//!
//! This crate provides common types used across the Guava Market components:
//! - `api` - Mobile-facing REST API server
//! - `integration-tests` - Black-box HTTP tests against the composed router
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no database access, no HTTP
//! clients. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, phone numbers, and emails

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
