//! Platform Crate - Technical Infrastructure
//!
//! This crate provides shared technical foundations:
//! - Request helpers (bearer token, client IP)
//! - Environment configuration helpers
//! - Durable key/value storage (the client's "local storage")
//! - A single injectable time source

pub mod client;
pub mod clock;
pub mod config;
pub mod storage;
