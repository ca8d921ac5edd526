//! Infrastructure Layer - Strategy store implementations

pub mod http;
pub mod memory;
pub mod postgres;
