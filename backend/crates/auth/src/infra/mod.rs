//! Infrastructure Layer

pub mod jwt;
