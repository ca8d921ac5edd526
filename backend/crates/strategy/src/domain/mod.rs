//! Domain Layer - Business logic and entities
//!
//! This layer contains:
//! - Domain entities (Strategy, DailyRecord)
//! - Domain value objects (CalendarDay)
//! - Domain services (catalog normalisation)
//! - Repository traits (interfaces)

pub mod entities;
pub mod repository;
pub mod services;
pub mod value_objects;
