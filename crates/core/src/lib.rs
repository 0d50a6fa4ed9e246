//! `midplat-core` — shared building blocks of the marketing console.
//!
//! Identifiers and the domain error live here so that the auth and console
//! crates agree on them without depending on each other.

pub mod entity;
pub mod error;
pub mod id;

pub use entity::Entity;
pub use error::DomainError;
pub use id::{BrandId, DistributorId, MenuId, UserId};
