//! Port traits defining external boundaries.
//!
//! Each trait represents a boundary between the application core and an
//! external system. Implementations live in `src/adapters/`.

pub mod thumbnail_service;

pub use thumbnail_service::{GenerateRequest, ReplicateRequest, ThumbnailService};
