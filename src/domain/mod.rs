//! Domain layer types and invariants.

pub mod entities;
pub mod locale;
pub mod metadata;
pub mod slug;
pub mod types;
