//! Shared types for the expo voting service.

mod types;

pub use types::DocumentId;
