//! Document record store for the expo voting service.
//!
//! A deliberately small document-database abstraction: named collections of
//! JSON documents with store-assigned ids, equality queries and an atomic
//! numeric increment. Backends:
//! - [`InMemoryRecordStore`] for tests and single-process deployments
//! - [`PostgresRecordStore`] backed by a JSONB table

pub mod document;
pub mod error;
pub mod memory;
pub mod postgres;
pub mod store;

pub use common::DocumentId;
pub use document::{Document, Fields};
pub use error::{RecordStoreError, Result};
pub use memory::InMemoryRecordStore;
pub use postgres::PostgresRecordStore;
pub use store::{RecordStore, RecordStoreExt};

/// Collection holding exhibit documents.
pub const EXHIBITS: &str = "exhibits";

/// Collection holding review documents.
pub const REVIEWS: &str = "reviews";
