//! Storage abstractions for ingested ARGO profiles.
//!
//! Provides unified interfaces for:
//! - The relational profile store ([`ProfileStore`]), PostgreSQL in production
//! - The text-search index over profile summaries ([`SearchIndex`])
//! - In-memory implementations of both, for tests and dry runs

pub mod catalog;
pub mod error;
pub mod memory;
pub mod search;

pub use catalog::{DuplicateGroup, PgProfileStore, ProfileStore, StoredProfile};
pub use error::{PersistenceError, PersistenceResult};
pub use memory::{MemoryProfileStore, MemorySearchIndex};
pub use search::{PgSearchIndex, SearchDocument, SearchHit, SearchIndex};
