#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![cfg_attr(not(test), deny(clippy::expect_used))]

//! Core types and traits for declarative HTML-to-record extraction
//!
//! This crate provides the foundational abstractions used by the htmlstruct
//! builders, independent of any HTML engine:
//!
//! - **Records**: static field descriptors and name-based assignment
//! - **Tags**: the `key:"value"` annotation grammar and per-key tag index
//! - **Normalization**: trimming and path-basename reduction for ID fields
//! - **Configuration**: extractor settings loaded from TOML and environment
//! - **Error handling**: unified error types
//!

pub mod config;
pub mod error;
pub mod normalize;
pub mod record;
pub mod tags;

// Re-export main types for convenience
pub use config::{ExtractorConfig, ExtractorConfigBuilder, DEFAULT_ANNOTATION_KEY};
pub use error::{AssignmentError, Error, Result, TagSyntaxError};
pub use normalize::{base_name, normalize, IdPolicy};
pub use record::{assign_field, FieldDescriptor, FieldValue, Record};
pub use tags::{build_tag_index, is_extractable, TagEntry, TagIndex, Tags};

/// Version of the core library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::error::Result;
    pub use crate::record::{FieldDescriptor, FieldValue, Record};
    pub use crate::tags::TagIndex;
}
