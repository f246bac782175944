//! Versioned JSON document format (import/export).

pub mod error;
pub mod schema;


pub use error::DocumentError;
pub use schema::{ComponentEntry, Document, ImageMeta, NormBBox, SCHEMA};
