//! Common types shared by all entities

pub mod entity_id;

// Re-exports
pub use entity_id::{id_string, opt_id_string, opt_text, text};
