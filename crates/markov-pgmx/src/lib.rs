//! JSON model documents for Markov networks.
//!
//! A document holds one network (variables, links, potentials and
//! policies) and any number of stored evidence cases, tagged with a
//! semantic `formatVersion`. [`PgmxWriter`] writes the current or the
//! legacy version; [`PgmxReader`] reads every version up to its own.
//! Potentials are decoded through a registry keyed by their `type`.

pub mod document;
pub mod error;
pub mod reader;
pub mod registry;
pub mod version;
pub mod writer;

pub use document::Document;
pub use error::{IoError, Result};
pub use reader::{LoadedModel, PgmxReader};
pub use writer::PgmxWriter;
