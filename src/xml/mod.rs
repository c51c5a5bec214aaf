//! XML element tree and text adapters.
//!
//! This module owns the DOM-like representation an editable project
//! document is reconciled against:
//!
//! - [`XmlElement`] / [`XmlNode`] - the tree model (ordered attributes,
//!   ordered children)
//! - [`read_document`] - parse text into a tree, with positioned errors
//! - [`write_document`] - serialize a tree to indented UTF-8 text
//!
//! The tree is format-agnostic: required-root-name validation is a
//! document-level concern and lives in [`crate::document`].

mod reader;
mod tree;
mod writer;

pub use reader::{read_document, ReadError};
pub use tree::{XmlElement, XmlNode};
pub use writer::write_document;
