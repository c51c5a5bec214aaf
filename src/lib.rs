//! # projdoc
//!
//! Core library for an editable XML project document: a bidirectional
//! synchronization engine between the raw textual form and a parsed
//! element tree, plus persistence and change notification.
//!
//! ## Module Structure (dependency order)
//!
//! ```text
//! document  → ProjectDocument synchronizer, errors, events, naming
//!   ↓
//! storage   → Storage trait, filesystem implementation
//!   ↓
//! xml       → element tree model, XML reader/writer adapters
//!   ↓
//! base      → primitives (Position for line/column reporting)
//! ```

// ============================================================================
// MODULES (dependency order: base → xml → storage → document)
// ============================================================================

/// Foundation types: source positions for error reporting
pub mod base;

/// XML: element tree model, reader and writer adapters
pub mod xml;

/// Storage: byte-level read/write collaborator trait
pub mod storage;

/// Document: the text/tree synchronizer, errors, events, naming
pub mod document;

// Re-export the primary entry points
pub use document::{
    DocumentError, DocumentEvent, NameGenerator, ParseError, ProjectDocument, SequentialNames,
    Subscription, SyncState, PROJECT_ROOT_TAG,
};
pub use storage::{FsStorage, Storage};
pub use xml::{XmlElement, XmlNode};

// Re-export foundation types
pub use base::Position;
