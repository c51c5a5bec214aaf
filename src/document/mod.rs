//! The document layer: synchronizer, errors, events, name generation.
//!
//! [`ProjectDocument`] is the single entry-point an editor front-end
//! binds to. Everything else here supports it: [`DocumentError`] /
//! [`ParseError`] for failure reporting, [`DocumentEvent`] and
//! [`Subscription`] for change notification, and [`NameGenerator`] for
//! naming fresh projects.

mod error;
mod events;
mod naming;
mod sync;

pub use error::{DocumentError, ParseError};
pub use events::{DocumentEvent, Subscription};
pub use naming::{NameGenerator, SequentialNames};
pub use sync::{ProjectDocument, SyncState, PROJECT_ROOT_TAG};
