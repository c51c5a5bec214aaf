//! The text/tree synchronizer backing an editable project document.
//!
//! `ProjectDocument` owns both representations of one project file:
//! the raw XML text and the parsed element tree. Either side may be
//! edited; the other is reconciled lazily, so a burst of edits costs
//! one conversion instead of one per edit.
//!
//! ## Quick start
//!
//! ```ignore
//! use projdoc::{ProjectDocument, SequentialNames};
//!
//! let mut doc = ProjectDocument::new();
//! let events = doc.subscribe();
//! doc.new_project(&mut SequentialNames::default());
//!
//! doc.mutate(|root| {
//!     root.set_attribute("processModel", "Separate");
//! });
//! doc.reconcile()?;
//! println!("{}", doc.text());
//! ```

use std::path::{Path, PathBuf};

use crate::storage::Storage;
use crate::xml::{read_document, write_document, XmlElement};

use super::error::{DocumentError, ParseError};
use super::events::{DocumentEvent, Notifier, Subscription};
use super::naming::NameGenerator;

/// Required tag of the document root element.
pub const PROJECT_ROOT_TAG: &str = "NUnitProject";

/// Which side of the document, if either, is ahead of the other.
///
/// Exactly one side can be pending at a time: the latest write always
/// overwrites a pending marker left by the other side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SyncState {
    /// Text and tree agree.
    #[default]
    Clean,
    /// The text was replaced and has not been parsed yet.
    TextDirty,
    /// The tree was edited and has not been serialized yet.
    TreeDirty,
}

/// An editable XML project document.
///
/// The struct is a long-lived shell: a front-end constructs it once,
/// subscribes, and then creates/opens/closes projects in it. See the
/// module docs for the synchronization model.
pub struct ProjectDocument {
    text: String,
    root: XmlElement,
    state: SyncState,
    last_error: Option<ParseError>,
    has_unsaved_changes: bool,
    name: String,
    path: Option<PathBuf>,
    notifier: Notifier,
}

impl ProjectDocument {
    // ── Construction & lifecycle ────────────────────────────────────

    /// A blank document shell. Emits nothing; use [`new_project`] or
    /// [`load_from`] to begin a project observers hear about.
    ///
    /// [`new_project`]: Self::new_project
    /// [`load_from`]: Self::load_from
    pub fn new() -> Self {
        let root = XmlElement::new(PROJECT_ROOT_TAG);
        let text = write_document(&root);
        Self {
            text,
            root,
            state: SyncState::Clean,
            last_error: None,
            has_unsaved_changes: false,
            name: String::new(),
            path: None,
            notifier: Notifier::default(),
        }
    }

    /// Register an observer. Events are queued per subscription and
    /// polled at the observer's leisure.
    pub fn subscribe(&mut self) -> Subscription {
        self.notifier.subscribe()
    }

    /// Start a fresh project: the default minimal document and a
    /// generated display name. Emits `Created`.
    pub fn new_project(&mut self, names: &mut dyn NameGenerator) {
        self.reset();
        self.name = names.next_name();
        self.notifier.emit(DocumentEvent::Created);
    }

    /// Close the current project and reset to the blank document.
    /// Emits `Closed`.
    pub fn close(&mut self) {
        self.reset();
        self.notifier.emit(DocumentEvent::Closed);
    }

    fn reset(&mut self) {
        self.root = XmlElement::new(PROJECT_ROOT_TAG);
        self.text = write_document(&self.root);
        self.state = SyncState::Clean;
        self.last_error = None;
        self.has_unsaved_changes = false;
        self.name = String::new();
        self.path = None;
    }

    // ── Text side ───────────────────────────────────────────────────

    /// Replace the text without parsing it. Parsing is deferred to
    /// [`reconcile`](Self::reconcile). Marks the document unsaved.
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
        self.state = SyncState::TextDirty;
        self.has_unsaved_changes = true;
    }

    /// Replace the text and parse it immediately (initial load / full
    /// replace, where the caller needs the outcome before continuing).
    ///
    /// On success the document is clean and saved. On failure the new
    /// text is kept (the user's work is not discarded), the previous
    /// tree stays, and the error is both captured and returned.
    pub fn load_text(&mut self, text: impl Into<String>) -> Result<(), ParseError> {
        self.text = text.into();
        self.state = SyncState::TextDirty;
        self.parse_text()?;
        self.has_unsaved_changes = false;
        Ok(())
    }

    // ── Tree side ───────────────────────────────────────────────────

    /// Apply a structural edit to the tree.
    ///
    /// Exactly one `Changed` event is emitted per call, before this
    /// returns, no matter how many node-level edits the closure makes.
    pub fn mutate<R>(&mut self, edit: impl FnOnce(&mut XmlElement) -> R) -> R {
        self.notifier.begin_edit();
        let out = edit(&mut self.root);
        self.state = SyncState::TreeDirty;
        self.has_unsaved_changes = true;
        self.notifier.note_change();
        self.notifier.end_edit();
        out
    }

    // ── Reconciliation ──────────────────────────────────────────────

    /// Bring the stale side up to date with the freshly written one.
    ///
    /// In `TextDirty` state this parses; a failure is captured into
    /// [`last_error`](Self::last_error), leaves the tree and the state
    /// untouched (retry after fixing the text), and is returned. In
    /// `TreeDirty` state this serializes, which cannot fail. `Clean`
    /// is a no-op and emits nothing.
    pub fn reconcile(&mut self) -> Result<(), ParseError> {
        match self.state {
            SyncState::Clean => Ok(()),
            SyncState::TextDirty => self.parse_text(),
            SyncState::TreeDirty => {
                self.text = write_document(&self.root);
                self.state = SyncState::Clean;
                tracing::trace!("reconcile: serialized tree into text");
                Ok(())
            }
        }
    }

    /// Parse `self.text`, replacing the tree only on success.
    fn parse_text(&mut self) -> Result<(), ParseError> {
        let parsed = match read_document(&self.text) {
            Ok(parsed) => parsed,
            Err(err) => {
                return Err(self.capture(ParseError::malformed(err.message, err.position)));
            }
        };

        if parsed.tag() != PROJECT_ROOT_TAG {
            let message = format!("expected <{PROJECT_ROOT_TAG}>, found <{}>", parsed.tag());
            return Err(self.capture(ParseError::invalid_root(message)));
        }

        self.root = parsed;
        self.state = SyncState::Clean;
        self.last_error = None;
        Ok(())
    }

    /// Record a parse failure for later inspection and hand it back
    /// for immediate propagation. Both, not either.
    fn capture(&mut self, err: ParseError) -> ParseError {
        tracing::debug!(error = %err, "parse failed, keeping previous tree");
        self.last_error = Some(err.clone());
        err
    }

    // ── Persistence ─────────────────────────────────────────────────

    /// The canonical textual form of the tree, computed fresh,
    /// independent of the reconciliation state.
    pub fn serialize(&self) -> String {
        write_document(&self.root)
    }

    /// Serialize and write to storage. On success the unsaved flag is
    /// cleared and the document adopts `path` (and its stem as name).
    pub fn save_to<S>(&mut self, storage: &S, path: impl Into<PathBuf>) -> Result<(), DocumentError>
    where
        S: Storage + ?Sized,
    {
        let path = path.into();
        let text = self.serialize();
        storage
            .write(&path, text.as_bytes())
            .map_err(|err| DocumentError::file_io(&path, err))?;

        self.has_unsaved_changes = false;
        self.name = display_name(&path);
        tracing::debug!(path = %path.display(), "saved project");
        self.path = Some(path);
        Ok(())
    }

    /// Read from storage and load. Emits `Created` on success.
    pub fn load_from<S>(&mut self, storage: &S, path: impl Into<PathBuf>) -> Result<(), DocumentError>
    where
        S: Storage + ?Sized,
    {
        let path = path.into();
        let bytes = storage
            .read(&path)
            .map_err(|err| DocumentError::file_io(&path, err))?;

        self.load_text(String::from_utf8_lossy(&bytes).into_owned())?;

        self.name = display_name(&path);
        tracing::debug!(path = %path.display(), "opened project");
        self.path = Some(path);
        self.notifier.emit(DocumentEvent::Created);
        Ok(())
    }

    // ── Access ──────────────────────────────────────────────────────

    /// The current textual form. Stale while `TreeDirty`.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// The current tree. Stale while `TextDirty`. All mutation goes
    /// through [`mutate`](Self::mutate) so change tracking cannot be
    /// bypassed.
    pub fn root(&self) -> &XmlElement {
        &self.root
    }

    pub fn state(&self) -> SyncState {
        self.state
    }

    /// The most recent parse failure, until a parse succeeds.
    pub fn last_error(&self) -> Option<&ParseError> {
        self.last_error.as_ref()
    }

    pub fn has_unsaved_changes(&self) -> bool {
        self.has_unsaved_changes
    }

    /// Display name: generated for new projects, file stem once saved
    /// or loaded.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Where the document was last saved to or loaded from.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }
}

impl Default for ProjectDocument {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ProjectDocument {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProjectDocument")
            .field("name", &self.name)
            .field("state", &self.state)
            .field("unsaved", &self.has_unsaved_changes)
            .field("path", &self.path)
            .field("last_error", &self.last_error.is_some())
            .finish()
    }
}

/// File stem shown as the document name once a path is known.
fn display_name(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default()
}
