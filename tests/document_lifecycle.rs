//! End-to-end lifecycle: create, edit, save to disk, reload.

use std::path::Path;

use projdoc::{
    DocumentEvent, FsStorage, ProjectDocument, SequentialNames, Storage, SyncState, XmlElement,
};

#[test]
fn create_edit_save_reload() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("demo.nunit");

    let mut doc = ProjectDocument::new();
    let events = doc.subscribe();
    doc.new_project(&mut SequentialNames::default());
    assert_eq!(doc.name(), "Project1");

    doc.mutate(|root| {
        root.set_attribute("processModel", "Separate");
        let mut config = XmlElement::new("Config");
        config.set_attribute("name", "Debug");
        config.append_element(XmlElement::new("assembly").with_attribute("path", "tests.dll"));
        root.append_element(config);
    });
    assert!(doc.has_unsaved_changes());

    doc.save_to(&FsStorage, &path).unwrap();
    assert!(!doc.has_unsaved_changes());
    assert_eq!(doc.path(), Some(path.as_path()));
    assert_eq!(doc.name(), "demo");

    // A second document loads what the first wrote
    let mut reloaded = ProjectDocument::new();
    reloaded.load_from(&FsStorage, &path).unwrap();
    assert_eq!(reloaded.root(), doc.root());
    assert_eq!(reloaded.state(), SyncState::Clean);

    doc.close();
    assert_eq!(
        events.drain(),
        [DocumentEvent::Created, DocumentEvent::Changed, DocumentEvent::Closed]
    );
}

#[test]
fn text_pane_edit_survives_failed_parse_on_disk_reload() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("broken.nunit");
    FsStorage.write(&path, b"<NUnitProject><Config></NUnitProject>").unwrap();

    let mut doc = ProjectDocument::new();
    let err = doc.load_from(&FsStorage, &path).unwrap_err();

    // The broken text is retained for the user to fix in place
    assert!(doc.text().contains("<Config>"), "text: {}", doc.text());
    assert!(doc.last_error().is_some());
    let _ = err;

    doc.set_text("<NUnitProject><Config/></NUnitProject>");
    doc.reconcile().unwrap();
    assert!(doc.root().find_child("Config").is_some());
}

#[test]
fn saved_file_is_indented_utf8_with_declaration() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("fmt.nunit");

    let mut doc = ProjectDocument::new();
    doc.mutate(|root| {
        root.append_element(XmlElement::new("Settings").with_attribute("activeconfig", "Debug"));
    });
    doc.save_to(&FsStorage, &path).unwrap();

    let on_disk = String::from_utf8(FsStorage.read(&path).unwrap()).unwrap();
    assert!(on_disk.starts_with("<?xml version=\"1.0\" encoding=\"utf-8\"?>\n"));
    assert!(on_disk.contains("\n  <Settings activeconfig=\"Debug\"/>"));
    assert!(on_disk.ends_with("</NUnitProject>\n"));
}

#[test]
fn load_from_rejects_foreign_root_without_adopting_path() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("other.xml");
    FsStorage.write(&path, b"<SomeOtherDocument/>").unwrap();

    let mut doc = ProjectDocument::new();
    assert!(doc.load_from(&FsStorage, &path).is_err());
    assert_eq!(doc.path(), None::<&Path>);
}
