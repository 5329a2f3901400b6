#![allow(missing_docs)]
#![allow(clippy::missing_docs_in_private_items)]

mod common;

use common::{empty_design, hierarchical_design, open};
use netedit_core::prelude::*;
use netedit_db::{GROUND_NET, POWER_NET};
use std::io::{self, Write};
use std::sync::{Arc, Mutex};

/// Log output of one test, for asserting on what was reported.
#[derive(Clone, Default)]
struct CapturedLog(Arc<Mutex<Vec<u8>>>);

impl CapturedLog {
    fn text(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

impl Write for CapturedLog {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[test]
fn test_new_cell_from_template() {
    let mut session = open(empty_design());
    session.new_cell("u0", Some("LUT2")).unwrap();
    assert_eq!(session.get_type("u0").unwrap().as_deref(), Some("LUT2"));
    assert_eq!(session.db().get_pins("u0", None, None).unwrap().len(), 3);
}

#[test]
fn test_new_cell_falls_back_to_black_box() {
    let mut session = open(empty_design());
    session.new_cell("unknown", Some("NOT_IN_LIBRARY")).unwrap();
    session.new_cell("bare", None).unwrap();
    for cell in ["unknown", "bare"] {
        assert_eq!(session.get_type(cell).unwrap(), None);
        assert_eq!(
            session
                .db()
                .get_property(&ObjectRef::cell(cell), &PropertyKey::IsBlackbox)
                .unwrap(),
            Some(PropertyValue::Bool(true))
        );
    }
}

#[test]
fn test_new_cell_duplicate_name() {
    let mut session = open(empty_design());
    session.new_cell("u0", Some("BUF")).unwrap();
    assert!(matches!(
        session.new_cell("u0", Some("LUT2")),
        Err(EditError::DuplicateName { class: ObjectClass::Cell, .. })
    ));
}

#[test]
fn test_delete_keeps_nets_and_ignores_missing_cells() {
    let mut design = empty_design();
    design.create_cell(Some("BUF"), "a", false).unwrap();
    design.create_cell(Some("BUF"), "b", false).unwrap();
    design.create_net("n").unwrap();
    design.connect("n", &Endpoint::pin("a", "O")).unwrap();
    design.connect("n", &Endpoint::pin("b", "I")).unwrap();
    let mut session = open(design);

    session.delete_cell("a").unwrap();
    session.delete_cell("a").unwrap();

    let members = session.db().net_members("n").unwrap();
    assert_eq!(members.len(), 1);
    assert!(members[0].is_sink());
}

#[test]
fn test_delete_reports_only_cells_that_existed() {
    let mut session = open(empty_design());
    session.new_cell("a", Some("BUF")).unwrap();

    let log = CapturedLog::default();
    let writer = log.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(move || writer.clone())
        .with_ansi(false)
        .with_max_level(tracing::Level::INFO)
        .finish();
    tracing::subscriber::with_default(subscriber, || {
        session.delete_cell("ghost").unwrap();
        session.delete_cell("a").unwrap();
    });

    let text = log.text();
    assert!(text.contains("Deleted cell 'a'"), "{text}");
    assert!(!text.contains("Deleted cell 'ghost'"), "{text}");
}

#[test]
fn test_rename() {
    let mut session = open(empty_design());
    session.new_cell("a", Some("BUF")).unwrap();
    session.new_cell("b", Some("BUF")).unwrap();

    session.rename_cell("a", "c").unwrap();
    assert_eq!(session.get_name("c").unwrap(), "c");
    assert!(matches!(session.get_name("a"), Err(EditError::NotFound { .. })));
    assert!(matches!(
        session.rename_cell("c", "b"),
        Err(EditError::DuplicateName { .. })
    ));
}

#[test]
fn test_duplicate_copies_every_non_empty_settable_property() {
    let mut session = open(empty_design());
    session.new_cell("ref", Some("FDRE")).unwrap();
    let source = ObjectRef::cell("ref");
    let db = session.db_mut();
    db.set_property(&source, &"INIT".into(), 1_i64.into(), false).unwrap();
    db.set_property(&source, &"KEEP".into(), true.into(), false).unwrap();
    db.set_property(&source, &"COMMENT".into(), "".into(), false).unwrap();
    db.set_property(&source, &"USER_TAG".into(), "alpha".into(), false).unwrap();

    let report = session.duplicate("ref", "copy").unwrap();

    assert_eq!(report.cell, "copy");
    assert_eq!(session.get_type("copy").unwrap().as_deref(), Some("FDRE"));
    let target = ObjectRef::cell("copy");
    for key in session.db().list_properties(&source).unwrap() {
        let value = session.db().get_property(&source, &key).unwrap();
        if key.is_identity() || value.as_ref().is_none_or(PropertyValue::is_empty) {
            continue;
        }
        assert_eq!(
            session.db().get_property(&target, &key).unwrap(),
            value,
            "property {key} differs"
        );
    }
    assert!(report.copied.contains(&"USER_TAG".into()));
    assert!(!report.copied.contains(&"COMMENT".into()));
    assert!(!report.skipped.iter().any(|(key, _)| key.as_str() == "COMMENT"));
    assert_eq!(
        session.db().get_property(&target, &"COMMENT".into()).unwrap(),
        None
    );
}

#[test]
fn test_duplicate_reports_refused_properties() {
    let mut session = open(empty_design());
    session.new_cell("ref", Some("FDRE")).unwrap();
    session.place("ref", &ObjectRef::bel("SLICE_X0Y0/AFF")).unwrap();
    session
        .db_mut()
        .set_property(&ObjectRef::cell("ref"), &PropertyKey::IsLocFixed, true.into(), false)
        .unwrap();

    let report = session.duplicate("ref", "copy").unwrap();

    assert!(!report.is_complete());
    let skipped: Vec<&str> = report.skipped.iter().map(|(k, _)| k.as_str()).collect();
    assert!(skipped.contains(&"IS_LOC_FIXED"));
    assert!(skipped.contains(&"BEL"));
    assert!(skipped.contains(&"STATUS"));
    assert!(!session.is_placed("copy").unwrap());
}

#[test]
fn test_duplicate_black_box() {
    let mut session = open(empty_design());
    session.new_cell("bb", Some("mystery")).unwrap();
    session.duplicate("bb", "bb2").unwrap();
    assert_eq!(session.get_type("bb2").unwrap(), None);
    assert_eq!(
        session
            .db()
            .get_property(&ObjectRef::cell("bb2"), &PropertyKey::RefName)
            .unwrap(),
        Some(PropertyValue::from("mystery"))
    );
}

#[test]
fn test_duplicate_errors() {
    let mut session = open(empty_design());
    session.new_cell("a", Some("BUF")).unwrap();
    assert!(matches!(
        session.duplicate("ghost", "b"),
        Err(EditError::NotFound { .. })
    ));
    assert!(matches!(
        session.duplicate("a", "a"),
        Err(EditError::DuplicateName { .. })
    ));
}

#[test]
fn test_get_primitives() {
    let session = open(hierarchical_design());
    assert_eq!(session.get_primitives("top/lut").unwrap(), vec!["top/lut"]);
    assert_eq!(
        session.get_primitives("top").unwrap(),
        vec!["top/lut", "top/ff", "top/sub/ff"]
    );
    assert_eq!(session.get_primitives("top/sub").unwrap(), vec!["top/sub/ff"]);
}

#[test]
fn test_tie_unused_pins_is_scoped_to_the_cell() {
    let mut session = open(empty_design());
    session.new_cell("ff", Some("FDRE")).unwrap();
    session.new_cell("other", Some("FDRE")).unwrap();

    assert_eq!(session.tie_unused_pins("ff").unwrap(), 4);

    let db = session.db();
    assert_eq!(
        db.pin_net(&PinRef::new("ff", "CE")).unwrap().as_deref(),
        Some(POWER_NET)
    );
    assert_eq!(
        db.pin_net(&PinRef::new("ff", "D")).unwrap().as_deref(),
        Some(GROUND_NET)
    );
    assert!(db
        .get_pins("other", Some(PinDirection::In), Some(true))
        .unwrap()
        .is_empty());
    assert!(matches!(
        session.tie_unused_pins("ghost"),
        Err(EditError::NotFound { .. })
    ));
}
