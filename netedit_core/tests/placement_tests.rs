#![allow(missing_docs)]
#![allow(clippy::missing_docs_in_private_items)]

mod common;

use common::{empty_design, open};
use netedit_core::prelude::*;
use rstest::rstest;

const LUT_A: &str = "SLICE_X0Y0/A6LUT";
const LUT_B: &str = "SLICE_X0Y0/B6LUT";
const FF_A: &str = "SLICE_X0Y0/AFF";

fn session_with_cells() -> Session<MemoryDesign> {
    let mut design = empty_design();
    design.create_cell(Some("LUT2"), "lut", false).unwrap();
    design.create_cell(Some("LUT2"), "other", false).unwrap();
    design.create_cell(Some("FDRE"), "ff", false).unwrap();
    design.create_cell(Some("mystery"), "bb", true).unwrap();
    design.create_net("n").unwrap();
    open(design)
}

#[test]
fn test_place_then_unplace_round_trip() {
    let mut session = session_with_cells();
    let placement = session.place("lut", &ObjectRef::bel(LUT_A)).unwrap();
    assert_eq!(placement.bel, LUT_A);
    assert_eq!(placement.site, "SLICE_X0Y0");
    assert!(session.is_placed("lut").unwrap());

    let bel = session.unplace("lut").unwrap();

    assert_eq!(bel.as_deref(), Some(LUT_A));
    assert_eq!(session.placement_status("lut").unwrap(), PlacementStatus::Unplaced);
    assert_eq!(
        session
            .db()
            .get_property(&ObjectRef::bel(LUT_A), &PropertyKey::IsUsed)
            .unwrap(),
        Some(PropertyValue::Bool(false))
    );
    assert_eq!(session.unplace("lut").unwrap(), None);
}

#[test]
fn test_place_on_used_bel_is_location_occupied() {
    let mut session = session_with_cells();
    session.place("other", &ObjectRef::bel(LUT_A)).unwrap();

    let err = session.place("lut", &ObjectRef::bel(LUT_A)).unwrap_err();

    match err {
        EditError::LocationOccupied { location, occupant } => {
            assert_eq!(location, LUT_A);
            assert_eq!(occupant, "other");
        }
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(session.placement_status("lut").unwrap(), PlacementStatus::Unplaced);
    assert_eq!(
        session.db().cell_placement("other").unwrap().map(|p| p.bel).as_deref(),
        Some(LUT_A)
    );
}

#[test]
fn test_place_on_full_site_is_location_occupied() {
    let mut session = session_with_cells();
    session.place("lut", &ObjectRef::bel(LUT_A)).unwrap();
    session.place("other", &ObjectRef::site("SLICE_X0Y0")).unwrap();
    assert_eq!(
        session.db().cell_placement("other").unwrap().map(|p| p.bel).as_deref(),
        Some(LUT_B)
    );
    session.place("ff", &ObjectRef::bel(FF_A)).unwrap();
    session.db_mut().create_cell(Some("FDRE"), "ff2", false).unwrap();
    session.place("ff2", &ObjectRef::site("SLICE_X0Y0")).unwrap();
    session.db_mut().create_cell(Some("FDRE"), "ff3", false).unwrap();

    let err = session.place("ff3", &ObjectRef::site("SLICE_X0Y0")).unwrap_err();
    assert!(matches!(err, EditError::LocationOccupied { .. }), "{err}");
}

#[test]
fn test_replacing_on_own_full_site_keeps_the_bel() {
    let mut session = session_with_cells();
    session.place("lut", &ObjectRef::bel(LUT_A)).unwrap();
    session.place("other", &ObjectRef::bel(LUT_B)).unwrap();
    session.place("ff", &ObjectRef::bel(FF_A)).unwrap();
    session.db_mut().create_cell(Some("FDRE"), "ff2", false).unwrap();
    session.place("ff2", &ObjectRef::site("SLICE_X0Y0")).unwrap();

    assert_eq!(session.place("lut", &ObjectRef::bel(LUT_A)).unwrap().bel, LUT_A);
    assert_eq!(session.place("lut", &ObjectRef::site("SLICE_X0Y0")).unwrap().bel, LUT_A);
    assert_eq!(
        session.db().cell_placement("other").unwrap().map(|p| p.bel).as_deref(),
        Some(LUT_B)
    );
}

#[test]
fn test_place_rejected_by_store_is_backing_error() {
    let mut session = session_with_cells();
    let err = session.place("ff", &ObjectRef::bel(LUT_A)).unwrap_err();
    assert!(matches!(err, EditError::Backing(_)), "{err}");
    assert!(!session.is_placed("ff").unwrap());
}

#[rstest]
#[case::net_as_location("lut", ObjectRef::net("n"))]
#[case::cell_as_location("lut", ObjectRef::cell("other"))]
#[case::net_as_cell("n", ObjectRef::bel(LUT_A))]
#[case::bel_as_cell(LUT_B, ObjectRef::bel(LUT_A))]
fn test_wrong_classes_are_invalid_arguments(#[case] cell: &str, #[case] location: ObjectRef) {
    let mut session = session_with_cells();
    assert!(matches!(
        session.place(cell, &location),
        Err(EditError::InvalidArgument(_))
    ));
    assert!(matches!(
        session.is_placement_legal(cell, &location),
        Err(EditError::InvalidArgument(_))
    ));
}

#[test]
fn test_bare_location_names_resolve() {
    let mut session = session_with_cells();
    let placement = session.place("lut", &ObjectRef::cell("SLICE_X0Y0")).unwrap();
    assert_eq!(placement.bel, LUT_A);
}

#[rstest]
#[case::free_compatible_bel("lut", LUT_B, true)]
#[case::incompatible_bel("ff", LUT_B, false)]
#[case::occupied_bel("lut", LUT_A, false)]
#[case::black_box("bb", LUT_B, false)]
#[case::own_bel("other", LUT_A, true)]
fn test_legality_probe_leaves_status_unchanged(#[case] cell: &str, #[case] bel: &str, #[case] legal: bool) {
    let mut session = session_with_cells();
    session.place("other", &ObjectRef::bel(LUT_A)).unwrap();
    let status_before = session.placement_status(cell).unwrap();
    let placement_before = session.db().cell_placement(cell).unwrap();

    assert_eq!(session.is_placement_legal(cell, &ObjectRef::bel(bel)).unwrap(), legal);

    assert_eq!(session.placement_status(cell).unwrap(), status_before);
    assert_eq!(session.db().cell_placement(cell).unwrap(), placement_before);
    assert_eq!(
        session.db().cell_placement("other").unwrap().map(|p| p.bel).as_deref(),
        Some(LUT_A)
    );
}

#[test]
fn test_legality_probe_restores_fixed_placement() {
    let mut session = session_with_cells();
    session.place("lut", &ObjectRef::bel(LUT_A)).unwrap();
    session
        .db_mut()
        .set_property(&ObjectRef::cell("lut"), &PropertyKey::IsBelFixed, true.into(), false)
        .unwrap();
    assert_eq!(session.placement_status("lut").unwrap(), PlacementStatus::Fixed);

    assert!(session.is_placement_legal("lut", &ObjectRef::bel(LUT_B)).unwrap());

    assert_eq!(session.placement_status("lut").unwrap(), PlacementStatus::Fixed);
    assert_eq!(
        session.db().cell_placement("lut").unwrap().map(|p| p.bel).as_deref(),
        Some(LUT_A)
    );
    assert_eq!(
        session
            .db()
            .get_property(&ObjectRef::bel(LUT_B), &PropertyKey::IsUsed)
            .unwrap(),
        Some(PropertyValue::Bool(false))
    );
}

#[test]
fn test_probe_guard_undoes_on_drop() {
    let mut design = empty_design();
    design.create_cell(Some("LUT2"), "lut", false).unwrap();
    {
        let mut probe = PlacementProbe::open(&mut design, "lut").unwrap();
        assert!(probe.try_place(&ObjectRef::bel(LUT_A)));
        assert!(probe.try_place(&ObjectRef::bel(LUT_B)));
        assert!(!probe.try_place(&ObjectRef::bel(FF_A)));
    }
    assert_eq!(design.cell_placement("lut").unwrap(), None);
    for bel in [LUT_A, LUT_B] {
        assert_eq!(
            design.get_property(&ObjectRef::bel(bel), &PropertyKey::IsUsed).unwrap(),
            Some(PropertyValue::Bool(false))
        );
    }
}

#[rstest]
#[case::lut_on_lut_bel("lut", ObjectRef::bel(LUT_A), true)]
#[case::lut_on_ff_bel("lut", ObjectRef::bel(FF_A), false)]
#[case::ff_on_site("ff", ObjectRef::site("SLICE_X0Y0"), true)]
#[case::black_box_on_site("bb", ObjectRef::site("SLICE_X0Y0"), false)]
fn test_compatible_with(#[case] cell: &str, #[case] location: ObjectRef, #[case] expected: bool) {
    let mut session = session_with_cells();
    session.place("other", &ObjectRef::bel(LUT_A)).unwrap();
    assert_eq!(session.compatible_with(cell, &location).unwrap(), expected);
}

#[test]
fn test_status_queries_on_missing_cell() {
    let session = session_with_cells();
    assert!(matches!(
        session.is_placed("ghost"),
        Err(EditError::NotFound { class: ObjectClass::Cell, .. })
    ));
}
