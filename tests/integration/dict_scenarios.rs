use std::collections::BTreeSet;

use framedict::{DictError, Frame, FrameDict, FrameGraph, FrameRef, Mapping};

fn names(list: &[&str]) -> BTreeSet<String> {
    list.iter().map(|name| name.to_string()).collect()
}

#[test]
fn sky_frames_named_and_defaulted() {
    let err = FrameDict::with_mapping(
        Frame::sky().named("SKY"),
        Mapping::unit(2),
        Frame::sky().named("SKY"),
    )
    .unwrap_err();
    assert!(matches!(err, DictError::DuplicateDomain { ref domain } if domain == "SKY"));

    let dict = FrameDict::with_mapping(Frame::sky().named("Sky"), Mapping::unit(2), Frame::sky())
        .unwrap();
    assert_eq!(dict.all_domains(), names(&["SKY"]));
    assert_eq!(dict.frame(2).unwrap().domain(), "SKY");
}

#[test]
fn removing_first_frame_renumbers_domains() {
    let mut dict = FrameDict::new(Frame::new(2).named("A"));
    dict.add_frame("A", Mapping::zoom(2, 2.0), Frame::new(2).named("B")).unwrap();
    dict.add_frame("B", Mapping::shift(vec![1.0, 0.0]), Frame::new(2).named("C")).unwrap();
    assert_eq!(dict.index("B").unwrap(), 2);
    assert_eq!(dict.index("C").unwrap(), 3);

    dict.remove_frame(1).unwrap();
    assert_eq!(dict.index("B").unwrap(), 1);
    assert_eq!(dict.index("C").unwrap(), 2);
    assert!(!dict.has_domain("A"));

    let out = dict.mapping("b", "c").unwrap().apply_forward(&[1.0, 1.0]).unwrap();
    assert_eq!(out, vec![2.0, 1.0]);
}

#[test]
fn domain_lookup_is_case_blind() {
    let mut dict = FrameDict::new(Frame::new(2).named("pixels"));
    let position = dict.add_frame(1, Mapping::unit(2), Frame::new(2).named("gcs")).unwrap();
    assert_eq!(dict.index("GCS").unwrap(), position);
    assert_eq!(dict.index("Gcs").unwrap(), position);
    assert!(dict.has_domain("gCs"));
    assert!(dict.all_domains().contains("GCS"));
}

#[test]
fn j2000_galactic_scenario() {
    let mut dict = FrameDict::new(Frame::sky().named("J2000"));
    assert_eq!(dict.all_domains(), names(&["J2000"]));
    assert_eq!(dict.index("j2000").unwrap(), 1);
    assert_eq!(dict.base(), 1);
    assert_eq!(dict.current(), 1);

    dict.add_frame(
        "J2000",
        Mapping::shift(vec![0.1, -0.2]).with_ident("j2000-to-galactic"),
        Frame::sky().named("GALACTIC"),
    )
    .unwrap();
    assert_eq!(dict.all_domains(), names(&["J2000", "GALACTIC"]));
    assert_eq!(dict.index("GALACTIC").unwrap(), dict.current());

    let err = dict
        .add_frame("GALACTIC", Mapping::unit(2), Frame::sky().named("j2000"))
        .unwrap_err();
    assert!(err.is_duplicate());
    assert_eq!(dict.frame_count(), 2);
    assert_eq!(dict.all_domains(), names(&["J2000", "GALACTIC"]));
}

#[test]
fn inputs_are_not_aliased() {
    let mut base = Frame::new(2).named("frame1");
    let mut mapping = Mapping::zoom(2, 1.5).with_ident("zoomMap");
    let mut current = Frame::new(2).named("frame2");
    let dict = FrameDict::with_mapping(base.clone(), mapping.clone(), current.clone()).unwrap();

    base.set_domain("newBase");
    mapping.set_ident("newMapping");
    current.set_domain("newCurrent");
    assert_eq!(dict.frame(FrameRef::Base).unwrap().domain(), "FRAME1");
    assert_eq!(dict.frame(FrameRef::Current).unwrap().domain(), "FRAME2");
    assert_eq!(
        dict.mapping(FrameRef::Base, FrameRef::Current).unwrap().ident(),
        Some("zoomMap")
    );

    let mut graph = FrameGraph::new(Frame::new(2).named("outside"));
    let from_graph = FrameDict::from_frame_set(&graph).unwrap();
    graph.set_domain("renamed");
    assert!(from_graph.has_domain("outside"));
    assert!(!from_graph.has_domain("renamed"));
}

#[test]
fn frame_set_with_colliding_domains_is_rejected() {
    let mut graph = FrameGraph::new(Frame::new(2).named("dup"));
    graph.add_frame(1, Mapping::unit(2), Frame::new(2)).unwrap();
    graph.set_domain("DUP");
    let err = FrameDict::try_from(graph).unwrap_err();
    assert!(err.is_duplicate());
}

#[test]
fn decoded_frame_set_with_bad_current_is_rejected() {
    let graph = FrameGraph::with_mapping(
        Frame::new(2).named("a"),
        Mapping::unit(2),
        Frame::new(2).named("b"),
    )
    .unwrap();
    let mut body = serde_json::to_value(&graph).unwrap();
    body["current"] = serde_json::json!(7);
    let decoded: FrameGraph = serde_json::from_value(body).unwrap();

    let err = FrameDict::try_from(decoded.clone()).unwrap_err();
    assert!(matches!(err, DictError::InvalidPosition { position: 7, count: 2 }));
    assert!(FrameDict::from_frame_set(&decoded).is_err());
}

#[test]
fn rename_then_reuse_old_name() {
    let mut dict =
        FrameDict::with_mapping(Frame::new(1).named("old"), Mapping::unit(1), Frame::new(1))
            .unwrap();
    dict.set_current("old").unwrap();
    dict.set_domain("new").unwrap();
    assert!(!dict.has_domain("old"));

    dict.set_current(2).unwrap();
    dict.set_domain("old").unwrap();
    assert_eq!(dict.index("old").unwrap(), 2);
    assert_eq!(dict.index("new").unwrap(), 1);
}

#[test]
fn rename_to_empty_drops_domain() {
    let mut dict = FrameDict::new(Frame::time().named("utc"));
    dict.set_domain("").unwrap();
    assert!(dict.all_domains().is_empty());
    assert_eq!(dict.domain(), "");
    assert!(dict.index("utc").unwrap_err().is_not_found());
}

#[test]
fn position_operations_pass_through() {
    let mut dict = FrameDict::with_mapping(
        Frame::new(2).named("frame1"),
        Mapping::zoom(2, 1.5),
        Frame::new(2).named("frame2"),
    )
    .unwrap();
    assert!(matches!(
        dict.set_current(3),
        Err(DictError::InvalidPosition { position: 3, count: 2 })
    ));
    assert!(dict.frame(0).is_err());
    dict.set_current(1).unwrap();
    assert_eq!(dict.current(), 1);
    assert_eq!(dict.frame_set().current(), 1);
}
