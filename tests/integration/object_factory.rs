use framedict::object::{self, cast_from_raw, known_classes};
use framedict::{Capability, DictError, Frame, FrameDict, FrameGraph, Mapping, Object, RawObject};
use serde_json::json;

fn sample_dict() -> FrameDict {
    let mut dict = FrameDict::with_mapping(
        Frame::new(2).named("pixels"),
        Mapping::zoom(2, 0.5).with_ident("plate"),
        Frame::new(2).named("focal"),
    )
    .unwrap();
    dict.add_frame("focal", Mapping::shift(vec![3.0, 4.0]), Frame::sky()).unwrap();
    dict
}

#[test]
fn frame_dict_survives_raw_round_trip() {
    let dict = sample_dict();
    let raw = dict.to_raw().unwrap();
    assert_eq!(raw.class_name(), "FrameSet");

    let rebuilt = FrameDict::from_raw(&raw).unwrap();
    assert_eq!(rebuilt.all_domains(), dict.all_domains());
    assert_eq!(rebuilt.index("FOCAL").unwrap(), 2);
    assert_eq!(rebuilt.frame(3).unwrap().domain(), "SKY");
    assert!(!rebuilt.has_domain("SKY"));

    let out = rebuilt
        .mapping("pixels", 3)
        .unwrap()
        .apply_forward(&[2.0, 4.0])
        .unwrap();
    assert_eq!(out, vec![4.0, 6.0]);
}

#[test]
fn raw_handles_of_other_classes_are_rejected() {
    let frame = Object::from(Frame::sky()).to_raw().unwrap();
    let err = FrameDict::from_raw(&frame).unwrap_err();
    assert!(matches!(
        err,
        DictError::TypeMismatch { ref expected, ref actual }
            if expected == "FrameSet" && actual == "SkyFrame"
    ));

    let unknown = RawObject::new("WcsMap", json!({}));
    assert!(matches!(
        FrameDict::from_raw(&unknown),
        Err(DictError::UnsupportedType { .. })
    ));
}

#[test]
fn raw_frame_set_with_duplicate_domains_is_rejected() {
    let mut graph = FrameGraph::new(Frame::new(1).named("x"));
    graph.add_frame(1, Mapping::unit(1), Frame::new(1)).unwrap();
    graph.set_domain("X");
    let raw = Object::from(graph).to_raw().unwrap();
    assert!(FrameDict::from_raw(&raw).unwrap_err().is_duplicate());
}

#[test]
fn lowercase_domains_in_raw_body_are_normalized() {
    let mut body = sample_dict().to_raw().unwrap().body().clone();
    body["nodes"][0]["frame"]["domain"] = json!("pixels");
    let raw = RawObject::new("FrameSet", body);

    let mut dict = FrameDict::from_raw(&raw).unwrap();
    assert!(dict.all_domains().contains("PIXELS"));
    assert_eq!(dict.frame(1).unwrap().domain(), "PIXELS");

    dict.set_current("pixels").unwrap();
    let before = dict.frame_set().clone();
    dict.set_domain("pixels").unwrap();
    assert_eq!(dict.frame_set(), &before);
    assert_eq!(dict.index("PIXELS").unwrap(), 1);
}

#[test]
fn every_known_class_is_constructible() {
    let samples = vec![
        Object::from(Frame::new(3)),
        Object::from(Frame::sky()),
        Object::from(Frame::spectrum()),
        Object::from(Frame::time()),
        Object::from(Mapping::unit(2)),
        Object::from(Mapping::zoom(2, 2.0)),
        Object::from(Mapping::shift(vec![1.0])),
        Object::from(Mapping::series(vec![Mapping::zoom(1, 2.0), Mapping::shift(vec![1.0])]).unwrap()),
        Object::from(FrameGraph::new(Frame::new(1))),
    ];
    let mut classes: Vec<&str> = samples.iter().map(Object::class_name).collect();
    classes.sort_unstable();
    assert_eq!(classes, known_classes());

    for sample in samples {
        let raw = sample.to_raw().unwrap();
        let decoded = cast_from_raw(&raw, Capability::Object).unwrap();
        assert_eq!(decoded, sample);
    }
}

#[test]
fn typed_cast_reports_capability() {
    let raw = Object::from(FrameGraph::new(Frame::new(2))).to_raw().unwrap();
    assert!(object::from_raw::<FrameGraph>(&raw).is_ok());
    let err = object::from_raw::<Mapping>(&raw).unwrap_err();
    assert!(err.is_type_error());
    assert_eq!(err.to_string(), "This is a FrameSet, which is not a Mapping");
}
