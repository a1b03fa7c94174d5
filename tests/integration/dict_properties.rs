use std::collections::BTreeSet;

use framedict::{Frame, FrameDict, Mapping, Position};
use proptest::prelude::*;

/// Small name pool so collisions are common; mixed case on purpose
const NAMES: &[&str] = &["a", "A", "b", "Sky", "SKY", "gcs", "Time", ""];

#[derive(Debug, Clone)]
enum Op {
    Add {
        from: Position,
        name: Option<usize>,
        sky: bool,
    },
    AddByDomain {
        from: usize,
        name: Option<usize>,
    },
    Remove(Position),
    RemoveByDomain(usize),
    SetCurrent(Position),
    Rename(usize),
}

fn name_strategy() -> impl Strategy<Value = Option<usize>> {
    proptest::option::of(0..NAMES.len())
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        (1..6usize, name_strategy(), any::<bool>())
            .prop_map(|(from, name, sky)| Op::Add { from, name, sky }),
        (0..NAMES.len(), name_strategy()).prop_map(|(from, name)| Op::AddByDomain { from, name }),
        (1..6usize).prop_map(Op::Remove),
        (0..NAMES.len()).prop_map(Op::RemoveByDomain),
        (1..6usize).prop_map(Op::SetCurrent),
        (0..NAMES.len()).prop_map(Op::Rename),
    ]
}

fn make_frame(name: Option<usize>, sky: bool) -> Frame {
    let frame = if sky { Frame::sky() } else { Frame::new(2) };
    match name {
        Some(i) => frame.named(NAMES[i]),
        None => frame,
    }
}

fn apply(dict: &mut FrameDict, op: &Op) -> framedict::Result<()> {
    match op {
        Op::Add { from, name, sky } => dict
            .add_frame(*from, Mapping::unit(2), make_frame(*name, *sky))
            .map(|_| ()),
        Op::AddByDomain { from, name } => dict
            .add_frame(NAMES[*from], Mapping::unit(2), make_frame(*name, false))
            .map(|_| ()),
        Op::Remove(position) => dict.remove_frame(*position),
        Op::RemoveByDomain(i) => dict.remove_frame(NAMES[*i]),
        Op::SetCurrent(position) => dict.set_current(*position),
        Op::Rename(i) => dict.set_domain(NAMES[*i]),
    }
}

fn assert_consistent(dict: &FrameDict) {
    let domains = dict.all_domains();
    for name in NAMES {
        let listed = domains.contains(&name.to_uppercase());
        assert_eq!(dict.has_domain(name), listed, "has_domain({name:?})");
        assert_eq!(dict.index(name).is_ok(), listed, "index({name:?})");
    }

    let indexed: BTreeSet<Position> = domains
        .iter()
        .map(|name| dict.index(name).unwrap())
        .collect();
    let named: BTreeSet<Position> = dict
        .frame_set()
        .frames()
        .filter(|(_, frame)| frame.indexable_domain().is_some())
        .map(|(position, _)| position)
        .collect();
    assert_eq!(indexed, named);
    assert_eq!(indexed.len(), domains.len());

    for name in &domains {
        let frame = dict.frame(name.as_str()).unwrap();
        assert_eq!(frame.indexable_domain(), Some(name.as_str()));
    }
}

proptest! {
    #[test]
    fn index_matches_graph_after_every_operation(ops in proptest::collection::vec(op_strategy(), 1..40)) {
        let mut dict = FrameDict::new(Frame::new(2).named("root"));
        for op in &ops {
            let before = dict.clone();
            if apply(&mut dict, op).is_err() {
                prop_assert_eq!(&dict, &before);
            }
            assert_consistent(&dict);
        }
    }

    #[test]
    fn rebuilding_from_the_same_graph_is_stable(ops in proptest::collection::vec(op_strategy(), 1..30)) {
        let mut dict = FrameDict::new(Frame::new(2));
        for op in &ops {
            let _ = apply(&mut dict, op);
        }
        let first = FrameDict::from_frame_set(dict.frame_set()).unwrap();
        let second = FrameDict::from_frame_set(dict.frame_set()).unwrap();
        prop_assert_eq!(first.domain_index(), dict.domain_index());
        prop_assert_eq!(first.domain_index(), second.domain_index());
    }

    #[test]
    fn renaming_to_own_name_is_idempotent(name in 0..NAMES.len()) {
        let mut dict = FrameDict::with_mapping(
            Frame::new(2).named("other"),
            Mapping::unit(2),
            make_frame(Some(name), false),
        ).unwrap();
        let before = dict.clone();
        dict.set_domain(NAMES[name]).unwrap();
        prop_assert_eq!(dict.all_domains(), before.all_domains());
        prop_assert_eq!(dict.frame_set(), before.frame_set());
    }
}
