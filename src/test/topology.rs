use crate::road::{NodeKind, PROBABILITY_TOLERANCE, RoadWorld, TopologyError};
use crate::topo::roundabout::{RoundaboutOpts, build_roundabout};
use std::collections::BTreeSet;

fn small_opts() -> RoundaboutOpts {
    RoundaboutOpts {
        lane_count: 4,
        angular_resolution: 5,
        speed_limit: 10.0,
        entrance_spacing: 2,
        start_radius: 2,
        car_spacing: 2.0,
    }
}

#[test]
fn every_node_probability_sums_to_one() {
    for opts in [
        small_opts(),
        RoundaboutOpts::default(),
        RoundaboutOpts {
            lane_count: 9,
            angular_resolution: 12,
            entrance_spacing: 0,
            start_radius: 6,
            ..RoundaboutOpts::default()
        },
        RoundaboutOpts {
            lane_count: 9,
            angular_resolution: 12,
            entrance_spacing: 0,
            start_radius: 4,
            car_spacing: 1.0,
            ..RoundaboutOpts::default()
        },
        RoundaboutOpts {
            lane_count: 3,
            angular_resolution: 7,
            entrance_spacing: 10,
            start_radius: 2,
            car_spacing: 1.0,
            ..RoundaboutOpts::default()
        },
    ] {
        let mut world = RoadWorld::default();
        build_roundabout(&mut world, &opts).expect("valid topology");

        for node in world.net.nodes() {
            let Some(out) = node.outgoing() else {
                assert!(node.is_exit());
                continue;
            };
            assert!(
                (out.sum() - 1.0).abs() <= PROBABILITY_TOLERANCE,
                "{} sums to {}",
                node.name(),
                out.sum()
            );
            assert!(out.edges().iter().all(|(_, p)| *p >= 0.0));
        }
    }
}

#[test]
fn small_roundabout_has_one_entrance_and_exit_per_gate_slot() {
    let opts = small_opts();
    let mut world = RoadWorld::default();
    let topo = build_roundabout(&mut world, &opts).expect("valid topology");

    let gates = [0_u32, 3].into_iter().collect::<BTreeSet<_>>();
    assert_eq!(topo.entrances.keys().copied().collect::<BTreeSet<_>>(), gates);
    assert_eq!(topo.exits.keys().copied().collect::<BTreeSet<_>>(), gates);
    assert_eq!(topo.lane_count(), 15);
    assert_eq!(world.net.len(), 15 + 2 + 2);

    for (&slot, &entrance) in &topo.entrances {
        let node = world.net.node(entrance);
        assert!(node.is_entrance());
        assert_eq!(node.name(), format!("entrance {slot}"));
        let out = node.outgoing().expect("entrance edges");
        assert_eq!(out.edges(), &[(topo.lane(4, slot).expect("outer lane"), 1.0)]);
    }

    for (&slot, &exit) in &topo.exits {
        assert!(world.net.node(exit).is_exit());
        let outer = world.net.node(topo.lane(4, slot).expect("outer lane"));
        assert_eq!(outer.outgoing().expect("edges").probability(exit), Some(0.15));
    }
}

#[test]
fn edge_counts_and_weights_depend_on_ring_position() {
    let opts = small_opts();
    let mut world = RoadWorld::default();
    let topo = build_roundabout(&mut world, &opts).expect("valid topology");
    let lane = |r, k| topo.lane(r, k).expect("lane exists");

    for k in 0..5 {
        let next = (k + 1) % 5;

        // 最内圈：前进 + 外移
        let inner = world.net.node(lane(2, k)).outgoing().expect("edges");
        assert_eq!(inner.len(), 2);
        assert_eq!(inner.probability(lane(2, next)), Some(0.7));
        assert_eq!(inner.probability(lane(3, next)), Some(0.3));

        // 中间圈：前进 + 外移 + 内移
        let middle = world.net.node(lane(3, k)).outgoing().expect("edges");
        assert_eq!(middle.len(), 3);
        assert_eq!(middle.probability(lane(3, next)), Some(0.5));
        assert_eq!(middle.probability(lane(4, next)), Some(0.25));
        assert_eq!(middle.probability(lane(2, next)), Some(0.25));

        // 最外圈：前进 + 内移（+ 出口）
        let outer = world.net.node(lane(4, k)).outgoing().expect("edges");
        assert_eq!(outer.probability(lane(4, next)), Some(0.7));
        if opts.is_gate(k) {
            assert_eq!(outer.len(), 3);
            assert_eq!(outer.probability(lane(3, next)), Some(0.15));
        } else {
            assert_eq!(outer.len(), 2);
            assert_eq!(outer.probability(lane(3, next)), Some(0.3));
        }
    }
}

#[test]
fn exit_time_and_capacity_follow_arc_length() {
    let opts = small_opts();
    let mut world = RoadWorld::default();
    let topo = build_roundabout(&mut world, &opts).expect("valid topology");

    for (r, expected_cap) in [(2, 1), (3, 1), (4, 2)] {
        let node = world.net.node(topo.lane(r, 0).expect("lane"));
        assert_eq!(node.name(), format!("({r}, 0)"));
        assert_eq!(node.max_capacity(), Some(expected_cap));
        assert_eq!(node.current_capacity(), 0);

        let expected = 2.0 * std::f64::consts::PI * f64::from(r) / (5.0 * 10.0);
        let got = node.exit_time().expect("lane exit time").as_units_f64();
        assert!((got - expected).abs() < 1e-6, "r={r}: {got} vs {expected}");
        assert!(matches!(node.kind(), NodeKind::Lane { .. }));
    }
}

#[test]
fn zero_capacity_ring_fails_construction_without_creating_nodes() {
    let opts = RoundaboutOpts {
        car_spacing: 3.0,
        ..small_opts()
    };
    let mut world = RoadWorld::default();
    let err = build_roundabout(&mut world, &opts).expect_err("ring 2 holds no car");

    match err {
        TopologyError::ZeroCapacity { radius, .. } => assert_eq!(radius, 2),
        other => panic!("expected ZeroCapacity, got {other:?}"),
    }
    assert!(world.net.is_empty());
}

#[test]
fn tight_inner_ring_is_rejected_at_default_spacing() {
    let opts = RoundaboutOpts {
        lane_count: 9,
        angular_resolution: 12,
        entrance_spacing: 0,
        start_radius: 4,
        ..RoundaboutOpts::default()
    };
    let mut world = RoadWorld::default();
    let err = build_roundabout(&mut world, &opts).expect_err("ring 4 arc is shorter than 3.0");
    assert!(err.to_string().starts_with("ring 4 would hold zero cars"));

    match err {
        TopologyError::ZeroCapacity {
            radius,
            arc_length,
            car_spacing,
        } => {
            assert_eq!(radius, 4);
            assert!(arc_length < car_spacing);
            assert_eq!(car_spacing, 3.0);
        }
        other => panic!("expected ZeroCapacity, got {other:?}"),
    }
    assert!(world.net.is_empty());
}

#[test]
fn single_ring_cannot_satisfy_probability_postcondition() {
    let opts = RoundaboutOpts {
        lane_count: 4,
        start_radius: 4,
        ..small_opts()
    };
    let mut world = RoadWorld::default();
    let err = build_roundabout(&mut world, &opts).expect_err("single ring leaks probability");
    assert!(matches!(err, TopologyError::Probabilities { .. }));
}

#[test]
fn invalid_options_are_rejected() {
    let cases = [
        RoundaboutOpts {
            start_radius: 0,
            ..small_opts()
        },
        RoundaboutOpts {
            lane_count: 1,
            ..small_opts()
        },
        RoundaboutOpts {
            angular_resolution: 0,
            ..small_opts()
        },
        RoundaboutOpts {
            speed_limit: 0.0,
            ..small_opts()
        },
        RoundaboutOpts {
            car_spacing: f64::NAN,
            ..small_opts()
        },
    ];
    for opts in cases {
        let mut world = RoadWorld::default();
        assert!(
            matches!(
                build_roundabout(&mut world, &opts),
                Err(TopologyError::InvalidOpts(_))
            ),
            "{opts:?} should be rejected"
        );
    }
}

#[test]
fn snapshot_reports_every_coordinate() {
    let opts = small_opts();
    let mut world = RoadWorld::default();
    let topo = build_roundabout(&mut world, &opts).expect("valid topology");

    let target = topo.lane(3, 2).expect("lane");
    world.net.enter(target).expect("room for one car");

    let snap = topo.snapshot(&world.net, crate::sim::SimTime::from_secs(7));
    assert_eq!(snap.t_ns, crate::sim::SimTime::from_secs(7).0);
    assert_eq!(snap.cells.len(), 15);
    assert_eq!(snap.get(3, 2), Some((1, 1)));
    assert_eq!(snap.get(4, 1), Some((0, 2)));
    assert_eq!(snap.get(5, 0), None);
    assert_eq!(snap.total_cars(), 1);
    assert_eq!(topo.position(target), Some((3, 2)));
}
