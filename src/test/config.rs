use crate::sim::{ActivationDelay, SimConfig, SimTime, TrafficOpts};
use crate::topo::roundabout::RoundaboutOpts;

#[test]
fn partial_json_config_falls_back_to_defaults() {
    let raw = r#"
{
    "topology": { "lane_count": 4, "start_radius": 2, "car_spacing": 2.0 },
    "traffic": { "activation": { "kind": "dwell" } },
    "random_seed": 9
}
    "#;
    let cfg: SimConfig = serde_json::from_str(raw).expect("parse config");

    assert_eq!(
        cfg.topology,
        RoundaboutOpts {
            lane_count: 4,
            start_radius: 2,
            car_spacing: 2.0,
            ..RoundaboutOpts::default()
        }
    );
    assert_eq!(cfg.traffic.activation, ActivationDelay::Dwell);
    assert_eq!(cfg.traffic.spawn_probability, 0.5);
    assert_eq!(cfg.random_seed, 9);
    assert_eq!(cfg.horizon(), SimTime::from_secs(1_000));
    assert_eq!(cfg.snapshot_every(), Some(SimTime::from_secs(5)));
}

#[test]
fn fixed_activation_parses_with_interval() {
    let cfg: TrafficOpts =
        serde_json::from_str(r#"{ "activation": { "kind": "fixed", "every": 2.5 } }"#)
            .expect("parse traffic opts");
    assert_eq!(cfg.activation, ActivationDelay::Fixed { every: 2.5 });
}

#[test]
fn traffic_validation_rejects_bad_probabilities_and_intervals() {
    assert!(TrafficOpts::default().validate().is_ok());

    let bad = [
        TrafficOpts {
            spawn_probability: 1.5,
            ..TrafficOpts::default()
        },
        TrafficOpts {
            move_probability: -0.1,
            ..TrafficOpts::default()
        },
        TrafficOpts {
            spawn_interval: 0.0,
            ..TrafficOpts::default()
        },
        TrafficOpts {
            activation: ActivationDelay::Fixed { every: 0.0 },
            ..TrafficOpts::default()
        },
    ];
    for opts in bad {
        assert!(opts.validate().is_err(), "{opts:?} should be rejected");
    }
}

#[test]
fn zero_snapshot_interval_disables_sampling() {
    let cfg = SimConfig {
        snapshot_interval: Some(0.0),
        ..SimConfig::default()
    };
    assert_eq!(cfg.snapshot_every(), None);
}

#[test]
fn run_config_validation_rejects_bad_horizon_and_snapshot_interval() {
    assert!(SimConfig::default().validate().is_ok());
    assert!(
        SimConfig {
            simulation_horizon: 0.0,
            snapshot_interval: Some(0.0),
            ..SimConfig::default()
        }
        .validate()
        .is_ok()
    );

    let bad = [
        SimConfig {
            simulation_horizon: -1.0,
            ..SimConfig::default()
        },
        SimConfig {
            simulation_horizon: f64::NAN,
            ..SimConfig::default()
        },
        SimConfig {
            simulation_horizon: f64::INFINITY,
            ..SimConfig::default()
        },
        SimConfig {
            snapshot_interval: Some(-5.0),
            ..SimConfig::default()
        },
        SimConfig {
            snapshot_interval: Some(f64::NAN),
            ..SimConfig::default()
        },
        SimConfig {
            traffic: TrafficOpts {
                spawn_probability: 2.0,
                ..TrafficOpts::default()
            },
            ..SimConfig::default()
        },
    ];
    for cfg in bad {
        assert!(cfg.validate().is_err(), "{cfg:?} should be rejected");
    }
}
