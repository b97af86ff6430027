use crate::road::RoadWorld;
use crate::sim::{SimTime, Simulator, TrafficOpts};
use crate::traffic::SpawnCars;
use crate::viz::{VizEventKind, VizLogger};

fn world_with_entrance() -> (RoadWorld, crate::road::NodeId) {
    let mut world = RoadWorld::new(3);
    let entrance = world
        .net
        .add_entrance("entrance 0", SimTime::from_units_f64(0.5));
    let lane = world.net.add_lane("(1, 0)", SimTime::from_secs(1), 1);
    world.net.connect(entrance, lane, 1.0).expect("connect");
    world.net.connect(lane, lane, 1.0).expect("connect");
    (world, entrance)
}

#[test]
fn certain_generator_spawns_once_per_interval() {
    let (mut world, entrance) = world_with_entrance();
    world.viz = Some(VizLogger::default());
    let opts = TrafficOpts {
        spawn_probability: 1.0,
        move_probability: 0.0,
        ..TrafficOpts::default()
    };

    let mut sim = Simulator::default();
    sim.schedule(SimTime::ZERO, SpawnCars { entrance, opts });
    sim.run_until(SimTime::from_secs(20), &mut world);

    assert_eq!(world.stats.spawned_cars, 5);
    // 入口容量无限，车辆都还停在入口
    assert_eq!(world.net.node(entrance).current_capacity(), 5);

    let spawn_times = world
        .viz
        .as_ref()
        .expect("viz enabled")
        .events
        .iter()
        .filter(|e| matches!(e.kind, VizEventKind::Spawn { .. }))
        .map(|e| e.t_ns)
        .collect::<Vec<_>>();
    let expected = (0..5)
        .map(|i| SimTime::from_secs(i * 5).0)
        .collect::<Vec<_>>();
    assert_eq!(spawn_times, expected);
}

#[test]
fn new_car_is_activated_at_its_spawn_instant_after_the_generator() {
    let (mut world, entrance) = world_with_entrance();
    world.viz = Some(VizLogger::default());
    let opts = TrafficOpts {
        spawn_probability: 1.0,
        move_probability: 0.0,
        ..TrafficOpts::default()
    };

    let mut sim = Simulator::default();
    sim.schedule(SimTime::ZERO, SpawnCars { entrance, opts });
    sim.run_until(SimTime::ZERO, &mut world);

    let kinds = world
        .viz
        .as_ref()
        .expect("viz enabled")
        .events
        .iter()
        .map(|e| e.kind.clone())
        .collect::<Vec<_>>();
    assert_eq!(
        kinds,
        vec![
            VizEventKind::Spawn { node: entrance.0 },
            VizEventKind::Hesitate { node: entrance.0 },
        ]
    );
    // 生成器与新车各有一次待唤醒
    assert_eq!(sim.pending(), 2);
}

#[test]
fn generator_keeps_running_even_when_it_never_spawns() {
    let (mut world, entrance) = world_with_entrance();
    let opts = TrafficOpts {
        spawn_probability: 0.0,
        ..TrafficOpts::default()
    };

    let mut sim = Simulator::default();
    sim.schedule(SimTime::ZERO, SpawnCars { entrance, opts });
    sim.run_until(SimTime::from_secs(100), &mut world);

    assert_eq!(world.stats.spawned_cars, 0);
    assert_eq!(sim.executed(), 21);
    assert_eq!(sim.pending(), 1);
}
