//! 入口生成器
//!
//! 每个入口一个无限循环的进程：每次唤醒以 `spawn_probability` 生成一辆车，
//! 然后在 `spawn_interval` 之后再次唤醒。

use super::car::{Car, CarStep};
use crate::road::{NodeId, RoadWorld};
use crate::sim::{Event, Simulator, TrafficOpts, World};
use crate::viz::VizEventKind;
use tracing::{debug, info};

/// 事件：入口生成器的一次唤醒
#[derive(Debug)]
pub struct SpawnCars {
    pub entrance: NodeId,
    pub opts: TrafficOpts,
}

impl Event for SpawnCars {
    #[tracing::instrument(level = "debug", skip(self, sim, world), fields(entrance = %self.entrance))]
    fn execute(self: Box<Self>, sim: &mut Simulator, world: &mut dyn World) {
        let me = *self;
        let w = world
            .as_any_mut()
            .downcast_mut::<RoadWorld>()
            .expect("world must be RoadWorld");
        if w.halted() {
            return;
        }

        if w.rng.gen_bool(me.opts.spawn_probability) {
            let car = match Car::spawn(w, me.entrance) {
                Ok(car) => car,
                Err(err) => {
                    w.record_fault(err);
                    return;
                }
            };
            info!(car = %car.id(), now = %sim.now(), "🚙 新车进入入口");
            w.viz_push(
                sim.now(),
                Some(car.id()),
                VizEventKind::Spawn {
                    node: me.entrance.0,
                },
            );
            // 新车在生成时刻立即获得第一次唤醒（排在本事件之后）
            sim.schedule(sim.now(), CarStep { car, opts: me.opts });
        } else {
            debug!("本次未生成车辆");
        }

        let every = me.opts.spawn_every();
        sim.schedule_in(every, me);
    }
}
