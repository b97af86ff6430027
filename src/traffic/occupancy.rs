//! 占用采样事件
//!
//! 按固定间隔把占用快照写入可视化记录，和仿真逻辑本身解耦。

use std::sync::Arc;

use crate::road::RoadWorld;
use crate::sim::{Event, SimTime, Simulator, World};
use crate::topo::roundabout::RoundaboutTopology;
use crate::viz::VizEventKind;
use tracing::trace;

#[derive(Debug)]
pub struct SampleOccupancy {
    pub topology: Arc<RoundaboutTopology>,
    pub every: SimTime,
}

impl Event for SampleOccupancy {
    fn execute(self: Box<Self>, sim: &mut Simulator, world: &mut dyn World) {
        let me = *self;
        let w = world
            .as_any_mut()
            .downcast_mut::<RoadWorld>()
            .expect("world must be RoadWorld");
        if w.viz.is_none() || w.halted() {
            return;
        }

        let snapshot = me.topology.snapshot(&w.net, sim.now());
        trace!(cars = snapshot.total_cars(), "占用快照");
        w.viz_push(sim.now(), None, VizEventKind::Occupancy { snapshot });

        let every = me.every;
        sim.schedule_in(every, me);
    }
}
