//! 道路世界实现
//!
//! 持有道路网络、随机源、统计与可视化记录，作为显式的仿真上下文传给每个事件。

use super::error::CapacityViolation;
use super::id::CarId;
use super::network::RoadNetwork;
use super::stats::Stats;
use crate::sim::{SimRng, SimTime, World};
use crate::viz::{VizEvent, VizEventKind, VizLogger};
use std::any::Any;
use tracing::error;

#[derive(Debug)]
pub struct RoadWorld {
    pub net: RoadNetwork,
    pub rng: SimRng,
    pub stats: Stats,
    pub viz: Option<VizLogger>,
    next_car_id: u64,
    fault: Option<CapacityViolation>,
}

impl RoadWorld {
    pub fn new(seed: u64) -> Self {
        Self {
            net: RoadNetwork::default(),
            rng: SimRng::new(seed),
            stats: Stats::default(),
            viz: None,
            next_car_id: 0,
            fault: None,
        }
    }

    /// 为新车分配标识符
    pub fn allocate_car(&mut self) -> CarId {
        let id = CarId(self.next_car_id);
        self.next_car_id += 1;
        id
    }

    /// 记录致命的容量错误；调度器将在本事件结束后停止
    pub fn record_fault(&mut self, err: CapacityViolation) {
        error!(%err, "容量不变量被破坏，停止仿真");
        if self.fault.is_none() {
            self.fault = Some(err);
        }
    }

    pub fn fault(&self) -> Option<&CapacityViolation> {
        self.fault.as_ref()
    }

    pub fn take_fault(&mut self) -> Option<CapacityViolation> {
        self.fault.take()
    }

    pub(crate) fn viz_push(&mut self, at: SimTime, car: Option<CarId>, kind: VizEventKind) {
        if let Some(v) = &mut self.viz {
            v.push(VizEvent {
                t_ns: at.0,
                car_id: car.map(|c| c.0),
                kind,
            });
        }
    }
}

impl Default for RoadWorld {
    fn default() -> Self {
        Self::new(0)
    }
}

impl World for RoadWorld {
    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn halted(&self) -> bool {
        self.fault.is_some()
    }
}
