//! 环岛仿真上下文
//!
//! 把调度器、世界与拓扑组合成一个显式的仿真对象：构建拓扑、为每个入口启动
//! 生成器、推进到给定时刻，并提供只读的占用快照。

use std::sync::Arc;

use super::generator::SpawnCars;
use super::occupancy::SampleOccupancy;
use crate::road::{RoadWorld, SimError, Stats};
use crate::sim::{SimConfig, SimTime, Simulator};
use crate::topo::roundabout::{RoundaboutTopology, build_roundabout};
use crate::viz::{OccupancySnapshot, VizLogger};
use tracing::info;

/// 一次运行的汇总
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub now: SimTime,
    pub events: u64,
    pub stats: Stats,
    /// 仍占用车道或入口的车辆数
    pub occupied: u64,
}

pub struct Roundabout {
    config: SimConfig,
    sim: Simulator,
    world: RoadWorld,
    topology: Arc<RoundaboutTopology>,
    started: bool,
}

impl Roundabout {
    /// 校验配置并构建拓扑；任何错误都在时钟启动之前返回
    pub fn new(config: SimConfig) -> Result<Self, SimError> {
        config.validate().map_err(SimError::InvalidConfig)?;

        let mut world = RoadWorld::new(config.random_seed);
        let topology = build_roundabout(&mut world, &config.topology)?;

        Ok(Self {
            config,
            sim: Simulator::default(),
            world,
            topology: Arc::new(topology),
            started: false,
        })
    }

    /// 开启可视化记录，并写入拓扑元信息作为第一条事件
    pub fn enable_viz(&mut self) {
        if self.world.viz.is_some() {
            return;
        }
        self.world.viz = Some(VizLogger::default());
        let meta = self.topology.viz_meta(&self.world.net);
        self.world.viz_push(SimTime::ZERO, None, meta);
    }

    /// 为每个入口登记生成器（只执行一次）
    fn start(&mut self) {
        if self.started {
            return;
        }
        self.started = true;

        let opts = self.config.traffic;
        for &entrance in self.topology.entrances.values() {
            self.sim.schedule(SimTime::ZERO, SpawnCars { entrance, opts });
        }
        if self.world.viz.is_some() {
            if let Some(every) = self.config.snapshot_every() {
                self.sim.schedule(
                    SimTime::ZERO,
                    SampleOccupancy {
                        topology: Arc::clone(&self.topology),
                        every,
                    },
                );
            }
        }
        info!(
            entrances = self.topology.entrances.len(),
            seed = self.config.random_seed,
            "生成器已启动"
        );
    }

    /// 运行到配置的 `simulation_horizon`
    pub fn run(&mut self) -> Result<RunSummary, SimError> {
        let horizon = self.config.horizon();
        self.run_until(horizon)
    }

    /// 推进到 `until`；可以分段多次调用
    pub fn run_until(&mut self, until: SimTime) -> Result<RunSummary, SimError> {
        self.start();
        self.sim.run_until(until, &mut self.world);
        if let Some(err) = self.world.fault() {
            return Err(err.clone().into());
        }
        Ok(self.summary())
    }

    pub fn summary(&self) -> RunSummary {
        RunSummary {
            now: self.sim.now(),
            events: self.sim.executed(),
            stats: self.world.stats.clone(),
            occupied: self.world.net.occupied(),
        }
    }

    /// 当前时刻每个 (radius, slot) 的 (current, max)
    pub fn snapshot(&self) -> OccupancySnapshot {
        self.topology.snapshot(&self.world.net, self.sim.now())
    }

    pub fn now(&self) -> SimTime {
        self.sim.now()
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn topology(&self) -> &RoundaboutTopology {
        &self.topology
    }

    pub fn world(&self) -> &RoadWorld {
        &self.world
    }

    pub fn viz(&self) -> Option<&VizLogger> {
        self.world.viz.as_ref()
    }

    pub fn take_viz(&mut self) -> Option<VizLogger> {
        self.world.viz.take()
    }
}
