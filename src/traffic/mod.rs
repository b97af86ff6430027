//! 交通智能体模块
//!
//! 车辆、入口生成器、占用采样，以及把它们与调度器组合起来的仿真上下文。

mod car;
mod generator;
mod occupancy;
mod roundabout;

pub use car::{Car, CarState, CarStep, StepOutcome};
pub use generator::SpawnCars;
pub use occupancy::SampleOccupancy;
pub use roundabout::{Roundabout, RunSummary};
