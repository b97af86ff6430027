//! 运行配置
//!
//! 所有选项都显式列出；时间类字段以浮点“时间单位”表示，便于 JSON 配置书写。

use serde::{Deserialize, Serialize};

use super::time::SimTime;
use crate::topo::roundabout::RoundaboutOpts;

/// 一次仿真运行的完整配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    pub topology: RoundaboutOpts,
    pub traffic: TrafficOpts,
    /// 时钟到达该值时停止运行（时间单位）
    pub simulation_horizon: f64,
    pub random_seed: u64,
    /// 占用快照的采样间隔（时间单位）；None 表示不采样
    pub snapshot_interval: Option<f64>,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            topology: RoundaboutOpts::default(),
            traffic: TrafficOpts::default(),
            simulation_horizon: 1000.0,
            random_seed: 0,
            snapshot_interval: Some(5.0),
        }
    }
}

impl SimConfig {
    pub fn horizon(&self) -> SimTime {
        SimTime::from_units_f64(self.simulation_horizon)
    }

    /// 仿真时长须为有限非负数；采样间隔若给出须为有限非负数（0 表示不采样）
    pub fn validate(&self) -> Result<(), String> {
        let h = self.simulation_horizon;
        if !(h.is_finite() && h >= 0.0) {
            return Err(format!(
                "simulation_horizon must be finite and non-negative, got {h}"
            ));
        }
        if let Some(every) = self.snapshot_interval {
            if !(every.is_finite() && every >= 0.0) {
                return Err(format!(
                    "snapshot_interval must be finite and non-negative, got {every}"
                ));
            }
        }
        self.traffic.validate()
    }

    pub fn snapshot_every(&self) -> Option<SimTime> {
        self.snapshot_interval
            .map(SimTime::from_units_f64)
            .filter(|t| *t > SimTime::ZERO)
    }
}

/// 车辆与入口生成器的行为参数
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrafficOpts {
    /// 每次生成器唤醒时产生新车的概率
    pub spawn_probability: f64,
    /// 生成器两次唤醒之间的间隔（时间单位）
    pub spawn_interval: f64,
    /// 车辆每次唤醒时尝试移动的概率（其余情况视为犹豫/让行）
    pub move_probability: f64,
    pub activation: ActivationDelay,
}

impl Default for TrafficOpts {
    fn default() -> Self {
        Self {
            spawn_probability: 0.5,
            spawn_interval: 5.0,
            move_probability: 0.5,
            activation: ActivationDelay::default(),
        }
    }
}

impl TrafficOpts {
    pub fn spawn_every(&self) -> SimTime {
        SimTime::from_units_f64(self.spawn_interval)
    }

    /// 概率须在 [0, 1] 内，间隔须为正（否则生成器会在同一时刻无限重排）
    pub fn validate(&self) -> Result<(), String> {
        for (name, p) in [
            ("spawn_probability", self.spawn_probability),
            ("move_probability", self.move_probability),
        ] {
            if !(0.0..=1.0).contains(&p) {
                return Err(format!("{name} must be within [0, 1], got {p}"));
            }
        }
        if self.spawn_every() == SimTime::ZERO {
            return Err(format!(
                "spawn_interval must be positive, got {}",
                self.spawn_interval
            ));
        }
        if let ActivationDelay::Fixed { every } = self.activation {
            if SimTime::from_units_f64(every) == SimTime::ZERO {
                return Err(format!("activation interval must be positive, got {every}"));
            }
        }
        Ok(())
    }
}

/// 车辆两次唤醒之间的间隔分布
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ActivationDelay {
    /// 固定间隔（时间单位）
    Fixed { every: f64 },
    /// 指数分布，均值为所在节点的 `exit_time`
    Dwell,
}

impl Default for ActivationDelay {
    fn default() -> Self {
        ActivationDelay::Fixed { every: 5.0 }
    }
}
