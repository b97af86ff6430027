//! 仿真时间类型
//!
//! 定义仿真时间及其单位转换。一个“时间单位”对应 `SimTime` 的一秒。

use serde::{Deserialize, Serialize};
use std::fmt;

/// 仿真时间（纳秒）。
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct SimTime(pub u64);

impl SimTime {
    pub const ZERO: SimTime = SimTime(0);
    pub const NANOS_PER_UNIT: u64 = 1_000_000_000;

    pub fn from_millis(ms: u64) -> SimTime {
        SimTime(ms.saturating_mul(1_000_000))
    }
    pub fn from_secs(s: u64) -> SimTime {
        SimTime(s.saturating_mul(Self::NANOS_PER_UNIT))
    }

    /// 由浮点时间单位换算；负数与 NaN 视为 0，超出范围饱和。
    pub fn from_units_f64(units: f64) -> SimTime {
        if !(units > 0.0) {
            return SimTime::ZERO;
        }
        let nanos = (units * Self::NANOS_PER_UNIT as f64).round();
        if nanos >= u64::MAX as f64 {
            SimTime(u64::MAX)
        } else {
            SimTime(nanos as u64)
        }
    }

    /// 转换为浮点时间单位
    pub fn as_units_f64(self) -> f64 {
        self.0 as f64 / Self::NANOS_PER_UNIT as f64
    }

    pub fn saturating_add(self, rhs: SimTime) -> SimTime {
        SimTime(self.0.saturating_add(rhs.0))
    }
}

impl fmt::Display for SimTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "t={:.3}", self.as_units_f64())
    }
}
