//! 统计信息
//!
//! 定义交通仿真统计数据结构。

/// 交通统计信息
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Stats {
    pub spawned_cars: u64,
    pub exited_cars: u64,
    pub moves: u64,
    pub blocked_moves: u64,
    pub hesitations: u64,
}

impl Stats {
    /// 仍在环岛内行驶的车辆数
    pub fn traveling(&self) -> u64 {
        self.spawned_cars.saturating_sub(self.exited_cars)
    }
}
