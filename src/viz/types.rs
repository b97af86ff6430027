use serde::{Deserialize, Serialize};

/// 可视化事件类型
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum VizEventKind {
    /// 拓扑元信息（作为 t=0 的第一条事件）
    Meta {
        nodes: Vec<VizNodeInfo>,
        edges: Vec<VizEdgeInfo>,
    },
    /// 入口生成了一辆新车
    Spawn { node: usize },
    /// 车辆移动到下一个节点
    Move { from: usize, to: usize },
    /// 目标节点已满，车辆原地等待下一次唤醒
    Blocked { from: usize, to: usize },
    /// 车辆本次唤醒未尝试移动
    Hesitate { node: usize },
    /// 车辆驶离环岛
    Exit { from: usize, exit: usize },
    /// 全部车道的占用快照
    Occupancy { snapshot: OccupancySnapshot },
}

/// 节点类型（用于可视化区分）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VizNodeKind {
    Lane,
    Entrance,
    Exit,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VizNodeInfo {
    pub id: usize,
    pub name: String,
    pub kind: VizNodeKind,
    /// 车道节点的 (radius, slot)；入口/出口为所在 slot
    #[serde(skip_serializing_if = "Option::is_none")]
    pub radius: Option<u32>,
    pub slot: u32,
    /// 入口为 None（无限）
    pub max_capacity: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VizEdgeInfo {
    pub from: usize,
    pub to: usize,
    pub probability: f64,
}

/// 某一时刻单个车道节点的占用
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OccupancyCell {
    pub radius: u32,
    pub slot: u32,
    pub current_capacity: u32,
    pub max_capacity: u32,
}

/// 只读占用快照：每个 (radius, slot) 的 (current, max)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OccupancySnapshot {
    pub t_ns: u64,
    pub cells: Vec<OccupancyCell>,
}

impl OccupancySnapshot {
    pub fn get(&self, radius: u32, slot: u32) -> Option<(u32, u32)> {
        self.cells
            .iter()
            .find(|c| c.radius == radius && c.slot == slot)
            .map(|c| (c.current_capacity, c.max_capacity))
    }

    pub fn total_cars(&self) -> u64 {
        self.cells.iter().map(|c| u64::from(c.current_capacity)).sum()
    }
}

/// 一个可回放的事件（JSON）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VizEvent {
    /// 仿真时间（纳秒，和 `SimTime.0` 同口径）
    pub t_ns: u64,
    pub car_id: Option<u64>,
    #[serde(flatten)]
    pub kind: VizEventKind,
}

/// 一个简单的事件收集器（存内存，仿真结束写 JSON 文件）
#[derive(Debug, Default)]
pub struct VizLogger {
    pub events: Vec<VizEvent>,
}

impl VizLogger {
    pub fn push(&mut self, ev: VizEvent) {
        self.events.push(ev);
    }

    /// 只保留车辆移动相关的事件（不含元信息与快照）
    pub fn agent_events(&self) -> impl Iterator<Item = &VizEvent> {
        self.events.iter().filter(|e| {
            !matches!(
                e.kind,
                VizEventKind::Meta { .. } | VizEventKind::Occupancy { .. }
            )
        })
    }

    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(&self.events)
    }
}
