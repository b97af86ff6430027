//! 可视化事件记录（用于离线回放）
//!
//! 可视化组件自行决定刷新频率与渲染方式；这里只提供结构化的 JSON 事件：
//! 拓扑元信息、车辆事件，以及按固定间隔采样的占用快照。

mod types;

pub use types::{
    OccupancyCell, OccupancySnapshot, VizEdgeInfo, VizEvent, VizEventKind, VizLogger, VizNodeInfo,
    VizNodeKind,
};
