//! 错误类型
//!
//! `CapacityViolation` 与 `TopologyError` 都是致命错误：前者意味着智能体逻辑或
//! 拓扑存在缺陷，后者阻止仿真启动。被阻塞的移动不是错误。

use thiserror::Error;

use super::id::NodeId;

/// 试图超出节点容量，或从空节点释放容量
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CapacityViolation {
    #[error("node {name} ({node}) is full: {max} of {max} slots taken")]
    Full { node: NodeId, name: String, max: u32 },

    #[error("node {name} ({node}) has no occupied slot to release")]
    Empty { node: NodeId, name: String },

    #[error("node {name} ({node}) is an exit and cannot be occupied")]
    NotOccupiable { node: NodeId, name: String },
}

/// 拓扑构建期错误
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TopologyError {
    #[error("invalid topology options: {0}")]
    InvalidOpts(String),

    /// 同一圈所有 slot 弧长相同，因此按整圈报告
    #[error("ring {radius} would hold zero cars (arc length {arc_length:.3} < car spacing {car_spacing})")]
    ZeroCapacity {
        radius: u32,
        arc_length: f64,
        car_spacing: f64,
    },

    #[error("node {name} has invalid transition probabilities (sum = {sum}, negative = {has_negative})")]
    Probabilities {
        name: String,
        sum: f64,
        has_negative: bool,
    },

    #[error("unknown node {0}")]
    UnknownNode(NodeId),
}

/// 运行期可能返回的错误
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SimError {
    #[error(transparent)]
    Topology(#[from] TopologyError),

    #[error(transparent)]
    Capacity(#[from] CapacityViolation),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}
