//! 道路模型模块
//!
//! 此模块包含环岛道路网络的核心组件：节点、转移概率、抽样器、网络与世界。

// 子模块声明
mod error;
mod id;
mod network;
mod node;
mod road_world;
mod sampler;
mod stats;

// 重新导出公共接口
pub use error::{CapacityViolation, SimError, TopologyError};
pub use id::{CarId, NodeId};
pub use network::RoadNetwork;
pub use node::{Node, NodeKind, PROBABILITY_TOLERANCE, Transitions};
pub use road_world::RoadWorld;
pub use sampler::CategoricalSampler;
pub use stats::Stats;
