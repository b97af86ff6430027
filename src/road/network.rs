//! 道路网络
//!
//! 持有全部节点。结构（节点、出边、概率）在拓扑构建后只读；
//! 运行期间唯一可变的是各节点的占用计数。

use super::error::{CapacityViolation, TopologyError};
use super::id::NodeId;
use super::node::{Node, NodeKind};
use crate::sim::SimTime;
use tracing::{debug, trace};

#[derive(Debug, Default)]
pub struct RoadNetwork {
    nodes: Vec<Node>,
}

impl RoadNetwork {
    fn next_id(&self) -> NodeId {
        NodeId(self.nodes.len())
    }

    /// 添加车道节点
    pub fn add_lane(&mut self, name: impl Into<String>, exit_time: SimTime, max_capacity: u32) -> NodeId {
        let id = self.next_id();
        self.nodes.push(Node::lane(id, name, exit_time, max_capacity));
        id
    }

    /// 添加入口节点
    pub fn add_entrance(&mut self, name: impl Into<String>, exit_time: SimTime) -> NodeId {
        let id = self.next_id();
        self.nodes.push(Node::entrance(id, name, exit_time));
        id
    }

    /// 添加出口节点
    pub fn add_exit(&mut self, name: impl Into<String>) -> NodeId {
        let id = self.next_id();
        self.nodes.push(Node::exit(id, name));
        id
    }

    /// 登记（或覆盖）一条有向出边
    pub fn connect(&mut self, from: NodeId, to: NodeId, probability: f64) -> Result<(), TopologyError> {
        if to.0 >= self.nodes.len() {
            return Err(TopologyError::UnknownNode(to));
        }
        let node = self
            .nodes
            .get_mut(from.0)
            .ok_or(TopologyError::UnknownNode(from))?;
        if !node.connect(to, probability) {
            return Err(TopologyError::InvalidOpts(format!(
                "exit node {} cannot have outgoing edges",
                node.name()
            )));
        }
        trace!(from = %from, to = %to, probability, "登记出边");
        Ok(())
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0)
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn can_move(&self, id: NodeId) -> bool {
        self.node(id).can_move()
    }

    pub fn enter(&mut self, id: NodeId) -> Result<(), CapacityViolation> {
        self.nodes[id.0].enter()
    }

    pub fn leave(&mut self, id: NodeId) -> Result<(), CapacityViolation> {
        self.nodes[id.0].leave()
    }

    /// 把一辆车从 `from` 移到 `to`：先释放旧位，再占用新位。
    ///
    /// 调用方必须先确认 `to` 可容纳；若占用失败，旧位会被恢复后再返回错误，
    /// 两个节点都不会留下中间状态。
    pub fn transfer(&mut self, from: NodeId, to: NodeId) -> Result<(), CapacityViolation> {
        self.leave(from)?;
        if let Err(e) = self.enter(to) {
            // 刚释放的位必定可以重新占用
            self.nodes[from.0].enter()?;
            return Err(e);
        }
        debug!(from = %from, to = %to, "占用已转移");
        Ok(())
    }

    /// 用一次均匀抽样 `u` 从 `from` 的出边中选出下一个节点
    pub fn sample_next(&self, from: NodeId, u: f64) -> Option<NodeId> {
        self.node(from).outgoing()?.sample(u)
    }

    /// 检查每个节点的转移概率；第一个不合法的节点作为错误返回
    pub fn verify(&self) -> Result<(), TopologyError> {
        for node in &self.nodes {
            if node.verify() {
                continue;
            }
            let (sum, has_negative) = node
                .outgoing()
                .map(|t| (t.sum(), t.has_negative()))
                .unwrap_or((0.0, false));
            return Err(TopologyError::Probabilities {
                name: node.name().to_string(),
                sum,
                has_negative,
            });
        }
        Ok(())
    }

    /// 所有车道与入口上的车辆总数
    pub fn occupied(&self) -> u64 {
        self.nodes
            .iter()
            .map(|n| u64::from(n.current_capacity()))
            .sum()
    }

    /// 所有车道节点的占用都处于 [0, max] 内
    pub fn capacity_invariant_holds(&self) -> bool {
        self.nodes.iter().all(|n| match n.kind() {
            NodeKind::Lane {
                max_capacity,
                current_capacity,
                ..
            } => current_capacity <= max_capacity,
            _ => true,
        })
    }
}
