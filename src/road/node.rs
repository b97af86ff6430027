//! 节点类型
//!
//! 节点是带容量上限的车道弧段。入口、出口与普通车道节点用标签变体区分，
//! 每个变体只携带与自身相关的字段。

use super::error::CapacityViolation;
use super::id::NodeId;
use super::sampler::CategoricalSampler;
use crate::sim::SimTime;

/// 概率和允许的浮点误差
pub const PROBABILITY_TOLERANCE: f64 = 1e-9;

/// 节点的出边及其转移概率
///
/// 出边按登记顺序保存，抽样表随每次 `connect` 重建。
#[derive(Debug, Clone, Default)]
pub struct Transitions {
    edges: Vec<(NodeId, f64)>,
    sampler: CategoricalSampler,
}

impl Transitions {
    /// 登记或覆盖一条出边
    pub fn connect(&mut self, to: NodeId, probability: f64) {
        match self.edges.iter_mut().find(|(t, _)| *t == to) {
            Some(edge) => edge.1 = probability,
            None => self.edges.push((to, probability)),
        }
        self.sampler = CategoricalSampler::new(&self.edges);
    }

    pub fn edges(&self) -> &[(NodeId, f64)] {
        &self.edges
    }

    pub fn len(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    pub fn probability(&self, to: NodeId) -> Option<f64> {
        self.edges.iter().find(|(t, _)| *t == to).map(|(_, p)| *p)
    }

    pub fn sum(&self) -> f64 {
        self.edges.iter().map(|(_, p)| p).sum()
    }

    pub fn has_negative(&self) -> bool {
        self.edges.iter().any(|(_, p)| *p < 0.0)
    }

    /// 所有概率非负且总和为 1
    pub fn verify(&self) -> bool {
        !self.has_negative() && (self.sum() - 1.0).abs() <= PROBABILITY_TOLERANCE
    }

    pub fn sample(&self, u: f64) -> Option<NodeId> {
        self.sampler.pick(u)
    }
}

/// 节点变体
#[derive(Debug, Clone)]
pub enum NodeKind {
    /// 环岛内部的车道弧段
    Lane {
        exit_time: SimTime,
        max_capacity: u32,
        current_capacity: u32,
        outgoing: Transitions,
    },
    /// 入口：容量无限，唯一出边以概率 1 通向最外圈
    Entrance {
        exit_time: SimTime,
        current_capacity: u32,
        outgoing: Transitions,
    },
    /// 出口：终点，无出边、不计容量
    Exit,
}

/// 节点
#[derive(Debug, Clone)]
pub struct Node {
    id: NodeId,
    name: String,
    kind: NodeKind,
}

impl Node {
    pub fn lane(id: NodeId, name: impl Into<String>, exit_time: SimTime, max_capacity: u32) -> Self {
        Self {
            id,
            name: name.into(),
            kind: NodeKind::Lane {
                exit_time,
                max_capacity,
                current_capacity: 0,
                outgoing: Transitions::default(),
            },
        }
    }

    pub fn entrance(id: NodeId, name: impl Into<String>, exit_time: SimTime) -> Self {
        Self {
            id,
            name: name.into(),
            kind: NodeKind::Entrance {
                exit_time,
                current_capacity: 0,
                outgoing: Transitions::default(),
            },
        }
    }

    pub fn exit(id: NodeId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            kind: NodeKind::Exit,
        }
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> &NodeKind {
        &self.kind
    }

    pub fn is_exit(&self) -> bool {
        matches!(self.kind, NodeKind::Exit)
    }

    pub fn is_entrance(&self) -> bool {
        matches!(self.kind, NodeKind::Entrance { .. })
    }

    pub fn exit_time(&self) -> Option<SimTime> {
        match &self.kind {
            NodeKind::Lane { exit_time, .. } | NodeKind::Entrance { exit_time, .. } => {
                Some(*exit_time)
            }
            NodeKind::Exit => None,
        }
    }

    /// 当前占用数；出口恒为 0
    pub fn current_capacity(&self) -> u32 {
        match &self.kind {
            NodeKind::Lane {
                current_capacity, ..
            }
            | NodeKind::Entrance {
                current_capacity, ..
            } => *current_capacity,
            NodeKind::Exit => 0,
        }
    }

    /// 容量上限；入口无限（None），出口不计容量（Some(0)）
    pub fn max_capacity(&self) -> Option<u32> {
        match &self.kind {
            NodeKind::Lane { max_capacity, .. } => Some(*max_capacity),
            NodeKind::Entrance { .. } => None,
            NodeKind::Exit => Some(0),
        }
    }

    /// 出边；出口返回 None
    pub fn outgoing(&self) -> Option<&Transitions> {
        match &self.kind {
            NodeKind::Lane { outgoing, .. } | NodeKind::Entrance { outgoing, .. } => Some(outgoing),
            NodeKind::Exit => None,
        }
    }

    /// 登记出边。出口没有出边，返回 false。
    pub fn connect(&mut self, to: NodeId, probability: f64) -> bool {
        match &mut self.kind {
            NodeKind::Lane { outgoing, .. } | NodeKind::Entrance { outgoing, .. } => {
                outgoing.connect(to, probability);
                true
            }
            NodeKind::Exit => false,
        }
    }

    /// 是否还能再容纳一辆车（纯查询）
    pub fn can_move(&self) -> bool {
        match &self.kind {
            NodeKind::Lane {
                max_capacity,
                current_capacity,
                ..
            } => current_capacity < max_capacity,
            NodeKind::Entrance { .. } => true,
            NodeKind::Exit => false,
        }
    }

    /// 占用一个容量位
    pub fn enter(&mut self) -> Result<(), CapacityViolation> {
        match &mut self.kind {
            NodeKind::Lane {
                max_capacity,
                current_capacity,
                ..
            } => {
                if *current_capacity >= *max_capacity {
                    return Err(CapacityViolation::Full {
                        node: self.id,
                        name: self.name.clone(),
                        max: *max_capacity,
                    });
                }
                *current_capacity += 1;
                Ok(())
            }
            NodeKind::Entrance {
                current_capacity, ..
            } => {
                *current_capacity = current_capacity.saturating_add(1);
                Ok(())
            }
            NodeKind::Exit => Err(CapacityViolation::NotOccupiable {
                node: self.id,
                name: self.name.clone(),
            }),
        }
    }

    /// 释放一个容量位
    pub fn leave(&mut self) -> Result<(), CapacityViolation> {
        match &mut self.kind {
            NodeKind::Lane {
                current_capacity, ..
            }
            | NodeKind::Entrance {
                current_capacity, ..
            } => {
                if *current_capacity == 0 {
                    return Err(CapacityViolation::Empty {
                        node: self.id,
                        name: self.name.clone(),
                    });
                }
                *current_capacity -= 1;
                Ok(())
            }
            NodeKind::Exit => Err(CapacityViolation::NotOccupiable {
                node: self.id,
                name: self.name.clone(),
            }),
        }
    }

    /// 诊断检查：出边概率非负且和为 1。出口是终点，恒为 true。
    pub fn verify(&self) -> bool {
        self.outgoing().is_none_or(Transitions::verify)
    }
}
