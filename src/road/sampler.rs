//! 分类分布抽样器
//!
//! 基于出边的累积概率表，每次抽样只消耗一次 [0, 1) 均匀随机数。
//! 概率为 0（或负）的出边不进入表中，永远不会被选中。

use super::id::NodeId;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CategoricalSampler {
    targets: Vec<NodeId>,
    /// cumulative[i] = 前 i+1 个正概率之和
    cumulative: Vec<f64>,
}

impl CategoricalSampler {
    /// 由 (目标, 概率) 列表构建；保持输入顺序。
    pub fn new<'a>(edges: impl IntoIterator<Item = &'a (NodeId, f64)>) -> Self {
        let mut targets = Vec::new();
        let mut cumulative = Vec::new();
        let mut acc = 0.0;
        for &(to, p) in edges {
            if p > 0.0 {
                acc += p;
                targets.push(to);
                cumulative.push(acc);
            }
        }
        Self {
            targets,
            cumulative,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    /// 表中正概率之和
    pub fn total(&self) -> f64 {
        self.cumulative.last().copied().unwrap_or(0.0)
    }

    /// 用一次均匀抽样 `u ∈ [0, 1)` 选出目标。没有可选出边时返回 None。
    pub fn pick(&self, u: f64) -> Option<NodeId> {
        let last = self.targets.len().checked_sub(1)?;
        let x = u.clamp(0.0, 1.0) * self.total();
        let idx = self.cumulative.partition_point(|&c| c <= x).min(last);
        Some(self.targets[idx])
    }
}
