//! 多车道环岛拓扑构建
//!
//! 在 `[start_radius, lane_count] × [0, angular_resolution)` 上为每个
//! (radius, slot) 生成一个车道节点，按三轮规则连边（前进、外移、内移），
//! 再在每个出入口 slot 挂上一个入口和一个出口。

use std::collections::BTreeMap;
use std::f64::consts::PI;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::road::{NodeId, RoadNetwork, RoadWorld, TopologyError};
use crate::sim::SimTime;
use crate::viz::{
    OccupancyCell, OccupancySnapshot, VizEdgeInfo, VizEventKind, VizNodeInfo, VizNodeKind,
};

const FORWARD_INTERIOR: f64 = 0.5;
const FORWARD_BOUNDARY: f64 = 0.7;
const OUTWARD: f64 = 0.25;
const OUTWARD_INNERMOST: f64 = 0.3;
const INWARD: f64 = 0.25;
const INWARD_OUTERMOST_AT_GATE: f64 = 0.15;
const INWARD_OUTERMOST: f64 = 0.3;
const EXIT_SIPHON: f64 = 0.15;
const ENTRANCE_EXIT_TIME: f64 = 0.5;

/// 环岛拓扑配置选项
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoundaboutOpts {
    /// 最外圈半径（车道圈数的上界）
    pub lane_count: u32,
    /// 每圈的 slot 数
    pub angular_resolution: u32,
    pub speed_limit: f64,
    /// 相邻出入口之间相隔的 slot 数
    pub entrance_spacing: u32,
    /// 最内圈半径（中心岛之外的第一条车道）
    pub start_radius: u32,
    /// 假定的最小车距（长度单位）
    pub car_spacing: f64,
}

impl Default for RoundaboutOpts {
    fn default() -> Self {
        Self {
            lane_count: 5,
            angular_resolution: 5,
            speed_limit: 10.0,
            entrance_spacing: 2,
            start_radius: 3,
            car_spacing: 3.0,
        }
    }
}

impl RoundaboutOpts {
    fn validate(&self) -> Result<(), TopologyError> {
        let bad = |msg: String| Err(TopologyError::InvalidOpts(msg));
        if self.start_radius == 0 {
            return bad("start_radius must be at least 1".into());
        }
        if self.lane_count < self.start_radius {
            return bad(format!(
                "lane_count ({}) must not be smaller than start_radius ({})",
                self.lane_count, self.start_radius
            ));
        }
        if self.angular_resolution == 0 {
            return bad("angular_resolution must be at least 1".into());
        }
        if !(self.speed_limit.is_finite() && self.speed_limit > 0.0) {
            return bad(format!("speed_limit must be positive, got {}", self.speed_limit));
        }
        if !(self.car_spacing.is_finite() && self.car_spacing > 0.0) {
            return bad(format!("car_spacing must be positive, got {}", self.car_spacing));
        }
        Ok(())
    }

    /// 半径 `r` 上单个 slot 的弧长
    pub fn arc_length(&self, radius: u32) -> f64 {
        2.0 * PI * f64::from(radius) / f64::from(self.angular_resolution)
    }

    /// slot 是否挂有出入口
    pub fn is_gate(&self, slot: u32) -> bool {
        slot % self.entrance_spacing.saturating_add(1) == 0
    }

    pub fn radii(&self) -> std::ops::RangeInclusive<u32> {
        self.start_radius..=self.lane_count
    }
}

/// 构建完成的环岛拓扑：坐标到节点的映射，以及按 slot 索引的出入口
#[derive(Debug, Clone)]
pub struct RoundaboutTopology {
    pub opts: RoundaboutOpts,
    lanes: Vec<NodeId>,
    pub entrances: BTreeMap<u32, NodeId>,
    pub exits: BTreeMap<u32, NodeId>,
}

impl RoundaboutTopology {
    fn index(&self, radius: u32, slot: u32) -> Option<usize> {
        if !self.opts.radii().contains(&radius) || slot >= self.opts.angular_resolution {
            return None;
        }
        let ring = (radius - self.opts.start_radius) as usize;
        Some(ring * self.opts.angular_resolution as usize + slot as usize)
    }

    /// (radius, slot) 处的车道节点
    pub fn lane(&self, radius: u32, slot: u32) -> Option<NodeId> {
        self.index(radius, slot).map(|i| self.lanes[i])
    }

    /// 所有车道坐标，按 (radius, slot) 升序
    pub fn coords(&self) -> impl Iterator<Item = (u32, u32, NodeId)> + '_ {
        let f = self.opts.angular_resolution;
        self.opts
            .radii()
            .flat_map(move |r| (0..f).map(move |k| (r, k)))
            .zip(self.lanes.iter().copied())
            .map(|((r, k), id)| (r, k, id))
    }

    pub fn lane_count(&self) -> usize {
        self.lanes.len()
    }

    /// 车道节点的坐标
    pub fn position(&self, id: NodeId) -> Option<(u32, u32)> {
        self.coords().find(|(_, _, n)| *n == id).map(|(r, k, _)| (r, k))
    }

    /// 只读占用快照，可在任意仿真时刻调用
    pub fn snapshot(&self, net: &RoadNetwork, at: SimTime) -> OccupancySnapshot {
        let cells = self
            .coords()
            .map(|(radius, slot, id)| {
                let node = net.node(id);
                OccupancyCell {
                    radius,
                    slot,
                    current_capacity: node.current_capacity(),
                    max_capacity: node.max_capacity().unwrap_or(u32::MAX),
                }
            })
            .collect();
        OccupancySnapshot { t_ns: at.0, cells }
    }

    /// 生成可视化元信息（节点与带概率的出边）
    pub fn viz_meta(&self, net: &RoadNetwork) -> VizEventKind {
        let mut nodes = Vec::with_capacity(net.len());
        for (radius, slot, id) in self.coords() {
            nodes.push(VizNodeInfo {
                id: id.0,
                name: net.node(id).name().to_string(),
                kind: VizNodeKind::Lane,
                radius: Some(radius),
                slot,
                max_capacity: net.node(id).max_capacity(),
            });
        }
        for (kind, gates) in [
            (VizNodeKind::Entrance, &self.entrances),
            (VizNodeKind::Exit, &self.exits),
        ] {
            for (&slot, &id) in gates {
                nodes.push(VizNodeInfo {
                    id: id.0,
                    name: net.node(id).name().to_string(),
                    kind,
                    radius: None,
                    slot,
                    max_capacity: net.node(id).max_capacity(),
                });
            }
        }
        nodes.sort_by_key(|n| n.id);

        let edges = net
            .nodes()
            .iter()
            .flat_map(|n| {
                n.outgoing()
                    .into_iter()
                    .flat_map(|t| t.edges())
                    .map(move |&(to, probability)| VizEdgeInfo {
                        from: n.id().0,
                        to: to.0,
                        probability,
                    })
            })
            .collect();

        VizEventKind::Meta { nodes, edges }
    }
}

/// 构建环岛拓扑
///
/// 失败条件：选项非法、某一圈的容量取整为 0、或任一节点的概率和不为 1。
/// 前两种在建点之前检出，`world` 保持不变；概率校验在连边之后进行，
/// 失败时已加入的节点留在 `world.net` 中，调用方应丢弃该 world。
pub fn build_roundabout(
    world: &mut RoadWorld,
    opts: &RoundaboutOpts,
) -> Result<RoundaboutTopology, TopologyError> {
    opts.validate()?;

    let f = opts.angular_resolution;
    let (inner, outer) = (opts.start_radius, opts.lane_count);

    // 容量先于建点检查，失败时不留下半成品
    let mut rings = Vec::with_capacity((outer - inner + 1) as usize);
    for r in opts.radii() {
        let arc_length = opts.arc_length(r);
        let capacity = (arc_length / opts.car_spacing).floor();
        if capacity < 1.0 {
            return Err(TopologyError::ZeroCapacity {
                radius: r,
                arc_length,
                car_spacing: opts.car_spacing,
            });
        }
        let exit_time = SimTime::from_units_f64(arc_length / opts.speed_limit);
        let max_capacity = capacity.min(f64::from(u32::MAX)) as u32;
        debug!(radius = r, ?exit_time, max_capacity, "车道参数");
        rings.push((exit_time, max_capacity));
    }

    let mut lanes = Vec::with_capacity(rings.len() * f as usize);
    for (r, &(exit_time, max_capacity)) in opts.radii().zip(&rings) {
        for k in 0..f {
            lanes.push(
                world
                    .net
                    .add_lane(format!("({r}, {k})"), exit_time, max_capacity),
            );
        }
    }

    let mut topo = RoundaboutTopology {
        opts: opts.clone(),
        lanes,
        entrances: BTreeMap::new(),
        exits: BTreeMap::new(),
    };
    let lane = |topo: &RoundaboutTopology, r: u32, k: u32| {
        topo.lane(r, k % f)
            .ok_or_else(|| TopologyError::InvalidOpts(format!("no lane at ({r}, {k})")))
    };

    // 前进：同一圈的下一个 slot
    for r in opts.radii() {
        let p = if inner < r && r < outer {
            FORWARD_INTERIOR
        } else {
            FORWARD_BOUNDARY
        };
        for k in 0..f {
            world.net.connect(lane(&topo, r, k)?, lane(&topo, r, k + 1)?, p)?;
        }
    }

    // 外移：外一圈的下一个 slot
    for r in inner..outer {
        let p = if r == inner { OUTWARD_INNERMOST } else { OUTWARD };
        for k in 0..f {
            world.net.connect(lane(&topo, r, k)?, lane(&topo, r + 1, k + 1)?, p)?;
        }
    }

    // 内移：内一圈的下一个 slot；最外圈在出入口处让出部分概率给出口
    for r in inner + 1..=outer {
        for k in 0..f {
            let p = match (r == outer, opts.is_gate(k)) {
                (true, true) => INWARD_OUTERMOST_AT_GATE,
                (true, false) => INWARD_OUTERMOST,
                (false, _) => INWARD,
            };
            world.net.connect(lane(&topo, r, k)?, lane(&topo, r - 1, k + 1)?, p)?;
        }
    }

    for k in (0..f).filter(|&k| opts.is_gate(k)) {
        let outer_lane = lane(&topo, outer, k)?;

        let entrance = world.net.add_entrance(
            format!("entrance {k}"),
            SimTime::from_units_f64(ENTRANCE_EXIT_TIME),
        );
        world.net.connect(entrance, outer_lane, 1.0)?;
        topo.entrances.insert(k, entrance);

        let exit = world.net.add_exit(format!("exit {k}"));
        world.net.connect(outer_lane, exit, EXIT_SIPHON)?;
        topo.exits.insert(k, exit);
    }

    world.net.verify()?;

    info!(
        lanes = topo.lane_count(),
        entrances = topo.entrances.len(),
        exits = topo.exits.len(),
        "🛣️  环岛拓扑构建完成"
    );
    Ok(topo)
}
