//! 车辆智能体
//!
//! 每辆车是一个只占用一个节点的独立进程：被唤醒后按概率决定是否尝试移动，
//! 从当前节点的出边中抽样目标，然后驶出、前进或原地受阻。

use crate::road::{CapacityViolation, CarId, NodeId, RoadWorld};
use crate::sim::{ActivationDelay, Event, SimTime, Simulator, TrafficOpts, World};
use crate::viz::VizEventKind;
use tracing::{debug, info, trace, warn};

/// 车辆状态
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CarState {
    Traveling,
    /// 终态：已驶出，不再被调度
    Exited,
}

/// 一次唤醒的结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    /// 本次未尝试移动
    Hesitated,
    Moved { from: NodeId, to: NodeId },
    /// 目标已满，原地等待
    Blocked { from: NodeId, to: NodeId },
    Exited { from: NodeId, exit: NodeId },
    /// 当前节点没有可选出边
    NoRoute,
}

/// 车辆：占用（但不拥有）`current` 节点的一个容量位
#[derive(Debug, Clone)]
pub struct Car {
    id: CarId,
    current: NodeId,
    state: CarState,
}

impl Car {
    /// 在入口处生成一辆车并占用入口的一个位
    pub fn spawn(world: &mut RoadWorld, at: NodeId) -> Result<Car, CapacityViolation> {
        world.net.enter(at)?;
        let id = world.allocate_car();
        world.stats.spawned_cars += 1;
        Ok(Car {
            id,
            current: at,
            state: CarState::Traveling,
        })
    }

    pub fn id(&self) -> CarId {
        self.id
    }

    pub fn current_node(&self) -> NodeId {
        self.current
    }

    pub fn state(&self) -> CarState {
        self.state
    }

    /// 执行一次唤醒。释放旧位与占用新位在同一次调用内完成。
    #[tracing::instrument(level = "debug", skip(self, world, opts), fields(car = %self.id, node = %self.current))]
    pub fn step(
        &mut self,
        world: &mut RoadWorld,
        opts: &TrafficOpts,
    ) -> Result<StepOutcome, CapacityViolation> {
        debug_assert_eq!(self.state, CarState::Traveling);

        if !world.rng.gen_bool(opts.move_probability) {
            trace!("本次不移动");
            world.stats.hesitations += 1;
            return Ok(StepOutcome::Hesitated);
        }

        let u = world.rng.uniform();
        let from = self.current;
        let Some(to) = world.net.sample_next(from, u) else {
            warn!("当前节点没有出边");
            world.stats.hesitations += 1;
            return Ok(StepOutcome::NoRoute);
        };

        if world.net.node(to).is_exit() {
            world.net.leave(from)?;
            self.state = CarState::Exited;
            world.stats.exited_cars += 1;
            info!(exit = world.net.node(to).name(), "🚗 驶出环岛");
            return Ok(StepOutcome::Exited { from, exit: to });
        }

        if world.net.can_move(to) {
            world.net.transfer(from, to)?;
            self.current = to;
            world.stats.moves += 1;
            debug!(to = world.net.node(to).name(), "前进");
            Ok(StepOutcome::Moved { from, to })
        } else {
            world.stats.blocked_moves += 1;
            debug!(to = world.net.node(to).name(), "目标已满，原地等待");
            Ok(StepOutcome::Blocked { from, to })
        }
    }

    /// 下一次唤醒前的等待时间
    pub fn next_delay(&self, world: &mut RoadWorld, opts: &TrafficOpts) -> SimTime {
        match opts.activation {
            ActivationDelay::Fixed { every } => SimTime::from_units_f64(every),
            ActivationDelay::Dwell => {
                let mean = world
                    .net
                    .node(self.current)
                    .exit_time()
                    .map(SimTime::as_units_f64)
                    .unwrap_or(0.0);
                SimTime::from_units_f64(world.rng.exponential(mean))
            }
        }
    }
}

/// 事件：唤醒一辆车
#[derive(Debug)]
pub struct CarStep {
    pub car: Car,
    pub opts: TrafficOpts,
}

impl Event for CarStep {
    fn execute(self: Box<Self>, sim: &mut Simulator, world: &mut dyn World) {
        let CarStep { mut car, opts } = *self;
        let w = world
            .as_any_mut()
            .downcast_mut::<RoadWorld>()
            .expect("world must be RoadWorld");
        if w.halted() {
            return;
        }

        let now = sim.now();
        let outcome = match car.step(w, &opts) {
            Ok(outcome) => outcome,
            Err(err) => {
                w.record_fault(err);
                return;
            }
        };

        let kind = match outcome {
            StepOutcome::Hesitated | StepOutcome::NoRoute => VizEventKind::Hesitate {
                node: car.current.0,
            },
            StepOutcome::Moved { from, to } => VizEventKind::Move {
                from: from.0,
                to: to.0,
            },
            StepOutcome::Blocked { from, to } => VizEventKind::Blocked {
                from: from.0,
                to: to.0,
            },
            StepOutcome::Exited { from, exit } => VizEventKind::Exit {
                from: from.0,
                exit: exit.0,
            },
        };
        w.viz_push(now, Some(car.id), kind);

        if car.state == CarState::Exited {
            return;
        }
        let delay = car.next_delay(w, &opts);
        sim.schedule_in(delay, CarStep { car, opts });
    }
}
