//! 仿真器（协作式调度器）
//!
//! 单线程、按唤醒时间排序执行事件。任意两个挂起点之间只有一个智能体在运行，
//! 因此对节点容量的修改天然无竞争。

use super::event::Event;
use super::scheduled_event::ScheduledEvent;
use super::time::SimTime;
use super::world::World;
use std::collections::BinaryHeap;
use tracing::{debug, info, trace};

/// 事件驱动仿真器：维护仿真时钟与待唤醒队列。
#[derive(Default)]
pub struct Simulator {
    now: SimTime,
    next_seq: u64,
    executed: u64,
    q: BinaryHeap<ScheduledEvent>,
}

impl Simulator {
    /// 获取当前仿真时间
    pub fn now(&self) -> SimTime {
        self.now
    }

    /// 已执行的事件总数
    pub fn executed(&self) -> u64 {
        self.executed
    }

    /// 队列中尚未执行的事件数
    pub fn pending(&self) -> usize {
        self.q.len()
    }

    /// 调度事件在指定时间执行。早于当前时钟的请求被钳制到当前时刻。
    #[tracing::instrument(level = "trace", skip(self, ev), fields(event_type = std::any::type_name::<E>(), schedule_at = ?at))]
    pub fn schedule<E: Event>(&mut self, at: SimTime, ev: E) {
        let at = at.max(self.now);
        let seq = self.next_seq;
        self.next_seq = self.next_seq.wrapping_add(1);
        self.q.push(ScheduledEvent {
            at,
            seq,
            ev: Box::new(ev),
        });
        trace!(now = ?self.now, seq, queue_size = self.q.len(), "事件已加入队列");
    }

    /// 在 `delay` 之后唤醒
    pub fn schedule_in<E: Event>(&mut self, delay: SimTime, ev: E) {
        let at = self.now.saturating_add(delay);
        self.schedule(at, ev);
    }

    /// 运行直到队列为空、世界请求停止，或到达 `until`。
    ///
    /// 唤醒时间恰好等于 `until` 的事件仍会执行；之后的事件留在队列中，不做清理。
    #[tracing::instrument(skip(self, world), fields(until = ?until))]
    pub fn run_until(&mut self, until: SimTime, world: &mut dyn World) {
        info!(now = ?self.now, queue_size = self.q.len(), "▶️  开始运行仿真");

        let start_count = self.executed;
        while let Some(top) = self.q.peek() {
            if top.at > until || world.halted() {
                break;
            }
            let Some(item) = self.q.pop() else { break };
            self.now = item.at;
            self.executed += 1;
            debug!(now = ?self.now, seq = item.seq, remaining_queue = self.q.len(), "执行事件");

            item.ev.execute(self, world);
            world.on_tick(self);
        }

        if !world.halted() {
            self.now = self.now.max(until);
        }

        info!(
            events = self.executed - start_count,
            final_time = ?self.now,
            halted = world.halted(),
            "✅ 仿真完成"
        );
    }
}
