//! 事件 trait
//!
//! 定义仿真事件接口。智能体（车辆、入口生成器）都以事件的形式挂起/恢复：
//! 执行一步后为自己调度下一次唤醒，然后返回。

use super::simulator::Simulator;
use super::world::World;

/// 事件：可被调度执行。使用 `self: Box<Self>` 以支持 move/所有权转移。
pub trait Event: Send + 'static {
    fn execute(self: Box<Self>, sim: &mut Simulator, world: &mut dyn World);
}
