//! 仿真随机源
//!
//! 整个运行共享一个 `SmallRng`，由 `random_seed` 确定性播种。调度是单线程且
//! 按 (时间, 登记序号) 全序执行，因此随机数的消费顺序、进而每一步的决策
//! 都由种子唯一确定。

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

pub struct SimRng(SmallRng);

impl SimRng {
    pub fn new(seed: u64) -> Self {
        SimRng(SmallRng::seed_from_u64(seed))
    }

    /// [0, 1) 上的均匀抽样
    #[inline]
    pub fn uniform(&mut self) -> f64 {
        self.0.r#gen::<f64>()
    }

    /// 以概率 `p`（钳制到 [0, 1]）返回 true
    #[inline]
    pub fn gen_bool(&mut self, p: f64) -> bool {
        self.0.gen_bool(p.clamp(0.0, 1.0))
    }

    /// 均值为 `mean` 的指数分布抽样（逆变换法）
    pub fn exponential(&mut self, mean: f64) -> f64 {
        if !(mean > 0.0) {
            return 0.0;
        }
        let u = self.uniform();
        -mean * (1.0 - u).ln()
    }
}

impl std::fmt::Debug for SimRng {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("SimRng")
    }
}
