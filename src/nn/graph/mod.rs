/*
 * @Author       : 老董
 * @Description  : 计算图
 *
 * 各 impl 块分散在子模块中：
 * - core.rs: 节点查询、取值/赋值、梯度清零、参数重置
 * - node_builders.rs: new_*_node
 * - forward.rs: 前向传播
 * - backward.rs: VJP 反向传播
 * - mode.rs: train/eval
 */

mod backward;
mod core;
mod error;
mod forward;
mod mode;
mod node_builders;

pub use error::GraphError;

use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::nn::nodes::NodeHandle;

/// 计算图：节点按创建顺序存放，`NodeId`即其下标
#[derive(Debug)]
pub struct Graph {
    pub(in crate::nn::graph) nodes: Vec<NodeHandle>,
    pub(in crate::nn::graph) is_eval_mode: bool,
    /// 图级别的随机数生成器（参数初始化、Dropout 掩码）
    pub(in crate::nn::graph) rng: StdRng,
    pub(in crate::nn::graph) seed: Option<u64>,
}

impl Graph {
    /// 创建一个新图，随机数种子取自系统熵源
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_entropy(), None)
    }

    /// 创建一个使用固定种子的图（参数初始化与 Dropout 均可复现）
    pub fn new_with_seed(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed), Some(seed))
    }

    fn with_rng(rng: StdRng, seed: Option<u64>) -> Self {
        Self {
            nodes: Vec::new(),
            is_eval_mode: false,
            rng,
            seed,
        }
    }

    pub const fn seed(&self) -> Option<u64> {
        self.seed
    }
}

impl Default for Graph {
    fn default() -> Self {
        Self::new()
    }
}
