/*
 * @Author       : 老董
 * @Description  : 优化器基础trait和辅助结构
 */

use crate::nn::{Graph, GraphError, NodeId};

/// 优化器核心 trait
pub trait Optimizer {
    /// 参数更新（使用已计算的梯度）
    ///
    /// `PyTorch` 风格训练循环：
    /// ```ignore
    /// optimizer.zero_grad(&mut graph);
    /// graph.forward(loss)?;
    /// graph.backward(loss)?;
    /// optimizer.step(&mut graph)?; // ← 只更新参数，不做 forward/backward
    /// ```
    fn step(&mut self, graph: &mut Graph) -> Result<(), GraphError>;

    /// 清空本优化器所管理参数的梯度
    fn zero_grad(&self, graph: &mut Graph) -> Result<(), GraphError>;

    /// 重置累积状态
    fn reset(&mut self);

    fn learning_rate(&self) -> f32;

    fn set_learning_rate(&mut self, lr: f32);
}

/// 优化器状态管理（内部实现，不对外暴露）
#[derive(Debug)]
pub(crate) struct OptimizerState {
    /// 可训练参数的节点 ID 列表
    trainable_nodes: Vec<NodeId>,
    learning_rate: f32,
}

impl OptimizerState {
    pub(crate) const fn with_params(params: Vec<NodeId>, learning_rate: f32) -> Self {
        Self {
            trainable_nodes: params,
            learning_rate,
        }
    }

    pub(crate) fn trainable_nodes(&self) -> &[NodeId] {
        &self.trainable_nodes
    }

    pub(crate) const fn learning_rate(&self) -> f32 {
        self.learning_rate
    }

    pub(crate) const fn set_learning_rate(&mut self, lr: f32) {
        self.learning_rate = lr;
    }
}
