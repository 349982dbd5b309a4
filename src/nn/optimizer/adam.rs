/*
 * @Author       : 老董
 * @Description  : Adam优化器实现
 */

use std::collections::HashMap;

use super::base::{Optimizer, OptimizerState};
use crate::nn::{Graph, GraphError, NodeId};
use crate::tensor::Tensor;

/// Adam优化器
#[derive(Debug)]
pub struct Adam {
    state: OptimizerState,
    beta1: f32,
    beta2: f32,
    epsilon: f32,
    /// 一阶矩估计
    m: HashMap<NodeId, Tensor>,
    /// 二阶矩估计
    v: HashMap<NodeId, Tensor>,
    /// 时间步
    t: usize,
}

impl Adam {
    /// 为图中所有可训练节点创建Adam优化器
    pub fn new(
        graph: &Graph,
        learning_rate: f32,
        beta1: f32,
        beta2: f32,
        epsilon: f32,
    ) -> Self {
        Self::with_params(&graph.get_trainable_nodes(), learning_rate, beta1, beta2, epsilon)
    }

    /// 使用默认参数（β1=0.9，β2=0.999，ε=1e-8）创建Adam优化器
    pub fn new_default(graph: &Graph, learning_rate: f32) -> Self {
        Self::new(graph, learning_rate, 0.9, 0.999, 1e-8)
    }

    /// 只优化指定的参数
    pub fn with_params(
        params: &[NodeId],
        learning_rate: f32,
        beta1: f32,
        beta2: f32,
        epsilon: f32,
    ) -> Self {
        Self {
            state: OptimizerState::with_params(params.to_vec(), learning_rate),
            beta1,
            beta2,
            epsilon,
            m: HashMap::new(),
            v: HashMap::new(),
            t: 0,
        }
    }
}

impl Optimizer for Adam {
    fn step(&mut self, graph: &mut Graph) -> Result<(), GraphError> {
        self.t += 1;

        // 先收集所有需要更新的参数及其梯度（避免借用冲突）；没有梯度的参数本步不更新
        let mut gradients = Vec::new();
        for &node_id in self.state.trainable_nodes() {
            if let Some(grad) = graph.get_node_grad(node_id)? {
                gradients.push((node_id, grad.clone()));
            }
        }

        for (node_id, gradient) in gradients {
            self.adam_update_with_gradient(graph, node_id, &gradient)?;
        }
        Ok(())
    }

    fn zero_grad(&self, graph: &mut Graph) -> Result<(), GraphError> {
        for &node_id in self.state.trainable_nodes() {
            graph.get_node_mut(node_id)?.set_grad(None);
        }
        Ok(())
    }

    fn reset(&mut self) {
        self.m.clear();
        self.v.clear();
        self.t = 0;
    }

    fn learning_rate(&self) -> f32 {
        self.state.learning_rate()
    }

    fn set_learning_rate(&mut self, lr: f32) {
        self.state.set_learning_rate(lr);
    }
}

impl Adam {
    fn adam_update_with_gradient(
        &mut self,
        graph: &mut Graph,
        node_id: NodeId,
        gradient: &Tensor,
    ) -> Result<(), GraphError> {
        let current_value = graph.get_node_value(node_id)?.ok_or_else(|| {
            GraphError::ComputationError(format!("参数{node_id}没有值，无法更新"))
        })?;

        // 原地更新一阶矩估计: m = β1 * m + (1 - β1) * g
        let m = self
            .m
            .entry(node_id)
            .or_insert_with(|| Tensor::zeros(gradient.shape()));
        *m *= self.beta1;
        *m += &(gradient * (1.0 - self.beta1));

        // 原地更新二阶矩估计: v = β2 * v + (1 - β2) * g²
        let v = self
            .v
            .entry(node_id)
            .or_insert_with(|| Tensor::zeros(gradient.shape()));
        *v *= self.beta2;
        *v += &(gradient * gradient * (1.0 - self.beta2));

        // 偏差修正
        let m_hat = &*m / (1.0 - self.beta1.powi(self.t as i32));
        let v_hat = &*v / (1.0 - self.beta2.powi(self.t as i32));

        // 参数更新: θ = θ - α * m_hat / (√v_hat + ε)
        let update = &m_hat / &(v_hat.sqrt() + self.epsilon);
        let new_value = current_value - &(self.state.learning_rate() * &update);

        graph.set_node_value(node_id, &new_value)
    }
}
