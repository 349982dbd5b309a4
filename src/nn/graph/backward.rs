use std::collections::HashMap;

use tracing::warn;

use super::{Graph, GraphError};
use crate::nn::NodeId;
use crate::nn::nodes::TraitNode;
use crate::tensor::Tensor;

impl Graph {
    // ========== VJP 反向传播核心 ==========

    /// 反向传播：从标量损失出发，按逆拓扑序把梯度传给各父节点，
    /// 最终累加到参数节点的`.grad`上（多次反向之间不清零，需调用`zero_grad`）。
    /// 返回损失值。
    pub fn backward(&mut self, loss: NodeId) -> Result<f32, GraphError> {
        if !self.is_train_mode() {
            warn!("在 eval 模式下调用 backward，这通常是误用");
        }

        let loss_node = self.get_node(loss)?;
        let loss_value = loss_node.value().ok_or_else(|| {
            GraphError::ComputationError(format!("损失{loss_node}没有值，请先执行 forward"))
        })?;
        let loss_scalar = loss_value.number().ok_or_else(|| {
            GraphError::InvalidOperation(format!(
                "反向传播要求损失为标量 [1, 1]，但得到 {:?}",
                loss_value.shape()
            ))
        })?;

        let order = self.ancestors(loss)?;
        let needs_grad = self.nodes_needing_grad(&order);

        let mut pending: HashMap<NodeId, Tensor> = HashMap::new();
        pending.insert(loss, Tensor::ones(&[1, 1]));
        let mut param_grads = Vec::new();

        for &id in order.iter().rev() {
            let Some(upstream) = pending.remove(&id) else {
                continue;
            };
            let node = self.get_node(id)?;
            if node.is_leaf() {
                if node.is_trainable() {
                    param_grads.push((id, upstream));
                }
                continue;
            }

            let value = node.value().ok_or_else(|| {
                GraphError::ComputationError(format!("{node}没有值，请先执行 forward"))
            })?;
            let parents = node
                .parents()
                .iter()
                .map(|&p| {
                    self.get_node(p)?.value().ok_or_else(|| {
                        GraphError::ComputationError(format!("{node}的父节点{p}没有值"))
                    })
                })
                .collect::<Result<Vec<&Tensor>, _>>()?;

            for (k, &parent) in node.parents().iter().enumerate() {
                if !needs_grad[parent.index()] {
                    continue;
                }
                let grad = node
                    .raw_node()
                    .calc_grad_to_parent(k, &parents, value, &upstream)?;
                match pending.get_mut(&parent) {
                    Some(acc) => *acc += &grad,
                    None => {
                        pending.insert(parent, grad);
                    }
                }
            }
        }

        for (id, grad) in param_grads {
            self.get_node_mut(id)?.accumulate_grad(&grad);
        }

        Ok(loss_scalar)
    }

    /// 标记哪些节点需要梯度：参数节点本身，以及任一父节点需要梯度的运算节点。
    /// 只依赖输入的子图（如第一层对原始特征的传播）不必求梯度。
    fn nodes_needing_grad(&self, order: &[NodeId]) -> Vec<bool> {
        let mut needs = vec![false; self.nodes.len()];
        for &id in order {
            let node = &self.nodes[id.index()];
            needs[id.index()] = if node.is_leaf() {
                node.is_trainable()
            } else {
                node.parents().iter().any(|p| needs[p.index()])
            };
        }
        needs
    }
}
