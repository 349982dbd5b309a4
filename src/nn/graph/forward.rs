use super::{Graph, GraphError};
use crate::nn::NodeId;
use crate::nn::nodes::{ForwardContext, TraitNode};
use crate::tensor::Tensor;

impl Graph {
    /// 前向传播：按拓扑序重新计算`target`及其所有非叶子祖先的值。
    /// 叶子节点必须已有值。
    pub fn forward(&mut self, target: NodeId) -> Result<(), GraphError> {
        let order = self.ancestors(target)?;
        for id in order {
            let idx = id.index();
            if self.nodes[idx].is_leaf() {
                if self.nodes[idx].value().is_none() {
                    return Err(GraphError::ComputationError(format!(
                        "{}没有值，无法前向传播，请先设置其值",
                        self.nodes[idx]
                    )));
                }
                continue;
            }

            // 父节点编号总小于本节点，拆分后可同时借用父节点的值与本节点
            let (before, rest) = self.nodes.split_at_mut(idx);
            let node = &mut rest[0];
            let parents = node
                .parents()
                .iter()
                .map(|p| {
                    before[p.index()].value().ok_or_else(|| {
                        GraphError::ComputationError(format!(
                            "{}的父节点{}没有值。不该触及本错误，否则说明crate代码有问题",
                            node,
                            before[p.index()]
                        ))
                    })
                })
                .collect::<Result<Vec<&Tensor>, _>>()?;
            let mut ctx = ForwardContext {
                is_train_mode: !self.is_eval_mode,
                rng: &mut self.rng,
            };
            let value = node.raw_node_mut().calc_value_by_parents(&parents, &mut ctx)?;
            node.set_value(Some(value));
        }
        Ok(())
    }
}
